use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::layout::Seat;

/// Fixed-formula fare tiers layered on a route's base price. This is a
/// stub, not a yield-management engine: the multipliers never move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareTable {
    pub tier_multipliers: HashMap<String, f64>,
}

impl Default for FareTable {
    fn default() -> Self {
        let mut m = HashMap::new();
        m.insert("economy".to_string(), 1.0);
        m.insert("premium".to_string(), 1.25);
        m.insert("vip".to_string(), 1.5);
        Self {
            tier_multipliers: m,
        }
    }
}

impl FareTable {
    /// Price per tier for a given route base price, rounded to the cent.
    pub fn tier_prices(&self, base_price_cents: i32) -> HashMap<String, i32> {
        self.tier_multipliers
            .iter()
            .map(|(tier, m)| (tier.clone(), apply_multiplier(base_price_cents, *m)))
            .collect()
    }
}

/// Total fare for a seat selection: the base price scaled by each seat's
/// category multiplier, rounded per seat so the sum matches what each
/// ticket line shows.
pub fn quote_total(base_price_cents: i32, seats: &[&Seat]) -> i32 {
    seats
        .iter()
        .map(|seat| apply_multiplier(base_price_cents, seat.price_multiplier))
        .sum()
}

fn apply_multiplier(base_price_cents: i32, multiplier: f64) -> i32 {
    (base_price_cents as f64 * multiplier).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_layout;

    #[test]
    fn test_quote_scales_per_seat() {
        let seats = generate_layout(4, "2-2").unwrap();
        let window = &seats[0]; // 1A, multiplier 1.0
        let aisle = &seats[1]; // 1B, multiplier 0.95

        assert_eq!(quote_total(1500, &[window]), 1500);
        assert_eq!(quote_total(1500, &[aisle]), 1425);
        assert_eq!(quote_total(1500, &[window, aisle]), 2925);
    }

    #[test]
    fn test_tier_prices_fixed_formula() {
        let table = FareTable::default();
        let prices = table.tier_prices(1500);
        assert_eq!(prices["economy"], 1500);
        assert_eq!(prices["premium"], 1875);
        assert_eq!(prices["vip"], 2250);
    }
}
