use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatCategory {
    Window,
    Aisle,
    Middle,
}

impl SeatCategory {
    /// Base price multiplier applied to the route fare for this seat.
    pub fn price_multiplier(self) -> f64 {
        match self {
            SeatCategory::Window => 1.0,
            SeatCategory::Aisle => 0.95,
            SeatCategory::Middle => 0.90,
        }
    }
}

/// One seat derived from a vehicle's layout. Never persisted; regenerated
/// on demand, so generation must stay deterministic for a given
/// (total_seats, pattern) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Row + column label, e.g. "12A". Stable key used by bookings.
    pub id: String,
    pub row: u32,
    pub column: char,
    pub category: SeatCategory,
    pub price_multiplier: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("unrecognised seat layout pattern: {0:?}")]
    BadPattern(String),
}

/// Column counts per side group, e.g. "2-2" -> [2, 2].
fn parse_pattern(pattern: &str) -> Result<Vec<usize>, LayoutError> {
    let groups: Vec<usize> = pattern
        .split('-')
        .map(|g| g.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|_| LayoutError::BadPattern(pattern.to_string()))?;

    let columns: usize = groups.iter().sum();
    if groups.is_empty() || groups.contains(&0) || columns > 26 {
        return Err(LayoutError::BadPattern(pattern.to_string()));
    }
    Ok(groups)
}

/// Category of the column at `index` within the row, given the side
/// groups. The leftmost column of the first group and the rightmost of the
/// last sit against the hull and are windows; columns on a group edge face
/// an aisle; anything else is boxed in.
fn categorise(index: usize, groups: &[usize]) -> SeatCategory {
    let total: usize = groups.iter().sum();
    if index == 0 || index == total - 1 {
        return SeatCategory::Window;
    }

    let mut offset = 0;
    for &size in groups {
        let last = offset + size - 1;
        if index == offset || index == last {
            return SeatCategory::Aisle;
        }
        if index < last {
            break;
        }
        offset += size;
    }
    SeatCategory::Middle
}

/// Derive the ordered seat list for a vehicle. Rows are numbered from 1,
/// columns lettered left to right across all groups; emission stops exactly
/// at `total_seats`, mid-row if necessary.
///
/// `total_seats <= 0` yields an empty list, not an error.
pub fn generate_layout(total_seats: i32, pattern: &str) -> Result<Vec<Seat>, LayoutError> {
    let groups = parse_pattern(pattern)?;
    if total_seats <= 0 {
        return Ok(Vec::new());
    }

    let columns: usize = groups.iter().sum();
    let total = total_seats as usize;
    let mut seats = Vec::with_capacity(total);

    let mut row = 1u32;
    while seats.len() < total {
        for index in 0..columns {
            if seats.len() == total {
                break;
            }
            let column = (b'A' + index as u8) as char;
            let category = categorise(index, &groups);
            seats.push(Seat {
                id: format!("{row}{column}"),
                row,
                column,
                category,
                price_multiplier: category.price_multiplier(),
            });
        }
        row += 1;
    }

    Ok(seats)
}
