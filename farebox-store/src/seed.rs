use tracing::info;
use uuid::Uuid;

use farebox_core::fleet::{Route, TransportKind, Vehicle};

use crate::memory::MemoryStore;

/// Load the demo fleet: three coach operators plus one ferry on the
/// Cambodian network. Returns the routes so callers can build schedule
/// keys without a second lookup.
pub async fn seed_sample_fleet(store: &MemoryStore) -> Vec<Route> {
    let vip_coach = Vehicle {
        id: Uuid::new_v4(),
        operator: "Mekong Express".to_string(),
        vehicle_type: "VIP Bus".to_string(),
        layout_pattern: "2-2".to_string(),
        total_seats: 44,
        amenities: string_vec(&["WiFi", "AC", "USB Charging", "Blanket", "Water"]),
    };
    let sleeper = Vehicle {
        id: Uuid::new_v4(),
        operator: "Giant Ibis".to_string(),
        vehicle_type: "Sleeper Bus".to_string(),
        layout_pattern: "2-1".to_string(),
        total_seats: 36,
        amenities: string_vec(&["WiFi", "AC", "Reclining Seats", "Meals", "Entertainment"]),
    };
    let standard = Vehicle {
        id: Uuid::new_v4(),
        operator: "Virak Buntham".to_string(),
        vehicle_type: "Standard Bus".to_string(),
        layout_pattern: "2-2".to_string(),
        total_seats: 45,
        amenities: string_vec(&["AC", "Water"]),
    };
    let catamaran = Vehicle {
        id: Uuid::new_v4(),
        operator: "Speed Ferries Cambodia".to_string(),
        vehicle_type: "Catamaran".to_string(),
        layout_pattern: "2-2".to_string(),
        total_seats: 40,
        amenities: string_vec(&["AC", "Life Jackets", "Open Deck"]),
    };

    let routes = vec![
        Route {
            id: Uuid::new_v4(),
            origin: "Phnom Penh".to_string(),
            destination: "Siem Reap".to_string(),
            distance_km: 314,
            duration: "5h 45m".to_string(),
            transport: TransportKind::Bus,
            base_price_cents: 1500,
            vehicle_id: vip_coach.id,
        },
        Route {
            id: Uuid::new_v4(),
            origin: "Siem Reap".to_string(),
            destination: "Phnom Penh".to_string(),
            distance_km: 314,
            duration: "5h 45m".to_string(),
            transport: TransportKind::Bus,
            base_price_cents: 1500,
            vehicle_id: sleeper.id,
        },
        Route {
            id: Uuid::new_v4(),
            origin: "Phnom Penh".to_string(),
            destination: "Sihanoukville".to_string(),
            distance_km: 230,
            duration: "4h 30m".to_string(),
            transport: TransportKind::Bus,
            base_price_cents: 1200,
            vehicle_id: standard.id,
        },
        Route {
            id: Uuid::new_v4(),
            origin: "Phnom Penh".to_string(),
            destination: "Kampot".to_string(),
            distance_km: 148,
            duration: "3h 15m".to_string(),
            transport: TransportKind::Bus,
            base_price_cents: 800,
            vehicle_id: standard.id,
        },
        Route {
            id: Uuid::new_v4(),
            origin: "Sihanoukville".to_string(),
            destination: "Koh Rong".to_string(),
            distance_km: 25,
            duration: "45m".to_string(),
            transport: TransportKind::Ferry,
            base_price_cents: 2500,
            vehicle_id: catamaran.id,
        },
    ];

    for vehicle in [vip_coach, sleeper, standard, catamaran] {
        store.insert_vehicle(vehicle).await;
    }
    for route in &routes {
        store.insert_route(route.clone()).await;
    }

    info!(routes = routes.len(), "sample fleet seeded");
    routes
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
