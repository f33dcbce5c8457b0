use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use farebox_core::booking::BookingStatus;
use farebox_core::payment::PaymentStatus;
use farebox_core::store::{BookingStore, FleetStore, PaymentStore, StoreError};

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total_bookings: usize,
    pub paid_bookings: usize,
    pub distinct_users: usize,
    pub total_revenue_cents: i64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutePerformance {
    pub route_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub bookings: usize,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub bookings: usize,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    #[serde(flatten)]
    pub summary: StatsSummary,
    pub top_routes: Vec<RoutePerformance>,
    pub daily_trend: Vec<TrendPoint>,
}

/// Read-only dashboard aggregation over the booking and payment logs.
/// Only ever queries; never mutates ledger state.
pub struct ReportingFacade {
    bookings: Arc<dyn BookingStore>,
    payments: Arc<dyn PaymentStore>,
    fleet: Arc<dyn FleetStore>,
}

impl ReportingFacade {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        payments: Arc<dyn PaymentStore>,
        fleet: Arc<dyn FleetStore>,
    ) -> Self {
        Self {
            bookings,
            payments,
            fleet,
        }
    }

    pub async fn stats(&self) -> Result<StatsSummary, StoreError> {
        let bookings = self.bookings.all().await?;
        let payments = self.payments.all().await?;

        let users: HashSet<&str> = bookings.iter().map(|b| b.user_id.as_str()).collect();
        let revenue: i64 = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| p.amount_cents as i64)
            .sum();

        Ok(StatsSummary {
            total_bookings: bookings.len(),
            paid_bookings: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Paid)
                .count(),
            distinct_users: users.len(),
            total_revenue_cents: revenue,
            generated_at: Utc::now(),
        })
    }

    /// Dashboard report: the summary plus the `top_n` routes by booking
    /// count and a paid-booking trend over the trailing `trailing_days`.
    pub async fn analytics(
        &self,
        top_n: usize,
        trailing_days: i64,
    ) -> Result<AnalyticsReport, StoreError> {
        let summary = self.stats().await?;
        let bookings = self.bookings.all().await?;

        // Per-route booking counts; revenue only from paid bookings.
        let mut by_route: HashMap<Uuid, (usize, i64)> = HashMap::new();
        for booking in &bookings {
            let entry = by_route.entry(booking.schedule.route_id).or_default();
            entry.0 += 1;
            if booking.status == BookingStatus::Paid {
                entry.1 += booking.total_cents as i64;
            }
        }

        let mut top_routes = Vec::with_capacity(by_route.len());
        for (route_id, (count, revenue)) in by_route {
            let (origin, destination) = match self.fleet.route(route_id).await? {
                Some(route) => (route.origin, route.destination),
                None => ("Unknown".to_string(), "Unknown".to_string()),
            };
            top_routes.push(RoutePerformance {
                route_id,
                origin,
                destination,
                bookings: count,
                revenue_cents: revenue,
            });
        }
        top_routes.sort_by(|a, b| b.bookings.cmp(&a.bookings).then(a.route_id.cmp(&b.route_id)));
        top_routes.truncate(top_n);

        let window_start = Utc::now() - Duration::days(trailing_days);
        let mut by_day: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();
        for booking in &bookings {
            if booking.status != BookingStatus::Paid || booking.created_at < window_start {
                continue;
            }
            let entry = by_day.entry(booking.created_at.date_naive()).or_default();
            entry.0 += 1;
            entry.1 += booking.total_cents as i64;
        }
        let daily_trend = by_day
            .into_iter()
            .map(|(day, (bookings, revenue_cents))| TrendPoint {
                day,
                bookings,
                revenue_cents,
            })
            .collect();

        Ok(AnalyticsReport {
            summary,
            top_routes,
            daily_trend,
        })
    }
}
