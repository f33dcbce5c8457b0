use std::sync::Arc;

use farebox_core::store::FleetStore;
use farebox_ledger::{
    BookingLedger, ExpirySweeper, PaymentProcessor, ReportingFacade, SimulatedGateway,
};
use farebox_store::app_config::BookingRules;
use farebox_store::MemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<BookingLedger>,
    pub payments: Arc<PaymentProcessor>,
    pub reporting: Arc<ReportingFacade>,
    pub sweeper: Arc<ExpirySweeper>,
    pub fleet: Arc<dyn FleetStore>,
}

impl AppState {
    /// Wire every service onto one shared store. The same `MemoryStore`
    /// serves as booking, payment and fleet repository, so all components
    /// observe a single consistent state.
    pub fn build(store: Arc<MemoryStore>, rules: &BookingRules) -> Self {
        let ledger = Arc::new(BookingLedger::with_prefix(
            store.clone(),
            store.clone(),
            &rules.reference_prefix,
        ));
        let payments = Arc::new(PaymentProcessor::new(
            store.clone(),
            store.clone(),
            Arc::new(SimulatedGateway),
        ));
        let reporting = Arc::new(ReportingFacade::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let sweeper = Arc::new(ExpirySweeper::new(
            store.clone(),
            rules.pending_expiry_seconds,
        ));

        Self {
            ledger,
            payments,
            reporting,
            sweeper,
            fleet: store,
        }
    }
}
