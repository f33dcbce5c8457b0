pub mod expiry;
pub mod ledger;
pub mod payments;
pub mod reporting;

pub use expiry::ExpirySweeper;
pub use ledger::{BookingLedger, LedgerError, ScheduleSnapshot};
pub use payments::{PaymentError, PaymentOutcome, PaymentProcessor, SimulatedGateway};
pub use reporting::ReportingFacade;
