//! Payment records, settlement and the payment/ticket state machine.

mod processor;
mod settlement;
mod sqlite_store;
mod store;
mod types;

pub use processor::{PayError, PaymentProcessor};
pub use settlement::{RandomGateway, SettlementOutcome, SettlementProvider};
pub use sqlite_store::SqlitePaymentStore;
pub use store::{CreatePaymentRequest, PaymentError, PaymentStore};
pub use types::{Payment, PaymentStatus};
