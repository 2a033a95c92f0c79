pub mod auth;
pub mod config;
pub mod db;
pub mod fares;
pub mod notify;
pub mod payment;
pub mod testing;
pub mod ticket;
pub mod user;

pub use auth::{hash_password, verify_password, AuthError, Claims, TokenGate};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, QueueConfig,
    SanitizedConfig,
};
pub use db::Db;
pub use fares::{price_of, quote, validity_of, FareQuote};
pub use notify::{
    create_notifier, NotificationEvent, NotificationQueue, NotificationWorker, Notifier,
    QueueError, QueuePump, QueuedNotification, RedisQueue,
};
pub use payment::{
    CreatePaymentRequest, PayError, Payment, PaymentError, PaymentProcessor, PaymentStatus,
    PaymentStore, RandomGateway, SettlementOutcome, SettlementProvider, SqlitePaymentStore,
};
pub use ticket::{
    CreateTicketRequest, SqliteTicketStore, Ticket, TicketError, TicketFilter, TicketStatus,
    TicketStore, Validation,
};
pub use user::{CreateUserRequest, SqliteUserStore, User, UserError, UserStore};
