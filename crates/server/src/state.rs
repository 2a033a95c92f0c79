use std::sync::Arc;

use faregate_core::{
    Config, Notifier, PaymentProcessor, PaymentStore, SanitizedConfig, TicketStore, TokenGate,
    UserStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    auth: TokenGate,
    users: Arc<dyn UserStore>,
    tickets: Arc<dyn TicketStore>,
    payments: Arc<dyn PaymentStore>,
    processor: PaymentProcessor,
    notifier: Notifier,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        auth: TokenGate,
        users: Arc<dyn UserStore>,
        tickets: Arc<dyn TicketStore>,
        payments: Arc<dyn PaymentStore>,
        processor: PaymentProcessor,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            auth,
            users,
            tickets,
            payments,
            processor,
            notifier,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn auth(&self) -> &TokenGate {
        &self.auth
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn tickets(&self) -> &dyn TicketStore {
        self.tickets.as_ref()
    }

    pub fn payments(&self) -> &dyn PaymentStore {
        self.payments.as_ref()
    }

    pub fn processor(&self) -> &PaymentProcessor {
        &self.processor
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
