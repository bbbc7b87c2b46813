use cashbook_core::{CashbookId, DomainError};
use cashbook_infra::{CommandDispatcher, DispatchError, InMemoryEventStore};
use cashbook_ledger::{Cashbook, CashbookCommand};

/// Shared per-process services handed to every handler.
#[derive(Debug)]
pub struct AppServices {
    dispatcher: CommandDispatcher<InMemoryEventStore>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            dispatcher: CommandDispatcher::new(InMemoryEventStore::new()),
        }
    }

    /// Execute a cashbook command and return the cashbook as it is afterwards.
    pub fn dispatch(&self, command: CashbookCommand) -> Result<Cashbook, DispatchError> {
        let cashbook_id = command.cashbook_id();
        self.dispatcher
            .dispatch::<Cashbook>(cashbook_id, command, Cashbook::empty)
    }

    /// Current state of a cashbook; `NotFound` if it was never created.
    pub fn cashbook(&self, cashbook_id: CashbookId) -> Result<Cashbook, DispatchError> {
        self.dispatcher
            .load(cashbook_id, Cashbook::empty)?
            .filter(Cashbook::is_created)
            .ok_or(DispatchError::from(DomainError::NotFound))
    }
}
