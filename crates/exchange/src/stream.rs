use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use venuelink_core::BalanceMap;

use crate::traits::{BalanceHandler, BalanceStream};

#[derive(Debug, Clone, PartialEq)]
pub enum BalanceEvent {
    Update(BalanceMap),
    Snapshot(BalanceMap),
}

/// Callback hub a venue transport pushes balance events into.
///
/// Handlers are invoked in registration order, outside the registry lock, so
/// a handler may register further handlers without deadlocking.
#[derive(Default)]
pub struct StandardStream {
    balance_update_handlers: RwLock<Vec<BalanceHandler>>,
    balance_snapshot_handlers: RwLock<Vec<BalanceHandler>>,
}

impl StandardStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_balance_update(&self, balances: &BalanceMap) {
        let handlers = self.balance_update_handlers.read().clone();
        debug!(
            "Dispatching balance update ({} currencies) to {} handler(s)",
            balances.len(),
            handlers.len()
        );
        for handler in handlers {
            handler(balances);
        }
    }

    pub fn emit_balance_snapshot(&self, balances: &BalanceMap) {
        let handlers = self.balance_snapshot_handlers.read().clone();
        debug!(
            "Dispatching balance snapshot ({} currencies) to {} handler(s)",
            balances.len(),
            handlers.len()
        );
        for handler in handlers {
            handler(balances);
        }
    }

    pub fn emit(&self, event: &BalanceEvent) {
        match event {
            BalanceEvent::Update(balances) => self.emit_balance_update(balances),
            BalanceEvent::Snapshot(balances) => self.emit_balance_snapshot(balances),
        }
    }

    /// Drain `rx` on a dedicated task, dispatching events in arrival order.
    /// The task ends when every sender is dropped.
    pub fn spawn_dispatcher(self: Arc<Self>, mut rx: mpsc::UnboundedReceiver<BalanceEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                self.emit(&event);
            }
            debug!("Balance event channel closed");
        })
    }

    pub fn handler_counts(&self) -> (usize, usize) {
        (
            self.balance_update_handlers.read().len(),
            self.balance_snapshot_handlers.read().len(),
        )
    }
}

impl std::fmt::Debug for StandardStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (updates, snapshots) = self.handler_counts();
        f.debug_struct("StandardStream")
            .field("balance_update_handlers", &updates)
            .field("balance_snapshot_handlers", &snapshots)
            .finish()
    }
}

impl BalanceStream for StandardStream {
    fn on_balance_update(&self, handler: BalanceHandler) {
        self.balance_update_handlers.write().push(handler);
    }

    fn on_balance_snapshot(&self, handler: BalanceHandler) {
        self.balance_snapshot_handlers.write().push(handler);
    }
}
