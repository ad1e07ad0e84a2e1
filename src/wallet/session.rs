//! Connected wallet session and its event subscriptions.
//!
//! Connectors report EIP-1193 style events (`accountsChanged`,
//! `chainChanged`, `disconnect`). The connector glue calls
//! [`WalletSession::deliver`] for each one; watchers registered with
//! [`WalletSession::watch`] are invoked synchronously, in subscription order,
//! after the session state has been updated.
//!
//! Only one dispatch runs at a time. Events delivered while a dispatch is in
//! progress, including from inside a handler, are queued and handed out by
//! that dispatch in arrival order once the current event's handlers return.

use crate::parser::ChainId;
use log::{debug, info};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;

/// EIP-1193 "user disconnected" provider error code
pub const DISCONNECT_CODE: i64 = 4900;

/// Event reported by the wallet connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Accounts exposed by the wallet; the first one is active. Empty when locked.
    AccountsChanged(Vec<String>),

    /// Active network switched
    ChainChanged(u64),

    /// Wallet disconnected
    Disconnected { code: i64, message: String },
}

impl SessionEvent {
    /// Build a `ChainChanged` event from the hex chain id connectors emit
    pub fn chain_changed_hex(hex_chain_id: &str) -> Option<Self> {
        let digits = hex_chain_id.trim().strip_prefix("0x")?;
        u64::from_str_radix(digits, 16).ok().map(SessionEvent::ChainChanged)
    }
}

type Handler = Arc<Mutex<dyn FnMut(&SessionEvent) + Send>>;

struct Pending {
    event: SessionEvent,
    /// Drop every watcher once this event has been handed out
    release_watchers: bool,
}

#[derive(Default)]
struct SessionState {
    address: Option<String>,
    chain_id: Option<u64>,
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
    queue: VecDeque<Pending>,
    dispatching: bool,
    closing: bool,
}

impl SessionState {
    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::AccountsChanged(accounts) => {
                self.address = accounts.first().cloned();
            }
            SessionEvent::ChainChanged(chain_id) => {
                self.chain_id = Some(*chain_id);
            }
            SessionEvent::Disconnected { .. } => {
                self.address = None;
                self.chain_id = None;
            }
        }
    }
}

/// A connected wallet
///
/// Cloning shares the same session.
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<Mutex<SessionState>>,
}

impl WalletSession {
    /// Start a session for an account resolved by the connector
    pub fn connect(address: impl Into<String>, chain_id: u64) -> Self {
        let address = address.into();
        info!("Wallet session opened for {} on chain {}", address, chain_id);

        Self {
            inner: Arc::new(Mutex::new(SessionState {
                address: Some(address),
                chain_id: Some(chain_id),
                ..SessionState::default()
            })),
        }
    }

    /// Active account, `None` once disconnected or locked
    pub fn address(&self) -> Option<String> {
        self.state().address.clone()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.state().chain_id
    }

    /// Supported network the wallet is on, `None` for other networks
    pub fn network(&self) -> Option<ChainId> {
        self.chain_id().and_then(ChainId::from_evm_chain_id)
    }

    /// Human-readable name of the connected network
    pub fn network_name(&self) -> Option<String> {
        let chain_id = self.chain_id()?;
        Some(match ChainId::from_evm_chain_id(chain_id) {
            Some(chain) => chain.display_name().to_string(),
            None => format!("Unsupported network ({})", chain_id),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.state().address.is_some()
    }

    /// Number of live subscriptions
    pub fn watcher_count(&self) -> usize {
        self.state().handlers.len()
    }

    /// Register `handler` for every subsequent event
    ///
    /// The returned [`Subscription`] unsubscribes when dropped.
    pub fn watch<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        let handler: Handler = Arc::new(Mutex::new(handler));
        state.handlers.push((id, handler));

        debug!("Session watcher {} registered", id);

        Subscription {
            id,
            session: Arc::downgrade(&self.inner),
            active: true,
        }
    }

    /// Apply an event from the connector and notify watchers
    ///
    /// Handlers run outside the session lock, so they may query the session,
    /// drop their own subscription or deliver further events. If a dispatch
    /// is already running the event is queued for it and this returns at once.
    pub fn deliver(&self, event: SessionEvent) {
        self.enqueue(Pending {
            event,
            release_watchers: false,
        });
    }

    /// Tear the session down
    ///
    /// Watchers receive one `Disconnected` event and are then released.
    /// Calling this on a session that is already disconnected does nothing.
    pub fn disconnect(&self) {
        {
            let mut state = self.state();
            if state.address.is_none() || state.closing {
                return;
            }
            state.closing = true;
        }

        info!("Wallet session disconnected");

        self.enqueue(Pending {
            event: SessionEvent::Disconnected {
                code: DISCONNECT_CODE,
                message: "disconnected by user".to_string(),
            },
            release_watchers: true,
        });
    }

    fn enqueue(&self, pending: Pending) {
        {
            let mut state = self.state();
            state.queue.push_back(pending);
            if state.dispatching {
                debug!("Dispatch in progress, {} events queued", state.queue.len());
                return;
            }
            state.dispatching = true;
        }

        let _guard = DispatchGuard(self);
        self.dispatch();
    }

    /// Hand out queued events until the queue is empty
    fn dispatch(&self) {
        loop {
            let (pending, handlers) = {
                let mut state = self.state();
                let Some(pending) = state.queue.pop_front() else {
                    state.dispatching = false;
                    return;
                };
                state.apply(&pending.event);
                let handlers: Vec<Handler> =
                    state.handlers.iter().map(|(_, h)| Arc::clone(h)).collect();
                (pending, handlers)
            };

            debug!("Delivering {:?} to {} watchers", pending.event, handlers.len());

            for handler in handlers {
                let mut handler = handler.lock().unwrap_or_else(PoisonError::into_inner);
                (&mut *handler)(&pending.event);
            }

            if pending.release_watchers {
                let released = {
                    let mut state = self.state();
                    state.closing = false;
                    std::mem::take(&mut state.handlers)
                };
                debug!("Released {} session watchers", released.len());
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lets later deliveries dispatch again if a handler panicked
struct DispatchGuard<'a>(&'a WalletSession);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            let mut state = self.0.state();
            state.dispatching = false;
            state.closing = false;
            state.queue.clear();
        }
    }
}

/// Handle returned by [`WalletSession::watch`]
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    session: Weak<Mutex<SessionState>>,
    active: bool,
}

impl Subscription {
    /// Stop receiving events; safe to call any number of times
    pub fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(inner) = self.session.upgrade() {
            let mut state = inner.lock().unwrap_or_else(PoisonError::into_inner);
            state.handlers.retain(|(id, _)| *id != self.id);
            debug!("Session watcher {} removed", self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_changed_hex() {
        assert_eq!(
            SessionEvent::chain_changed_hex("0x89"),
            Some(SessionEvent::ChainChanged(137))
        );
        assert_eq!(SessionEvent::chain_changed_hex("137"), None);
    }

    #[test]
    fn test_accounts_changed_updates_address() {
        let session = WalletSession::connect("0xaaa", 1);
        session.deliver(SessionEvent::AccountsChanged(vec![
            "0xbbb".to_string(),
            "0xccc".to_string(),
        ]));
        assert_eq!(session.address(), Some("0xbbb".to_string()));

        session.deliver(SessionEvent::AccountsChanged(Vec::new()));
        assert!(!session.is_connected());
    }

    #[test]
    fn test_handler_can_read_session() {
        let session = WalletSession::connect("0xaaa", 1);
        let observer = session.clone();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        let _sub = session.watch(move |_| {
            *sink.lock().unwrap() = observer.chain_id();
        });
        session.deliver(SessionEvent::ChainChanged(10));

        assert_eq!(*seen.lock().unwrap(), Some(10));
    }

    #[test]
    fn test_network_follows_chain_changes() {
        let session = WalletSession::connect("0xaaa", 1);
        assert_eq!(session.network(), Some(ChainId::Ethereum));
        assert_eq!(session.network_name().as_deref(), Some("Ethereum"));

        session.deliver(SessionEvent::ChainChanged(42161));
        assert_eq!(session.network(), Some(ChainId::Arbitrum));
        assert_eq!(session.network_name().as_deref(), Some("Arbitrum One"));

        session.deliver(SessionEvent::ChainChanged(56));
        assert_eq!(session.network(), None);
        assert_eq!(session.network_name().as_deref(), Some("Unsupported network (56)"));

        session.disconnect();
        assert_eq!(session.network_name(), None);
    }
}
