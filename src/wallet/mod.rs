//! Wallet session state supplied by an external wallet connector.
//!
//! The session is constructed explicitly by the caller and passed to whatever
//! needs the connected account; there is no process-wide connector.

pub mod session;

pub use session::{SessionEvent, Subscription, WalletSession, DISCONNECT_CODE};
