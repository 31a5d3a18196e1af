//! Stateful chat core
//!
//! - `message` / `log`: the append-only conversation
//! - `session`: ownership of the backend session id
//! - `dispatcher` / `progress`: single-flight submission with a rotating
//!   progress line
//! - `notify`: transient notifications
//! - `controller`: the composition the front ends drive

pub mod controller;
pub mod dispatcher;
pub mod log;
pub mod message;
pub mod notify;
pub mod progress;
pub mod session;

pub use controller::{ChatController, ChatSettings, NewConversation, SubmitOutcome};
pub use dispatcher::{DispatchState, InFlight, QueryDispatcher, Settlement};
pub use log::ConversationLog;
pub use message::{Message, Role};
pub use notify::{
    Notification, NotificationLevel, Notifier, RecordingNotifier, TerminalNotifier,
};
pub use progress::{ProgressSettings, ProgressTicker};
pub use session::{SessionChange, SessionManager};
