//! # TwoFA Companion – host integration
//!
//! Everything that sits between the host credential manager and the TOTP
//! engine:
//!
//! - **Classifier** – marks records whose title carries the 2FA marker
//! - **Collaborator traits** – record store, clipboard sink, user notifier
//! - **Event bus** – the host's "menu opening" event with scoped
//!   subscriptions
//! - **Service** – the trigger state machine and the generate-and-copy flow
//!
//! The host owns storage, UI, and the clipboard auto-clear timer; this crate
//! only decides eligibility, derives codes, and hands them over.

pub mod plugin;

pub use plugin::classifier::{EntryClassifier, DEFAULT_MARKER};
pub use plugin::events::{MenuOpenEvent, MenuOpeningHandler, SelectionEventBus, Subscription};
pub use plugin::host::{ClipboardSink, RecordStore, UserNotifier};
pub use plugin::service::{Plugin, PluginService, PluginServiceState};
pub use plugin::types::*;
