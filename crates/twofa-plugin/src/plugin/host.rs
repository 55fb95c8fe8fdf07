//! Collaborator traits the host credential manager implements.
//!
//! The plugin calls into these; it never owns storage, clipboard timers, or
//! dialog rendering itself.

use crate::plugin::types::CredentialRecord;

/// The host's record store, reduced to the one capability the plugin needs.
pub trait RecordStore {
    /// The record currently selected in the host UI, if any.  Queried both
    /// when the entry menu opens and again at trigger time — the selection
    /// may change between the two.
    fn selected_record(&self) -> Option<CredentialRecord>;
}

/// The host's clipboard, including whatever auto-clear countdown it runs.
pub trait ClipboardSink {
    /// Place `text` on the clipboard.  `false` means the write was refused;
    /// the plugin does nothing further (no retry).
    fn copy(&mut self, text: &str) -> bool;
}

/// The host's user-facing error surface (a blocking dialog or equivalent).
pub trait UserNotifier {
    /// Present a generation failure to the user.  Called at most once per
    /// trigger; `message` names the failure kind and message but never the
    /// offending secret.
    fn show_error(&mut self, title: &str, message: &str);
}
