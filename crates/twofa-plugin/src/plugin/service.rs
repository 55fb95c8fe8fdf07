//! High-level orchestrator — owns the trigger state machine, runs the
//! generate-and-copy flow, and wires the collaborators together.
//!
//! All operations are synchronous and run on the host's event-dispatch
//! thread; the mutex around the shared service only serializes the bus
//! handler against the host action.

use std::sync::{Arc, Mutex, PoisonError};

use twofa_core::DiagnosticLog;
use twofa_otp::{generate_current, TotpOptions};

use crate::plugin::classifier::EntryClassifier;
use crate::plugin::events::{MenuOpenEvent, MenuOpeningHandler, SelectionEventBus, Subscription};
use crate::plugin::host::{ClipboardSink, RecordStore, UserNotifier};
use crate::plugin::types::*;

/// Thread-safe shared service handle.
pub type PluginServiceState = Arc<Mutex<PluginService>>;

/// Central plugin service.
pub struct PluginService {
    store: Box<dyn RecordStore + Send>,
    clipboard: Box<dyn ClipboardSink + Send>,
    notifier: Box<dyn UserNotifier + Send>,
    classifier: EntryClassifier,
    options: TotpOptions,
    diagnostics: Arc<DiagnosticLog>,
    state: TriggerState,
}

impl PluginService {
    /// Create a service wrapped in `Arc<Mutex<_>>`, logging to the default
    /// diagnostic path.
    pub fn new(
        store: Box<dyn RecordStore + Send>,
        clipboard: Box<dyn ClipboardSink + Send>,
        notifier: Box<dyn UserNotifier + Send>,
        config: PluginConfig,
    ) -> PluginServiceState {
        let diagnostics = Arc::new(DiagnosticLog::at_default_path(config.diagnostics_enabled));
        Arc::new(Mutex::new(Self::with_diagnostics(
            store,
            clipboard,
            notifier,
            config,
            diagnostics,
        )))
    }

    /// Create a plain service with an explicit diagnostic log handle.
    pub fn with_diagnostics(
        store: Box<dyn RecordStore + Send>,
        clipboard: Box<dyn ClipboardSink + Send>,
        notifier: Box<dyn UserNotifier + Send>,
        config: PluginConfig,
        diagnostics: Arc<DiagnosticLog>,
    ) -> Self {
        Self {
            store,
            clipboard,
            notifier,
            classifier: EntryClassifier::new(config.marker.clone()),
            options: config.totp_options(),
            diagnostics,
            state: TriggerState::Idle,
        }
    }

    /// Current position of the trigger state machine.
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// The diagnostic log this service traces to.
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Selection handling
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// React to the host's menu-opening event: classify the selection and
    /// settle in `Eligible` or `Ineligible`.
    pub fn on_menu_opening(&mut self, event: &MenuOpenEvent) {
        self.state = match event.current_selection() {
            None => {
                self.diagnostics.note("menu opening: nothing selected");
                TriggerState::Ineligible
            }
            Some(record) if self.classifier.is_two_factor_entry(record) => {
                self.diagnostics.note(&format!(
                    "menu opening: entry {:?} is eligible for code generation",
                    record.title().unwrap_or("<untitled>")
                ));
                TriggerState::Eligible
            }
            Some(record) => {
                self.diagnostics.note(&format!(
                    "menu opening: entry {:?} is not a 2FA entry",
                    record.title().unwrap_or("<untitled>")
                ));
                TriggerState::Ineligible
            }
        };
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Generation action
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Run the generation action once.  The host disables the action while
    /// the machine is not `Eligible`, but an invocation in that state must
    /// still be a harmless no-op.  The machine stays `Eligible` through
    /// every branch, so the action is freely repeatable.
    pub fn trigger(&mut self) -> TriggerOutcome {
        if self.state != TriggerState::Eligible {
            self.diagnostics.note("trigger ignored: no eligible entry");
            return TriggerOutcome::Ignored;
        }

        // The selection may have changed since the menu opened; re-read it.
        let record = match self.store.selected_record() {
            Some(record) => record,
            None => {
                self.diagnostics.note("trigger ignored: selection is gone");
                return TriggerOutcome::Ignored;
            }
        };

        match generate_current(record.secret().unwrap_or(""), &self.options) {
            Ok(None) => {
                self.diagnostics.note("trigger: entry has no secret configured");
                TriggerOutcome::NoSecret
            }
            Ok(Some(generated)) => {
                if self.clipboard.copy(&generated.code) {
                    self.diagnostics.note("trigger: code copied to clipboard");
                    TriggerOutcome::Copied
                } else {
                    self.diagnostics.note("trigger: clipboard refused the code");
                    TriggerOutcome::CopyFailed
                }
            }
            Err(e) => {
                // The rendered error names kind and message, never the secret.
                self.diagnostics
                    .note(&format!("trigger: generation failed: {}", e));
                self.notifier
                    .show_error("Could not generate a 2FA code", &e.to_string());
                TriggerOutcome::GenerationFailed
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Lifecycle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Bus adapter delivering menu events into the shared service.
struct ServiceHandler {
    service: PluginServiceState,
}

impl MenuOpeningHandler for ServiceHandler {
    fn on_menu_opening(&mut self, event: &MenuOpenEvent) {
        self.service
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_menu_opening(event);
    }
}

/// Registration/deregistration pair around the host's event bus.
///
/// `start` subscribes the service, `stop` (or drop) deregisters it —
/// a stopped plugin can never observe another event.
pub struct Plugin {
    service: PluginServiceState,
    subscription: Option<Subscription>,
}

impl Plugin {
    pub fn new(service: PluginServiceState) -> Self {
        Self {
            service,
            subscription: None,
        }
    }

    /// Subscribe to the host's menu-opening event.  Idempotent.
    pub fn start(&mut self, bus: &Arc<SelectionEventBus>) {
        if self.subscription.is_some() {
            return;
        }
        self.lock_service().diagnostics().note("plugin started");
        self.subscription = Some(bus.subscribe(Box::new(ServiceHandler {
            service: self.service.clone(),
        })));
    }

    /// Deregister from the bus.  Safe to call repeatedly; also runs on drop.
    pub fn stop(&mut self) {
        if self.subscription.take().is_some() {
            self.lock_service().diagnostics().note("plugin stopped");
        }
    }

    /// Whether the plugin currently holds a live subscription.
    pub fn is_started(&self) -> bool {
        self.subscription.is_some()
    }

    /// Shared handle to the service, for the host's action wiring.
    pub fn service(&self) -> PluginServiceState {
        self.service.clone()
    }

    /// Run the generation action on the shared service.
    pub fn trigger(&self) -> TriggerOutcome {
        self.lock_service().trigger()
    }

    fn lock_service(&self) -> std::sync::MutexGuard<'_, PluginService> {
        self.service.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Plugin {
    fn drop(&mut self) {
        self.stop();
    }
}
