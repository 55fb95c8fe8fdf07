//! Types shared across the host-integration layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use twofa_otp::TotpOptions;

use crate::plugin::classifier::DEFAULT_MARKER;

/// Field name the host stores a record's display title under.
pub const FIELD_TITLE: &str = "Title";

/// Field name the host stores the shared secret under.  2FA entries keep
/// their base32 secret in the generic password slot.
pub const FIELD_PASSWORD: &str = "Password";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Credential record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A credential record as handed over by the host store: a bag of named
/// string fields.  The plugin never mutates one, and the type deliberately
/// implements no `Serialize` — its values are secrets and must not leave the
/// process through this crate.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialRecord {
    fields: HashMap<String, String>,
}

impl CredentialRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a named field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Typed field accessor; `None` when the field is absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The display title, if any.
    pub fn title(&self) -> Option<&str> {
        self.field(FIELD_TITLE)
    }

    /// The raw shared secret, if any.
    pub fn secret(&self) -> Option<&str> {
        self.field(FIELD_PASSWORD)
    }
}

/// Every field value except the title is redacted: records routinely carry
/// secrets and must survive accidental `{:?}` logging.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.fields.keys().collect();
        names.sort();
        let mut out = f.debug_struct("CredentialRecord");
        for name in names {
            if name == FIELD_TITLE {
                out.field(name, &self.fields[name]);
            } else {
                out.field(name, &"<redacted>");
            }
        }
        out.finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Plugin configuration, passed in at construction — there is no implicit
/// process-global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Title substring that marks a record as a 2FA entry.
    pub marker: String,
    /// Digits in the generated code.
    pub digits: u8,
    /// Time-step length in seconds.
    pub period: u32,
    /// Whether the file diagnostic log starts enabled.
    pub diagnostics_enabled: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            digits: twofa_otp::DEFAULT_DIGITS,
            period: twofa_otp::DEFAULT_PERIOD,
            diagnostics_enabled: false,
        }
    }
}

impl PluginConfig {
    /// Derivation options this configuration translates to.
    pub fn totp_options(&self) -> TotpOptions {
        TotpOptions::default()
            .with_digits(self.digits)
            .with_period(self.period)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Trigger state machine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the generation action currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    /// No selection event observed yet.
    Idle,
    /// A selection exists but is not a 2FA entry (or nothing is selected);
    /// the generation action is disabled.
    Ineligible,
    /// The selected record is a 2FA entry; the action is enabled.
    Eligible,
}

/// What a [`trigger`](crate::plugin::service::PluginService::trigger) call
/// actually did.  Lets hosts and tests observe the error-policy branch
/// without a logging side channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// Nothing was eligible; the call was a no-op.
    Ignored,
    /// The entry has no secret configured; expected, silent.
    NoSecret,
    /// A code was generated and accepted by the clipboard sink.
    Copied,
    /// The clipboard sink refused the code; silent, no retry.
    CopyFailed,
    /// Derivation failed; the user was notified once.
    GenerationFailed,
}
