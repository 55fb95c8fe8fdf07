//! Types for TOTP code derivation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Digit count every code is rendered with unless overridden.
///
/// Six digits is the de-facto authenticator standard and what the host
/// manager's users expect to type; the width is part of the observable
/// contract, so it is fixed here rather than left to a library default.
pub const DEFAULT_DIGITS: u8 = 6;

/// Time-step length in seconds unless overridden.
pub const DEFAULT_PERIOD: u32 = 30;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Derivation options
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tunables for code derivation.  HMAC-SHA1 is the only algorithm; the
/// plugin is not a general OTP library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpOptions {
    /// Number of digits in the rendered code (1–9).
    pub digits: u8,
    /// Time-step length in seconds (non-zero).
    pub period: u32,
}

impl Default for TotpOptions {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        }
    }
}

impl TotpOptions {
    /// Builder: set the digit count.
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Builder: set the time-step length.
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Reject option combinations derivation cannot honour.
    pub fn validate(&self) -> Result<(), OtpError> {
        if self.digits == 0 || self.digits > 9 {
            return Err(OtpError::new(
                OtpErrorKind::InvalidDigits,
                format!("digit count must be between 1 and 9, got {}", self.digits),
            ));
        }
        if self.period == 0 {
            return Err(OtpError::new(
                OtpErrorKind::InvalidPeriod,
                "time-step period must be non-zero",
            ));
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generated code
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One derived code, valid only for its time step.  Ephemeral: handed to
/// the clipboard sink and dropped, never cached or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// The code string, leading zeros preserved (e.g. `"078212"`).
    pub code: String,
    /// The time-step counter the code was derived for.
    pub counter: u64,
    /// Seconds until the step rolls over.
    pub remaining_seconds: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpErrorKind {
    /// The secret is not decodable base32.
    InvalidSecret,
    /// The requested digit count cannot be rendered.
    InvalidDigits,
    /// The requested time-step period is unusable.
    InvalidPeriod,
}

/// Crate-level error.  The message and detail describe the failure but
/// never contain the offending secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpError {
    pub kind: OtpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl OtpError {
    pub fn new(kind: OtpErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl From<OtpError> for String {
    fn from(e: OtpError) -> String {
        e.to_string()
    }
}
