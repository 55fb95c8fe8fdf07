//! # TwoFA Companion – TOTP derivation
//!
//! The code-generation half of the plugin core:
//!
//! - **Secret normalization** – strips the spaces users paste along with
//!   their base32 secrets, and nothing else
//! - **RFC 4648 decoding** – case-insensitive base32 with padding tolerance
//! - **RFC 6238 / 4226** – time-step derivation and HMAC-SHA1 dynamic
//!   truncation, rendered as a fixed-width decimal code
//!
//! An absent secret is an expected condition (`Ok(None)`), distinct from a
//! malformed one (`Err`).

pub mod otp;

pub use otp::core::{
    decode_secret, generate_at, generate_current, hotp_raw, normalize_secret,
    seconds_remaining_at, time_step_at,
};
pub use otp::types::*;
