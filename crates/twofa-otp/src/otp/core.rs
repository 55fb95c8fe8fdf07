//! Code derivation — RFC 4226 (HOTP) dynamic truncation driven by the
//! RFC 6238 time step, over HMAC-SHA1.
//!
//! The entry point is [`generate_at`]: normalize, decode, derive.  An empty
//! secret is the expected "entry has no secret configured" case and yields
//! `Ok(None)`; a malformed secret is a recoverable error.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::otp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Secret handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Strip every space character from a pasted secret.  Spaces are the one
/// thing authenticator setup screens add for readability; anything else is
/// left for the decoder to judge.
pub fn normalize_secret(raw: &str) -> String {
    raw.replace(' ', "")
}

/// Decode a normalized secret as RFC 4648 base32.
///
/// Decoding is tolerant the way authenticators are: case-insensitive and
/// indifferent to trailing `=` padding.  The error never carries the
/// secret itself.
pub fn decode_secret(normalized: &str) -> Result<Vec<u8>, OtpError> {
    let canonical = normalized.trim_end_matches('=').to_ascii_uppercase();
    if canonical.is_empty() {
        return Err(OtpError::new(
            OtpErrorKind::InvalidSecret,
            "secret contains only padding characters",
        ));
    }
    base32::decode(base32::Alphabet::Rfc4648 { padding: false }, &canonical).ok_or_else(|| {
        OtpError::new(OtpErrorKind::InvalidSecret, "secret is not valid base32")
            .with_detail(format!("{} characters after normalization", canonical.len()))
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute an HOTP code for the given raw key bytes and counter.
/// `digits` must be at most 9; [`generate_at`] validates this.
pub fn hotp_raw(key: &[u8], counter: u64, digits: u8) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(&counter.to_be_bytes());
    let hmac_result = mac.finalize().into_bytes();
    truncate(&hmac_result, digits)
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(hmac_result: &[u8], digits: u8) -> String {
    let offset = (hmac_result[hmac_result.len() - 1] & 0x0f) as usize;
    let binary = ((hmac_result[offset] as u32 & 0x7f) << 24)
        | ((hmac_result[offset + 1] as u32) << 16)
        | ((hmac_result[offset + 2] as u32) << 8)
        | (hmac_result[offset + 3] as u32);
    let code = binary % 10u32.pow(digits as u32);
    format!("{:0>width$}", code, width = digits as usize)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time steps (RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Time-step counter for a unix timestamp.  `period` must be non-zero.
pub fn time_step_at(unix_seconds: u64, period: u32) -> u64 {
    unix_seconds / period as u64
}

/// Seconds until the step containing `unix_seconds` rolls over.
pub fn seconds_remaining_at(unix_seconds: u64, period: u32) -> u32 {
    let p = period as u64;
    (p - (unix_seconds % p)) as u32
}

fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Derive the code for `raw_secret` at an explicit unix timestamp.
///
/// Returns `Ok(None)` when the secret is empty after normalization — the
/// entry simply has no secret configured and there is nothing to generate.
pub fn generate_at(
    raw_secret: &str,
    options: &TotpOptions,
    unix_seconds: u64,
) -> Result<Option<GeneratedCode>, OtpError> {
    options.validate()?;

    let normalized = normalize_secret(raw_secret);
    if normalized.is_empty() {
        log::debug!("no secret configured, skipping generation");
        return Ok(None);
    }

    let key = decode_secret(&normalized)?;
    let counter = time_step_at(unix_seconds, options.period);
    let code = hotp_raw(&key, counter, options.digits);
    Ok(Some(GeneratedCode {
        code,
        counter,
        remaining_seconds: seconds_remaining_at(unix_seconds, options.period),
    }))
}

/// Derive the code for `raw_secret` at the current system time.
pub fn generate_current(
    raw_secret: &str,
    options: &TotpOptions,
) -> Result<Option<GeneratedCode>, OtpError> {
    generate_at(raw_secret, options, current_unix_time())
}
