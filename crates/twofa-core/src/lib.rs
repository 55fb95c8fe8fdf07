//! # TwoFA Companion – shared infrastructure
//!
//! Diagnostics plumbing used by the plugin crates: an append-only,
//! activation-gated file log for field troubleshooting.

pub mod diagnostics;

pub use diagnostics::{DiagnosticError, DiagnosticLog};
