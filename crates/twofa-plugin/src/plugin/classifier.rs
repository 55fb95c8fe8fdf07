//! Entry classification — decides whether a credential record denotes a
//! two-factor secret.

use crate::plugin::types::CredentialRecord;

/// Title substring marking 2FA entries unless the host configures another.
pub const DEFAULT_MARKER: &str = "2FA";

/// Classifies records by a case-insensitive title substring.
#[derive(Debug, Clone)]
pub struct EntryClassifier {
    marker: String,
}

impl Default for EntryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl EntryClassifier {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The configured marker substring.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// `true` iff the record's title, case-insensitively, contains the
    /// marker.  Absent or empty titles never classify; neither does an
    /// empty marker (a match-everything marker is never useful).
    ///
    /// Pure with respect to the record: same title, same answer.
    pub fn is_two_factor_entry(&self, record: &CredentialRecord) -> bool {
        if self.marker.is_empty() {
            return false;
        }
        let title = match record.title() {
            Some(t) if !t.is_empty() => t,
            _ => return false,
        };
        let matched = title
            .to_lowercase()
            .contains(&self.marker.to_lowercase());
        log::trace!(
            "title {:?} {} marker {:?}",
            title,
            if matched { "contains" } else { "does not contain" },
            self.marker
        );
        matched
    }
}
