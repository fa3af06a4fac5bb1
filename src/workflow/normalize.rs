//! Submission normalizer: trims, validates, and protocol-qualifies a
//! user-entered product URL before it is used as a request key.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use url::Url;

/// A validated, protocol-qualified product URL. Only the normalizer
/// constructs these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonicalizes a raw URL string.
///
/// Already-valid http/https input passes through unchanged, so normalizing
/// twice is a no-op. Scheme-less input (and input whose "scheme" is really a
/// host, as `host:port` parses) gets `https://` prefixed exactly once and is
/// re-validated. Anything else is rejected.
pub fn normalize(raw: &str) -> Result<CanonicalUrl, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            Ok(CanonicalUrl(trimmed.to_string()))
        }
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
            let prefixed = format!("https://{}", trimmed);
            match Url::parse(&prefixed) {
                Ok(parsed) if parsed.host_str().is_some() => Ok(CanonicalUrl(prefixed)),
                _ => Err(ValidationError::InvalidUrl),
            }
        }
        Err(_) => Err(ValidationError::InvalidUrl),
    }
}
