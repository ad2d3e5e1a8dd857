//! Identifier and digest types.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque identifier of a dashboard entity in the monitoring system.
///
/// Restricted to the characters New Relic uses in entity GUIDs
/// (`[A-Za-z0-9_-]`, base64url without padding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DashboardGuid(String);

impl DashboardGuid {
    /// Validate and wrap a GUID string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if valid {
            Ok(Self(raw))
        } else {
            Err(CoreError::InvalidGuid(raw))
        }
    }

    /// Extract the GUID from a dashboard page URL (`.../detail/<guid>...`).
    pub fn from_url(url: &str) -> Option<Self> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"/detail/([A-Za-z0-9_-]+)").ok())
            .as_ref()?;
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_owned()))
    }

    /// Accept either a bare GUID or a dashboard URL.
    pub fn from_guid_or_url(input: &str) -> Result<Self, CoreError> {
        match Self::from_url(input) {
            Some(guid) => Ok(guid),
            None => Self::parse(input.trim()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DashboardGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DashboardGuid {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DashboardGuid {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DashboardGuid> for String {
    fn from(guid: DashboardGuid) -> Self {
        guid.0
    }
}

/// Blake3 digest of a canonical document.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUID: &str = "MXxWSVp8REFTSEJPQVJEfDEyMzQ1";

    #[test]
    fn test_guid_from_url() {
        let url = format!("https://one.newrelic.com/dashboards/detail/{GUID}?account=1&state=abc");
        assert_eq!(DashboardGuid::from_url(&url).unwrap().as_str(), GUID);
    }

    #[test]
    fn test_guid_from_url_without_detail_segment() {
        assert!(DashboardGuid::from_url("https://one.newrelic.com/dashboards").is_none());
        assert!(DashboardGuid::from_url("https://one.newrelic.com/detail/").is_none());
    }

    #[test]
    fn test_guid_parse_rejects_bad_input() {
        assert!(DashboardGuid::parse("").is_err());
        assert!(DashboardGuid::parse("abc def").is_err());
        assert!(DashboardGuid::parse("abc/def").is_err());
        assert!(DashboardGuid::parse("abc_DEF-123").is_ok());
    }

    #[test]
    fn test_guid_from_guid_or_url() {
        assert_eq!(DashboardGuid::from_guid_or_url(GUID).unwrap().as_str(), GUID);
        let url = format!("https://one.eu.newrelic.com/dashboards/detail/{GUID}");
        assert_eq!(DashboardGuid::from_guid_or_url(&url).unwrap().as_str(), GUID);
        assert!(DashboardGuid::from_guid_or_url("https://example.com/").is_err());
    }

    #[test]
    fn test_guid_serde_validates() {
        let guid: DashboardGuid = serde_json::from_str(&format!("\"{GUID}\"")).unwrap();
        assert_eq!(guid.as_str(), GUID);
        assert!(serde_json::from_str::<DashboardGuid>("\"not valid\"").is_err());
    }

    #[test]
    fn test_digest_hex() {
        let d = Digest::of(b"{}");
        assert_eq!(d.to_hex().len(), 64);
        assert_eq!(d.short().len(), 12);
        assert!(d.to_hex().starts_with(&d.short()));
    }
}
