//! Dotted numeric versions and latest-version selection.
//!
//! A [`Version`] compares component-wise as integers, so `10` sorts after
//! `9`. When one version is a prefix of another the longer one is greater:
//! `1.2 < 1.2.0`. This is the ordering `Vec<u64>` derives, which is why the
//! components are stored as a vector rather than a fixed-width tuple.

use std::fmt;
use std::str::FromStr;

use crate::error::NetBeansError;

/// A dotted sequence of non-negative integers.
///
/// # Example
///
/// ```
/// use netbeans_manager::Version;
///
/// let older: Version = "9.0".parse().unwrap();
/// let newer: Version = "10.0".parse().unwrap();
/// assert!(newer > older);
/// assert_eq!(newer.to_string(), "10.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Returns the numeric components in order.
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl FromStr for Version {
    type Err = NetBeansError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let components = raw
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| NetBeansError::MalformedVersion {
                version: raw.to_owned(),
            })?;
        Ok(Self { components })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.components.iter();
        if let Some(first) = parts.next() {
            write!(f, "{first}")?;
        }
        for part in parts {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

/// Returns the highest version in `versions`, rendered from its numeric
/// components.
///
/// Leading zeros are normalised away: `"8.02"` is returned as `"8.2"`.
///
/// # Errors
///
/// Returns [`NetBeansError::EmptyInput`] when `versions` is empty and
/// [`NetBeansError::MalformedVersion`] when any entry fails to parse. Every
/// entry is parsed, so a malformed value is reported even when a valid
/// maximum exists.
pub fn pick_latest<I, S>(versions: I) -> Result<String, NetBeansError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut latest: Option<Version> = None;
    for raw in versions {
        let candidate: Version = raw.as_ref().parse()?;
        latest = match latest {
            Some(current) if current >= candidate => Some(current),
            _ => Some(candidate),
        };
    }
    latest
        .map(|version| version.to_string())
        .ok_or(NetBeansError::EmptyInput)
}
