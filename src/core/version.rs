//! Compiler version parsing and comparison.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version `{0}`")]
    Invalid(String),
}

/// Parse a compiler version leniently.
///
/// Surrounding whitespace and a leading `v` are ignored, missing minor and
/// patch components default to zero and leading zeros are dropped, so
/// `13`, `v13.2` and `013.02.0` all parse.
pub fn parse_tolerant(s: &str) -> Result<Version, VersionError> {
    let invalid = || VersionError::Invalid(s.to_string());

    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let (core, rest) = match trimmed.find(['-', '+']) {
        Some(i) => trimmed.split_at(i),
        None => (trimmed, ""),
    };

    let mut parts: Vec<String> = Vec::with_capacity(3);
    for part in core.split('.') {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let stripped = part.trim_start_matches('0');
        parts.push(if stripped.is_empty() { "0" } else { stripped }.to_string());
    }
    if parts.len() > 3 {
        return Err(invalid());
    }
    parts.resize(3, "0".to_string());

    Version::parse(&format!("{}{}", parts.join("."), rest)).map_err(|_| invalid())
}

/// Compare two version strings.
///
/// Parsable versions compare semantically and rank above unparsable ones;
/// two unparsable versions compare as text.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_tolerant(a), parse_tolerant(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// A dotted version with up to four numeric components, as used by
/// Visual Studio (`17.9.34607.119`) and MSVC toolsets (`14.39.33519`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionQuad {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
}

impl FromStr for VersionQuad {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid(s.to_string());

        let mut fields = [0u64; 4];
        let mut count = 0;
        for part in s.trim().split('.') {
            if count == fields.len() {
                return Err(invalid());
            }
            fields[count] = part.parse().map_err(|_| invalid())?;
            count += 1;
        }

        Ok(VersionQuad {
            major: fields[0],
            minor: fields[1],
            patch: fields[2],
            build: fields[3],
        })
    }
}

impl fmt::Display for VersionQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Compare two quad strings; unparsable ones rank below parsable ones.
pub fn compare_quads(a: &str, b: &str) -> Ordering {
    match (a.parse::<VersionQuad>(), b.parse::<VersionQuad>()) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tolerant() {
        assert_eq!(parse_tolerant("13").unwrap(), Version::new(13, 0, 0));
        assert_eq!(parse_tolerant("v13.2").unwrap(), Version::new(13, 2, 0));
        assert_eq!(parse_tolerant(" 013.02.0 ").unwrap(), Version::new(13, 2, 0));
        assert_eq!(parse_tolerant("17.0.6").unwrap(), Version::new(17, 0, 6));

        let pre = parse_tolerant("14.0.0-rc1").unwrap();
        assert_eq!(pre.pre.as_str(), "rc1");

        assert!(parse_tolerant("").is_err());
        assert!(parse_tolerant("gcc").is_err());
        assert!(parse_tolerant("1.2.3.4").is_err());
    }

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("13.2.0", "9.4.0"), Ordering::Greater);
        assert_eq!(compare_versions("10", "10.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("13.2.0", "trunk"), Ordering::Greater);
        assert_eq!(compare_versions("devel", "trunk"), Ordering::Less);
    }

    #[test]
    fn test_sort_descending_puts_unparsable_last() {
        let mut versions = vec!["9.4.0", "weird", "13.2.0", "11"];
        versions.sort_by(|a, b| compare_versions(b, a));
        assert_eq!(versions, vec!["13.2.0", "11", "9.4.0", "weird"]);
    }

    #[test]
    fn test_version_quad() {
        let v: VersionQuad = "14.39.33519".parse().unwrap();
        assert_eq!(
            v,
            VersionQuad {
                major: 14,
                minor: 39,
                patch: 33519,
                build: 0
            }
        );
        assert_eq!(v.to_string(), "14.39.33519.0");

        let newer: VersionQuad = "17.9.34607.119".parse().unwrap();
        let older: VersionQuad = "17.10".parse().unwrap();
        assert!(older > newer);

        assert!("1.2.3.4.5".parse::<VersionQuad>().is_err());
        assert!("14.x".parse::<VersionQuad>().is_err());
        assert!("".parse::<VersionQuad>().is_err());
    }

    #[test]
    fn test_compare_quads() {
        assert_eq!(compare_quads("14.40.33807", "14.39.33519"), Ordering::Greater);
        assert_eq!(compare_quads("garbage", "14.39"), Ordering::Less);
    }
}
