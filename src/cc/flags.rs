//! Per-configuration compiler flags.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown build config `{0}`")]
pub struct UnknownConfig(pub String);

/// A build configuration, as understood by CMake-style generators.
///
/// `All` holds flags shared by every configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BuildConfig {
    #[default]
    All,
    Debug,
    Release,
    MinSizeRel,
    RelWithDebInfo,
}

impl BuildConfig {
    pub const ALL: [BuildConfig; 5] = [
        BuildConfig::All,
        BuildConfig::Debug,
        BuildConfig::Release,
        BuildConfig::MinSizeRel,
        BuildConfig::RelWithDebInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfig::All => "all",
            BuildConfig::Debug => "debug",
            BuildConfig::Release => "release",
            BuildConfig::MinSizeRel => "minsizerel",
            BuildConfig::RelWithDebInfo => "relwithdebinfo",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildConfig {
    type Err = UnknownConfig;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        BuildConfig::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| UnknownConfig(s.to_string()))
    }
}

impl Serialize for BuildConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BuildConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A deduplicated, sorted set of flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeSet<String>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<I, S>(&mut self, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(flags.into_iter().map(Into::into));
    }

    /// Add every flag of `other`.
    pub fn insert(&mut self, other: &FlagSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FlagSet::new();
        set.add(iter);
        set
    }
}

/// Flag sets keyed by build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(BTreeMap<BuildConfig, FlagSet>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add flags to `config`. Adding nothing leaves the map untouched.
    pub fn add<I, S>(&mut self, config: BuildConfig, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut flags = flags.into_iter().peekable();
        if flags.peek().is_none() {
            return;
        }
        self.0.entry(config).or_default().add(flags);
    }

    pub fn get(&self, config: BuildConfig) -> Option<&FlagSet> {
        self.0.get(&config)
    }

    /// Flags in effect for `config`: the shared `All` set plus its own.
    pub fn effective(&self, config: BuildConfig) -> FlagSet {
        let mut set = self.get(BuildConfig::All).cloned().unwrap_or_default();
        if config != BuildConfig::All {
            if let Some(own) = self.get(config) {
                set.insert(own);
            }
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuildConfig, &FlagSet)> {
        self.0.iter().map(|(c, f)| (*c, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_text() {
        for config in BuildConfig::ALL {
            assert_eq!(config.to_string().parse::<BuildConfig>().unwrap(), config);
        }
        assert_eq!("RelWithDebInfo".parse::<BuildConfig>().unwrap(), BuildConfig::RelWithDebInfo);
        assert_eq!(
            "profile".parse::<BuildConfig>().unwrap_err().to_string(),
            "unknown build config `profile`"
        );
    }

    #[test]
    fn test_build_config_serde() {
        let json = serde_json::to_string(&BuildConfig::MinSizeRel).unwrap();
        assert_eq!(json, "\"minsizerel\"");
        let parsed: BuildConfig = serde_json::from_str("\"Debug\"").unwrap();
        assert_eq!(parsed, BuildConfig::Debug);
        assert!(serde_json::from_str::<BuildConfig>("\"fast\"").is_err());
    }

    #[test]
    fn test_flag_set_dedupes() {
        let mut set: FlagSet = ["-Wall", "-O2"].into_iter().collect();
        set.add(["-Wall", "-g"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["-O2", "-Wall", "-g"]);

        let mut other = FlagSet::new();
        other.add(["-DNDEBUG"]);
        set.insert(&other);
        assert_eq!(set.len(), 4);
        assert!(set.contains("-DNDEBUG"));
    }

    #[test]
    fn test_flags_per_config() {
        let mut flags = Flags::new();
        flags.add(BuildConfig::Release, Vec::<String>::new());
        assert!(flags.is_empty());

        flags.add(BuildConfig::All, ["-Wall"]);
        flags.add(BuildConfig::Release, ["-O3", "-DNDEBUG"]);
        flags.add(BuildConfig::Debug, ["-g"]);

        let release = flags.effective(BuildConfig::Release);
        assert_eq!(release.iter().collect::<Vec<_>>(), vec!["-DNDEBUG", "-O3", "-Wall"]);
        assert_eq!(flags.effective(BuildConfig::All).len(), 1);
        assert!(flags.effective(BuildConfig::MinSizeRel).contains("-Wall"));

        let json = serde_json::to_value(&flags).unwrap();
        assert_eq!(json["debug"], serde_json::json!(["-g"]));
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
    }
}
