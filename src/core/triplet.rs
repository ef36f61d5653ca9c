//! Target triplet parsing and normalization.
//!
//! A triplet such as `x86_64-pc-linux-gnu` is split into hyphen-separated
//! segments and each segment is classified against lookup tables. The result
//! is a [`Target`] with canonical lowercase tokens (`x64`, `linux`, `elf`,
//! `glibc`), or `"unknown"` for categories no segment matched.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value used for a category no segment matched.
pub const UNKNOWN: &str = "unknown";

/// Error produced by triplet parsing or validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripletError {
    #[error("empty target string")]
    Empty,

    #[error("invalid target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },
}

const ARCH_TABLE: &[(&str, &str)] = &[
    ("x64", "x64"),
    ("amd64", "x64"),
    ("x86_64", "x64"),
    ("x32", "x32"),
    ("86", "x32"),
    ("x86", "x32"),
    ("386", "x32"),
    ("i386", "x32"),
    ("486", "x32"),
    ("i486", "x32"),
    ("586", "x32"),
    ("i586", "x32"),
    ("686", "x32"),
    ("i686", "x32"),
    ("arm", "arm"),
    ("arm32", "arm"),
    ("arm64", "arm64"),
    ("aarch64", "arm64"),
    ("ia64", "ia64"),
    ("powerpc", "powerpc"),
    ("powerpcle", "powerpcle"),
    ("s390", "s390"),
    ("s390x", "s390x"),
    ("sparc", "sparc"),
    ("sparc64", "sparc64"),
    ("sparcv9", "sparc64"),
    ("c6x", "c6x"),
    ("tilegx", "tilegx"),
    ("tilegxbe", "tilegxbe"),
    ("tilepro", "tilepro"),
];

/// Architecture families accepted verbatim (`riscv64gc`, `armv7`, ...).
const ARCH_PREFIXES: &[&str] = &[
    "aarch64",
    "amdgcn",
    "arc",
    "arm",
    "avr",
    "blackfin",
    "cr16",
    "cris",
    "epiphany",
    "h8300",
    "ia64",
    "iq2000",
    "lm32",
    "loongarch",
    "m32c",
    "m32r",
    "m68k",
    "microblaze",
    "mips",
    "moxie",
    "msp430",
    "nds32le",
    "nds32be",
    "nvptx",
    "or1k",
    "powerpc",
    "rl78",
    "riscv32",
    "riscv64",
    "rx",
    "wasm",
    "xtensa",
    "visium",
];

const OS_TABLE: &[(&str, &str)] = &[
    // windows
    ("mingw32", "windows"),
    ("mingw", "windows"),
    ("mingw64", "windows"),
    ("w64", "windows"),
    ("msvc", "windows"),
    ("windows", "windows"),
    // unix-like
    ("linux", "linux"),
    ("darwin", "darwin"),
    ("freebsd", "freebsd"),
    ("netbsd", "netbsd"),
    ("openbsd", "openbsd"),
    ("dragonfly", "dragonfly"),
    ("solaris", "solaris"),
    ("sunos", "solaris"),
    ("illumos", "solaris"),
    ("aix", "aix"),
    ("hpux", "hpux"),
    ("ios", "ios"),
    // embedded and special
    ("uclinux", "uclinux"),
    ("none", "none"),
    ("baremetal", "none"),
    ("cygwin", "cygwin"),
    ("msys", "msys"),
    ("vxworks", "vxworks"),
    ("vxworksae", "vxworks"),
    ("haiku", "haiku"),
    ("android", "android"),
    ("emscripten", "emscripten"),
    ("wasi", "wasi"),
];

const ABI_TABLE: &[(&str, &str)] = &[
    ("eabi", "eabi"),
    ("eabisim", "eabisim"),
    ("mingw32", "pe"),
    ("mingw", "pe"),
    ("mingw64", "pe"),
    ("w64", "pe"),
    ("msvc", "pe"),
    ("windows", "pe"),
    ("cygwin", "pe"),
    ("msys", "pe"),
    ("pe", "pe"),
    ("elf", "elf"),
    ("netbsd", "elf"),
    ("openbsd", "elf"),
    ("freebsd", "elf"),
    ("aix", "elf"),
    ("gnueabi", "elf"),
    ("gnueabihf", "elf"),
    ("marcho", "marcho"),
];

/// Vendor segments that only restate the Windows C runtime.
const RUNTIME_MARKERS: &[&str] = &["msvc", "mingw", "mingw32", "mingw64", "w64"];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Parse and normalize an architecture token.
///
/// Returns the lowercased input and `false` if the token is not recognized.
pub fn parse_arch(arch: &str) -> (String, bool) {
    let arch = arch.to_lowercase();
    if let Some(norm) = lookup(ARCH_TABLE, &arch) {
        return (norm.to_string(), true);
    }
    if ARCH_PREFIXES.iter().any(|p| arch.starts_with(p)) {
        return (arch, true);
    }
    (arch, false)
}

/// Parse and normalize an operating system token.
///
/// Versioned names such as `darwin20` or `freebsd13.2` match by prefix.
pub fn parse_os(os: &str) -> (String, bool) {
    let os = os.to_lowercase();
    if let Some(norm) = lookup(OS_TABLE, &os) {
        return (norm.to_string(), true);
    }
    if let Some((_, norm)) = OS_TABLE.iter().find(|(k, _)| os.starts_with(k)) {
        return (norm.to_string(), true);
    }
    (os, false)
}

/// Parse and normalize an ABI (object format) token.
pub fn parse_abi(abi: &str) -> (String, bool) {
    let abi = abi.to_lowercase();
    if let Some(norm) = lookup(ABI_TABLE, &abi) {
        return (norm.to_string(), true);
    }
    if ["linux", "uclinux", "solaris"]
        .iter()
        .any(|p| abi.starts_with(p))
    {
        return ("elf".to_string(), true);
    }
    if abi.starts_with("darwin") {
        return ("marcho".to_string(), true);
    }
    (abi, false)
}

/// Parse and normalize a C library token.
pub fn parse_libc(libc: &str) -> (String, bool) {
    let libc = libc.to_lowercase();
    let norm = match libc.as_str() {
        "mingw32" | "mingw" | "mingw64" | "w64" => "mingw",
        "musl" => "musl",
        "gnu" | "msys" | "cygwin" | "glibc" => "glibc",
        "mcvcrt" | "msvcrt" | "msvc" => "msvcrt",
        _ => return (libc, false),
    };
    (norm.to_string(), true)
}

pub fn normalize_arch(arch: &str) -> String {
    parse_arch(arch).0
}

pub fn normalize_os(os: &str) -> String {
    parse_os(os).0
}

pub fn normalize_abi(abi: &str) -> String {
    parse_abi(abi).0
}

pub fn normalize_libc(libc: &str) -> String {
    parse_libc(libc).0
}

/// A normalized compilation target.
///
/// Empty fields act as wildcards in [`Target::matches`], which lets a
/// partially filled target serve as a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arch: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub os: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub abi: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub libc: String,
}

impl Target {
    /// Create a target from raw tokens, normalizing each one.
    pub fn new(arch: &str, os: &str, abi: &str, libc: &str) -> Self {
        Target {
            arch: normalize_arch(arch),
            os: normalize_os(os),
            abi: normalize_abi(abi),
            libc: normalize_libc(libc),
        }
    }

    /// Query target matching only `arch` and `os`.
    pub fn with_arch_os(arch: &str, os: &str) -> Self {
        Target {
            arch: normalize_arch(arch),
            os: normalize_os(os),
            ..Target::default()
        }
    }

    /// Parse a triplet string, returning the target and leftover vendor
    /// segments.
    pub fn parse(triplet: &str) -> Result<(Target, Vec<String>), TripletError> {
        parse_target(triplet)
    }

    /// Field-wise comparison where an empty field on either side matches
    /// anything.
    pub fn matches(&self, other: &Target) -> bool {
        fn field(a: &str, b: &str) -> bool {
            a.is_empty() || b.is_empty() || a == b
        }
        field(&self.arch, &other.arch)
            && field(&self.os, &other.os)
            && field(&self.abi, &other.abi)
            && field(&self.libc, &other.libc)
    }

    /// Both OS and architecture are known.
    pub fn is_valid(&self) -> bool {
        self.os != UNKNOWN && self.arch != UNKNOWN
    }

    pub fn validate(&self) -> Result<(), TripletError> {
        let reason = if self.arch == UNKNOWN {
            "unknown architecture"
        } else if self.os == UNKNOWN {
            "unknown operating system"
        } else {
            return Ok(());
        };
        Err(TripletError::InvalidTarget {
            target: self.to_string(),
            reason: reason.to_string(),
        })
    }

    pub fn is_darwin(&self) -> bool {
        matches!(self.os.as_str(), "darwin" | "ios")
    }

    pub fn is_linux(&self) -> bool {
        matches!(self.os.as_str(), "linux" | "android" | "uclinux")
    }

    pub fn is_bsd(&self) -> bool {
        matches!(
            self.os.as_str(),
            "freebsd" | "netbsd" | "openbsd" | "dragonfly"
        )
    }

    pub fn is_solaris(&self) -> bool {
        matches!(self.os.as_str(), "solaris" | "sunos" | "illumos")
    }

    pub fn is_unix(&self) -> bool {
        self.is_linux()
            || self.is_darwin()
            || self.is_bsd()
            || self.is_solaris()
            || matches!(self.os.as_str(), "aix" | "hpux")
    }

    pub fn is_posix(&self) -> bool {
        self.is_unix() || matches!(self.os.as_str(), "cygwin" | "msys")
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.os.as_str(), "none" | "baremetal" | "vxworks")
    }

    pub fn is_wasm(&self) -> bool {
        matches!(self.os.as_str(), "emscripten" | "wasi")
    }
}

impl fmt::Display for Target {
    /// Known parts joined with `-`, e.g. `x64-linux-elf-glibc`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.arch, &self.os, &self.abi, &self.libc]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty() && *s != UNKNOWN)
            .collect();
        f.write_str(&parts.join("-"))
    }
}

/// A parsed triplet that keeps the input string and its unclassified
/// segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Full {
    #[serde(flatten)]
    pub target: Target,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub original: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vendors: Vec<String>,
}

impl Full {
    pub fn parse(triplet: &str) -> Result<Self, TripletError> {
        parse_full(triplet)
    }
}

impl std::ops::Deref for Full {
    type Target = Target;

    fn deref(&self) -> &Target {
        &self.target
    }
}

/// Parse a triplet into a [`Full`] record.
pub fn parse_full(triplet: &str) -> Result<Full, TripletError> {
    let (target, vendors) = parse_target(triplet)?;
    Ok(Full {
        target,
        original: triplet.to_string(),
        vendors,
    })
}

/// Parse a triplet string into its components.
///
/// Each category scans every raw segment and keeps the first match. The
/// architecture must be the first recognizable segment. An OS of `none`
/// yields to a later, more specific OS segment (`arm-none-linux-gnueabi`).
/// Segments not consumed as arch, OS or ABI become vendors; Windows
/// runtime markers among them are dropped once the C library is known.
pub fn parse_target(triplet: &str) -> Result<(Target, Vec<String>), TripletError> {
    if triplet.is_empty() {
        return Err(TripletError::Empty);
    }

    let segments: Vec<&str> = triplet.split('-').collect();
    let mut consumed = vec![false; segments.len()];
    let mut target = Target {
        arch: UNKNOWN.to_string(),
        os: UNKNOWN.to_string(),
        abi: UNKNOWN.to_string(),
        libc: UNKNOWN.to_string(),
    };

    if let Some((i, arch)) = segments.iter().enumerate().find_map(|(i, s)| {
        let (arch, ok) = parse_arch(s);
        ok.then_some((i, arch))
    }) {
        target.arch = arch;
        consumed[i] = true;
    }

    for (i, s) in segments.iter().enumerate() {
        let (os, ok) = parse_os(s);
        if ok && (target.os == UNKNOWN || target.os == "none") {
            target.os = os;
            consumed[i] = true;
        }
    }

    for (i, s) in segments.iter().enumerate() {
        let (abi, ok) = parse_abi(s);
        if ok && target.abi == UNKNOWN {
            target.abi = abi;
            consumed[i] = true;
        }
    }

    if let Some(libc) = segments.iter().find_map(|s| {
        let (libc, ok) = parse_libc(s);
        ok.then_some(libc)
    }) {
        target.libc = libc;
    }

    let known_libc = target.libc != UNKNOWN;
    let vendors = segments
        .iter()
        .zip(&consumed)
        .filter(|(_, used)| !**used)
        .map(|(s, _)| s.to_string())
        .filter(|s| !(known_libc && RUNTIME_MARKERS.contains(&s.to_lowercase().as_str())))
        .collect();

    Ok((target, vendors))
}

/// The target this program runs on, with only `arch` and `os` set.
pub fn host_target() -> Target {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };
    Target::with_arch_os(std::env::consts::ARCH, os)
}
