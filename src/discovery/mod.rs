//! Toolchain discovery.
//!
//! Each compiler family has its own prober:
//! - [`gcc`]: GNU compilers found on `PATH`
//! - [`clang`]: LLVM-based front-ends (clang, Apple clang, emcc, zig, ...)
//! - [`msvc`]: Visual Studio installations (Windows only)
//!
//! This module fans out across the probers, merges their results and picks
//! the best toolchain for a target.

pub mod clang;
pub mod feedback;
pub mod gcc;
pub mod msvc;
pub(crate) mod probe;

use std::cmp::Ordering;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::core::chain::Chain;
use crate::core::triplet::{host_target, Target};
use crate::util::config::{Config, DEFAULT_PREFERENCE, DEFAULT_PROBE_TIMEOUT_SECS};

pub use clang::ClangInstallation;
pub use feedback::Feedback;
pub use gcc::GccInstallation;
pub use msvc::MsvcInstallation;

/// Knobs shared by every prober.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Limit for a single compiler invocation.
    pub timeout: Duration,
    /// Directories scanned after `PATH`.
    pub extra_search_paths: Vec<PathBuf>,
    /// Scan only `extra_search_paths`; ignore `PATH`, `CC` and well-known
    /// install roots.
    pub isolated: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        ProbeOptions {
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            extra_search_paths: Vec::new(),
            isolated: false,
        }
    }
}

impl ProbeOptions {
    pub fn from_config(config: &Config) -> Self {
        ProbeOptions {
            timeout: config.probe_timeout(),
            extra_search_paths: config.discovery.extra_search_paths.clone(),
            isolated: false,
        }
    }
}

/// A compiler installation of any family.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "compiler", rename_all = "lowercase")]
pub enum Installation {
    Msvc(MsvcInstallation),
    Gcc(GccInstallation),
    Clang(ClangInstallation),
}

impl Installation {
    pub fn print_summary(&self, w: &mut dyn Write) -> io::Result<()> {
        match self {
            Installation::Msvc(inst) => inst.print_summary(w),
            Installation::Gcc(inst) => inst.print_summary(w),
            Installation::Clang(inst) => inst.print_summary(w),
        }
    }
}

/// Whether the type filter admits a family known under `names`.
///
/// An empty filter, or one holding a single empty string, admits everything.
fn wants<S: AsRef<str>>(types: &[S], names: &[&str]) -> bool {
    match types {
        [] => true,
        [only] if only.as_ref().is_empty() => true,
        _ => types.iter().any(|t| names.contains(&t.as_ref())),
    }
}

const MSVC_NAMES: &[&str] = &["msvc"];
const GCC_NAMES: &[&str] = &["gcc", "gnu"];
const CLANG_NAMES: &[&str] = &["clang", "llvm"];

/// Discover installations of the requested families with default options.
pub fn discover_installations<S: AsRef<str>>(
    types: &[S],
    feedback: Feedback<'_>,
) -> Vec<Installation> {
    discover_installations_with(types, &ProbeOptions::default(), feedback)
}

pub fn discover_installations_with<S: AsRef<str>>(
    types: &[S],
    opts: &ProbeOptions,
    feedback: Feedback<'_>,
) -> Vec<Installation> {
    let mut found = Vec::new();
    if wants(types, MSVC_NAMES) {
        found.extend(
            msvc::discover_installations(opts, feedback)
                .into_iter()
                .map(Installation::Msvc),
        );
    }
    if wants(types, GCC_NAMES) {
        found.extend(
            gcc::discover_installations(opts, feedback)
                .into_iter()
                .map(Installation::Gcc),
        );
    }
    if wants(types, CLANG_NAMES) {
        found.extend(
            clang::discover_installations(opts, feedback)
                .into_iter()
                .map(Installation::Clang),
        );
    }
    found
}

/// Discover toolchains of the requested families with default options.
///
/// With `want_cxx`, GCC installations lacking a C++ compiler are left out.
/// Clang drivers double as their own C++ front-end and are always kept.
pub fn discover_toolchains<S: AsRef<str>>(
    want_cxx: bool,
    types: &[S],
    feedback: Feedback<'_>,
) -> Vec<Chain> {
    discover_toolchains_with(want_cxx, types, &ProbeOptions::default(), feedback)
}

pub fn discover_toolchains_with<S: AsRef<str>>(
    want_cxx: bool,
    types: &[S],
    opts: &ProbeOptions,
    feedback: Feedback<'_>,
) -> Vec<Chain> {
    let mut chains = Vec::new();
    if wants(types, MSVC_NAMES) {
        chains.extend(msvc::discover_toolchains(opts, feedback));
    }
    if wants(types, GCC_NAMES) {
        chains.extend(gcc::discover_toolchains(want_cxx, opts, feedback));
    }
    if wants(types, CLANG_NAMES) {
        chains.extend(clang::discover_toolchains(opts, feedback));
    }
    chains
}

/// Chains whose target matches `target` (empty fields match anything).
pub fn find<'a>(target: &Target, chains: &'a [Chain]) -> Vec<&'a Chain> {
    chains
        .iter()
        .filter(|chain| chain.target.matches(target))
        .collect()
}

/// Chains that target the host OS and architecture.
pub fn natives(chains: &[Chain]) -> Vec<&Chain> {
    find(&host_target(), chains)
}

/// Pick the best native chain. See [`choose`].
pub fn choose_native<'a, S: AsRef<str>>(
    chains: &'a [Chain],
    preference: &[S],
) -> Option<&'a Chain> {
    choose(chains, &host_target(), preference)
}

/// Pick the best chain for `target`.
///
/// Families are tried in `preference` order (`gcc, clang, msvc` when empty)
/// and the highest-ranked chain of the first family with a match wins. If no
/// preferred family matches, the candidates are ordered by compiler, target
/// and full version and the first one is returned.
pub fn choose<'a, S: AsRef<str>>(
    chains: &'a [Chain],
    target: &Target,
    preference: &[S],
) -> Option<&'a Chain> {
    let candidates = find(target, chains);
    if candidates.len() <= 1 {
        return candidates.into_iter().next();
    }

    let preference: Vec<&str> = if preference.is_empty() {
        DEFAULT_PREFERENCE.to_vec()
    } else {
        preference.iter().map(|p| p.as_ref()).collect()
    };

    for family in preference {
        let best = candidates
            .iter()
            .copied()
            .filter(|chain| chain.compiler.eq_ignore_ascii_case(family))
            .max_by(|a, b| compare_within_family(family, a, b));
        if let Some(best) = best {
            tracing::debug!(
                "chose {} {} for {}",
                best.compiler,
                best.version,
                best.target.original
            );
            return Some(best);
        }
    }

    candidates.into_iter().min_by(|a, b| {
        a.compiler
            .cmp(&b.compiler)
            .then_with(|| a.target.original.cmp(&b.target.original))
            .then_with(|| a.full_version.cmp(&b.full_version))
    })
}

fn compare_within_family(family: &str, a: &Chain, b: &Chain) -> Ordering {
    if family.eq_ignore_ascii_case("msvc") {
        msvc::compare(a, b)
    } else {
        gcc::compare(a, b)
    }
}
