//! Compiler environment for generators, from a discovered chain or from the
//! `CC`/`CXX` environment variables.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::cc::flags::{BuildConfig, Flags};
use crate::core::chain::Chain;
use crate::core::executable::{collect_tools, split_path, ToolNames};
use crate::core::tool::{Tool, ToolPath, Toolset};
use crate::discovery::{clang, gcc, msvc, ProbeOptions};
use crate::util::fs::{file_exists, to_slash};
use crate::util::process::find_executable;

/// Errors from [`Builder::from_env`].
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("missing CC/CXX environment variables")]
    Missing,

    #[error("invalid {var} path `{path}`: {reason}")]
    InvalidPath {
        var: &'static str,
        path: String,
        reason: String,
    },

    #[error("inconsistent compiler types detected: CC is {cc}, CXX is {cxx}")]
    Inconsistent { cc: String, cxx: String },

    #[error("unsupported compiler type: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Gcc,
    Clang,
    Msvc,
}

impl Family {
    fn as_str(&self) -> &'static str {
        match self {
            Family::Gcc => "gcc",
            Family::Clang => "clang",
            Family::Msvc => "msvc",
        }
    }
}

/// Siblings of a `gcc` driver, substituted for the `gcc` in its name.
const GCC_SIBLINGS: &ToolNames = &[
    ("gcc", Tool::CCompiler),
    ("g++", Tool::CxxCompiler),
    ("c++", Tool::CxxCompiler),
    ("ar", Tool::Archiver),
    ("gcc-ar", Tool::Archiver),
    ("as", Tool::Assembler),
    ("ld", Tool::DllLinker),
    ("ld", Tool::ExeLinker),
    ("objcopy", Tool::ObjCopy),
    ("objdump", Tool::ObjDump),
    ("ranlib", Tool::Ranlib),
    ("gcc-ranlib", Tool::Ranlib),
    ("windres", Tool::ResourceCompiler),
    ("strip", Tool::Strip),
];

/// Siblings of a `clang` driver; `llvm-` prefixed names are tried as well.
const CLANG_SIBLINGS: &ToolNames = &[
    ("clang", Tool::CCompiler),
    ("clang++", Tool::CxxCompiler),
    ("ar", Tool::Archiver),
    ("lld", Tool::DllLinker),
    ("lld", Tool::ExeLinker),
    ("objcopy", Tool::ObjCopy),
    ("objdump", Tool::ObjDump),
    ("ranlib", Tool::Ranlib),
    ("rc", Tool::ResourceCompiler),
    ("strip", Tool::Strip),
];

/// Lowercase file name without a trailing `.exe`.
fn executable_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match name.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Family implied by an executable name, if any.
fn classify(stem: &str, cxx: bool) -> Option<Family> {
    if stem == "cl" {
        Some(Family::Msvc)
    } else if stem.contains("clang") {
        Some(Family::Clang)
    } else if (cxx && stem.contains("g++")) || (!cxx && stem.contains("gcc")) {
        Some(Family::Gcc)
    } else {
        None
    }
}

/// Bare names are looked up on `PATH`; other paths are made absolute.
fn resolve(var: &'static str, value: &str) -> Result<PathBuf, EnvError> {
    let invalid = |reason: &str| EnvError::InvalidPath {
        var,
        path: value.to_string(),
        reason: reason.to_string(),
    };

    let path = Path::new(value);
    let resolved = if path.components().count() == 1 && !path.is_absolute() {
        find_executable(value).ok_or_else(|| invalid("not found on PATH"))?
    } else if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| invalid(&e.to_string()))?
            .join(path)
    };

    if !file_exists(&resolved) {
        return Err(invalid("no such file"));
    }
    Ok(resolved)
}

/// Replace the last `from` in the file name of `path` with `to`.
fn swap_in_name(path: &str, from: &str, to: &str) -> Option<String> {
    let (dir, base) = split_path(path);
    let i = base.rfind(from)?;
    Some(format!("{}{}{}{}", dir, &base[..i], to, &base[i + from.len()..]))
}

/// What a build needs to know about a compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Builder {
    pub compiler: String,
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub full_version: String,
    pub tools: Toolset,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc_include_dirs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cxx_include_dirs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub library_dirs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
}

impl Builder {
    pub fn from_chain(chain: &Chain) -> Self {
        Builder {
            compiler: chain.compiler.clone(),
            version: chain.version.clone(),
            full_version: chain.full_version.clone(),
            tools: chain.tools.clone(),
            cc_include_dirs: chain.cc_include_dirs.clone(),
            cxx_include_dirs: chain.cxx_include_dirs.clone(),
            library_dirs: chain.library_dirs.clone(),
            environment: chain.environment.clone(),
        }
    }

    /// Build from the process environment (`CC`, `CXX`, `AR`, `AS`).
    pub fn from_env(opts: &ProbeOptions) -> Result<Self, EnvError> {
        Self::from_env_with(|var| std::env::var(var).ok(), opts)
    }

    /// Build from variables supplied by `lookup`.
    ///
    /// The compiler family is guessed from the executable names first; `CC`
    /// and `CXX` naming different families is an error. The compiler is then
    /// probed for its version and include directories, and tools the
    /// environment did not name are filled in from `AR`/`AS` and from files
    /// next to the compiler.
    pub fn from_env_with<F>(lookup: F, opts: &ProbeOptions) -> Result<Self, EnvError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let cc = var("CC").map(|v| resolve("CC", v.trim())).transpose()?;
        let cxx = var("CXX").map(|v| resolve("CXX", v.trim())).transpose()?;

        let cc_family = cc.as_deref().and_then(|p| classify(&executable_stem(p), false));
        let cxx_family = cxx.as_deref().and_then(|p| classify(&executable_stem(p), true));
        if let (Some(a), Some(b)) = (cc_family, cxx_family) {
            if a != b {
                return Err(EnvError::Inconsistent {
                    cc: a.as_str().to_string(),
                    cxx: b.as_str().to_string(),
                });
            }
        }

        let mut builder = Builder::default();
        if let Some(cc) = &cc {
            builder.tools.insert(Tool::CCompiler, ToolPath::new(to_slash(cc)));
        }
        if let Some(cxx) = &cxx {
            builder.tools.insert(Tool::CxxCompiler, ToolPath::new(to_slash(cxx)));
        }

        let Some(probe_path) = cxx.as_deref().or(cc.as_deref()) else {
            return Err(EnvError::Missing);
        };

        let guessed = cc_family.or(cxx_family);
        let family = match builder.probe(guessed, probe_path, opts) {
            Some(family) => family,
            None => match guessed {
                Some(family) => {
                    tracing::warn!(
                        "could not query {}, assuming {}",
                        probe_path.display(),
                        family.as_str()
                    );
                    family
                }
                None => return Err(EnvError::Unsupported(to_slash(probe_path))),
            },
        };
        builder.compiler = family.as_str().to_string();

        if family != Family::Msvc {
            builder.fill_tools(family, cc.as_deref(), cxx.as_deref(), &var);
        }
        Ok(builder)
    }

    /// Query `exe` as each plausible family in turn and record what the
    /// first successful probe reports.
    fn probe(&mut self, guessed: Option<Family>, exe: &Path, opts: &ProbeOptions) -> Option<Family> {
        let plausible = |f: Family| guessed.is_none() || guessed == Some(f);

        if plausible(Family::Gcc) {
            match gcc::query_version(exe, opts) {
                Ok(inst) => {
                    self.version = inst.version;
                    self.full_version = inst.full_version;
                    self.cc_include_dirs = inst.cc_include_dirs;
                    self.cxx_include_dirs = inst.cxx_include_dirs;
                    return Some(Family::Gcc);
                }
                Err(e) => tracing::debug!("{} is not gcc: {:#}", exe.display(), e),
            }
        }
        if plausible(Family::Clang) {
            match clang::query_version(exe, opts) {
                Ok(inst) => {
                    self.version = inst.version;
                    self.full_version = inst.full_version;
                    self.cc_include_dirs = inst.cc_include_dirs;
                    self.cxx_include_dirs = inst.cxx_include_dirs;
                    return Some(Family::Clang);
                }
                Err(e) => tracing::debug!("{} is not clang: {:#}", exe.display(), e),
            }
        }
        if plausible(Family::Msvc) {
            match msvc::query_version(exe, opts) {
                Ok((version, _target)) => {
                    self.version = version;
                    return Some(Family::Msvc);
                }
                Err(e) => tracing::debug!("{} is not cl: {:#}", exe.display(), e),
            }
        }
        None
    }

    fn fill_tools<F>(&mut self, family: Family, cc: Option<&Path>, cxx: Option<&Path>, var: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (tool, name) in [(Tool::Archiver, "AR"), (Tool::Assembler, "AS")] {
            if self.tools.contains(tool) {
                continue;
            }
            if let Some(value) = var(name) {
                self.tools.insert(tool, ToolPath::new(value.trim().replace('\\', "/")));
            }
        }

        let (driver, cxx_driver, names) = match family {
            Family::Clang => ("clang", "clang++", CLANG_SIBLINGS),
            _ => ("gcc", "g++", GCC_SIBLINGS),
        };
        // Sibling names are derived from the C driver's name.
        let base = cc
            .map(to_slash)
            .filter(|p| split_path(p).1.contains(driver))
            .or_else(|| cxx.and_then(|p| swap_in_name(&to_slash(p), cxx_driver, driver)));
        let Some(base) = base else {
            return;
        };

        for (tool, path) in collect_tools(&base, driver, names).iter() {
            self.tools.insert_missing(tool, path.clone());
        }
    }

    /// Conventional optimization and debug flags for the compiler family.
    pub fn default_flags(&self) -> Flags {
        let mut flags = Flags::new();
        if self.compiler.eq_ignore_ascii_case("msvc") {
            flags.add(BuildConfig::All, ["/nologo"]);
            flags.add(BuildConfig::Debug, ["/Od", "/Zi", "/RTC1"]);
            flags.add(BuildConfig::Release, ["/O2", "/Ob2", "/DNDEBUG"]);
            flags.add(BuildConfig::MinSizeRel, ["/O1", "/Ob1", "/DNDEBUG"]);
            flags.add(BuildConfig::RelWithDebInfo, ["/O2", "/Ob1", "/Zi", "/DNDEBUG"]);
        } else {
            flags.add(BuildConfig::Debug, ["-O0", "-g"]);
            flags.add(BuildConfig::Release, ["-O3", "-DNDEBUG"]);
            flags.add(BuildConfig::MinSizeRel, ["-Os", "-DNDEBUG"]);
            flags.add(BuildConfig::RelWithDebInfo, ["-O2", "-g", "-DNDEBUG"]);
        }
        flags
    }

    pub fn print_summary(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "compiler: {} {}", self.compiler, self.version)?;
        if !self.full_version.is_empty() {
            writeln!(w, "- full version: '{}'", self.full_version)?;
        }
        for (tool, path) in self.tools.iter() {
            writeln!(w, "- {}: '{}'", tool.as_str(), path)?;
        }
        Ok(())
    }
}
