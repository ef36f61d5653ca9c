//! GCC discovery.
//!
//! Candidates are executables on `PATH` named like `gcc`, `gcc-13` or
//! `x86_64-w64-mingw32-gcc.exe`. Each one is asked for its predefined
//! macros, its `-v` banner and its system include directories. Candidates
//! that answer identically are the same build reached under different names
//! and collapse into one [`GccInstallation`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::chain::Chain;
use crate::core::executable::{find_tools, split_path, Executable, ToolNames};
use crate::core::tool::{Tool, ToolPath, Toolset};
use crate::core::triplet::Full;
use crate::core::version::compare_versions;
use crate::discovery::probe;
use crate::discovery::{Feedback, ProbeOptions};
use crate::util::env::EnvMap;
use crate::util::fs::{join_path_list, search_files_and_symlinks, to_slash, FileMatches};
use crate::util::process::{combined_output, find_executable, find_executable_in};

static GCC_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:\w+-)*)gcc(?:-\d+(?:\.\d+)*)?(?:\.exe)?$").unwrap()
});
static GCC_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gcc version (\S+)").unwrap());
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*-)gcc").unwrap());

const CONFIGURED_WITH: &str = "Configured with: ";

/// File names of GCC tools relative to the `gcc` infix, in lookup order.
///
/// `cpp` is the preprocessor and deliberately absent.
pub const GCC_TOOL_NAMES: &ToolNames = &[
    ("gcc", Tool::CCompiler),
    ("g++", Tool::CxxCompiler),
    ("c++", Tool::CxxCompiler),
    ("ar", Tool::Archiver),
    ("as", Tool::Assembler),
    ("ld", Tool::Linker),
    ("objcopy", Tool::ObjCopy),
    ("objdump", Tool::ObjDump),
    ("ranlib", Tool::Ranlib),
    ("windres", Tool::ResourceCompiler),
    ("strip", Tool::Strip),
    ("gcc-ar", Tool::Archiver),
    ("gcc-as", Tool::Assembler),
    ("gcc-ld", Tool::Linker),
    ("gcc-objcopy", Tool::ObjCopy),
    ("gcc-objdump", Tool::ObjDump),
    ("gcc-ranlib", Tool::Ranlib),
    ("gcc-windres", Tool::ResourceCompiler),
    ("gcc-strip", Tool::Strip),
];

/// Binutils looked up on `PATH` when they are not next to the compiler.
const BINUTILS: &[(&str, Tool)] = &[
    ("ar", Tool::Archiver),
    ("ranlib", Tool::Ranlib),
    ("objcopy", Tool::ObjCopy),
    ("objdump", Tool::ObjDump),
    ("strip", Tool::Strip),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigureError {
    #[error("unterminated quoted value for `--{key}`")]
    UnterminatedQuote { key: String },
}

/// One GCC build and every path it was found under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GccInstallation {
    pub full_version: String,
    pub version: String,
    pub target: Full,
    pub thread_model: String,
    pub cc_include_dirs: Vec<String>,
    pub cxx_include_dirs: Vec<String>,
    /// Front-ends from `--enable-languages`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    /// Cross prefix such as `x86_64-w64-mingw32-`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub toolchain_prefix: String,
    pub c_compiler: Executable,
}

impl GccInstallation {
    pub fn print_summary(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "gcc {}", self.version)?;
        if !self.toolchain_prefix.is_empty() {
            writeln!(w, "- toolchain prefix: '{}'", self.toolchain_prefix)?;
        }
        writeln!(w, "- target: {}", self.target.original)?;
        writeln!(w, "  - os: {}", self.target.os)?;
        writeln!(w, "  - arch: {}", self.target.arch)?;
        writeln!(w, "  - abi: {}", self.target.abi)?;
        writeln!(w, "  - libc: {}", self.target.libc)?;
        writeln!(w, "- thread model: {}", self.thread_model)?;
        writeln!(w, "- CC primary path: '{}'", self.c_compiler.primary_path)?;
        for path in &self.c_compiler.other_paths {
            writeln!(w, "- CC alternative path: '{}'", path)?;
        }
        for path in &self.c_compiler.symlinks {
            writeln!(w, "- CC symlink path: '{}'", path)?;
        }
        Ok(())
    }

    /// Assemble a toolchain around the primary compiler path.
    ///
    /// Sibling tools are found by replacing the last `gcc` in the file name;
    /// binutils still missing are looked up in the directories `opts` scans.
    pub fn to_chain(&self, opts: &ProbeOptions) -> Chain {
        let primary = &self.c_compiler.primary_path;
        let mut tools = Toolset::new();
        tools.insert(Tool::CCompiler, self.c_compiler.tool_path());

        let (dir, base) = split_path(primary);
        if let Some(i) = base.rfind("gcc") {
            let prefix = format!("{}{}", dir, &base[..i]);
            let postfix = &base[i + "gcc".len()..];
            for (tool, path) in find_tools(&prefix, postfix, GCC_TOOL_NAMES).iter() {
                tools.insert_missing(tool, path.clone());
            }
        }
        let dirs = probe::search_dirs(opts);
        for (tool, path) in find_binutils(&self.toolchain_prefix, &self.version, &dirs) {
            tools.insert_missing(tool, path);
        }

        let installed_dir = Path::new(primary)
            .parent()
            .map(to_slash)
            .unwrap_or_default();

        let mut env = EnvMap::new();
        if let Some(cc) = tools.path(Tool::CCompiler) {
            env.insert("CC".to_string(), cc.to_string());
        }
        if let Some(cxx) = tools.path(Tool::CxxCompiler) {
            env.insert("CXX".to_string(), cxx.to_string());
        }
        env.insert(
            "C_INCLUDE_PATH".to_string(),
            join_path_list(&self.cc_include_dirs),
        );
        env.insert(
            "CPLUS_INCLUDE_PATH".to_string(),
            join_path_list(&self.cxx_include_dirs),
        );

        let mut chain = Chain {
            compiler: "gcc".to_string(),
            implementation: "gcc".to_string(),
            version: self.version.clone(),
            full_version: self.full_version.clone(),
            target: self.target.clone(),
            thread_model: self.thread_model.clone(),
            installed_dir,
            tools,
            cc_include_dirs: self.cc_include_dirs.clone(),
            cxx_include_dirs: self.cxx_include_dirs.clone(),
            ..Chain::default()
        };
        chain.set_environment(&env);
        chain
    }
}

/// Binutils in `dirs` as `<prefix>gcc-<version>-<tool>` or `<prefix><tool>`.
fn find_binutils(prefix: &str, version: &str, dirs: &[PathBuf]) -> Vec<(Tool, ToolPath)> {
    BINUTILS
        .iter()
        .filter_map(|(name, tool)| {
            let versioned = format!("{}gcc-{}-{}", prefix, version, name);
            find_executable_in(&versioned, dirs)
                .or_else(|| find_executable_in(&format!("{}{}", prefix, name), dirs))
                .map(|path| (*tool, ToolPath::new(to_slash(path))))
        })
        .collect()
}

/// Whether a file name looks like a GCC C compiler.
pub fn is_gcc_name(name: &str) -> bool {
    if !name.contains("gcc") {
        return false;
    }
    let Some(caps) = GCC_NAME_RE.captures(name) else {
        return false;
    };
    let prefix = caps.get(1).map_or("", |m| m.as_str());
    !prefix.split('-').any(|part| part == "gfortran")
}

/// Cross prefix of a compiler file name (`x86_64-linux-gnu-gcc-13` ->
/// `x86_64-linux-gnu-`).
pub fn toolchain_prefix(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    PREFIX_RE
        .captures(&base)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_start_matches("llvm-").to_string())
        .unwrap_or_default()
}

/// Parse the flags of a `Configured with:` line into a key/value map.
///
/// Only `--key[=value]` tokens are recognized. Values run to the next space
/// unless single-quoted, in which case they run to the closing quote.
pub fn parse_config(line: &str) -> Result<BTreeMap<String, String>, ConfigureError> {
    fn is_key_char(c: u8) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'-'
    }

    let bytes = line.as_bytes();
    let n = bytes.len();
    let mut map = BTreeMap::new();
    let mut i = 0;

    while i + 2 < n {
        if bytes[i] != b'-' || bytes[i + 1] != b'-' {
            i += 1;
            continue;
        }
        i += 2;

        let start = i;
        while i < n && is_key_char(bytes[i]) {
            i += 1;
        }
        let key = &line[start..i];

        let mut value = "";
        if i < n && bytes[i] == b'=' {
            i += 1;
            if i < n && bytes[i] == b'\'' {
                i += 1;
                let start = i;
                let Some(len) = line[start..].find('\'') else {
                    return Err(ConfigureError::UnterminatedQuote {
                        key: key.to_string(),
                    });
                };
                value = &line[start..start + len];
                i = start + len + 1;
            } else {
                let start = i;
                while i < n && bytes[i] != b' ' {
                    i += 1;
                }
                value = &line[start..i];
            }
        }

        if !key.is_empty() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    Ok(map)
}

/// `__GNUC__.__GNUC_MINOR__.__GNUC_PATCHLEVEL__` from `-dM -E` output.
///
/// Clang defines `__GNUC__` too; a `__clang__` definition disqualifies the
/// output.
fn version_from_macros(text: &str) -> Option<String> {
    let mut major = None;
    let mut minor = None;
    let mut patch = None;

    for line in text.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("#define") {
            continue;
        }
        let (Some(name), value) = (fields.next(), fields.next()) else {
            continue;
        };
        match name {
            "__clang__" => return None,
            "__GNUC__" => major = value,
            "__GNUC_MINOR__" => minor = value,
            "__GNUC_PATCHLEVEL__" => patch = value,
            _ => {}
        }
    }

    Some(format!(
        "{}.{}.{}",
        major?,
        minor.unwrap_or("0"),
        patch.unwrap_or("0")
    ))
}

/// The version in the last non-empty line of `-v` output.
fn version_from_banner(text: &str) -> Option<String> {
    let last = text.lines().map(str::trim).filter(|l| !l.is_empty()).last()?;
    GCC_VERSION_RE
        .captures(last)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn full_version_line(text: &str) -> String {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    lines
        .clone()
        .find(|l| l.starts_with("gcc version "))
        .or_else(|| lines.next_back())
        .unwrap_or_default()
        .to_string()
}

/// Languages enabled at configure time.
fn languages(text: &str) -> Vec<String> {
    let Some(line) = text
        .lines()
        .find_map(|l| l.trim_end_matches('\r').strip_prefix(CONFIGURED_WITH))
    else {
        return Vec::new();
    };

    match parse_config(line) {
        Ok(config) => config
            .get("enable-languages")
            .map(|langs| {
                langs
                    .split(',')
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        Err(e) => {
            tracing::debug!("ignoring configure line: {}", e);
            Vec::new()
        }
    }
}

/// Ask one executable about itself.
///
/// The returned installation has no paths recorded yet.
pub fn query_version(exe: &Path, opts: &ProbeOptions) -> Result<GccInstallation> {
    let tool = ToolPath::new(to_slash(exe));

    let macros = probe::run(&tool, &["-dM", "-E", "-"], opts)
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| version_from_macros(&String::from_utf8_lossy(&out.stdout)));

    let output = probe::run(&tool, &["-v"], opts)?;
    if !output.status.success() {
        bail!("`{} -v` exited with {:?}", tool, output.status.code());
    }
    let verbose = combined_output(&output);

    let Some(version) = macros.or_else(|| version_from_banner(&verbose)) else {
        bail!("`{}` does not report a gcc version", tool);
    };

    let mut inst = GccInstallation {
        full_version: full_version_line(&verbose),
        version,
        target: probe::parse_target_line(&verbose).unwrap_or_default(),
        thread_model: probe::parse_thread_model(&verbose).unwrap_or_default(),
        languages: languages(&verbose),
        ..GccInstallation::default()
    };

    match probe::system_includes(&tool, "c", opts) {
        Ok(dirs) => inst.cc_include_dirs = dirs,
        Err(e) => tracing::debug!("no C include dirs from {}: {:#}", tool, e),
    }
    match probe::system_includes(&tool, "c++", opts) {
        Ok(dirs) => inst.cxx_include_dirs = dirs,
        Err(e) => tracing::debug!("no C++ include dirs from {}: {:#}", tool, e),
    }

    Ok(inst)
}

/// Discover GCC installations, newest first.
///
/// A `CC` variable naming a working GCC is used as the only result.
pub fn discover_installations(opts: &ProbeOptions, feedback: Feedback<'_>) -> Vec<GccInstallation> {
    feedback.say("discovering gcc installations");

    if !opts.isolated {
        if let Some(inst) = from_env_compiler(opts, feedback) {
            return vec![inst];
        }
    }

    let files = search_files_and_symlinks(&probe::search_dirs(opts), is_gcc_name);
    let found = group_installations(&files, opts);

    feedback.say(format!("found {} gcc installation(s)", found.len()));
    found
}

fn from_env_compiler(opts: &ProbeOptions, feedback: Feedback<'_>) -> Option<GccInstallation> {
    let cc = std::env::var("CC").ok().filter(|cc| !cc.is_empty())?;
    let path = find_executable(&cc)?;
    feedback.say(format!(
        "checking compiler from environment: {}",
        path.display()
    ));

    match query_version(&path, opts) {
        Ok(mut inst) => {
            inst.toolchain_prefix = toolchain_prefix(&path);
            inst.c_compiler.other_paths = vec![to_slash(&path)];
            inst.c_compiler.choose_primary_c_compiler_path(
                &inst.target.original,
                "gcc",
                &inst.version,
                GCC_TOOL_NAMES,
            );
            Some(inst)
        }
        Err(e) => {
            tracing::debug!("CC={} is not a usable gcc: {:#}", cc, e);
            None
        }
    }
}

fn group_installations(files: &FileMatches, opts: &ProbeOptions) -> Vec<GccInstallation> {
    let mut groups: BTreeMap<String, probe::Group<GccInstallation>> = BTreeMap::new();

    for (file, links) in files {
        let mut inst = match query_version(file, opts) {
            Ok(inst) => inst,
            Err(e) => {
                tracing::debug!("skipping {}: {:#}", file.display(), e);
                continue;
            }
        };
        inst.toolchain_prefix = toolchain_prefix(file);

        let key = probe::signature(
            &[&inst.version, &inst.target.original, &inst.thread_model],
            &inst.cc_include_dirs,
            &inst.cxx_include_dirs,
        );
        groups
            .entry(key)
            .or_insert_with(|| probe::Group::new(inst))
            .add(file, links);
    }

    let mut found: Vec<GccInstallation> = groups
        .into_values()
        .map(|group| {
            let (mut inst, other_paths, symlinks) = group.into_parts();
            inst.c_compiler.other_paths = other_paths;
            inst.c_compiler.symlinks = symlinks;
            inst.c_compiler.choose_primary_c_compiler_path(
                &inst.target.original,
                "gcc",
                &inst.version,
                GCC_TOOL_NAMES,
            );
            inst
        })
        .collect();

    found.sort_by(|a, b| probe::newest_first(&a.version, &b.version));
    found
}

/// Discover GCC toolchains.
///
/// With `want_cxx`, installations without a C++ compiler are skipped.
pub fn discover_toolchains(
    want_cxx: bool,
    opts: &ProbeOptions,
    feedback: Feedback<'_>,
) -> Vec<Chain> {
    discover_installations(opts, feedback)
        .iter()
        .filter_map(|inst| {
            feedback.say(format!(
                "scanning gcc {} targeting {} at {}",
                inst.full_version, inst.target.original, inst.c_compiler.primary_path
            ));
            let chain = inst.to_chain(opts);
            if want_cxx && !chain.tools.contains(Tool::CxxCompiler) {
                tracing::debug!(
                    "skipping {}: no C++ compiler",
                    inst.c_compiler.primary_path
                );
                return None;
            }
            Some(chain)
        })
        .collect()
}

/// Rank two GCC-style chains: version, then target, then full version,
/// then C++ compiler path, then C compiler path.
pub fn compare(a: &Chain, b: &Chain) -> Ordering {
    let path = |chain: &Chain, tool| chain.tools.path(tool).map(str::to_string);

    compare_versions(&a.version, &b.version)
        .then_with(|| a.target.original.cmp(&b.target.original))
        .then_with(|| a.full_version.cmp(&b.full_version))
        .then_with(|| path(a, Tool::CxxCompiler).cmp(&path(b, Tool::CxxCompiler)))
        .then_with(|| path(a, Tool::CCompiler).cmp(&path(b, Tool::CCompiler)))
}
