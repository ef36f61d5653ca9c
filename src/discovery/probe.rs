//! Helpers shared by the GCC and Clang probers.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;

use crate::core::tool::ToolPath;
use crate::core::triplet::{parse_full, Full};
use crate::core::version::compare_versions;
use crate::discovery::ProbeOptions;
use crate::util::fs::{path_dirs, to_slash};
use crate::util::process::{combined_output, ProcessBuilder};

static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Target:\s+(.*?)\s*$").unwrap());
static THREAD_MODEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Thread model:\s+(.*?)\s*$").unwrap());
static INSTALLED_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^InstalledDir:\s+(.*?)\s*$").unwrap());
static FRAMEWORK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(framework directory\)$").unwrap());

const INCLUDE_START: &str = "#include <...> search starts here:";
const INCLUDE_END: &str = "End of search list.";

/// Run `tool` (with its sub-commands) followed by `args`.
pub(crate) fn run(tool: &ToolPath, args: &[&str], opts: &ProbeOptions) -> Result<Output> {
    ProcessBuilder::new(&tool.path)
        .args(&tool.commands)
        .args(args)
        .timeout(opts.timeout)
        .exec()
}

/// Output of `<tool> -v`, stdout and stderr combined.
pub(crate) fn verbose_output(tool: &ToolPath, opts: &ProbeOptions) -> Result<String> {
    let output = run(tool, &["-v"], opts)?;
    Ok(combined_output(&output))
}

/// System include directories reported by `<tool> -x<lang> -E -v -`.
///
/// The child runs in the `C` locale so the search-list markers are not
/// translated.
pub(crate) fn system_includes(tool: &ToolPath, lang: &str, opts: &ProbeOptions) -> Result<Vec<String>> {
    let output = ProcessBuilder::new(&tool.path)
        .args(&tool.commands)
        .arg(format!("-x{}", lang))
        .args(["-E", "-v", "-"])
        .c_locale()
        .timeout(opts.timeout)
        .exec()?;

    if !output.status.success() {
        bail!(
            "`{} -x{} -E -v -` failed with exit code {:?}",
            tool,
            lang,
            output.status.code()
        );
    }
    Ok(parse_include_block(&combined_output(&output)))
}

/// Lines between the include search-list markers, trimmed, with macOS
/// framework annotations removed and WSL mount paths translated.
pub(crate) fn parse_include_block(text: &str) -> Vec<String> {
    text.lines()
        .skip_while(|line| !line.contains(INCLUDE_START))
        .skip(1)
        .take_while(|line| !line.contains(INCLUDE_END))
        .map(|line| FRAMEWORK_RE.replace(line.trim(), "").into_owned())
        .filter(|line| !line.is_empty())
        .map(|line| fix_wsl_path(&line))
        .collect()
}

/// Rewrite `/mnt/<drive>/rest` to `<DRIVE>:/rest`. Anything else is
/// returned unchanged.
pub(crate) fn fix_wsl_path(path: &str) -> String {
    let Some(rest) = path.strip_prefix("/mnt/") else {
        return path.to_string();
    };
    let mut chars = rest.chars();
    match (chars.next(), chars.as_str()) {
        (Some(drive), tail)
            if drive.is_ascii_alphabetic() && (tail.is_empty() || tail.starts_with('/')) =>
        {
            let tail = if tail.is_empty() { "/" } else { tail };
            format!("{}:{}", drive.to_ascii_uppercase(), tail)
        }
        _ => path.to_string(),
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The `Target:` line of `-v` output as a parsed triplet.
///
/// A target that does not parse keeps only its original text.
pub(crate) fn parse_target_line(text: &str) -> Option<Full> {
    let original = capture(&TARGET_RE, text)?;
    Some(parse_full(&original).unwrap_or_else(|_| Full {
        original,
        ..Full::default()
    }))
}

pub(crate) fn parse_thread_model(text: &str) -> Option<String> {
    capture(&THREAD_MODEL_RE, text)
}

pub(crate) fn parse_installed_dir(text: &str) -> Option<String> {
    capture(&INSTALLED_DIR_RE, text)
}

/// Directories to scan: `PATH` followed by configured extras.
pub(crate) fn search_dirs(opts: &ProbeOptions) -> Vec<PathBuf> {
    let mut dirs = if opts.isolated { Vec::new() } else { path_dirs() };
    dirs.extend(opts.extra_search_paths.iter().cloned());
    dirs
}

/// Key under which equivalent compiler builds are grouped.
pub(crate) fn signature(head: &[&str], cc_dirs: &[String], cxx_dirs: &[String]) -> String {
    format!("{}{}#{}", head.concat(), cc_dirs.join("|"), cxx_dirs.join("|"))
}

/// Paths whose probes answered identically, plus the answer.
pub(crate) struct Group<T> {
    inst: T,
    files: BTreeSet<String>,
    symlinks: BTreeSet<String>,
}

impl<T> Group<T> {
    pub(crate) fn new(inst: T) -> Self {
        Group {
            inst,
            files: BTreeSet::new(),
            symlinks: BTreeSet::new(),
        }
    }

    /// Record a probed file and the links that resolve to it.
    pub(crate) fn add(&mut self, file: &Path, links: &BTreeSet<PathBuf>) {
        self.files.insert(fix_wsl_path(&to_slash(file)));
        self.symlinks
            .extend(links.iter().map(|l| fix_wsl_path(&to_slash(l))));
    }

    /// The first answer, the probed files and their links, sorted.
    pub(crate) fn into_parts(self) -> (T, Vec<String>, Vec<String>) {
        (
            self.inst,
            self.files.into_iter().collect(),
            self.symlinks.into_iter().collect(),
        )
    }
}

/// Newest version first; unparsable versions after parsable ones.
pub(crate) fn newest_first(a: &str, b: &str) -> Ordering {
    compare_versions(b, a)
}

/// Fake compiler scripts for driving the probers in tests.
#[cfg(all(test, unix))]
pub(crate) mod fake {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable `/bin/sh` script named `name` into `dir`.
    pub(crate) fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Write an empty executable file.
    pub(crate) fn touch(dir: &Path, name: &str) -> PathBuf {
        script(dir, name, "exit 0")
    }
}
