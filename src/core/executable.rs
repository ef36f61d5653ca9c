//! Choosing a primary path among equivalent compiler executables.
//!
//! One compiler build is often reachable through several names: a
//! `/usr/bin/gcc` symlink, a versioned `gcc-13`, a cross-style
//! `x86_64-linux-gnu-gcc-13`. Discovery groups them and then scores each
//! candidate to decide which one to present as the primary path.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::tool::{Tool, ToolPath, Toolset};
use crate::util::fs::{file_exists, to_slash};

/// File-name stems and the role each one fills, in lookup priority order.
pub type ToolNames = [(&'static str, Tool)];

/// A compiler executable and the other names it is reachable under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Executable {
    pub primary_path: String,
    /// Sub-commands the primary path needs (`zig cc`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<String>,
    #[serde(
        default,
        rename = "alternative-paths",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub other_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symlinks: Vec<String>,
}

impl Executable {
    /// Pick the best-scoring candidate as the primary path.
    ///
    /// Candidates are the current primary path, other paths and symlinks.
    /// They are visited in lexicographic order and only a strictly higher
    /// score replaces the current best, so ties go to the smallest path.
    /// The winner is removed from both alternate lists.
    pub fn choose_primary_c_compiler_path(
        &mut self,
        target: &str,
        cc: &str,
        version: &str,
        names: &ToolNames,
    ) {
        let other_paths: BTreeSet<String> = self.other_paths.iter().map(to_slash).collect();
        let symlinks: BTreeSet<String> = self.symlinks.iter().map(to_slash).collect();

        let mut candidates: BTreeSet<String> = other_paths.union(&symlinks).cloned().collect();
        if !self.primary_path.is_empty() {
            candidates.insert(to_slash(&self.primary_path));
        }

        if candidates.len() < 2 {
            if let Some(only) = candidates.into_iter().next() {
                self.primary_path = only;
            }
            self.other_paths.clear();
            self.symlinks.clear();
            return;
        }

        let Some(best) = find_best(candidates.iter().map(String::as_str), |path| {
            c_compiler_score(target, cc, version, path, names)
        }) else {
            return;
        };
        let best = best.to_string();

        self.other_paths = other_paths.into_iter().filter(|p| *p != best).collect();
        self.symlinks = symlinks.into_iter().filter(|p| *p != best).collect();
        self.primary_path = best;
    }

    /// The primary path with its sub-commands.
    pub fn tool_path(&self) -> ToolPath {
        ToolPath::with_commands(self.primary_path.clone(), self.subcommands.clone())
    }
}

/// Highest-scoring item; the first one wins a tie.
pub fn find_best<'a, I, F>(items: I, scorer: F) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> i64,
{
    let mut best: Option<(&str, i64)> = None;
    for item in items {
        let score = scorer(item);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((item, score));
        }
    }
    best.map(|(item, _)| item)
}

/// Split at the last path separator; the directory keeps its trailing one.
pub(crate) fn split_path(path: &str) -> (&str, &str) {
    match path.rfind(['/', '\\']) {
        Some(i) => path.split_at(i + 1),
        None => ("", path),
    }
}

/// Look for `prefix + name + postfix` for every entry of `names`.
///
/// The first existing file per role wins.
pub fn find_tools(prefix: &str, postfix: &str, names: &ToolNames) -> Toolset {
    let mut tools = Toolset::new();
    for (name, tool) in names {
        if tools.contains(*tool) {
            continue;
        }
        let candidate = format!("{}{}{}", prefix, name, postfix);
        if file_exists(&candidate) {
            tools.insert(*tool, ToolPath::new(to_slash(&candidate)));
        }
    }
    tools
}

/// Sibling tools found by substituting the last `infix` in the file name of
/// `path`. Clang paths are also tried with an `llvm-` prefix
/// (`clang-17` -> `llvm-ar-17`).
pub fn collect_tools(path: &str, infix: &str, names: &ToolNames) -> Toolset {
    let (dir, base) = split_path(path);
    let Some(i) = base.rfind(infix) else {
        return Toolset::new();
    };

    let prefix = format!("{}{}", dir, &base[..i]);
    let postfix = &base[i + infix.len()..];
    let mut tools = find_tools(&prefix, postfix, names);

    if infix == "clang" {
        let llvm = find_tools(&format!("{}llvm-", prefix), postfix, names);
        for (tool, found) in llvm.iter() {
            tools.insert_missing(tool, found.clone());
        }
    }
    tools
}

/// Bonus per sibling tool found next to the candidate.
const TOOL_WEIGHT: i64 = 128_000;

/// A candidate path broken into the parts the score predicates look at.
struct Candidate<'a> {
    target: &'a str,
    cc: &'a str,
    version: &'a str,
    dir: &'a str,
    base: &'a str,
    /// Lowercased file name without `.exe`.
    stem: String,
}

impl Candidate<'_> {
    fn has_target_prefix(&self) -> bool {
        !self.target.is_empty() && self.stem.starts_with(self.target)
    }

    fn has_version_suffix(&self) -> bool {
        !self.version.is_empty() && self.stem.ends_with(self.version)
    }
}

fn has_cxx_sibling(c: &Candidate<'_>) -> bool {
    c.cc == "gcc"
        && c.base.contains("gcc")
        && ["g++", "c++"]
            .iter()
            .any(|cxx| file_exists(format!("{}{}", c.dir, c.base.replacen("gcc", cxx, 1))))
}

fn target_named(c: &Candidate<'_>) -> bool {
    c.has_target_prefix()
}

fn target_and_version_named(c: &Candidate<'_>) -> bool {
    c.has_target_prefix() && c.has_version_suffix()
}

fn version_suffixed(c: &Candidate<'_>) -> bool {
    !c.has_target_prefix() && c.has_version_suffix()
}

fn version_inside(c: &Candidate<'_>) -> bool {
    !c.has_target_prefix()
        && !c.has_version_suffix()
        && !c.version.is_empty()
        && c.stem.contains(c.version)
}

fn target_in_dir(c: &Candidate<'_>) -> bool {
    !c.target.is_empty() && c.dir.contains(c.target)
}

fn version_in_dir(c: &Candidate<'_>) -> bool {
    !c.version.is_empty() && c.dir.contains(c.version)
}

/// Weighted predicates applied on top of the path length and sibling count.
const BONUSES: &[(i64, fn(&Candidate<'_>) -> bool)] = &[
    (64_000, has_cxx_sibling),
    (32_000, target_named),
    (-16_000, target_and_version_named),
    (8_000, version_suffixed),
    (4_000, version_inside),
    (2_000, target_in_dir),
    (1_000, version_in_dir),
];

/// Score a candidate compiler path; higher is better.
///
/// The path length gives a mild preference for more specific paths. The
/// number of sibling tools dominates, then a C++ partner for gcc, then the
/// naming convention (`<target>-gcc` over `<target>-gcc-<version>` over
/// `gcc-<version>`), then target or version in the directory.
pub fn c_compiler_score(
    target: &str,
    cc: &str,
    version: &str,
    path: &str,
    names: &ToolNames,
) -> i64 {
    let (dir, base) = split_path(path);
    let lower = base.to_lowercase();
    let stem = lower.strip_suffix(".exe").unwrap_or(&lower).to_string();

    let candidate = Candidate {
        target,
        cc,
        version,
        dir,
        base,
        stem,
    };

    let tools = collect_tools(path, cc, names).len() as i64;
    let bonus: i64 = BONUSES
        .iter()
        .filter(|(_, applies)| applies(&candidate))
        .map(|(weight, _)| weight)
        .sum();

    path.len() as i64 + tools * TOOL_WEIGHT + bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NAMES: &ToolNames = &[
        ("gcc", Tool::CCompiler),
        ("g++", Tool::CxxCompiler),
        ("ar", Tool::Archiver),
        ("gcc-ar", Tool::Archiver),
    ];

    fn touch(dir: &std::path::Path, name: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, "").unwrap();
        to_slash(&path)
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/usr/bin/gcc"), ("/usr/bin/", "gcc"));
        assert_eq!(split_path("gcc"), ("", "gcc"));
        assert_eq!(split_path("C:\\mingw\\bin\\gcc.exe"), ("C:\\mingw\\bin\\", "gcc.exe"));
    }

    #[test]
    fn test_single_candidate_short_circuits() {
        let mut exe = Executable {
            symlinks: vec!["/usr/bin/gcc".to_string()],
            ..Executable::default()
        };
        exe.choose_primary_c_compiler_path("x86_64-linux-gnu", "gcc", "13.2.0", NAMES);

        assert_eq!(exe.primary_path, "/usr/bin/gcc");
        assert!(exe.other_paths.is_empty());
        assert!(exe.symlinks.is_empty());
    }

    #[test]
    fn test_no_candidates_leaves_primary_empty() {
        let mut exe = Executable::default();
        exe.choose_primary_c_compiler_path("", "gcc", "", NAMES);
        assert!(exe.primary_path.is_empty());
    }

    #[test]
    fn test_target_name_beats_versioned_target_name() {
        let tmp = TempDir::new().unwrap();
        let plain = touch(tmp.path(), "x86_64-linux-gnu-gcc");
        let versioned = touch(tmp.path(), "x86_64-linux-gnu-gcc-13");

        let target = "x86_64-linux-gnu";
        let a = c_compiler_score(target, "gcc", "13", &plain, NAMES);
        let b = c_compiler_score(target, "gcc", "13", &versioned, NAMES);
        assert!(a > b, "{} <= {}", a, b);
    }

    #[test]
    fn test_siblings_dominate() {
        let tmp = TempDir::new().unwrap();
        let rich = tmp.path().join("rich");
        let bare = tmp.path().join("a-much-longer-directory-name-for-the-bare-copy");
        fs::create_dir_all(&rich).unwrap();
        fs::create_dir_all(&bare).unwrap();

        let rich_gcc = touch(&rich, "gcc");
        touch(&rich, "g++");
        touch(&rich, "ar");
        let bare_gcc = touch(&bare, "gcc");

        let mut exe = Executable {
            other_paths: vec![bare_gcc.clone(), rich_gcc.clone()],
            ..Executable::default()
        };
        exe.choose_primary_c_compiler_path("x86_64-linux-gnu", "gcc", "13", NAMES);

        assert_eq!(exe.primary_path, rich_gcc);
        assert_eq!(exe.other_paths, vec![bare_gcc]);
        assert!(!exe.other_paths.contains(&exe.primary_path));
    }

    #[test]
    fn test_primary_removed_from_symlinks() {
        let tmp = TempDir::new().unwrap();
        let real = touch(tmp.path(), "x86_64-linux-gnu-gcc-13");
        let link = touch(tmp.path(), "gcc");

        let mut exe = Executable {
            primary_path: real.clone(),
            symlinks: vec![link.clone(), real.clone()],
            ..Executable::default()
        };
        exe.choose_primary_c_compiler_path("x86_64-linux-gnu", "gcc", "13", NAMES);

        assert_eq!(exe.primary_path, real);
        assert_eq!(exe.symlinks, vec![link]);
    }

    #[test]
    fn test_find_tools_first_name_wins() {
        let tmp = TempDir::new().unwrap();
        let prefix = format!("{}/x86_64-linux-gnu-", to_slash(tmp.path()));
        touch(tmp.path(), "x86_64-linux-gnu-gcc-ar-13");
        let ar = touch(tmp.path(), "x86_64-linux-gnu-ar-13");

        let tools = find_tools(&prefix, "-13", NAMES);
        assert_eq!(tools.path(Tool::Archiver), Some(ar.as_str()));
    }

    #[test]
    fn test_collect_tools_tries_llvm_for_clang() {
        let tmp = TempDir::new().unwrap();
        let clang = touch(tmp.path(), "clang-17");
        let llvm_ar = touch(tmp.path(), "llvm-ar-17");
        let names: &ToolNames = &[("clang", Tool::CCompiler), ("ar", Tool::Archiver)];

        let tools = collect_tools(&clang, "clang", names);
        assert_eq!(tools.path(Tool::CCompiler), Some(clang.as_str()));
        assert_eq!(tools.path(Tool::Archiver), Some(llvm_ar.as_str()));
    }

    #[test]
    fn test_find_best_keeps_first_on_tie() {
        let best = find_best(["b", "a", "c"], |_| 1);
        assert_eq!(best, Some("b"));
        assert_eq!(find_best(Vec::<&str>::new(), |_| 1), None);
    }

    #[test]
    fn test_empty_target_and_version_add_nothing() {
        let score = c_compiler_score("", "gcc", "", "/nowhere/gcc", NAMES);
        assert_eq!(score, "/nowhere/gcc".len() as i64);
    }
}
