//! Discovery of LLVM-based compilers.
//!
//! Several front-ends share clang's command line but announce themselves
//! differently in the first line of `-v`. The banner decides the
//! [`Implementation`]; everything after it is parsed the same way.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::chain::Chain;
use crate::core::executable::{collect_tools, split_path, Executable, ToolNames};
use crate::core::tool::{Tool, ToolPath, Toolset};
use crate::core::triplet::{parse_full, Full};
use crate::discovery::probe;
use crate::discovery::{Feedback, ProbeOptions};
use crate::util::env::EnvMap;
use crate::util::fs::{dir_exists, join_path_list, search_files_and_symlinks, to_slash, FileMatches};

/// A clang-compatible front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Implementation {
    #[default]
    Clang,
    AppleClang,
    Emscripten,
    IntelClang,
    TiClang,
    ArmClang,
    ZigClang,
}

impl Implementation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Implementation::Clang => "clang",
            Implementation::AppleClang => "apple-clang",
            Implementation::Emscripten => "emscripten",
            Implementation::IntelClang => "intel-clang",
            Implementation::TiClang => "ti-clang",
            Implementation::ArmClang => "arm-clang",
            Implementation::ZigClang => "zig-clang",
        }
    }

    /// The infix that names the compiler driver in file names.
    fn driver_infix(&self) -> &'static str {
        match self {
            Implementation::Emscripten => "emcc",
            Implementation::ZigClang => "zig",
            _ => "clang",
        }
    }

    fn tool_names(&self) -> &'static ToolNames {
        match self {
            Implementation::Emscripten => EMSCRIPTEN_TOOL_NAMES,
            _ => CLANG_TOOL_NAMES,
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File names of LLVM tools relative to the `clang` infix, in lookup order.
pub const CLANG_TOOL_NAMES: &ToolNames = &[
    ("clang", Tool::CCompiler),
    ("clang++", Tool::CxxCompiler),
    ("ar", Tool::Archiver),
    ("as", Tool::Assembler),
    ("lld", Tool::Linker),
    ("objcopy", Tool::ObjCopy),
    ("objdump", Tool::ObjDump),
    ("ranlib", Tool::Ranlib),
    ("windres", Tool::ResourceCompiler),
    ("strip", Tool::Strip),
    ("llvm-ar", Tool::Archiver),
    ("llvm-as", Tool::Assembler),
    ("llvm-objcopy", Tool::ObjCopy),
    ("llvm-objdump", Tool::ObjDump),
    ("llvm-ranlib", Tool::Ranlib),
    ("llvm-windres", Tool::ResourceCompiler),
    ("llvm-strip", Tool::Strip),
];

/// Emscripten wrapper scripts relative to the `emcc` infix.
pub const EMSCRIPTEN_TOOL_NAMES: &ToolNames = &[
    ("emcc", Tool::CCompiler),
    ("em++", Tool::CxxCompiler),
    ("emar", Tool::Archiver),
    ("emranlib", Tool::Ranlib),
];

/// `zig` sub-commands and the roles they fill.
const ZIG_SUBCOMMANDS: &[(&str, Tool)] = &[
    ("cc", Tool::CCompiler),
    ("c++", Tool::CxxCompiler),
    ("ar", Tool::Archiver),
    ("rc", Tool::ResourceCompiler),
    ("ranlib", Tool::Ranlib),
    ("objcopy", Tool::ObjCopy),
    ("objdump", Tool::ObjDump),
];

static CLANG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^clang(?:-\d+(?:\.\d+)*)?(?:\.exe)?$").unwrap());
static EMCC_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^em(?:cc|c\+\+)(?:\.exe)?$").unwrap());
static ZIG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^zig(?:\.exe)?$").unwrap());

/// Banner patterns in match order. Emscripten and Apple come before the
/// generic pattern because their banners mention clang too.
static BANNERS: LazyLock<Vec<(Implementation, Regex)>> = LazyLock::new(|| {
    [
        (
            Implementation::Emscripten,
            r"^emcc \(Emscripten gcc/clang-like replacement.*\) ([\d\.]+)",
        ),
        (Implementation::AppleClang, r"^Apple (?:clang|LLVM) version ([\d\.]+)"),
        (Implementation::IntelClang, r"^Intel[^\n]+oneAPI[^\n]+ ([\d\.]+)"),
        (Implementation::TiClang, r"^TI .* Clang ([\d\.]+)"),
        (Implementation::ArmClang, r"^armclang version ([\d\.]+)"),
        (Implementation::Clang, r"^(?:.*clang) version ([\d\.]+)"),
    ]
    .into_iter()
    .map(|(imp, re)| (imp, Regex::new(re).unwrap()))
    .collect()
});

static ZIG_BANNER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Homebrew )?clang version ([\d\.]+)").unwrap());

/// What the first line of `-v` says about the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Banner {
    implementation: Implementation,
    full_version: String,
    version: String,
}

fn banner_from(implementation: Implementation, re: &Regex, line: &str) -> Option<Banner> {
    let caps = re.captures(line)?;
    Some(Banner {
        implementation,
        full_version: caps.get(0)?.as_str().trim().to_string(),
        version: caps.get(1)?.as_str().to_string(),
    })
}

/// Identify a front-end by its banner line.
fn classify(line: &str) -> Option<Banner> {
    BANNERS
        .iter()
        .find_map(|(imp, re)| banner_from(*imp, re, line))
}

fn classify_zig(line: &str) -> Option<Banner> {
    banner_from(Implementation::ZigClang, &ZIG_BANNER_RE, line)
}

/// One LLVM-based compiler build and every path it was found under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClangInstallation {
    pub implementation: Implementation,
    pub full_version: String,
    pub version: String,
    /// Default target reported by the driver.
    pub target: Full,
    pub thread_model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub installed_dir: String,
    pub cc_include_dirs: Vec<String>,
    pub cxx_include_dirs: Vec<String>,
    pub c_compiler: Executable,
}

impl ClangInstallation {
    pub fn print_summary(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{} {}", self.implementation, self.version)?;
        writeln!(w, "- full version: '{}'", self.full_version)?;
        writeln!(w, "- primary target: {}", self.target.original)?;
        writeln!(w, "  - os: {}", self.target.os)?;
        writeln!(w, "  - arch: {}", self.target.arch)?;
        writeln!(w, "  - abi: {}", self.target.abi)?;
        writeln!(w, "  - libc: {}", self.target.libc)?;
        writeln!(w, "- thread model: {}", self.thread_model)?;
        writeln!(w, "- CC primary path: '{}'", self.c_compiler.primary_path)?;
        if !self.c_compiler.subcommands.is_empty() {
            writeln!(
                w,
                "- CC subcommands: {}",
                self.c_compiler.subcommands.join(" ")
            )?;
        }
        for path in &self.c_compiler.other_paths {
            writeln!(w, "- CC alternative path: '{}'", path)?;
        }
        for path in &self.c_compiler.symlinks {
            writeln!(w, "- CC symlink path: '{}'", path)?;
        }
        writeln!(w, "- installed dir: {}", self.installed_dir)?;
        Ok(())
    }

    /// Assemble a toolchain around the primary driver.
    ///
    /// `zig` serves every role through sub-commands. Other drivers find
    /// their siblings by file name; without a C++ driver the C driver is
    /// used for both languages.
    pub fn to_chain(&self) -> Chain {
        let primary = &self.c_compiler.primary_path;
        let mut tools = Toolset::new();

        if self.implementation == Implementation::ZigClang {
            for (cmd, tool) in ZIG_SUBCOMMANDS {
                tools.insert(*tool, ToolPath::with_commands(primary.clone(), [*cmd]));
            }
        } else {
            tools.insert(Tool::CCompiler, self.c_compiler.tool_path());
            let siblings = collect_tools(
                primary,
                self.implementation.driver_infix(),
                self.implementation.tool_names(),
            );
            for (tool, path) in siblings.iter() {
                tools.insert_missing(tool, path.clone());
            }
        }

        if let Some(cc) = tools.get(Tool::CCompiler).cloned() {
            tools.insert_missing(Tool::CxxCompiler, cc);
        }

        let installed_dir = if self.installed_dir.is_empty() {
            split_path(primary).0.trim_end_matches(['/', '\\']).to_string()
        } else {
            self.installed_dir.clone()
        };

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
            compiler: "clang".to_string(),
            implementation: self.implementation.to_string(),
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

/// Whether a file name looks like a clang, emcc or zig driver.
pub fn is_clang_name(name: &str) -> bool {
    CLANG_NAME_RE.is_match(name) || EMCC_NAME_RE.is_match(name) || ZIG_NAME_RE.is_match(name)
}

/// Ask one driver about itself.
///
/// `zig` binaries are queried as `zig cc`. The returned installation has no
/// paths recorded yet.
pub fn query_version(exe: &Path, opts: &ProbeOptions) -> Result<ClangInstallation> {
    let path = to_slash(exe);
    let is_zig = exe
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| ZIG_NAME_RE.is_match(n));

    let tool = if is_zig {
        ToolPath::with_commands(path, ["cc"])
    } else {
        ToolPath::new(path)
    };

    // Some wrappers exit non-zero on `-v` without inputs; the banner decides.
    let verbose = probe::verbose_output(&tool, opts)?;
    let first = verbose
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    let banner = if is_zig {
        classify_zig(first)
    } else {
        classify(first)
    };
    let Some(banner) = banner else {
        bail!("`{} -v` does not print a known clang banner", tool);
    };

    let target = if banner.implementation == Implementation::Emscripten {
        parse_full("wasm32-emscripten")?
    } else {
        probe::parse_target_line(&verbose).unwrap_or_default()
    };

    let mut inst = ClangInstallation {
        implementation: banner.implementation,
        full_version: banner.full_version,
        version: banner.version,
        target,
        thread_model: probe::parse_thread_model(&verbose).unwrap_or_default(),
        installed_dir: probe::parse_installed_dir(&verbose)
            .map(|d| d.replace('\\', "/"))
            .unwrap_or_default(),
        ..ClangInstallation::default()
    };
    if is_zig {
        inst.c_compiler.subcommands = tool.commands.clone();
    }

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

/// Directories searched for LLVM drivers.
fn search_dirs(opts: &ProbeOptions) -> Vec<PathBuf> {
    let mut dirs = probe::search_dirs(opts);
    if cfg!(windows) && !opts.isolated {
        for var in ["LLVM_ROOT", "ProgramFiles(x86)", "ProgramFiles"] {
            if let Some(root) = std::env::var_os(var).map(PathBuf::from) {
                if dir_exists(&root) {
                    dirs.push(root.join("LLVM").join("bin"));
                }
            }
        }
    }
    dirs
}

/// Discover LLVM-based compiler installations, newest first.
pub fn discover_installations(
    opts: &ProbeOptions,
    feedback: Feedback<'_>,
) -> Vec<ClangInstallation> {
    feedback.say("discovering LLVM-based compiler installations");

    let files = search_files_and_symlinks(&search_dirs(opts), is_clang_name);
    let found = group_installations(&files, opts);

    feedback.say(format!(
        "found {} LLVM-based compiler installation(s)",
        found.len()
    ));
    found
}

fn group_installations(files: &FileMatches, opts: &ProbeOptions) -> Vec<ClangInstallation> {
    let mut groups: BTreeMap<String, probe::Group<ClangInstallation>> = BTreeMap::new();

    for (file, links) in files {
        let inst = match query_version(file, opts) {
            Ok(inst) => inst,
            Err(e) => {
                tracing::debug!("skipping {}: {:#}", file.display(), e);
                continue;
            }
        };

        let key = probe::signature(
            &[
                inst.implementation.as_str(),
                &inst.full_version,
                &inst.version,
                &inst.target.original,
                &inst.thread_model,
            ],
            &inst.cc_include_dirs,
            &inst.cxx_include_dirs,
        );
        groups
            .entry(key)
            .or_insert_with(|| probe::Group::new(inst))
            .add(file, links);
    }

    let mut found: Vec<ClangInstallation> = groups
        .into_values()
        .map(|group| {
            let (mut inst, other_paths, symlinks) = group.into_parts();
            inst.c_compiler.other_paths = other_paths;
            inst.c_compiler.symlinks = symlinks;
            inst.c_compiler.choose_primary_c_compiler_path(
                &inst.target.original,
                inst.implementation.driver_infix(),
                &inst.version,
                inst.implementation.tool_names(),
            );
            inst
        })
        .collect();

    found.sort_by(|a, b| probe::newest_first(&a.version, &b.version));
    found
}

/// Discover LLVM-based toolchains.
pub fn discover_toolchains(opts: &ProbeOptions, feedback: Feedback<'_>) -> Vec<Chain> {
    discover_installations(opts, feedback)
        .iter()
        .map(|inst| {
            feedback.say(format!(
                "scanning {} {} targeting {} at {}",
                inst.implementation,
                inst.full_version,
                inst.target.original,
                inst.c_compiler.primary_path
            ));
            inst.to_chain()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(line: &str) -> Option<(Implementation, String, String)> {
        classify(line).map(|b| (b.implementation, b.full_version, b.version))
    }

    #[test]
    fn test_is_clang_name() {
        assert!(is_clang_name("clang"));
        assert!(is_clang_name("clang-17"));
        assert!(is_clang_name("clang.exe"));
        assert!(is_clang_name("emcc"));
        assert!(is_clang_name("em++"));
        assert!(is_clang_name("zig"));
        assert!(is_clang_name("zig.exe"));

        assert!(!is_clang_name("clang++"));
        assert!(!is_clang_name("clang-format"));
        assert!(!is_clang_name("clang-tidy-17"));
        assert!(!is_clang_name("emar"));
    }

    #[test]
    fn test_classify_banners() {
        assert_eq!(
            classified("emcc (Emscripten gcc/clang-like replacement + linker emulating GNU ld) 3.1.51 (c0c2ca1314672a25699846b4663701bcb6f69cca)"),
            Some((
                Implementation::Emscripten,
                "emcc (Emscripten gcc/clang-like replacement + linker emulating GNU ld) 3.1.51".to_string(),
                "3.1.51".to_string()
            ))
        );
        assert_eq!(
            classified("Apple clang version 15.0.0 (clang-1500.1.0.2.5)"),
            Some((
                Implementation::AppleClang,
                "Apple clang version 15.0.0".to_string(),
                "15.0.0".to_string()
            ))
        );
        assert_eq!(
            classified("Intel(R) oneAPI DPC++/C++ Compiler 2024.0.0 (2024.0.0.20231017)")
                .map(|c| (c.0, c.2)),
            Some((Implementation::IntelClang, "2024.0.0".to_string()))
        );
        assert_eq!(
            classified("TI Arm Clang 3.2.0 (based on LLVM 15)").map(|c| (c.0, c.2)),
            Some((Implementation::TiClang, "3.2.0".to_string()))
        );
        assert_eq!(
            classified("armclang version 6.21").map(|c| (c.0, c.2)),
            Some((Implementation::ArmClang, "6.21".to_string()))
        );
        assert_eq!(
            classified("Ubuntu clang version 14.0.0-1ubuntu1.1"),
            Some((
                Implementation::Clang,
                "Ubuntu clang version 14.0.0".to_string(),
                "14.0.0".to_string()
            ))
        );
        assert_eq!(classified("gcc version 13.2.0 (GCC)"), None);
    }

    #[test]
    fn test_vanilla_banner_is_not_zig() {
        let banner = classify("clang version 17.0.6").unwrap();
        assert_eq!(banner.implementation, Implementation::Clang);

        let zig = classify_zig("clang version 16.0.6 (https://github.com/ziglang/zig-bootstrap 1dda86241204c4649f668d46b6a37feed707c7b4)").unwrap();
        assert_eq!(zig.implementation, Implementation::ZigClang);
        assert_eq!(zig.version, "16.0.6");
    }

    #[test]
    fn test_implementation_names() {
        assert_eq!(Implementation::TiClang.to_string(), "ti-clang");
        assert_eq!(
            serde_json::to_value(Implementation::AppleClang).unwrap(),
            "apple-clang"
        );
    }

    #[test]
    fn test_zig_chain_uses_subcommands() {
        let inst = ClangInstallation {
            implementation: Implementation::ZigClang,
            version: "16.0.6".to_string(),
            target: parse_full("x86_64-linux-gnu").unwrap(),
            c_compiler: Executable {
                primary_path: "/opt/zig/zig".to_string(),
                subcommands: vec!["cc".to_string()],
                ..Executable::default()
            },
            ..ClangInstallation::default()
        };

        let chain = inst.to_chain();
        assert_eq!(chain.compiler, "clang");
        assert_eq!(chain.implementation, "zig-clang");
        assert_eq!(chain.installed_dir, "/opt/zig");
        assert_eq!(
            chain.tools.get(Tool::CxxCompiler),
            Some(&ToolPath::with_commands("/opt/zig/zig", ["c++"]))
        );
        assert_eq!(
            chain.tools.get(Tool::ResourceCompiler),
            Some(&ToolPath::with_commands("/opt/zig/zig", ["rc"]))
        );
        assert!(!chain.tools.contains(Tool::Linker));
        assert!(chain.environment.contains(&"CC=/opt/zig/zig".to_string()));
    }

    #[test]
    fn test_cxx_falls_back_to_c_driver() {
        let inst = ClangInstallation {
            c_compiler: Executable {
                primary_path: "/nonexistent/bin/clang".to_string(),
                ..Executable::default()
            },
            ..ClangInstallation::default()
        };
        let chain = inst.to_chain();
        assert_eq!(chain.tools.path(Tool::CxxCompiler), Some("/nonexistent/bin/clang"));
    }

    #[test]
    fn test_summary_lists_subcommands() {
        let inst = ClangInstallation {
            implementation: Implementation::ZigClang,
            version: "16.0.6".to_string(),
            c_compiler: Executable {
                primary_path: "/opt/zig/zig".to_string(),
                subcommands: vec!["cc".to_string()],
                ..Executable::default()
            },
            ..ClangInstallation::default()
        };
        let mut out = Vec::new();
        inst.print_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("zig-clang 16.0.6\n"));
        assert!(text.contains("- CC subcommands: cc\n"));
    }

    #[cfg(unix)]
    mod probing {
        use super::*;
        use crate::discovery::probe::fake;
        use tempfile::TempDir;

        const INCLUDES: &str = r#"
"-xc -E -v -"|"-xc++ -E -v -")
  cat >&2 <<'EOF'
#include <...> search starts here:
 /usr/lib/llvm-17/lib/clang/17/include
 /usr/include
End of search list.
EOF
  ;;"#;

        fn isolated(dir: &Path) -> ProbeOptions {
            ProbeOptions {
                extra_search_paths: vec![dir.to_path_buf()],
                isolated: true,
                ..ProbeOptions::default()
            }
        }

        fn file_name(path: &str) -> &str {
            split_path(path).1
        }

        #[test]
        fn test_clang_toolchain() {
            let tmp = TempDir::new().unwrap();
            let dir = tmp.path();
            let body = format!(
                r#"case "$*" in
"-v")
  cat >&2 <<'EOF'
Ubuntu clang version 17.0.6 (++20231209124227+6009708b4367-1~exp1~20231209124336.77)
Target: x86_64-pc-linux-gnu
Thread model: posix
InstalledDir: /usr/lib/llvm-17/bin
EOF
  ;;{}
*) exit 1 ;;
esac"#,
                INCLUDES
            );
            fake::script(dir, "clang-17", &body);
            fake::touch(dir, "clang++-17");
            fake::touch(dir, "llvm-ar-17");
            fake::touch(dir, "clang-format-17");

            let chains = discover_toolchains(&isolated(dir), Feedback::none());
            assert_eq!(chains.len(), 1);

            let chain = &chains[0];
            assert_eq!(chain.implementation, "clang");
            assert_eq!(chain.version, "17.0.6");
            assert_eq!(chain.target.arch, "x64");
            assert_eq!(chain.thread_model, "posix");
            assert_eq!(chain.installed_dir, "/usr/lib/llvm-17/bin");
            assert_eq!(
                chain.cc_include_dirs,
                vec!["/usr/lib/llvm-17/lib/clang/17/include", "/usr/include"]
            );
            assert_eq!(file_name(chain.tools.path(Tool::CxxCompiler).unwrap()), "clang++-17");
            assert_eq!(file_name(chain.tools.path(Tool::Archiver).unwrap()), "llvm-ar-17");
        }

        #[test]
        fn test_emscripten_installation() {
            let tmp = TempDir::new().unwrap();
            let dir = tmp.path();
            let body = format!(
                r#"case "$*" in
"-v")
  echo "emcc (Emscripten gcc/clang-like replacement + linker emulating GNU ld) 3.1.51 (c0c2ca1314672a25699846b4663701bcb6f69cca)" >&2
  echo "clang version 18.0.0" >&2
  echo "Target: wasm32-unknown-emscripten" >&2
  exit 1
  ;;{}
*) exit 1 ;;
esac"#,
                INCLUDES
            );
            fake::script(dir, "emcc", &body);
            fake::touch(dir, "emar");

            let found = discover_installations(&isolated(dir), Feedback::none());
            assert_eq!(found.len(), 1);
            let inst = &found[0];
            assert_eq!(inst.implementation, Implementation::Emscripten);
            assert_eq!(inst.version, "3.1.51");
            assert_eq!(inst.target.original, "wasm32-emscripten");
            assert_eq!(file_name(&inst.c_compiler.primary_path), "emcc");

            let chain = inst.to_chain();
            assert_eq!(file_name(chain.tools.path(Tool::Archiver).unwrap()), "emar");
        }

        #[test]
        fn test_zig_is_queried_through_cc() {
            let tmp = TempDir::new().unwrap();
            let dir = tmp.path();
            let body = r#"[ "$1" = "cc" ] || exit 1
shift
case "$*" in
"-v")
  echo "clang version 16.0.6 (https://github.com/ziglang/zig-bootstrap 1dda86241204c4649f668d46b6a37feed707c7b4)" >&2
  echo "Target: x86_64-unknown-linux-musl" >&2
  ;;
*) exit 1 ;;
esac"#;
            fake::script(dir, "zig", body);

            let found = discover_installations(&isolated(dir), Feedback::none());
            assert_eq!(found.len(), 1);
            let inst = &found[0];
            assert_eq!(inst.implementation, Implementation::ZigClang);
            assert_eq!(inst.c_compiler.subcommands, vec!["cc"]);
            assert_eq!(inst.target.libc, "musl");
        }

        #[test]
        fn test_unknown_banner_is_skipped() {
            let tmp = TempDir::new().unwrap();
            fake::script(tmp.path(), "clang", r#"echo "frobnicator 1.0" >&2"#);
            assert!(discover_installations(&isolated(tmp.path()), Feedback::none()).is_empty());
        }
    }
}
