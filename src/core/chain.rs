//! Assembled toolchains.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::core::tool::{Tool, Toolset};
use crate::core::triplet::Full;
use crate::util::env::{self, EnvMap};

/// A fully resolved toolchain: compiler, companion tools, target and the
/// environment a build needs to use them.
///
/// MSVC-only fields stay empty for other compilers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Chain {
    /// Compiler family: `gcc`, `clang` or `msvc`.
    pub compiler: String,
    /// Specific front-end within the family (`apple-clang`, `zig`, ...).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub implementation: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_version: String,
    pub target: Full,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thread_model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub installed_dir: String,

    #[serde(default, rename = "msvc-id", skip_serializing_if = "String::is_empty")]
    pub visual_studio_id: String,
    #[serde(default, rename = "msvc-arch", skip_serializing_if = "String::is_empty")]
    pub visual_studio_arch: String,
    #[serde(default, rename = "msvc-version", skip_serializing_if = "String::is_empty")]
    pub visual_studio_version: String,
    #[serde(default, rename = "windows-sdk", skip_serializing_if = "String::is_empty")]
    pub windows_sdk_version: String,
    #[serde(default, rename = "ucrt", skip_serializing_if = "String::is_empty")]
    pub ucrt_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub toolset_version: String,

    pub tools: Toolset,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc_include_dirs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cxx_include_dirs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub library_dirs: Vec<String>,
    /// Sorted `NAME=VALUE` lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
}

impl Chain {
    /// Replace the environment with the sorted contents of `vars`.
    pub fn set_environment(&mut self, vars: &EnvMap) {
        self.environment = env::join(vars);
    }

    /// Environment as a map.
    pub fn environment_map(&self) -> EnvMap {
        env::split(&self.environment)
    }

    /// Write a short human-readable description.
    pub fn print_summary(&self, w: &mut dyn Write) -> io::Result<()> {
        let mut target = self.target.original.clone();
        if !self.visual_studio_arch.is_empty() {
            target = format!("{}.{}", target, self.visual_studio_arch);
        }
        let version = if self.visual_studio_version.is_empty() {
            self.version.clone()
        } else {
            format!("{} ({})", self.visual_studio_version, self.version)
        };
        writeln!(w, "{} {} targeting '{}'", self.compiler, version, target)?;

        let cc = self.tools.get(Tool::CCompiler);
        let cxx = self.tools.get(Tool::CxxCompiler);
        if cc == cxx {
            if let Some(cc) = cc {
                writeln!(w, "  - path: '{}'", native(&cc.to_string()))?;
            }
        } else {
            if let Some(cc) = cc {
                writeln!(w, "  - C path: '{}'", native(&cc.to_string()))?;
            }
            if let Some(cxx) = cxx {
                writeln!(w, "  - C++ path: '{}'", native(&cxx.to_string()))?;
            }
        }
        Ok(())
    }
}

/// Forward-slash path in the platform's separator.
pub(crate) fn native(path: &str) -> String {
    if cfg!(windows) {
        path.replace('/', "\\")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tool::ToolPath;
    use crate::core::triplet::parse_full;

    fn gcc_chain() -> Chain {
        let mut tools = Toolset::new();
        tools.insert(Tool::CCompiler, ToolPath::new("/usr/bin/gcc-13"));
        tools.insert(Tool::CxxCompiler, ToolPath::new("/usr/bin/g++-13"));
        Chain {
            compiler: "gcc".to_string(),
            version: "13.2.0".to_string(),
            target: parse_full("x86_64-linux-gnu").unwrap(),
            tools,
            ..Chain::default()
        }
    }

    #[test]
    fn test_summary_separate_paths() {
        let mut out = Vec::new();
        gcc_chain().print_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("gcc 13.2.0 targeting 'x86_64-linux-gnu'\n"));
        assert!(text.contains("C path:"));
        assert!(text.contains("C++ path:"));
    }

    #[test]
    fn test_summary_msvc_shared_path() {
        let mut tools = Toolset::new();
        tools.insert(Tool::CCompiler, ToolPath::new("cl.exe"));
        tools.insert(Tool::CxxCompiler, ToolPath::new("cl.exe"));
        let chain = Chain {
            compiler: "msvc".to_string(),
            version: "17.9.34607.119".to_string(),
            visual_studio_version: "17.0".to_string(),
            visual_studio_arch: "x64".to_string(),
            target: parse_full("x86_64-pc-windows-msvc").unwrap(),
            tools,
            ..Chain::default()
        };

        let mut out = Vec::new();
        chain.print_summary(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(
            "msvc 17.0 (17.9.34607.119) targeting 'x86_64-pc-windows-msvc.x64'\n"
        ));
        assert!(text.contains("  - path: 'cl.exe'"));
    }

    #[test]
    fn test_environment_round_trip() {
        let mut chain = gcc_chain();
        let vars = env::split(&["CXX=/usr/bin/g++-13", "CC=/usr/bin/gcc-13"]);
        chain.set_environment(&vars);

        assert_eq!(
            chain.environment,
            vec!["CC=/usr/bin/gcc-13", "CXX=/usr/bin/g++-13"]
        );
        assert_eq!(chain.environment_map(), vars);
    }

    #[test]
    fn test_json_field_names() {
        let mut chain = gcc_chain();
        chain.cc_include_dirs = vec!["/usr/include".to_string()];
        let json = serde_json::to_value(&chain).unwrap();

        assert_eq!(json["compiler"], "gcc");
        assert_eq!(json["target"]["original"], "x86_64-linux-gnu");
        assert_eq!(json["tools"]["c"], "/usr/bin/gcc-13");
        assert_eq!(json["cc-include-dirs"][0], "/usr/include");
        assert!(json.get("msvc-id").is_none());
    }
}
