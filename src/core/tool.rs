//! Tool roles and resolved tool paths.
//!
//! A [`Toolset`] maps each [`Tool`] role a toolchain provides to the
//! executable that fills it. Roles always serialize in the canonical order
//! of [`Tool::ALL`], whatever order they were inserted in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error parsing a tool specifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("empty tool specifier")]
    Empty,

    #[error("unknown tool specifier `{0}`")]
    Unknown(String),
}

/// A functional role inside a toolchain.
///
/// Variant order is the canonical serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    CxxCompiler,
    CCompiler,
    Assembler,
    ResourceCompiler,
    Archiver,
    DllLinker,
    ExeLinker,
    Linker,
    ObjCopy,
    ObjDump,
    Ranlib,
    Strip,
    ManifestTool,
}

impl Tool {
    /// Every role, in canonical order.
    pub const ALL: [Tool; 13] = [
        Tool::CxxCompiler,
        Tool::CCompiler,
        Tool::Assembler,
        Tool::ResourceCompiler,
        Tool::Archiver,
        Tool::DllLinker,
        Tool::ExeLinker,
        Tool::Linker,
        Tool::ObjCopy,
        Tool::ObjDump,
        Tool::Ranlib,
        Tool::Strip,
        Tool::ManifestTool,
    ];

    /// Short name used as the serialized key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::CxxCompiler => "c++",
            Tool::CCompiler => "c",
            Tool::Assembler => "as",
            Tool::ResourceCompiler => "rc",
            Tool::Archiver => "ar",
            Tool::DllLinker => "dll",
            Tool::ExeLinker => "exe",
            Tool::Linker => "ld",
            Tool::ObjCopy => "objcopy",
            Tool::ObjDump => "objdump",
            Tool::Ranlib => "ranlib",
            Tool::Strip => "strip",
            Tool::ManifestTool => "mt",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c++" | "cpp" | "cxx" => Ok(Tool::CxxCompiler),
            "c" | "cc" => Ok(Tool::CCompiler),
            "as" => Ok(Tool::Assembler),
            "rc" => Ok(Tool::ResourceCompiler),
            "ar" | "lib" => Ok(Tool::Archiver),
            "dll" | "so" => Ok(Tool::DllLinker),
            "exe" => Ok(Tool::ExeLinker),
            "ld" | "link" => Ok(Tool::Linker),
            "objcopy" => Ok(Tool::ObjCopy),
            "objdump" => Ok(Tool::ObjDump),
            "ranlib" | "runlib" => Ok(Tool::Ranlib),
            "strip" => Ok(Tool::Strip),
            "mt" => Ok(Tool::ManifestTool),
            "" => Err(ToolError::Empty),
            other => Err(ToolError::Unknown(other.to_string())),
        }
    }
}

impl Serialize for Tool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Path to a tool executable, plus sub-command tokens when one executable
/// serves several roles (`zig cc`, `zig ar`).
///
/// Serializes as a plain string without sub-commands, otherwise as an array
/// `[path, cmd...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolPath {
    pub path: String,
    pub commands: Vec<String>,
}

impl ToolPath {
    pub fn new(path: impl Into<String>) -> Self {
        ToolPath {
            path: path.into(),
            commands: Vec::new(),
        }
    }

    pub fn with_commands<I, S>(path: impl Into<String>, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolPath {
            path: path.into(),
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for ToolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for cmd in &self.commands {
            write!(f, " {}", cmd)?;
        }
        Ok(())
    }
}

impl Serialize for ToolPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.commands.is_empty() {
            serializer.serialize_str(&self.path)
        } else {
            let mut parts = Vec::with_capacity(self.commands.len() + 1);
            parts.push(self.path.as_str());
            parts.extend(self.commands.iter().map(String::as_str));
            parts.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ToolPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Path(String),
            Parts(Vec<String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Path(path) => Ok(ToolPath::new(path)),
            Repr::Parts(mut parts) => {
                if parts.is_empty() {
                    return Err(serde::de::Error::custom("empty tool path array"));
                }
                let path = parts.remove(0);
                Ok(ToolPath {
                    path,
                    commands: parts,
                })
            }
        }
    }
}

/// Tool roles mapped to their executables, unique per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Toolset(BTreeMap<Tool, ToolPath>);

impl Toolset {
    pub fn new() -> Self {
        Toolset::default()
    }

    /// Set the path for `tool`, replacing any previous one.
    pub fn insert(&mut self, tool: Tool, path: ToolPath) {
        self.0.insert(tool, path);
    }

    /// Set `tool` only if it is not present yet.
    pub fn insert_missing(&mut self, tool: Tool, path: ToolPath) {
        self.0.entry(tool).or_insert(path);
    }

    pub fn get(&self, tool: Tool) -> Option<&ToolPath> {
        self.0.get(&tool)
    }

    /// Executable path for `tool`, if present.
    pub fn path(&self, tool: Tool) -> Option<&str> {
        self.0.get(&tool).map(|p| p.path.as_str())
    }

    pub fn contains(&self, tool: Tool) -> bool {
        self.0.contains_key(&tool)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Roles and paths in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Tool, &ToolPath)> {
        self.0.iter().map(|(t, p)| (*t, p))
    }
}

impl FromIterator<(Tool, ToolPath)> for Toolset {
    fn from_iter<I: IntoIterator<Item = (Tool, ToolPath)>>(iter: I) -> Self {
        Toolset(iter.into_iter().collect())
    }
}
