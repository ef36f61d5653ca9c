//! Visual Studio (MSVC) discovery.
//!
//! Installations come from three sources, merged by installation path:
//! `vswhere.exe`, the legacy `VSxxxCOMNTOOLS`/`VSINSTALLDIR` variables and a
//! scan of the standard install roots. Each installation is then probed once
//! per target architecture by running `vcvarsall.bat` inside a throwaway
//! batch script and capturing the environment it sets up.
//!
//! Only Windows hosts have installations; elsewhere both entry points return
//! nothing.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::chain::Chain;
use crate::core::tool::{Tool, ToolPath, Toolset};
use crate::core::triplet::{parse_full, Full};
use crate::core::version::compare_quads;
use crate::discovery::{Feedback, ProbeOptions};
use crate::util::env::{self, EnvMap};
use crate::util::fs::{dir_exists, file_exists, to_slash};
use crate::util::process::{combined_output, find_executable, ProcessBuilder};

const VSWHERE_SUBPATH: &str = "Microsoft Visual Studio/Installer/vswhere.exe";
const TOOLS_VERSION_FILE: &str = "VC/Auxiliary/Build/Microsoft.VCToolsVersion.default.txt";

/// Target architectures handed to `vcvarsall.bat`.
const TARGET_ARCHES: [&str; 4] = ["x86", "amd64", "arm", "arm64"];

/// Variables captured from a configured developer prompt.
const CAPTURED_VARS: &[&str] = &[
    "CL",
    "_CL_",
    "INCLUDE",
    "LIBPATH",
    "LINK",
    "_LINK_",
    "LIB",
    "PATH",
    "TMP",
    "FRAMEWORKDIR",
    "FRAMEWORKDIR64",
    "FRAMEWORKVERSION",
    "FRAMEWORKVERSION64",
    "UCRTCONTEXTROOT",
    "UCRTVERSION",
    "UNIVERSALCRTSDKDIR",
    "VCINSTALLDIR",
    "VCTARGETSPATH",
    "WINDOWSLIBPATH",
    "WINDOWSSDKDIR",
    "WINDOWSSDKLIBVERSION",
    "WINDOWSSDKVERSION",
    "VISUALSTUDIOVERSION",
];

/// Legacy per-version tool variables and the version each implies.
const COMNTOOLS_VARS: &[(&str, &str, &str)] = &[
    ("VS140COMNTOOLS", "14.0", "Visual Studio 2015"),
    ("VS120COMNTOOLS", "12.0", "Visual Studio 2013"),
    ("VS110COMNTOOLS", "11.0", "Visual Studio 2012"),
];

static CL_BANNER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Microsoft .*Version (\S+) for (.*?)\s*$").unwrap());

/// How an installation was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMethod {
    #[default]
    Vswhere,
    Env,
    Standalone,
}

impl DiscoveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMethod::Vswhere => "vswhere",
            DiscoveryMethod::Env => "env",
            DiscoveryMethod::Standalone => "standalone",
        }
    }
}

/// An MSVC toolset (`VC/Tools/MSVC/<version>`) inside an installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolsetVersion {
    pub version: String,
    pub path: String,
    pub is_default: bool,
}

/// A Visual Studio (or Build Tools) instance.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MsvcInstallation {
    pub display_name: String,
    pub instance_id: String,
    pub installation_path: String,
    pub installation_version: String,
    pub description: String,
    pub is_prerelease: bool,
    pub toolset_versions: Vec<ToolsetVersion>,
    pub discovery_method: DiscoveryMethod,
}

impl MsvcInstallation {
    pub fn print_summary(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.display_name)?;
        writeln!(w, "- version: '{}'", self.installation_version)?;
        writeln!(w, "- instance id: '{}'", self.instance_id)?;
        writeln!(w, "- path: '{}'", self.installation_path)?;
        writeln!(w, "- discovery method: '{}'", self.discovery_method.as_str())?;
        if !self.toolset_versions.is_empty() {
            writeln!(w, "- toolsets:")?;
            for ts in &self.toolset_versions {
                let default = if ts.is_default { " (default)" } else { "" };
                writeln!(w, "  - version: '{}'{}", ts.version, default)?;
            }
        }
        if self.is_prerelease {
            writeln!(w, "- this is a pre-release build")?;
        }
        Ok(())
    }

    /// Version of the default toolset, if one is marked.
    pub fn default_toolset(&self) -> Option<&ToolsetVersion> {
        self.toolset_versions.iter().find(|ts| ts.is_default)
    }

    fn root(&self) -> &Path {
        Path::new(&self.installation_path)
    }

    /// Major component of the installation version (`17` for `17.9.34607.119`).
    fn major_version(&self) -> Option<u64> {
        let (major, _) = self.installation_version.split_once('.')?;
        major.parse().ok()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VswhereInstance {
    #[serde(default)]
    instance_id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    installation_path: String,
    #[serde(default)]
    installation_version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_prerelease: bool,
}

/// Parse the JSON array printed by `vswhere -format json`.
pub(crate) fn parse_vswhere(json: &str) -> Result<Vec<MsvcInstallation>> {
    let instances: Vec<VswhereInstance> =
        serde_json::from_str(json).context("failed to parse vswhere output")?;

    Ok(instances
        .into_iter()
        .map(|i| MsvcInstallation {
            display_name: i.display_name,
            instance_id: i.instance_id,
            installation_path: i.installation_path.replace('\\', "/"),
            installation_version: i.installation_version,
            description: i.description,
            is_prerelease: i.is_prerelease,
            toolset_versions: Vec::new(),
            discovery_method: DiscoveryMethod::Vswhere,
        })
        .collect())
}

fn program_files_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = ["ProgramFiles(x86)", "ProgramFiles"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .map(PathBuf::from)
        .collect();
    roots.push(PathBuf::from(r"C:\Program Files (x86)"));

    let mut seen = BTreeSet::new();
    roots.retain(|root| dir_exists(root) && seen.insert(root.clone()));
    roots
}

fn find_vswhere() -> Option<PathBuf> {
    program_files_roots()
        .into_iter()
        .map(|root| root.join(VSWHERE_SUBPATH))
        .find(|path| file_exists(path))
        .or_else(|| find_executable("vswhere.exe"))
}

fn from_vswhere(opts: &ProbeOptions, feedback: Feedback<'_>) -> Result<Vec<MsvcInstallation>> {
    let Some(vswhere) = find_vswhere() else {
        bail!("failed to find vswhere.exe");
    };
    feedback.say(format!("using vswhere utility: {}", vswhere.display()));

    let output = ProcessBuilder::new(&vswhere)
        .args(["-all", "-format", "json", "-products", "*", "-legacy", "-prerelease"])
        .timeout(opts.timeout)
        .exec()?;
    if !output.status.success() {
        bail!(
            "vswhere failed with exit code {:?}: {}",
            output.status.code(),
            combined_output(&output).trim()
        );
    }
    parse_vswhere(&String::from_utf8_lossy(&output.stdout))
}

/// Installations named by legacy environment variables.
///
/// `VSxxxCOMNTOOLS` points at `<root>/Common7/Tools`; `VSINSTALLDIR` is set
/// inside an already configured developer prompt.
pub(crate) fn from_env_vars<F>(lookup: F) -> Vec<MsvcInstallation>
where
    F: Fn(&str) -> Option<String>,
{
    let mut found = Vec::new();

    for (var, version, name) in COMNTOOLS_VARS {
        let Some(tools) = lookup(var).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let Some(root) = Path::new(tools.trim()).parent().and_then(Path::parent) else {
            continue;
        };
        if !dir_exists(root) {
            tracing::debug!("{} points to missing directory {}", var, tools);
            continue;
        }
        found.push(MsvcInstallation {
            display_name: name.to_string(),
            installation_path: to_slash(root),
            installation_version: version.to_string(),
            discovery_method: DiscoveryMethod::Env,
            ..MsvcInstallation::default()
        });
    }

    if let Some(root) = lookup("VSINSTALLDIR").filter(|v| !v.trim().is_empty()) {
        let root = PathBuf::from(root.trim());
        if dir_exists(&root) {
            let version = lookup("VISUALSTUDIOVERSION")
                .or_else(|| lookup("VisualStudioVersion"))
                .unwrap_or_default();
            found.push(MsvcInstallation {
                display_name: "Visual Studio (VSINSTALLDIR)".to_string(),
                installation_path: to_slash(&root),
                installation_version: version.trim().to_string(),
                discovery_method: DiscoveryMethod::Env,
                ..MsvcInstallation::default()
            });
        }
    }

    found
}

/// Marketing year to installation major version.
fn year_to_version(year: &str) -> &'static str {
    match year {
        "2017" => "15.0",
        "2019" => "16.0",
        "2022" => "17.0",
        _ => "",
    }
}

/// Installations under `roots` that ship a `vcvarsall.bat`.
///
/// Both the modern `Microsoft Visual Studio/<year>/<edition>` layout and the
/// legacy `Microsoft Visual Studio <version>` layout are recognized.
pub(crate) fn scan_standalone(roots: &[PathBuf]) -> Vec<MsvcInstallation> {
    let mut found = Vec::new();

    for root in roots {
        let base = glob::Pattern::escape(&to_slash(root));

        let modern = format!(
            "{}/Microsoft Visual Studio/*/*/VC/Auxiliary/Build/vcvarsall.bat",
            base
        );
        for bat in glob_files(&modern) {
            // Build -> Auxiliary -> VC -> <edition>
            let Some(install) = bat.ancestors().nth(4) else {
                continue;
            };
            let edition = file_name(install);
            let year = install.parent().map(file_name).unwrap_or_default();
            found.push(MsvcInstallation {
                display_name: format!("Visual Studio {} {}", year, edition),
                installation_path: to_slash(install),
                installation_version: year_to_version(&year).to_string(),
                discovery_method: DiscoveryMethod::Standalone,
                ..MsvcInstallation::default()
            });
        }

        let legacy = format!("{}/Microsoft Visual Studio */VC/vcvarsall.bat", base);
        for bat in glob_files(&legacy) {
            let Some(install) = bat.ancestors().nth(2) else {
                continue;
            };
            let name = file_name(install);
            let version = name
                .strip_prefix("Microsoft Visual Studio ")
                .unwrap_or_default()
                .to_string();
            found.push(MsvcInstallation {
                display_name: name,
                installation_path: to_slash(install),
                installation_version: version,
                discovery_method: DiscoveryMethod::Standalone,
                ..MsvcInstallation::default()
            });
        }
    }

    found
}

fn glob_files(pattern: &str) -> Vec<PathBuf> {
    match glob::glob(pattern) {
        Ok(paths) => paths.filter_map(|p| p.ok()).filter(|p| p.is_file()).collect(),
        Err(e) => {
            tracing::debug!("bad glob pattern {}: {}", pattern, e);
            Vec::new()
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Drop installations whose path (compared case-insensitively, ignoring a
/// trailing slash) was already seen. Earlier entries win.
pub(crate) fn dedupe(installations: Vec<MsvcInstallation>) -> Vec<MsvcInstallation> {
    let mut seen = BTreeSet::new();
    installations
        .into_iter()
        .filter(|inst| {
            let key = inst
                .installation_path
                .replace('\\', "/")
                .trim_end_matches('/')
                .to_lowercase();
            seen.insert(key)
        })
        .collect()
}

/// Toolsets under `<root>/VC/Tools/MSVC`, newest first.
pub(crate) fn toolset_versions(root: &Path) -> Vec<ToolsetVersion> {
    let default = fs::read_to_string(root.join(TOOLS_VERSION_FILE))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let Ok(entries) = fs::read_dir(root.join("VC/Tools/MSVC")) else {
        return Vec::new();
    };

    let mut toolsets: Vec<ToolsetVersion> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| {
            let version = e.file_name().to_string_lossy().into_owned();
            ToolsetVersion {
                is_default: !default.is_empty() && version == default,
                path: to_slash(e.path()),
                version,
            }
        })
        .collect();

    toolsets.sort_by(|a, b| compare_quads(&b.version, &a.version));
    toolsets
}

/// Discover Visual Studio installations, newest first.
pub fn discover_installations(opts: &ProbeOptions, feedback: Feedback<'_>) -> Vec<MsvcInstallation> {
    feedback.say("discovering msvc installations");
    if !cfg!(windows) || opts.isolated {
        tracing::debug!("skipping msvc discovery on this host");
        return Vec::new();
    }

    let mut found = Vec::new();
    match from_vswhere(opts, feedback) {
        Ok(list) => found.extend(list),
        Err(e) => feedback.say(format!("{:#}", e)),
    }
    found.extend(from_env_vars(|var| std::env::var(var).ok()));
    found.extend(scan_standalone(&program_files_roots()));

    let mut found = dedupe(found);
    for inst in &mut found {
        inst.toolset_versions = toolset_versions(inst.root());
    }
    found.sort_by(|a, b| compare_quads(&b.installation_version, &a.installation_version));

    feedback.say(format!("found {} msvc installation(s)", found.len()));
    found
}

/// Discover one toolchain per installation and supported architecture.
pub fn discover_toolchains(opts: &ProbeOptions, feedback: Feedback<'_>) -> Vec<Chain> {
    discover_installations(opts, feedback)
        .iter()
        .flat_map(|inst| test_arches(inst, opts, feedback))
        .collect()
}

fn find_vcvarsall(root: &Path) -> Option<PathBuf> {
    ["VC/Auxiliary/Build/vcvarsall.bat", "VC/vcvarsall.bat"]
        .iter()
        .map(|sub| root.join(sub))
        .find(|path| file_exists(path))
}

/// The host architecture in `vcvarsall.bat` terms.
fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86" => "x86",
        "arm" => "arm",
        "aarch64" => "arm64",
        _ => "amd64",
    }
}

/// Argument selecting a native (`amd64`) or cross (`amd64_arm64`) prompt.
pub(crate) fn vcvars_arg(host: &str, target: &str) -> String {
    if host == target {
        target.to_string()
    } else {
        format!("{}_{}", host, target)
    }
}

fn test_arches(inst: &MsvcInstallation, opts: &ProbeOptions, feedback: Feedback<'_>) -> Vec<Chain> {
    feedback.say(format!("testing installation: {}", inst.installation_path));

    let Some(devbat) = find_vcvarsall(inst.root()) else {
        feedback.say("ERROR: failed to locate vcvarsall.bat file");
        return Vec::new();
    };
    feedback.say(format!("using devbat: {}", devbat.display()));

    let common_dir = inst.root().join("Common7").join("Tools");
    let major = inst.major_version();
    let host = host_arch();

    let captured: Vec<Option<EnvMap>> = TARGET_ARCHES
        .par_iter()
        .map(|arch| {
            let arg = vcvars_arg(host, arch);
            match collect_vars(&devbat, &arg, major, &common_dir, opts) {
                Ok(vars) => Some(vars),
                Err(e) => {
                    tracing::debug!("vcvarsall {}: {:#}", arg, e);
                    None
                }
            }
        })
        .collect();

    TARGET_ARCHES
        .iter()
        .zip(captured)
        .filter_map(|(arch, vars)| {
            let vars = vars?;
            feedback.say(format!(
                "{}: architecture {} - supported",
                inst.display_name, arch
            ));
            Some(chain_from_vars(inst, arch, &vars))
        })
        .collect()
}

const ENV_FILE: &str = "vcvars.env";

/// Batch script that runs `vcvarsall.bat <arg>` and appends the captured
/// variables to `ENV_FILE` next to itself, one `NAME := value` per line.
pub(crate) fn batch_script(devbat: &Path, arg: &str, major: Option<u64>, common_dir: &Path) -> String {
    let mut lines = vec![
        "@echo off".to_string(),
        r#"cd /d "%~dp0""#.to_string(),
    ];
    if let Some(major) = major {
        lines.push(format!(
            r#"set "VS{}0COMNTOOLS={}""#,
            major,
            common_dir.display()
        ));
    }
    lines.push(format!(r#"call "{}" {} || exit /b 1"#, devbat.display(), arg));
    for var in CAPTURED_VARS {
        lines.push(format!("echo {} := %{}% >> {}", var, var, ENV_FILE));
    }

    let mut script = lines.join("\r\n");
    script.push_str("\r\n");
    script
}

/// Parse `NAME := value` lines. A value that is still the literal
/// `%NAME%` means `cmd` left the variable unexpanded, i.e. it was unset.
pub(crate) fn parse_batch_output(text: &str) -> EnvMap {
    let mut vars = EnvMap::new();
    for line in text.lines() {
        let Some((name, value)) = line.split_once(":=") else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || value.is_empty() || value == format!("%{}%", name) {
            continue;
        }
        vars.insert(name.to_string(), value.to_string());
    }
    vars
}

fn collect_vars(
    devbat: &Path,
    arg: &str,
    major: Option<u64>,
    common_dir: &Path,
    opts: &ProbeOptions,
) -> Result<EnvMap> {
    let dir = tempfile::Builder::new()
        .prefix("chainfind-msvc")
        .tempdir()
        .context("failed to create temporary directory")?;
    let bat = dir.path().join("vcvars.bat");
    fs::write(&bat, batch_script(devbat, arg, major, common_dir))
        .with_context(|| format!("failed to write {}", bat.display()))?;

    let output = ProcessBuilder::new("cmd")
        .arg("/C")
        .arg(&bat)
        .cwd(dir.path())
        .timeout(opts.timeout)
        .exec()?;
    if !output.status.success() {
        bail!("vcvarsall.bat {} failed with exit code {:?}", arg, output.status.code());
    }

    let env_file = dir.path().join(ENV_FILE);
    let text = fs::read_to_string(&env_file)
        .with_context(|| format!("failed to read {}", env_file.display()))?;
    let vars = parse_batch_output(&text);
    if !vars.contains_key("INCLUDE") {
        bail!("invalid batch output, can't find INCLUDE entry");
    }
    Ok(vars)
}

fn arch_triplet(arch: &str) -> &'static str {
    match arch {
        "x86" => "i686-pc-windows-msvc",
        "arm" => "arm-pc-windows-msvc",
        "arm64" => "aarch64-pc-windows-msvc",
        _ => "x86_64-pc-windows-msvc",
    }
}

/// Split a `;`-separated list captured from `cmd`, dropping empty entries.
fn split_list(value: Option<&String>) -> impl Iterator<Item = &str> {
    value
        .map(String::as_str)
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn find_in(dirs: &[&str], exe: &str) -> Option<String> {
    dirs.iter()
        .map(|dir| Path::new(dir).join(exe))
        .find(|path| file_exists(path))
        .map(to_slash)
}

/// A tool named by a captured variable, if the variable holds a path to
/// an existing file. `CL` and `LINK` usually carry options instead.
fn tool_from_var(vars: &EnvMap, name: &str) -> Option<String> {
    vars.get(name)
        .filter(|v| file_exists(v.as_str()))
        .map(|v| to_slash(v.as_str()))
}

/// Assemble the chain for one architecture from its captured environment.
pub(crate) fn chain_from_vars(inst: &MsvcInstallation, arch: &str, vars: &EnvMap) -> Chain {
    let triplet = arch_triplet(arch);
    let target = parse_full(triplet).unwrap_or_else(|_| Full {
        original: triplet.to_string(),
        ..Full::default()
    });

    let path_dirs: Vec<&str> = split_list(vars.get("PATH")).collect();
    let mut tools = Toolset::new();
    let mut compiler_vars = EnvMap::new();

    if let Some(cl) = tool_from_var(vars, "CL").or_else(|| find_in(&path_dirs, "cl.exe")) {
        compiler_vars.insert("CC".to_string(), cl.clone());
        compiler_vars.insert("CXX".to_string(), cl.clone());
        tools.insert(Tool::CCompiler, ToolPath::new(cl.clone()));
        tools.insert(Tool::CxxCompiler, ToolPath::new(cl));
    }

    let link = tool_from_var(vars, "LINK").or_else(|| find_in(&path_dirs, "link.exe"));
    if let Some(link) = &link {
        tools.insert(Tool::DllLinker, ToolPath::new(link.clone()));
        tools.insert(Tool::ExeLinker, ToolPath::new(link.clone()));
    }

    let lib = link
        .as_deref()
        .and_then(|link| Path::new(link).parent())
        .map(|dir| dir.join("lib.exe"))
        .filter(|lib| file_exists(lib))
        .map(to_slash)
        .or_else(|| find_in(&path_dirs, "lib.exe"));
    if let Some(lib) = lib {
        tools.insert(Tool::Archiver, ToolPath::new(lib));
    }
    if let Some(rc) = find_in(&path_dirs, "rc.exe") {
        tools.insert(Tool::ResourceCompiler, ToolPath::new(rc));
    }
    if let Some(mt) = find_in(&path_dirs, "mt.exe") {
        tools.insert(Tool::ManifestTool, ToolPath::new(mt));
    }

    let include_dirs: Vec<String> = split_list(vars.get("INCLUDE"))
        .filter(|dir| dir_exists(dir))
        .map(to_slash)
        .collect();
    let library_dirs: Vec<String> = split_list(vars.get("LIB")).map(to_slash).collect();

    let field = |name: &str| vars.get(name).cloned().unwrap_or_default();

    let mut chain = Chain {
        compiler: "msvc".to_string(),
        implementation: "msvc".to_string(),
        full_version: format!(
            "{} - {} - {}",
            inst.display_name, target.arch, inst.installation_version
        ),
        version: inst.installation_version.clone(),
        target,
        installed_dir: inst.installation_path.clone(),
        visual_studio_id: inst.instance_id.clone(),
        visual_studio_arch: arch.to_string(),
        visual_studio_version: field("VISUALSTUDIOVERSION"),
        windows_sdk_version: field("WINDOWSSDKVERSION").trim_end_matches('\\').to_string(),
        ucrt_version: field("UCRTVERSION"),
        toolset_version: inst
            .default_toolset()
            .map(|ts| ts.version.clone())
            .unwrap_or_default(),
        tools,
        cxx_include_dirs: include_dirs.clone(),
        cc_include_dirs: include_dirs,
        library_dirs,
        ..Chain::default()
    };
    // Developer prompt variables, with CC/CXX pointing at the located cl.exe.
    chain.set_environment(&env::merge(vars, &compiler_vars));
    chain
}

/// Version and target from the banner `cl.exe` prints when run bare.
pub fn parse_cl_banner(text: &str) -> Option<(String, String)> {
    let caps = CL_BANNER_RE.captures(text)?;
    Some((caps[1].to_string(), caps[2].trim().to_string()))
}

/// Run `cl.exe` without arguments and read its banner.
pub fn query_version(cl: &Path, opts: &ProbeOptions) -> Result<(String, String)> {
    let output = ProcessBuilder::new(cl).timeout(opts.timeout).exec()?;
    parse_cl_banner(&combined_output(&output))
        .with_context(|| format!("unsupported version output from {}", cl.display()))
}

/// Rank two MSVC chains; the greater one is preferred.
///
/// Installation version, Windows SDK version and UCRT version are compared
/// as version quads (parsable beats unparsable), then the full version and
/// the installed directory as text.
pub fn compare(a: &Chain, b: &Chain) -> Ordering {
    compare_quads(&a.version, &b.version)
        .then_with(|| compare_quads(&a.windows_sdk_version, &b.windows_sdk_version))
        .then_with(|| compare_quads(&a.ucrt_version, &b.ucrt_version))
        .then_with(|| a.full_version.cmp(&b.full_version))
        .then_with(|| a.installed_dir.cmp(&b.installed_dir))
}
