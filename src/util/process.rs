//! Subprocess execution utilities.
//!
//! Every compiler probe goes through [`ProcessBuilder`]. Environment
//! overrides apply to the child only, and a deadline can be attached so a
//! hung compiler never blocks discovery indefinitely.

use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

/// How often a child with a deadline is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<OsString>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Force the `C` locale in the child so banners are not translated.
    pub fn c_locale(self) -> Self {
        self.env("LANG", "C").env("LC_ALL", "C")
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Kill the child if it runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command and wait for completion.
    ///
    /// stdin is closed right away so probes such as `gcc -E -` see
    /// end-of-file instead of inheriting the terminal.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();

        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))?;

        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        drop(child.stdin.take());

        let status = self.wait(&mut child)?;

        Ok(Output {
            status,
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus> {
        let Some(timeout) = self.timeout else {
            return child
                .wait()
                .with_context(|| format!("failed to wait for `{}`", self.program.display()));
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child
                .try_wait()
                .with_context(|| format!("failed to wait for `{}`", self.program.display()))?
            {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                bail!(
                    "`{}` timed out after {:.1}s",
                    self.display_command(),
                    timeout.as_secs_f64()
                );
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Display the command for error messages. Non-UTF-8 arguments are
    /// shown lossily; the child still receives them unchanged.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// stdout followed by stderr, lossily decoded.
///
/// Compilers print `-v` banners to stderr, some wrappers to stdout.
pub fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find an executable in `dirs` only, ignoring `PATH`.
pub fn find_executable_in(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    if dirs.is_empty() {
        return None;
    }
    let paths = std::env::join_paths(dirs).ok()?;
    let cwd = std::env::current_dir().ok()?;
    which::which_in(name, Some(paths), cwd).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_builder() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.trim() == "hello" || stdout.contains("hello"));
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("gcc").args(["-x", "c", "-E", "-v", "-"]);

        assert_eq!(pb.display_command(), "gcc -x c -E -v -");
    }

    #[cfg(unix)]
    #[test]
    fn test_child_env_does_not_touch_parent() {
        let before = std::env::var("LC_ALL").ok();
        let output = ProcessBuilder::new("sh")
            .args(["-c", "echo $LC_ALL"])
            .c_locale()
            .exec()
            .unwrap();

        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "C");
        assert_eq!(std::env::var("LC_ALL").ok(), before);
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_is_closed() {
        let output = ProcessBuilder::new("cat")
            .timeout(Duration::from_secs(5))
            .exec()
            .unwrap();
        assert!(output.status.success());
        assert!(output.stdout.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_args_reach_child_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/opt/caf\xe9/include");
        let output = ProcessBuilder::new("sh")
            .args(["-c", "printf %s \"$1\"", "sh"])
            .arg(raw)
            .exec()
            .unwrap();

        assert_eq!(output.stdout, b"/opt/caf\xe9/include");
    }

    #[test]
    fn test_find_executable_in_ignores_path() {
        assert_eq!(find_executable_in("sh", &[]), None);

        let tmp = tempfile::TempDir::new().unwrap();
        assert_eq!(find_executable_in("sh", &[tmp.path().to_path_buf()]), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_find_executable_in_searches_dirs() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let ar = tmp.path().join("ar");
        std::fs::write(&ar, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&ar, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(
            find_executable_in("ar", &[tmp.path().to_path_buf()]),
            Some(ar)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let err = ProcessBuilder::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(100))
            .exec()
            .unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }

    #[cfg(unix)]
    #[test]
    fn test_combined_output_keeps_both_streams() {
        let output = ProcessBuilder::new("sh")
            .args(["-c", "echo out; echo err 1>&2"])
            .exec()
            .unwrap();
        let text = combined_output(&output);
        assert!(text.contains("out"));
        assert!(text.contains("err"));
    }
}
