//! `git` subprocess backend.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::{parse_added_lines, DiffScope, VcsError, VersionControl};

/// Upper bound for a single git invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs `git` in a repository directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_string(),
            root: root.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Move `root` up to the top level of the repository containing it.
    ///
    /// Keeps the current root when git cannot answer; queries from a
    /// non-repository directory then fail and degrade instead of erroring here.
    pub fn discover(mut self) -> Self {
        match self.run(&["rev-parse", "--show-toplevel"]) {
            Ok(out) if !out.trim().is_empty() => {
                self.root = PathBuf::from(out.trim());
            }
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, dir = %self.root.display(), "repository root not found");
            }
        }
        self
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `root` is inside a git work tree.
    pub fn is_repository(&self) -> bool {
        matches!(
            self.run(&["rev-parse", "--is-inside-work-tree"]),
            Ok(out) if out.trim() == "true"
        )
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("{} {}", self.program, args.join(" "));
        trace!(%command, root = %self.root.display(), "running");

        let mut child = Command::new(&self.program)
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| VcsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // drain both pipes so a large diff cannot block the child
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(VcsError::Timeout {
                    command,
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);

        if !status.success() {
            let stderr = stderr.trim().to_string();
            if stderr.to_lowercase().contains("not a git repository") {
                return Err(VcsError::NotARepository(self.root.display().to_string()));
            }
            return Err(VcsError::Failed {
                command,
                status: status.to_string(),
                stderr,
            });
        }

        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn diff_args(scope: DiffScope) -> &'static [&'static str] {
    match scope {
        DiffScope::WorkingTree => &["diff", "HEAD", "--no-color", "--no-ext-diff"],
        DiffScope::Index => &["diff", "--cached", "--no-color", "--no-ext-diff"],
    }
}

impl VersionControl for GitCli {
    fn changed_files(&self, scope: DiffScope) -> Result<Vec<String>, VcsError> {
        let mut args = diff_args(scope).to_vec();
        args.push("--name-only");
        let out = self.run(&args)?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn added_lines(&self, scope: DiffScope, path: &str) -> Result<Vec<usize>, VcsError> {
        let mut args = diff_args(scope).to_vec();
        args.extend(["-U0", "--", path]);
        let out = self.run(&args)?;
        Ok(parse_added_lines(&out))
    }
}
