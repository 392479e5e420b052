use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context as _;

use crate::export::script::{ArtifactPaths, BaseName, build_control_script};
use crate::foundation::error::{TelopError, TelopResult};
use crate::style::model::TelopStyle;

/// Environment variable naming the production tool executable.
pub const AFTERFX_ENV: &str = "TELOP_AFTERFX";
/// Environment variable bounding an export run, in whole seconds.
pub const EXPORT_TIMEOUT_ENV: &str = "TELOP_EXPORT_TIMEOUT_SECS";

const TOOL_NAMES: &[&str] = &["afterfx", "AfterFX.exe", "afterfx.exe"];
const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// How long a killed tool's output readers get to reach end of stream.
const DRAIN_GRACE: Duration = Duration::from_secs(1);
/// Output directory used when none is given.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Options for writing control scripts and running the export tool.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Working output directory for the script and the artifact.
    pub out_dir: PathBuf,
    /// Explicit tool executable; when unset the tool is looked up.
    pub tool_path: Option<PathBuf>,
    /// Kill the tool after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Replace an artifact left by an earlier run.
    pub overwrite: bool,
}

impl Default for ExportOpts {
    /// Writes into `dist`, looks the tool up, overwrites, and takes the timeout from
    /// `TELOP_EXPORT_TIMEOUT_SECS`.
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            tool_path: None,
            timeout: parse_timeout(std::env::var(EXPORT_TIMEOUT_ENV).ok().as_deref()),
            overwrite: true,
        }
    }
}

impl ExportOpts {
    /// Default options writing into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }

    /// Use `tool` instead of looking the executable up.
    pub fn with_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.tool_path = Some(tool.into());
        self
    }

    /// Bound the tool run.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Allow or refuse replacing an existing artifact.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Outcome of a successful export.
#[derive(Clone, Debug)]
pub struct ExportReport {
    /// Script and artifact locations.
    pub paths: ArtifactPaths,
    /// Tool used for the run.
    pub tool: PathBuf,
    /// Tool exit status, rendered for display.
    pub status: String,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Boundary to the external production tool.
///
/// Implementations are called once per export attempt; callers do not retry.
pub trait ExportGateway {
    /// Produce the export artifact for `style` under the sanitized name `base`.
    fn export(&self, style: &TelopStyle, base: &BaseName) -> TelopResult<ExportReport>;
}

/// Runs After Effects on a generated control script.
#[derive(Clone, Debug)]
pub struct AfterEffectsGateway {
    opts: ExportOpts,
}

impl AfterEffectsGateway {
    /// Create a gateway with `opts`.
    pub fn new(opts: ExportOpts) -> Self {
        Self { opts }
    }

    /// Options this gateway runs with.
    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }
}

impl ExportGateway for AfterEffectsGateway {
    #[tracing::instrument(skip(self, style), fields(base = %base))]
    fn export(&self, style: &TelopStyle, base: &BaseName) -> TelopResult<ExportReport> {
        let tool = find_tool(self.opts.tool_path.as_deref())?;
        let paths = ArtifactPaths::new(&self.opts.out_dir, base);

        if paths.artifact.exists() {
            if !self.opts.overwrite {
                return Err(TelopError::export_failed(format!(
                    "artifact '{}' already exists",
                    paths.artifact.display()
                )));
            }
            std::fs::remove_file(&paths.artifact).with_context(|| {
                format!("failed to remove stale artifact '{}'", paths.artifact.display())
            })?;
        }
        write_script_to(style, &paths)?;

        tracing::info!(tool = %tool.display(), script = %paths.script.display(), "running export tool");
        let run = run_tool(&tool, &paths.script, self.opts.timeout)?;

        if !paths.artifact.exists() {
            return Err(TelopError::export_failed(format!(
                "'{}' exited with {} without producing '{}': {}",
                tool.display(),
                run.status,
                paths.artifact.display(),
                run.stderr.trim()
            )));
        }
        if !run.status.success() {
            tracing::warn!(status = %run.status, "export tool reported failure but the artifact exists");
        }

        Ok(ExportReport {
            paths,
            tool,
            status: run.status.to_string(),
            stdout: run.stdout,
            stderr: run.stderr,
        })
    }
}

/// Write the control script for `style` into `opts.out_dir` without running any tool.
pub fn write_control_script(style: &TelopStyle, opts: &ExportOpts) -> TelopResult<ArtifactPaths> {
    let base = BaseName::from_template_name(&style.template_name);
    let paths = ArtifactPaths::new(&opts.out_dir, &base);
    write_script_to(style, &paths)?;
    Ok(paths)
}

fn write_script_to(style: &TelopStyle, paths: &ArtifactPaths) -> TelopResult<()> {
    if let Some(parent) = paths.script.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    let script = build_control_script(style, paths);
    std::fs::write(&paths.script, script)
        .with_context(|| format!("failed to write control script '{}'", paths.script.display()))?;
    tracing::debug!(path = %paths.script.display(), "wrote control script");
    Ok(())
}

/// Locate the tool: explicit path, then `TELOP_AFTERFX`, then a search of `PATH`.
pub fn find_tool(explicit: Option<&Path>) -> TelopResult<PathBuf> {
    find_tool_in(
        explicit,
        std::env::var_os(AFTERFX_ENV),
        std::env::var_os("PATH"),
    )
}

fn find_tool_in(
    explicit: Option<&Path>,
    env_tool: Option<OsString>,
    search_path: Option<OsString>,
) -> TelopResult<PathBuf> {
    if let Some(path) = explicit {
        return existing_tool(path.to_path_buf());
    }
    if let Some(value) = env_tool.filter(|v| !v.is_empty()) {
        return existing_tool(PathBuf::from(value));
    }
    if let Some(paths) = search_path {
        for dir in std::env::split_paths(&paths) {
            for name in TOOL_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Ok(candidate);
                }
            }
        }
    }
    Err(TelopError::tool_not_found(format!(
        "After Effects was not found on PATH; set {AFTERFX_ENV} or pass an explicit tool path"
    )))
}

fn existing_tool(path: PathBuf) -> TelopResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(TelopError::tool_not_found(format!(
            "'{}' does not exist",
            path.display()
        )))
    }
}

fn parse_timeout(raw: Option<&str>) -> Option<Duration> {
    let raw = raw?.trim();
    match raw.parse::<u64>() {
        Ok(0) => None,
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            tracing::warn!(value = raw, "ignoring invalid {EXPORT_TIMEOUT_ENV}");
            None
        }
    }
}

struct ToolRun {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

fn run_tool(tool: &Path, script: &Path, timeout: Option<Duration>) -> TelopResult<ToolRun> {
    let mut child = Command::new(tool)
        .arg("-r")
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            TelopError::export_failed(format!("failed to spawn '{}': {e}", tool.display()))
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let waited = match timeout {
        None => child.wait().map(Some).map_err(|e| {
            TelopError::export_failed(format!("failed to wait for '{}': {e}", tool.display()))
        }),
        Some(limit) => wait_with_timeout(&mut child, limit, tool),
    };

    match waited {
        Ok(Some(status)) => Ok(ToolRun {
            status,
            stdout: join_drain(stdout, "stdout")?,
            stderr: join_drain(stderr, "stderr")?,
        }),
        Ok(None) => {
            settle_drain(stdout, "stdout");
            let stderr = settle_drain(stderr, "stderr");
            let stderr = stderr.trim();
            let mut msg = format!(
                "'{}' timed out after {}s",
                tool.display(),
                timeout.map_or(0.0, |t| t.as_secs_f64())
            );
            if !stderr.is_empty() {
                msg.push_str(": ");
                msg.push_str(stderr);
            }
            Err(TelopError::export_failed(msg))
        }
        Err(e) => {
            settle_drain(stdout, "stdout");
            settle_drain(stderr, "stderr");
            Err(e)
        }
    }
}

/// Wait up to `limit` for the tool. On expiry the tool is killed and reaped and `None` is
/// returned.
fn wait_with_timeout(
    child: &mut Child,
    limit: Duration,
    tool: &Path,
) -> TelopResult<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        let polled = match child.try_wait() {
            Ok(polled) => polled,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(TelopError::export_failed(format!(
                    "failed to poll '{}': {e}",
                    tool.display()
                )));
            }
        };
        if let Some(status) = polled {
            return Ok(Some(status));
        }
        if started.elapsed() >= limit {
            // Kill can race a natural exit; the wait below reaps either way.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> Option<Drain> {
    stream.map(|mut s| {
        std::thread::spawn(move || {
            let mut bytes = Vec::new();
            s.read_to_end(&mut bytes)?;
            Ok(bytes)
        })
    })
}

/// Collect a reader after the tool was killed. Descendants of the tool may still hold the
/// pipe open; a reader that has not finished within `DRAIN_GRACE` is left behind.
fn settle_drain(handle: Option<Drain>, name: &str) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    let deadline = Instant::now() + DRAIN_GRACE;
    while !handle.is_finished() && Instant::now() < deadline {
        std::thread::sleep(POLL_INTERVAL);
    }
    if !handle.is_finished() {
        tracing::warn!(stream = name, "tool output still open after kill; abandoning reader");
        return String::new();
    }
    join_drain(Some(handle), name).unwrap_or_default()
}

fn join_drain(handle: Option<Drain>, name: &str) -> TelopResult<String> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    let bytes = handle
        .join()
        .map_err(|_| TelopError::export_failed(format!("{name} drain thread panicked")))?
        .map_err(|e| TelopError::export_failed(format!("failed to read tool {name}: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/export/runner.rs"]
mod tests;
