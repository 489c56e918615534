#![allow(clippy::module_name_repetitions)]
//! Container runtime seam and its docker CLI implementation.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use which::which;

use crate::docker::run::Invocation;
use crate::LaunchError;

/// The three runtime operations the launcher needs, plus a reachability probe.
pub trait ContainerRuntime {
    /// Program name used when rendering previews.
    fn program(&self) -> &str {
        "docker"
    }

    /// Fail with `RuntimeUnavailable` when the daemon cannot be reached.
    fn ping(&self) -> Result<(), LaunchError>;

    /// True if the image exists locally (never pulls).
    fn image_exists(&self, image: &str) -> bool;

    /// Build `image` from `descriptor` with `context` as build context.
    fn build(&self, image: &str, descriptor: &Path, context: &Path) -> Result<(), LaunchError>;

    /// Run the container attached to the caller's stdio; block until it exits
    /// and return its exit code.
    fn run(&self, invocation: &Invocation) -> Result<i32, LaunchError>;
}

/// Runtime backed by the `docker` CLI (or a compatible program named by CODEX_BOX_RUNTIME).
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
    path: Option<PathBuf>,
}

impl DockerCli {
    pub fn from_env() -> Self {
        let program = env::var("CODEX_BOX_RUNTIME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "docker".to_string());
        Self::new(program)
    }

    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        let path = which(&program).ok();
        DockerCli { program, path }
    }

    fn path(&self) -> Result<&Path, LaunchError> {
        self.path
            .as_deref()
            .ok_or_else(|| LaunchError::RuntimeUnavailable {
                reason: format!("{} was not found in PATH", self.program),
            })
    }
}

impl ContainerRuntime for DockerCli {
    fn program(&self) -> &str {
        &self.program
    }

    fn ping(&self) -> Result<(), LaunchError> {
        let runtime = self.path()?;
        tracing::debug!(runtime = %runtime.display(), "probing container daemon");
        let out = Command::new(runtime)
            .args(["info", "--format", "{{.ServerVersion}}"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| LaunchError::RuntimeUnavailable {
                reason: format!("failed to execute {}: {e}", runtime.display()),
            })?;
        if out.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&out.stderr);
        let reason = stderr
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} daemon is not running", self.program));
        Err(LaunchError::RuntimeUnavailable { reason })
    }

    fn image_exists(&self, image: &str) -> bool {
        let Ok(runtime) = self.path() else {
            return false;
        };
        let out = match Command::new(runtime)
            .arg("image")
            .arg("inspect")
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
        {
            Ok(out) => out,
            Err(e) => {
                tracing::warn!(image, error = %e, "image query could not be started");
                return false;
            }
        };
        if out.status.success() {
            tracing::debug!(image, "image present locally");
            return true;
        }
        let stderr = String::from_utf8_lossy(&out.stderr);
        if reports_missing_image(&stderr) {
            tracing::debug!(image, status = %out.status, "image not present locally");
        } else {
            tracing::warn!(
                image,
                status = %out.status,
                stderr = stderr.trim(),
                "image query failed; treating image as absent"
            );
        }
        false
    }

    fn build(&self, image: &str, descriptor: &Path, context: &Path) -> Result<(), LaunchError> {
        let runtime = self.path()?;
        tracing::debug!(image, descriptor = %descriptor.display(), context = %context.display(), "building image");
        let status = Command::new(runtime)
            .arg("build")
            .arg("-t")
            .arg(image)
            .arg("-f")
            .arg(descriptor)
            .arg(context)
            .status()
            .map_err(|e| LaunchError::BuildFailed {
                image: image.to_string(),
                reason: format!("failed to execute {}: {e}", runtime.display()),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::BuildFailed {
                image: image.to_string(),
                reason: status.to_string(),
            })
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<i32, LaunchError> {
        let runtime = self.path()?;
        tracing::debug!(args = invocation.args.len(), "starting container");
        let mut cmd = Command::new(runtime);
        cmd.args(&invocation.args);
        for (k, v) in &invocation.env {
            cmd.env(k, v);
        }

        let _interrupts = interrupts::Deferred::install();
        let status = cmd.status().map_err(|e| LaunchError::RuntimeUnavailable {
            reason: format!("failed to execute {}: {e}", runtime.display()),
        })?;
        let code = exit_code_of(status);
        tracing::debug!(code, "container exited");
        Ok(code)
    }
}

/// `image inspect` output that means the image is simply not there.
fn reports_missing_image(stderr: &str) -> bool {
    let s = stderr.to_ascii_lowercase();
    s.contains("no such image") || s.contains("no such object") || s.contains("not found")
}

/// Exit code of a finished child; a signal death is reported as 128 + signal.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}

#[cfg(unix)]
mod interrupts {
    use nix::libc::c_int;
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

    extern "C" fn swallow(_: c_int) {}

    /// Keeps SIGINT/SIGQUIT from killing the launcher while the child runs,
    /// so the child's own exit status can be relayed. A real handler (not
    /// SIG_IGN) is used because handlers reset on exec while ignores are
    /// inherited by the child.
    pub(super) struct Deferred {
        saved: Vec<(Signal, SigAction)>,
    }

    impl Deferred {
        pub(super) fn install() -> Self {
            let act = SigAction::new(
                SigHandler::Handler(swallow),
                SaFlags::SA_RESTART,
                SigSet::empty(),
            );
            let mut saved = Vec::new();
            for sig in [Signal::SIGINT, Signal::SIGQUIT] {
                // SAFETY: the handler is empty and async-signal-safe.
                if let Ok(prev) = unsafe { signal::sigaction(sig, &act) } {
                    saved.push((sig, prev));
                }
            }
            Deferred { saved }
        }
    }

    impl Drop for Deferred {
        fn drop(&mut self) {
            for (sig, prev) in &self.saved {
                // SAFETY: restores the disposition that was in place before install().
                let _ = unsafe { signal::sigaction(*sig, prev) };
            }
        }
    }
}

#[cfg(not(unix))]
mod interrupts {
    pub(super) struct Deferred;

    impl Deferred {
        pub(super) fn install() -> Self {
            Deferred
        }
    }
}
