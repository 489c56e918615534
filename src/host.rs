//! Snapshot of the host process environment.
//!
//! Everything the resolver and the invocation builder would otherwise read
//! from globals (cwd, home, TERM, credentials, TTY state) is captured once
//! here and passed by reference.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::CREDENTIAL_ENV_VARS;

#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    /// Current directory of the launcher process.
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    /// Caller's `TERM`, if set and non-empty.
    pub term: Option<String>,
    /// Recognized credential variables that are set and non-empty.
    pub credentials: BTreeMap<String, String>,
    pub stdin_tty: bool,
    pub stdout_tty: bool,
    /// Directory holding the build descriptor and the optional context file.
    pub launcher_dir: Option<PathBuf>,
    /// Where the build-gate lock file lives.
    pub lock_dir: PathBuf,
}

impl HostEnv {
    pub fn capture() -> Self {
        let credentials = CREDENTIAL_ENV_VARS
            .iter()
            .filter_map(|k| non_empty_var(k).map(|v| (k.to_string(), v)))
            .collect();

        HostEnv {
            cwd: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            home: home::home_dir().filter(|h| !h.as_os_str().is_empty()),
            term: non_empty_var("TERM"),
            credentials,
            stdin_tty: atty::is(atty::Stream::Stdin),
            stdout_tty: atty::is(atty::Stream::Stdout),
            launcher_dir: launcher_dir(),
            lock_dir: lock_dir(non_empty_var("XDG_RUNTIME_DIR")),
        }
    }

    /// True when both stdin and stdout are attached to a terminal.
    pub fn interactive(&self) -> bool {
        self.stdin_tty && self.stdout_tty
    }

    pub fn credential(&self, name: &str) -> Option<&str> {
        self.credentials
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// The per-user runtime dir, else a per-user directory under the temp dir.
fn lock_dir(xdg_runtime_dir: Option<String>) -> PathBuf {
    match xdg_runtime_dir {
        Some(dir) => PathBuf::from(dir),
        None => env::temp_dir().join(user_scoped_name("codex-box")),
    }
}

#[cfg(unix)]
fn user_scoped_name(prefix: &str) -> String {
    format!("{prefix}-{}", nix::unistd::getuid())
}

#[cfg(not(unix))]
fn user_scoped_name(prefix: &str) -> String {
    prefix.to_string()
}

/// CODEX_BOX_HOME wins; otherwise the canonical directory of the running executable.
fn launcher_dir() -> Option<PathBuf> {
    if let Some(dir) = non_empty_var("CODEX_BOX_HOME") {
        let p = PathBuf::from(dir);
        return Some(fs::canonicalize(&p).unwrap_or(p));
    }
    let exe = env::current_exe().ok()?;
    let exe = fs::canonicalize(&exe).unwrap_or(exe);
    exe.parent().map(|p| p.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_ignores_empty_values() {
        let mut host = HostEnv::default();
        host.credentials.insert("OPENAI_API_KEY".into(), String::new());
        host.credentials.insert("OPENAI_ORG_ID".into(), "org-1".into());
        assert_eq!(host.credential("OPENAI_API_KEY"), None);
        assert_eq!(host.credential("OPENAI_ORG_ID"), Some("org-1"));
        assert_eq!(host.credential("UNRELATED"), None);
    }

    #[test]
    fn interactive_requires_both_streams() {
        let mut host = HostEnv {
            stdin_tty: true,
            ..Default::default()
        };
        assert!(!host.interactive());
        host.stdout_tty = true;
        assert!(host.interactive());
    }

    #[test]
    fn lock_dir_prefers_runtime_dir() {
        assert_eq!(
            lock_dir(Some("/run/user/1000".into())),
            PathBuf::from("/run/user/1000")
        );
    }

    #[cfg(unix)]
    #[test]
    fn temp_lock_dir_is_scoped_to_the_user() {
        let dir = lock_dir(None);
        assert!(dir.starts_with(env::temp_dir()));
        assert_eq!(
            dir.file_name().and_then(|n| n.to_str()),
            Some(format!("codex-box-{}", nix::unistd::getuid()).as_str())
        );
    }

    #[test]
    fn capture_records_only_recognized_credentials() {
        let host = HostEnv::capture();
        assert!(host
            .credentials
            .keys()
            .all(|k| CREDENTIAL_ENV_VARS.contains(&k.as_str())));
        assert!(!host.lock_dir.as_os_str().is_empty());
    }
}
