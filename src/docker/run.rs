#![allow(clippy::module_name_repetitions)]
//! Docker `run` argument assembly and preview rendering.

use std::ffi::OsString;

use crate::docker::env::collect_env_flags;
use crate::docker::mounts::{collect_mounts, volume_flags};
use crate::util::shell_join;
use crate::{HostEnv, ResolvedConfig, CONTAINER_SHELL, CONTAINER_WORK_DIR, TOOL_NAME};

/// A fully assembled `run` invocation: the argument vector after the runtime
/// program name, plus credential values to place in the runtime's environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<OsString>,
    pub env: Vec<(String, String)>,
}

fn tty_flags(host: &HostEnv) -> &'static str {
    // Without a terminal on both ends docker refuses -t; stay attached with -i only.
    if host.interactive() {
        "-it"
    } else {
        "-i"
    }
}

/// The in-container command: a shell, or the tool followed by pass-through args.
pub fn container_command(cfg: &ResolvedConfig) -> Vec<OsString> {
    if cfg.shell_mode {
        vec![CONTAINER_SHELL.into()]
    } else {
        let mut cmd = Vec::with_capacity(cfg.tool_args.len() + 1);
        cmd.push(TOOL_NAME.into());
        cmd.extend(cfg.tool_args.iter().cloned());
        cmd
    }
}

impl Invocation {
    pub fn build(cfg: &ResolvedConfig, host: &HostEnv) -> Self {
        let mut args: Vec<OsString> = vec!["run".into(), "--rm".into(), tty_flags(host).into()];

        args.extend(volume_flags(&collect_mounts(cfg, host.launcher_dir.as_deref())));

        args.push("-w".into());
        args.push(CONTAINER_WORK_DIR.into());

        let env = collect_env_flags(host);
        args.extend(env.args);

        args.push(cfg.image_name.into());
        args.extend(container_command(cfg));

        Invocation {
            args,
            env: env.forwarded,
        }
    }

    /// Shell-escaped rendering, e.g. for --verbose and --dry-run.
    pub fn preview(&self, program: &str) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(program.to_string());
        words.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        shell_join(&words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IMAGE_NAME;
    use std::path::PathBuf;

    fn cfg(shell: bool, tool_args: &[&str]) -> ResolvedConfig {
        ResolvedConfig {
            work_dir: PathBuf::from("/tmp/proj"),
            config_dir: PathBuf::from("/h/.config/codex"),
            data_dir: PathBuf::from("/h/.local/share/codex"),
            force_build: false,
            shell_mode: shell,
            tool_args: tool_args.iter().map(OsString::from).collect(),
            image_name: IMAGE_NAME,
        }
    }

    fn strings(inv: &Invocation) -> Vec<String> {
        inv.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn full_vector_for_tool_run() {
        let host = HostEnv {
            term: Some("xterm".into()),
            ..Default::default()
        };
        let inv = Invocation::build(&cfg(false, &["--version"]), &host);
        assert_eq!(
            strings(&inv),
            vec![
                "run",
                "--rm",
                "-i",
                "-v",
                "/tmp/proj:/workspace",
                "-v",
                "/h/.config/codex:/home/coder/.codex",
                "-v",
                "/h/.local/share/codex:/home/coder/.local/share/codex",
                "-w",
                "/workspace",
                "-e",
                "TERM=xterm",
                "codex-box:latest",
                "codex",
                "--version",
            ]
        );
        assert!(inv.env.is_empty());
    }

    #[test]
    fn shell_mode_ignores_tool_args() {
        let inv = Invocation::build(&cfg(true, &["--model", "o3"]), &HostEnv::default());
        let args = strings(&inv);
        let image_at = args.iter().position(|a| a == IMAGE_NAME).unwrap();
        assert_eq!(&args[image_at + 1..], &[CONTAINER_SHELL.to_string()]);
    }

    #[test]
    fn tool_args_keep_their_order() {
        let inv = Invocation::build(&cfg(false, &["-s", "b", "a"]), &HostEnv::default());
        let args = strings(&inv);
        assert_eq!(&args[args.len() - 4..], &["codex", "-s", "b", "a"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_tool_args_reach_the_vector_verbatim() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![0x66, 0xff]);
        let mut c = cfg(false, &[]);
        c.tool_args.push(raw.clone());
        let inv = Invocation::build(&c, &HostEnv::default());
        assert_eq!(inv.args.last(), Some(&raw));
    }

    #[test]
    fn terminal_on_both_ends_gets_a_tty() {
        let host = HostEnv {
            stdin_tty: true,
            stdout_tty: true,
            ..Default::default()
        };
        let inv = Invocation::build(&cfg(false, &[]), &host);
        assert_eq!(inv.args[2], "-it");
    }

    #[test]
    fn credentials_ride_in_env_not_args() {
        let mut host = HostEnv::default();
        host.credentials.insert("OPENAI_ORG_ID".into(), "org-1".into());
        let inv = Invocation::build(&cfg(false, &[]), &host);
        let args = strings(&inv);
        assert!(args.windows(2).any(|w| w[0] == "-e" && w[1] == "OPENAI_ORG_ID"));
        assert!(!args.iter().any(|a| a == "OPENAI_API_KEY"));
        assert_eq!(
            inv.env,
            vec![("OPENAI_ORG_ID".to_string(), "org-1".to_string())]
        );
    }

    #[test]
    fn preview_quotes_arguments() {
        let inv = Invocation::build(&cfg(false, &["fix the bug"]), &HostEnv::default());
        let p = inv.preview("docker");
        assert!(p.starts_with("docker run --rm -i "), "{p}");
        assert!(p.ends_with("codex-box:latest codex 'fix the bug'"), "{p}");
    }
}
