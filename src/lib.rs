#![allow(clippy::module_name_repetitions)]
//! codex-box: run the Codex CLI inside a Docker container with a controlled
//! set of host paths and credentials.
//!
//! A run is three steps in fixed order:
//! - resolve flags and defaults into a [`ResolvedConfig`] ([`cli`], [`config`]),
//! - make sure the image exists, building it when needed ([`docker::images`]),
//! - assemble and execute the `docker run` invocation ([`docker::run`]).
//!
//! Host state (cwd, home, TERM, credentials, TTYs) is read once into a
//! [`HostEnv`] so the resolver and builder can be driven by tests.

pub mod cli;
mod color;
pub mod config;
pub mod docker;
mod errors;
pub mod host;
pub mod launch;
pub mod lock;
pub mod telemetry;
pub mod util;

pub use cli::{parse_args, usage_text, Cli, Parsed};
pub use color::{
    color_enabled_stderr, log_error_stderr, log_info_stderr, log_warn_stderr, paint,
    set_color_mode, ColorMode,
};
pub use config::ResolvedConfig;
pub use docker::{ContainerRuntime, DockerCli, Invocation};
pub use errors::{exit_code_for_status, LaunchError};
pub use host::HostEnv;
pub use launch::launch;
pub use telemetry::telemetry_init;

/// In-container invocation name of the tool.
pub const TOOL_NAME: &str = "codex";
pub const IMAGE_NAME: &str = "codex-box:latest";

/// Defaults, relative to the user's home directory.
pub const DEFAULT_CONFIG_SUBDIR: &str = ".config/codex";
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/codex";

pub const CONTAINER_WORK_DIR: &str = "/workspace";
pub const CONTAINER_CONFIG_DIR: &str = "/home/coder/.codex";
pub const CONTAINER_DATA_DIR: &str = "/home/coder/.local/share/codex";
pub const CONTAINER_SHELL: &str = "/bin/bash";

/// Files looked up in the launcher directory.
pub const BUILD_DESCRIPTOR: &str = "Dockerfile";
pub const CONTEXT_FILE: &str = "AGENTS.md";
pub const CONTAINER_CONTEXT_FILE: &str = "/home/coder/.codex/AGENTS.md";

/// Forwarded by name when set and non-empty on the host.
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["OPENAI_API_KEY", "OPENAI_ORG_ID"];
pub const TERM_FALLBACK: &str = "xterm-256color";
