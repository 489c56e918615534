//! Turns parsed flags plus the host snapshot into absolute, existing paths.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{Cli, HostEnv, LaunchError, DEFAULT_CONFIG_SUBDIR, DEFAULT_DATA_SUBDIR, IMAGE_NAME};

/// Everything a single run needs, resolved once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub work_dir: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub force_build: bool,
    pub shell_mode: bool,
    pub tool_args: Vec<OsString>,
    pub image_name: &'static str,
}

impl ResolvedConfig {
    /// The work dir is checked first and never created, so a missing one
    /// leaves the filesystem untouched. Config and data dirs are created
    /// with all parents when absent.
    pub fn resolve(cli: &Cli, host: &HostEnv) -> Result<Self, LaunchError> {
        let work_dir = resolve_existing_dir(cli.work_dir.as_deref(), host)?;
        let config_dir = ensure_dir("config", cli.config_dir.as_deref(), DEFAULT_CONFIG_SUBDIR, host)?;
        let data_dir = ensure_dir("data", cli.data_dir.as_deref(), DEFAULT_DATA_SUBDIR, host)?;

        Ok(ResolvedConfig {
            work_dir,
            config_dir,
            data_dir,
            force_build: cli.force_build,
            shell_mode: cli.shell,
            tool_args: cli.tool_args.clone(),
            image_name: IMAGE_NAME,
        })
    }
}

/// Relative inputs are taken relative to the launcher's cwd.
fn absolutize(p: &Path, host: &HostEnv) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        host.cwd.join(p)
    }
}

fn resolve_existing_dir(flag: Option<&Path>, host: &HostEnv) -> Result<PathBuf, LaunchError> {
    let requested = absolutize(flag.unwrap_or(host.cwd.as_path()), host);
    match fs::canonicalize(&requested) {
        Ok(p) if p.is_dir() => Ok(p),
        _ => Err(LaunchError::PathNotFound { path: requested }),
    }
}

fn ensure_dir(
    what: &'static str,
    flag: Option<&Path>,
    default_subdir: &str,
    host: &HostEnv,
) -> Result<PathBuf, LaunchError> {
    let requested = match flag {
        Some(p) => absolutize(p, host),
        None => host
            .home
            .as_deref()
            .ok_or(LaunchError::HomeUnknown)?
            .join(default_subdir),
    };

    let creation_err = |source: io::Error| LaunchError::PathCreation {
        what,
        path: requested.clone(),
        source,
    };
    if !requested.is_dir() {
        tracing::debug!(dir = %requested.display(), what, "creating directory");
        fs::create_dir_all(&requested).map_err(creation_err)?;
    }
    fs::canonicalize(&requested).map_err(creation_err)
}
