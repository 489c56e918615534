#![allow(clippy::module_name_repetitions)]
//! Mount list for the run invocation: three directories plus an optional read-only file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::util::fs::{path_pair, path_pair_ro};
use crate::{
    ResolvedConfig, CONTAINER_CONFIG_DIR, CONTAINER_CONTEXT_FILE, CONTAINER_DATA_DIR,
    CONTAINER_WORK_DIR, CONTEXT_FILE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: &'static str,
    pub read_only: bool,
}

impl Mount {
    fn rw(host: &Path, container: &'static str) -> Self {
        Mount {
            host: host.to_path_buf(),
            container,
            read_only: false,
        }
    }

    pub fn volume_arg(&self) -> OsString {
        if self.read_only {
            path_pair_ro(&self.host, self.container)
        } else {
            path_pair(&self.host, self.container)
        }
    }
}

/// The context file next to the launcher, if there is one.
pub fn context_file(launcher_dir: Option<&Path>) -> Option<PathBuf> {
    let p = launcher_dir?.join(CONTEXT_FILE);
    p.is_file().then_some(p)
}

/// Work, config and data in that order, then the context file when present.
pub fn collect_mounts(cfg: &ResolvedConfig, launcher_dir: Option<&Path>) -> Vec<Mount> {
    let mut mounts = vec![
        Mount::rw(&cfg.work_dir, CONTAINER_WORK_DIR),
        Mount::rw(&cfg.config_dir, CONTAINER_CONFIG_DIR),
        Mount::rw(&cfg.data_dir, CONTAINER_DATA_DIR),
    ];
    if let Some(ctx) = context_file(launcher_dir) {
        mounts.push(Mount {
            host: ctx,
            container: CONTAINER_CONTEXT_FILE,
            read_only: true,
        });
    }
    mounts
}

pub(crate) fn volume_flags(mounts: &[Mount]) -> Vec<OsString> {
    let mut flags = Vec::with_capacity(mounts.len() * 2);
    for m in mounts {
        flags.push(OsString::from("-v"));
        flags.push(m.volume_arg());
    }
    flags
}
