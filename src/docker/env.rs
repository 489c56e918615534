#![allow(clippy::module_name_repetitions)]
//! Docker `-e` arguments and credential forwarding policy.

use std::ffi::OsString;

use crate::{HostEnv, CREDENTIAL_ENV_VARS, TERM_FALLBACK};

/// Environment flags plus the values the runtime process must carry so that
/// name-only `-e KEY` entries resolve. Values never appear in the argument vector.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvFlags {
    pub args: Vec<OsString>,
    pub forwarded: Vec<(String, String)>,
}

pub(crate) fn push_env_kv(args: &mut Vec<OsString>, key: &str, val: &str) {
    args.push(OsString::from("-e"));
    args.push(OsString::from(format!("{key}={val}")));
}

pub(crate) fn push_env_name(args: &mut Vec<OsString>, key: &str) {
    args.push(OsString::from("-e"));
    args.push(OsString::from(key));
}

pub fn term_value(host: &HostEnv) -> &str {
    host.term
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(TERM_FALLBACK)
}

/// TERM always; each credential only when set and non-empty on the host.
pub fn collect_env_flags(host: &HostEnv) -> EnvFlags {
    let mut flags = EnvFlags::default();
    push_env_kv(&mut flags.args, "TERM", term_value(host));
    for key in CREDENTIAL_ENV_VARS {
        if let Some(val) = host.credential(key) {
            push_env_name(&mut flags.args, key);
            flags.forwarded.push((key.to_string(), val.to_string()));
        }
    }
    flags
}
