use std::ffi::OsString;
use std::path::Path;

/// Render a `-v` value: `<host>:<container>`.
pub fn path_pair(host: &Path, container: &str) -> OsString {
    let mut s = host.as_os_str().to_os_string();
    s.push(":");
    s.push(container);
    s
}

/// Same as [`path_pair`] with the read-only suffix.
pub fn path_pair_ro(host: &Path, container: &str) -> OsString {
    let mut s = path_pair(host, container);
    s.push(":ro");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn pair_joins_with_colon() {
        let host = PathBuf::from("/tmp");
        assert_eq!(path_pair(&host, "/container").to_string_lossy(), "/tmp:/container");
    }

    #[test]
    fn read_only_pair_has_suffix() {
        let host = PathBuf::from("/opt/codex-box/AGENTS.md");
        assert_eq!(
            path_pair_ro(&host, "/home/coder/.codex/AGENTS.md").to_string_lossy(),
            "/opt/codex-box/AGENTS.md:/home/coder/.codex/AGENTS.md:ro"
        );
    }
}
