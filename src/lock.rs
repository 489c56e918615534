use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

pub const BUILD_LOCK_FILE: &str = "codex-box.build.lock";

/// Exclusive advisory lock held while the image gate checks and builds.
/// Released on drop; the lock file itself is left in place so a waiting
/// launcher never ends up locking an unlinked inode.
#[derive(Debug)]
pub struct BuildLock {
    file: File,
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        // Best-effort unlock; ignore errors
        let _ = self.file.unlock();
    }
}

fn open_lock_file(p: &Path) -> io::Result<File> {
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(p)
}

/// Take the lock, calling `on_wait` once if another launcher already holds it.
pub fn acquire_build_lock_at(p: &Path, on_wait: impl FnOnce()) -> io::Result<BuildLock> {
    let file = open_lock_file(p)?;
    match file.try_lock_exclusive() {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::WouldBlock || is_contended(&e) => {
            on_wait();
            file.lock_exclusive()?;
        }
        Err(e) => return Err(e),
    }
    Ok(BuildLock { file })
}

fn is_contended(e: &io::Error) -> bool {
    e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

pub fn build_lock_path(lock_dir: &Path) -> PathBuf {
    lock_dir.join(BUILD_LOCK_FILE)
}
