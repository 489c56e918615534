#![allow(clippy::module_name_repetitions)]
//! Image availability gate: decide whether to build, then build.

use std::path::PathBuf;

use tracing::instrument;

use crate::docker::runtime::ContainerRuntime;
use crate::lock::{acquire_build_lock_at, build_lock_path};
use crate::{color_enabled_stderr, log_info_stderr, log_warn_stderr, HostEnv, LaunchError, BUILD_DESCRIPTOR};

pub fn must_build(force: bool, image_present: bool) -> bool {
    force || !image_present
}

/// Ensure `image` exists locally, building it from the descriptor next to the
/// launcher when it is absent or `force` is set. Returns true if a build ran.
///
/// The presence query and the build happen under the build lock, so a
/// concurrent launcher waits and then finds the image instead of rebuilding it.
#[instrument(level = "debug", skip(runtime, host), err)]
pub fn ensure_image<R>(
    runtime: &R,
    image: &str,
    force: bool,
    host: &HostEnv,
) -> Result<bool, LaunchError>
where
    R: ContainerRuntime + ?Sized,
{
    let use_err = color_enabled_stderr();
    let lock_path = build_lock_path(&host.lock_dir);
    let _lock = match acquire_build_lock_at(&lock_path, || {
        log_info_stderr(use_err, "codex-box: waiting for another image build to finish...")
    }) {
        Ok(l) => Some(l),
        Err(e) => {
            log_warn_stderr(
                use_err,
                &format!(
                    "cannot lock {}: {e}; concurrent builds are not serialized",
                    lock_path.display()
                ),
            );
            None
        }
    };

    let present = runtime.image_exists(image);
    if !must_build(force, present) {
        return Ok(false);
    }

    let Some(context) = host.launcher_dir.as_deref() else {
        return Err(LaunchError::BuildDescriptorMissing {
            path: PathBuf::from(BUILD_DESCRIPTOR),
        });
    };
    let descriptor = context.join(BUILD_DESCRIPTOR);
    if !descriptor.is_file() {
        return Err(LaunchError::BuildDescriptorMissing { path: descriptor });
    }

    let why = if present { "rebuild requested" } else { "image not found" };
    log_info_stderr(
        use_err,
        &format!("codex-box: building {image} ({why}) from {}", descriptor.display()),
    );
    runtime.build(image, &descriptor, context)?;
    Ok(true)
}
