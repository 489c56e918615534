//! One launcher run: resolve, check the runtime, gate the image, run.

use crate::docker::{ensure_image, ContainerRuntime, Invocation};
use crate::{color_enabled_stderr, log_info_stderr, Cli, HostEnv, LaunchError, ResolvedConfig};

/// Run the launcher against an already parsed command line.
///
/// Returns the container's exit code (always 0 here; a non-zero container
/// status comes back as `LaunchError::RunFailed`). With `--dry-run` the
/// runtime is never contacted.
pub fn launch<R>(cli: &Cli, host: &HostEnv, runtime: &R) -> Result<i32, LaunchError>
where
    R: ContainerRuntime + ?Sized,
{
    let cfg = ResolvedConfig::resolve(cli, host)?;
    let invocation = Invocation::build(&cfg, host);
    let use_err = color_enabled_stderr();

    if cli.dry_run {
        report_dirs(use_err, &cfg);
        log_info_stderr(
            use_err,
            &format!("codex-box: docker: {}", invocation.preview(runtime.program())),
        );
        log_info_stderr(use_err, "codex-box: dry-run requested; not executing Docker.");
        return Ok(0);
    }

    runtime.ping()?;
    let built = ensure_image(runtime, cfg.image_name, cfg.force_build, host)?;

    if cli.verbose {
        log_info_stderr(
            use_err,
            &format!(
                "codex-box: v{} ({}, {})",
                env!("CARGO_PKG_VERSION"),
                env!("CODEX_BOX_BUILD_TARGET"),
                env!("CODEX_BOX_BUILD_PROFILE")
            ),
        );
        log_info_stderr(
            use_err,
            &format!(
                "codex-box: image: {} ({})",
                cfg.image_name,
                if built { "built" } else { "cached" }
            ),
        );
        log_info_stderr(
            use_err,
            &format!("codex-box: docker: {}", invocation.preview(runtime.program())),
        );
    }
    report_dirs(use_err, &cfg);

    match runtime.run(&invocation)? {
        0 => Ok(0),
        code => Err(LaunchError::RunFailed { code }),
    }
}

fn report_dirs(use_err: bool, cfg: &ResolvedConfig) {
    log_info_stderr(
        use_err,
        &format!("codex-box: workdir: {}", cfg.work_dir.display()),
    );
    log_info_stderr(
        use_err,
        &format!("codex-box: config:  {}", cfg.config_dir.display()),
    );
    log_info_stderr(
        use_err,
        &format!("codex-box: data:    {}", cfg.data_dir.display()),
    );
}
