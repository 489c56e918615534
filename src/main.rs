use std::env;
use std::process::ExitCode;

use codex_box::{
    color_enabled_stderr, launch, log_error_stderr, parse_args, set_color_mode, telemetry_init,
    usage_text, DockerCli, HostEnv, LaunchError, Parsed,
};

fn report(e: &LaunchError) -> ExitCode {
    let use_err = color_enabled_stderr();
    log_error_stderr(use_err, &e.to_string());
    if e.shows_usage() {
        eprintln!();
        eprint!("{}", usage_text());
    }
    ExitCode::from(e.exit_code())
}

fn main() -> ExitCode {
    let cli = match parse_args(env::args_os()) {
        Ok(Parsed::Launch(cli)) => cli,
        Ok(Parsed::Help(text)) | Ok(Parsed::Version(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => return report(&e),
    };

    if let Some(mode) = cli.color {
        set_color_mode(mode);
    }
    telemetry_init();

    let host = HostEnv::capture();
    let runtime = DockerCli::from_env();
    match launch(&cli, &host, &runtime) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}
