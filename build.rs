fn main() {
    // Re-run build script when this file changes
    println!("cargo:rerun-if-changed=build.rs");

    // Target triple and profile, shown by `--verbose`
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=CODEX_BOX_BUILD_TARGET={target}");

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=CODEX_BOX_BUILD_PROFILE={profile}");
}
