use crate::shell::{Command, CommandRunner};
use anyhow::{bail, Result};
use log::info;
use std::path::{Path, PathBuf};

pub const TARGET_OS: &str = "linux";
pub const TARGET_ARCH: &str = "amd64";

/// Fetches dependencies and cross compiles the Go package in `src_dir` into a
/// single stripped binary `src_dir/bin_name`.
pub fn go_build(runner: &dyn CommandRunner, src_dir: &Path, bin_name: &str) -> Result<PathBuf> {
    info!("building {} for {TARGET_OS}/{TARGET_ARCH}", src_dir.display());

    runner.run(&Command::new("go").args(["get", "."]).in_dir(src_dir))?;
    runner.run(
        &Command::new("go")
            .args(["build", "-ldflags=-s -w", "-o", bin_name])
            .env("GOOS", TARGET_OS)
            .env("GOARCH", TARGET_ARCH)
            .in_dir(src_dir),
    )?;

    let bin_path = src_dir.join(bin_name);
    if !bin_path.is_file() {
        bail!("go build did not produce {}", bin_path.display());
    }

    Ok(bin_path)
}
