use crate::shell::{Command, CommandRunner};
use anyhow::{anyhow, Context, Result};
use log::info;
use std::io::{Cursor, Write};
use std::path::Path;
use std::str::FromStr;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

/// How the lambda binary gets wrapped into its zip archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageMode {
    /// Built in memory with the `zip` crate.
    #[default]
    InProcess,
    /// `zip -j`, needs the zip utility on PATH.
    Shell,
}

impl FromStr for PackageMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "in-process" => Ok(PackageMode::InProcess),
            "shell" => Ok(PackageMode::Shell),
            other => Err(anyhow!(
                "unknown package mode {other}, expected in-process or shell"
            )),
        }
    }
}

/// A deflate zip archive holding exactly one entry, `entry_name`.
pub fn zip_single_entry(entry_name: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    writer
        .start_file(entry_name, options)
        .context("Error starting zip entry")?;
    writer.write_all(payload).context("Error writing zip entry")?;
    let cursor = writer.finish().context("Error finishing zip archive")?;

    Ok(cursor.into_inner())
}

pub fn zip_with_cli(
    runner: &dyn CommandRunner,
    dir: &Path,
    zip_name: &str,
    bin_name: &str,
) -> Result<()> {
    runner.run(&Command::new("zip").args(["-j", zip_name, bin_name]).in_dir(dir))
}

/// Packages `dir/bin_name` into `dir/zip_name` and returns the archive bytes.
pub fn package(
    mode: PackageMode,
    runner: &dyn CommandRunner,
    dir: &Path,
    bin_name: &str,
    zip_name: &str,
) -> Result<Vec<u8>> {
    let zip_path = dir.join(zip_name);
    info!("packaging {bin_name} into {} ({mode:?})", zip_path.display());

    match mode {
        PackageMode::InProcess => {
            let payload = std::fs::read(dir.join(bin_name))
                .with_context(|| format!("Error reading {bin_name}"))?;
            let archive = zip_single_entry(bin_name, &payload)?;
            std::fs::write(&zip_path, &archive)
                .with_context(|| format!("Error writing {}", zip_path.display()))?;
            Ok(archive)
        }
        PackageMode::Shell => {
            zip_with_cli(runner, dir, zip_name, bin_name)?;
            std::fs::read(&zip_path).with_context(|| format!("Error reading {}", zip_path.display()))
        }
    }
}
