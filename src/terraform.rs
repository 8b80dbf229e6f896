use crate::settings::{Settings, TERRAFORM_BUCKET_VAR};
use crate::shell::{Command, CommandRunner};
use anyhow::{anyhow, Result};
use std::path::Path;

/// Explicit bucket wins, then `TF_VAR_terrabucket`.
pub fn resolve_state_bucket(explicit: Option<&str>, settings: &Settings) -> Result<String> {
    explicit
        .filter(|bucket| !bucket.is_empty())
        .map(str::to_owned)
        .or_else(|| settings.terraform_bucket.clone())
        .ok_or_else(|| anyhow!("Bucket should be provided via {TERRAFORM_BUCKET_VAR} env var"))
}

/// Init terraform in dir with state bucket and region
pub fn terra_init(
    runner: &dyn CommandRunner,
    settings: &Settings,
    path: &Path,
    bucket: Option<&str>,
) -> Result<()> {
    let bucket = resolve_state_bucket(bucket, settings)?;

    runner.run(
        &Command::new("terraform")
            .arg("init")
            .args(["-backend-config".to_string(), format!("bucket={bucket}")])
            .args([
                "-backend-config".to_string(),
                format!("region={}", settings.region),
            ])
            .arg("-reconfigure")
            .in_dir(path),
    )
}

pub fn terra_apply(runner: &dyn CommandRunner, path: &Path, vars: &[(&str, &str)]) -> Result<()> {
    let mut command = Command::new("terraform").args(["apply", "-auto-approve"]);
    for (name, value) in vars {
        command = command.arg("-var").arg(format!("{name}={value}"));
    }

    runner.run(&command.in_dir(path))
}
