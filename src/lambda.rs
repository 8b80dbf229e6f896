use crate::{
    artifacts::Artifacts,
    backup::backup_object,
    go_build::go_build,
    package::{package, PackageMode},
    shell::CommandRunner,
    storage_key::ArtifactKey,
    store::ObjectStore,
};
use anyhow::Result;
use log::info;
use std::path::PathBuf;

pub const BIN_NAME: &str = "main";
pub const ZIP_NAME: &str = "main.zip";

#[derive(Debug, Clone)]
pub struct LambdaDeploy {
    /// Go package dir, e.g. `lambda/tg-webhook`
    pub path: PathBuf,
    pub version: Option<String>,
    pub bucket: String,
    pub package_mode: PackageMode,
}

/// Build golang lambda, zip it and upload to deploy bucket. The previous
/// archive at the same key is kept under the `.prev` key.
///
/// Returns the key the archive was uploaded to.
pub async fn lambda_deploy(
    store: &dyn ObjectStore,
    runner: &dyn CommandRunner,
    request: &LambdaDeploy,
) -> Result<String> {
    let artifact = ArtifactKey::from_path(&request.path)?;
    let key = artifact.key(request.version.as_deref());
    let bucket = request.bucket.as_str();

    backup_object(store, bucket, &key, &artifact.backup_key()).await?;

    let mut artifacts = Artifacts::new();
    artifacts.track(request.path.join(BIN_NAME));
    artifacts.track(request.path.join(ZIP_NAME));

    go_build(runner, &request.path, BIN_NAME)?;
    let archive = package(
        request.package_mode,
        runner,
        &request.path,
        BIN_NAME,
        ZIP_NAME,
    )?;

    info!("uploading {} bytes to s3://{bucket}/{key}", archive.len());
    store.put(bucket, &key, archive).await?;

    Ok(key)
}
