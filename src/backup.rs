use crate::store::ObjectStore;
use anyhow::Result;
use log::{debug, info};

/// Copy `key` to `backup_key` if it exists. Returns whether a copy was made.
pub async fn backup_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    backup_key: &str,
) -> Result<bool> {
    if !store.exists(bucket, key).await? {
        debug!("nothing to back up at s3://{bucket}/{key}");
        return Ok(false);
    }

    info!("backing up s3://{bucket}/{key} to {backup_key}");
    store.copy(bucket, key, backup_key).await?;

    Ok(true)
}
