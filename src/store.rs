use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    error::HeadObjectError,
    types::{ByteStream, SdkError},
    Client, Region,
};
use log::debug;

/// The handful of bucket operations the deploy tasks need.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(false)` only when the object is missing; any other failure is an error.
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Server side copy of `source_key` to `dest_key` inside the same bucket.
    async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()>;

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        S3Store { client }
    }

    pub async fn connect(region: &str) -> Self {
        let config = aws_config::from_env()
            .region(Region::new(region.to_owned()))
            .load()
            .await;

        S3Store::new(Client::new(&config))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(err) if is_missing(&err) => {
                debug!("s3://{bucket}/{key} not found");
                Ok(false)
            }
            Err(err) => Err(err).with_context(|| format!("Error reading s3://{bucket}/{key}")),
        }
    }

    async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()> {
        self.client
            .copy_object()
            .bucket(bucket)
            .key(dest_key)
            .copy_source(format!("{bucket}/{source_key}"))
            .send()
            .await
            .with_context(|| {
                format!("Error copying s3://{bucket}/{source_key} to s3://{bucket}/{dest_key}")
            })?;

        Ok(())
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| format!("Error uploading s3://{bucket}/{key}"))?;

        Ok(())
    }
}

/// HEAD answers a missing key with a bodyless 404, which is not always parsed
/// into the modeled `NotFound`.
fn is_missing(err: &SdkError<HeadObjectError>) -> bool {
    match err {
        SdkError::ServiceError { err, raw } => {
            err.is_not_found() || raw.http().status() == http::StatusCode::NOT_FOUND
        }
        _ => false,
    }
}


#[cfg(test)]
pub mod memory {
    use super::ObjectStore;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory bucket that counts writes.
    #[derive(Default)]
    pub struct MemoryStore {
        objects: Mutex<HashMap<(String, String), Vec<u8>>>,
        writes: Mutex<usize>,
        fail_puts: bool,
    }

    impl MemoryStore {
        pub fn failing_puts() -> Self {
            MemoryStore {
                fail_puts: true,
                ..Default::default()
            }
        }

        pub fn insert(&self, bucket: &str, key: &str, body: &[u8]) {
            self.objects
                .lock()
                .unwrap()
                .insert((bucket.into(), key.into()), body.to_vec());
        }

        pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
            self.objects
                .lock()
                .unwrap()
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
        }

        pub fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
            Ok(self.get(bucket, key).is_some())
        }

        async fn copy(&self, bucket: &str, source_key: &str, dest_key: &str) -> Result<()> {
            let body = self
                .get(bucket, source_key)
                .ok_or_else(|| anyhow!("NoSuchKey: {source_key}"))?;
            *self.writes.lock().unwrap() += 1;
            self.insert(bucket, dest_key, &body);
            Ok(())
        }

        async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
            if self.fail_puts {
                return Err(anyhow!("connection reset uploading {key}"));
            }
            *self.writes.lock().unwrap() += 1;
            self.insert(bucket, key, &body);
            Ok(())
        }
    }
}
