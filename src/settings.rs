use anyhow::{anyhow, Result};

pub const DEFAULT_DEPLOY_BUCKET: &str = "webtectrl-deploy";

pub const REGION_VAR: &str = "AWS_DEFAULT_REGION";
pub const DEPLOY_BUCKET_VAR: &str = "DEPLOY_BUCKET";
pub const TERRAFORM_BUCKET_VAR: &str = "TF_VAR_terrabucket";
pub const VIBER_SECRET_VAR: &str = "VIBER_BOT_SECRET";

/// Values every task reads from the environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub region: String,
    pub deploy_bucket: String,
    pub terraform_bucket: Option<String>,
    pub viber_secret: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = non_empty(lookup(REGION_VAR))
            .ok_or_else(|| anyhow!("{REGION_VAR} env var missing, please source environment file"))?;

        let deploy_bucket =
            non_empty(lookup(DEPLOY_BUCKET_VAR)).unwrap_or_else(|| DEFAULT_DEPLOY_BUCKET.into());

        Ok(Settings {
            region,
            deploy_bucket,
            terraform_bucket: non_empty(lookup(TERRAFORM_BUCKET_VAR)),
            viber_secret: non_empty(lookup(VIBER_SECRET_VAR)),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
