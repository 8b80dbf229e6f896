use crate::{
    lambda::{lambda_deploy, LambdaDeploy},
    settings::Settings,
    shell::CommandRunner,
    store::ObjectStore,
    terraform::terra_apply,
    viber::ViberClient,
};
use anyhow::{anyhow, Result};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct WebhookDeploy {
    pub lambda: LambdaDeploy,
    /// Terraform dir that wires the uploaded archive into the lambda.
    pub infra_path: PathBuf,
    pub webhook_url: String,
    /// Viber api base, `viber::VIBER_API` outside of tests.
    pub viber_api: String,
    pub secret: Option<String>,
}

/// Build and upload the webhook lambda, apply terraform with the new version,
/// then point the viber bot at `webhook_url`.
pub async fn deploy_viber_webhook(
    store: &dyn ObjectStore,
    runner: &dyn CommandRunner,
    settings: &Settings,
    request: &WebhookDeploy,
) -> Result<()> {
    let version = request
        .lambda
        .version
        .as_deref()
        .ok_or_else(|| anyhow!("a lambda version is required to deploy the webhook"))?;

    // a missing secret fails before anything is uploaded
    let viber =
        ViberClient::from_settings(&request.viber_api, request.secret.as_deref(), settings)?;

    let key = lambda_deploy(store, runner, &request.lambda).await?;
    info!("uploaded {key}, applying {}", request.infra_path.display());

    terra_apply(runner, &request.infra_path, &[("lambda_version", version)])?;
    viber.set_webhook(&request.webhook_url).await?;

    Ok(())
}
