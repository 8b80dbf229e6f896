use anyhow::{Error, Result};
use deploy_tasks::{
    deploy::{deploy_viber_webhook, WebhookDeploy},
    dynamo_local::start_dynamo_local,
    lambda::{lambda_deploy, LambdaDeploy},
    package::PackageMode,
    settings::Settings,
    shell::XshellRunner,
    store::S3Store,
    terraform::terra_init,
    viber::{ViberClient, VIBER_API},
};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "tasks", about = "Build, package and deploy the project lambdas")]
enum Opt {
    /// Build golang lambda, zip it and upload to deploy bucket
    LambdaDeploy {
        /// Lambda source dir, e.g. lambda/tg-webhook
        #[structopt(parse(from_os_str))]
        path: PathBuf,

        /// Version appended to the s3 key, e.g. 1.0.1
        version: Option<String>,

        /// Deploy bucket, defaults to DEPLOY_BUCKET or webtectrl-deploy
        #[structopt(short, long)]
        bucket: Option<String>,

        /// How to build the zip: in-process or shell
        #[structopt(long, default_value = "in-process")]
        package: PackageMode,
    },

    /// Init terraform in dir with state bucket and region
    TerraInit {
        #[structopt(parse(from_os_str))]
        path: PathBuf,

        /// State bucket, defaults to TF_VAR_terrabucket
        #[structopt(short, long)]
        bucket: Option<String>,
    },

    /// Start DynamoDB in local docker
    StartDynamoLocal,

    /// Register the viber bot webhook url
    ViberSetWebhook {
        url: String,

        /// Bot auth token, defaults to VIBER_BOT_SECRET
        #[structopt(short, long)]
        secret: Option<String>,
    },

    /// Deploy the viber webhook lambda, apply terraform and register the webhook
    DeployViberWebhook {
        #[structopt(parse(from_os_str))]
        path: PathBuf,

        version: String,

        /// Terraform dir
        #[structopt(parse(from_os_str))]
        infra: PathBuf,

        url: String,

        #[structopt(short, long)]
        bucket: Option<String>,

        #[structopt(short, long)]
        secret: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "deploy_tasks=info,tasks=info");
    }
    env_logger::init();

    let options = Opt::from_args();
    let settings = Settings::from_env()?;
    let runner = XshellRunner;

    match options {
        Opt::LambdaDeploy {
            path,
            version,
            bucket,
            package,
        } => {
            let store = S3Store::connect(&settings.region).await;
            let request = LambdaDeploy {
                path,
                version,
                bucket: bucket.unwrap_or_else(|| settings.deploy_bucket.clone()),
                package_mode: package,
            };
            let key = lambda_deploy(&store, &runner, &request).await?;
            info!("deployed s3://{}/{key}", request.bucket);
        }
        Opt::TerraInit { path, bucket } => {
            terra_init(&runner, &settings, &path, bucket.as_deref())?;
        }
        Opt::StartDynamoLocal => {
            start_dynamo_local(&runner, &settings.region).await?;
        }
        Opt::ViberSetWebhook { url, secret } => {
            ViberClient::from_settings(VIBER_API, secret.as_deref(), &settings)?
                .set_webhook(&url)
                .await?;
        }
        Opt::DeployViberWebhook {
            path,
            version,
            infra,
            url,
            bucket,
            secret,
        } => {
            let store = S3Store::connect(&settings.region).await;
            let request = WebhookDeploy {
                lambda: LambdaDeploy {
                    path,
                    version: Some(version),
                    bucket: bucket.unwrap_or_else(|| settings.deploy_bucket.clone()),
                    package_mode: PackageMode::default(),
                },
                infra_path: infra,
                webhook_url: url,
                viber_api: VIBER_API.to_string(),
                secret,
            };
            deploy_viber_webhook(&store, &runner, &settings, &request).await?;
        }
    }

    Ok(())
}
