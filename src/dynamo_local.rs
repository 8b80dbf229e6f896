use crate::shell::{Command, CommandRunner};
use anyhow::{bail, Result};
use aws_sdk_dynamodb::{Client, Endpoint, Region};
use http::Uri;
use log::{debug, info};
use std::time::Duration;

pub const LOCAL_ENDPOINT: &str = "http://localhost:8000";
pub const CONTAINER_NAME: &str = "dynamo";
pub const IMAGE: &str = "amazon/dynamodb-local:latest";

const READY_ATTEMPTS: u32 = 10;
const READY_DELAY: Duration = Duration::from_secs(3);

pub fn docker_run_command() -> Command {
    Command::new("docker").args([
        "run",
        "-d",
        "-p",
        "8000:8000",
        "--name",
        CONTAINER_NAME,
        IMAGE,
    ])
}

/// Start DynamoDB in local docker and wait until it answers `ListTables`.
pub async fn start_dynamo_local(runner: &dyn CommandRunner, region: &str) -> Result<()> {
    runner.run(&docker_run_command())?;

    let config = aws_config::from_env()
        .region(Region::new(region.to_owned()))
        .load()
        .await;

    let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
        .endpoint_resolver(Endpoint::immutable(Uri::from_static(LOCAL_ENDPOINT)))
        .build();

    let ddb = Client::from_conf(dynamo_config);

    for attempt in 1..=READY_ATTEMPTS {
        match ddb.list_tables().send().await {
            Ok(output) => {
                let tables = output.table_names().map(|names| names.len()).unwrap_or(0);
                info!("dynamodb local is up at {LOCAL_ENDPOINT}, {tables} tables");
                return Ok(());
            }
            Err(err) => {
                debug!("dynamodb local not ready (attempt {attempt}): {err}");
                tokio::time::sleep(READY_DELAY).await;
            }
        }
    }

    bail!("dynamodb local did not answer at {LOCAL_ENDPOINT} after {READY_ATTEMPTS} attempts")
}
