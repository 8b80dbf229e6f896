use crate::settings::{Settings, VIBER_SECRET_VAR};
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

pub const VIBER_API: &str = "https://chatapi.viber.com";

#[derive(Serialize, Debug)]
struct SetWebhookRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize, Debug, Default)]
pub struct ViberResponse {
    pub status: i64,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub event_types: Vec<String>,
}

impl ViberResponse {
    /// Viber answers 200 even for failures; `status` 0 is the only success.
    pub fn into_result(self) -> Result<Self> {
        if self.status != 0 {
            bail!(
                "viber api error {}: {}",
                self.status,
                self.status_message
            );
        }
        Ok(self)
    }
}

pub struct ViberClient {
    http: reqwest::Client,
    api: String,
    token: String,
}

impl ViberClient {
    pub fn with_api(api: &str, token: &str) -> Self {
        ViberClient {
            http: reqwest::Client::new(),
            api: api.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }

    /// Explicit secret wins, then `VIBER_BOT_SECRET`.
    pub fn from_settings(api: &str, secret: Option<&str>, settings: &Settings) -> Result<Self> {
        let token = secret
            .filter(|secret| !secret.is_empty())
            .map(str::to_owned)
            .or_else(|| settings.viber_secret.clone())
            .ok_or_else(|| anyhow!("{VIBER_SECRET_VAR} env var missing"))?;

        Ok(ViberClient::with_api(api, &token))
    }

    pub async fn set_webhook(&self, url: &str) -> Result<ViberResponse> {
        info!("setting viber webhook to {url}");

        let response = self
            .http
            .post(format!("{}/pa/set_webhook", self.api))
            .header("X-Viber-Auth-Token", &self.token)
            .json(&SetWebhookRequest { url })
            .send()
            .await
            .context("Error calling viber set_webhook")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            bail!("viber set_webhook returned {status}: {text}");
        }

        let response = response.json::<ViberResponse>().await?.into_result()?;
        info!("webhook set, event types: {:?}", response.event_types);

        Ok(response)
    }
}


#[cfg(test)]
pub mod stub {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers a single viber api call with a success body. `on_request` runs
    /// once the request is fully read; the handle yields the raw request.
    pub async fn serve_once<F>(on_request: F) -> (String, JoinHandle<String>)
    where
        F: FnOnce() + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = String::new();
            let mut buf = vec![0u8; 4096];
            while !request.ends_with('}') {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.push_str(&String::from_utf8_lossy(&buf[..n]));
            }
            on_request();

            let body = r#"{"status":0,"status_message":"ok","event_types":["delivered","seen"]}"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            request
        });

        (format!("http://{addr}"), server)
    }
}
