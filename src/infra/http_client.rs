use crate::app::ports::PageSource;
use crate::config::SourceConfig;
use crate::error::Result;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Fetches a page with a single blocking GET.
pub struct ReqwestPageSource {
    client: Client,
    url: String,
}

impl ReqwestPageSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout_seconds.map(Duration::from_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl PageSource for ReqwestPageSource {
    fn location(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    fn fetch(&self) -> Result<String> {
        info!("Fetching page");
        let resp = self.client.get(&self.url).send()?.error_for_status()?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = resp.text()?;
        debug!(status, content_type = %content_type, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
