//! Topping source backed by a Kubernetes-style REST API

use super::source::{ToppingSource, WatchEvent, WatchStream};
use crate::config::KubernetesCatalogConfig;
use crate::error::SourceError;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use restaurant_types::ToppingList;

const TOPPINGS_PATH: &str = "/apis/restaurant.programming-kubernetes.info/v1alpha1/toppings";

/// Lists and watches `toppings` on an API server over HTTP
#[derive(Debug, Clone)]
pub struct KubeToppingSource {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    watch_timeout_secs: u64,
}

impl KubeToppingSource {
    pub fn new(api_server: &str, token: Option<String>, watch_timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}{}", api_server.trim_end_matches('/'), TOPPINGS_PATH),
            token,
            watch_timeout_secs,
        }
    }

    /// Build from configuration, reading the bearer token file if one is set
    pub fn from_config(config: &KubernetesCatalogConfig) -> Result<Self, SourceError> {
        let token = match &config.token_file {
            Some(path) => Some(std::fs::read_to_string(path)?.trim().to_string()),
            None => None,
        };
        Ok(Self::new(&config.api_server, token, config.watch_timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get(&self, query: &[(&str, String)]) -> Result<reqwest::Response, SourceError> {
        let mut request = self.client.get(&self.url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                code: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ToppingSource for KubeToppingSource {
    async fn list(&self) -> Result<ToppingList, SourceError> {
        let response = self.get(&[]).await?;
        Ok(response.json::<ToppingList>().await?)
    }

    async fn watch(&self, resource_version: &str) -> Result<WatchStream, SourceError> {
        let query = [
            ("watch", "true".to_string()),
            ("resourceVersion", resource_version.to_string()),
            ("allowWatchBookmarks", "true".to_string()),
            ("timeoutSeconds", self.watch_timeout_secs.to_string()),
        ];
        let response = self.get(&query).await?;

        let body = Box::pin(response.bytes_stream());
        let events = stream::unfold((body, Vec::new()), |(mut body, mut buffer)| async move {
            loop {
                if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    match parse_watch_line(&line) {
                        Some(event) => return Some((event, (body, buffer))),
                        None => continue,
                    }
                }

                match body.next().await {
                    Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                    Some(Err(e)) => return Some((Err(SourceError::from(e)), (body, buffer))),
                    None => {
                        let rest = std::mem::take(&mut buffer);
                        return parse_watch_line(&rest).map(|event| (event, (body, buffer)));
                    }
                }
            }
        });

        Ok(events.boxed())
    }
}

/// Decode one newline-delimited watch frame; blank lines yield nothing
fn parse_watch_line(line: &[u8]) -> Option<Result<WatchEvent, SourceError>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_slice(line).map_err(SourceError::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_api_server() {
        let source = KubeToppingSource::new("https://10.0.0.1:6443/", None, 300);
        assert_eq!(
            source.url(),
            "https://10.0.0.1:6443/apis/restaurant.programming-kubernetes.info/v1alpha1/toppings"
        );
    }

    #[test]
    fn test_parse_watch_line() {
        assert!(parse_watch_line(b"  \n").is_none());

        let event = parse_watch_line(
            br#"{"type":"DELETED","object":{"kind":"Topping","metadata":{"name":"anchovy"}}}"#,
        )
        .unwrap()
        .unwrap();
        assert!(matches!(event, WatchEvent::Deleted(t) if t.name() == "anchovy"));

        let err = parse_watch_line(b"{not json}\n").unwrap().unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn test_from_config_reads_token_file() {
        let dir = std::env::temp_dir().join(format!("restaurant-webhook-token-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let token_path = dir.join("token");
        std::fs::write(&token_path, "s3cr3t\n").unwrap();

        let config = KubernetesCatalogConfig {
            api_server: "http://127.0.0.1:8001".to_string(),
            token_file: Some(token_path.to_string_lossy().into_owned()),
            watch_timeout_secs: 60,
        };
        let source = KubeToppingSource::from_config(&config).unwrap();
        assert_eq!(source.token.as_deref(), Some("s3cr3t"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
