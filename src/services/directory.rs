use super::{DirectoryService, Member};
use crate::config::DirectoryConfig;
use crate::error::{StylecastError, StylecastResult};
use crate::http_client::HttpClient;
use async_trait::async_trait;
use url::Url;

/// Directory client: `GET /members` and `GET /members/{key}`
pub struct HttpDirectory {
    client: HttpClient,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(client: HttpClient, config: &DirectoryConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn members_url(&self) -> String {
        format!("{}/members", self.base_url)
    }

    /// Key is appended as a single, percent-encoded path segment
    fn member_url(&self, key: &str) -> StylecastResult<String> {
        let mut url = Url::parse(&self.members_url())?;
        url.path_segments_mut()
            .map_err(|_| StylecastError::ConfigError(format!("{} cannot be a base URL", self.base_url)))?
            .push(key);
        Ok(url.into())
    }
}

#[async_trait]
impl DirectoryService for HttpDirectory {
    async fn list_members(&self) -> StylecastResult<Vec<String>> {
        self.client.get_json(&self.members_url(), &[]).await
    }

    async fn member(&self, key: &str) -> StylecastResult<Member> {
        let url = self.member_url(key)?;
        self.client.get_json(&url, &[]).await.map_err(|e| match e {
            StylecastError::NotFound(_) => StylecastError::NotFound(format!("member '{}'", key)),
            other => other,
        })
    }
}
