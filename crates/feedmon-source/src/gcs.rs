use crate::error::{Result, SourceError};
use crate::MetadataSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedmon_common::path_date::is_folder_placeholder;
use feedmon_common::types::FileRecord;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Maximum response body length kept in error messages.
const MAX_ERROR_BODY: usize = 500;

/// Settings for [`GcsMetadataSource`].
#[derive(Debug, Clone)]
pub struct GcsSettings {
    /// API base URL, without trailing slash.
    pub endpoint: String,
    /// OAuth2 bearer token; `None` for public buckets or emulators.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GcsSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// Lists objects through the Cloud Storage JSON API (`objects.list`).
pub struct GcsMetadataSource {
    endpoint: String,
    access_token: Option<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectsPage {
    #[serde(default)]
    items: Vec<ObjectResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectResource {
    name: String,
    /// The API encodes uint64 values as decimal strings.
    #[serde(default)]
    size: Option<String>,
    updated: Option<DateTime<Utc>>,
}

impl GcsMetadataSource {
    pub fn new(settings: GcsSettings) -> Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| SourceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            access_token: settings.access_token,
            client,
        })
    }

    async fn fetch_page(
        &self,
        bucket: &str,
        prefix: &str,
        page_token: Option<&str>,
    ) -> Result<ObjectsPage> {
        let url = format!("{}/storage/v1/b/{}/o", self.endpoint, bucket);
        let mut query = vec![
            ("prefix", prefix),
            ("fields", "items(name,size,updated),nextPageToken"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let mut request = self.client.get(&url).query(&query);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Http {
                source_name: "gcs".to_string(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Converts one API page into records, dropping folder placeholders and
/// objects with an unreadable size.
fn records_from_page(page: ObjectsPage) -> Vec<FileRecord> {
    page.items
        .into_iter()
        .filter(|item| !is_folder_placeholder(&item.name))
        .filter_map(|item| {
            let size = match item.size.as_deref().map(str::parse::<u64>) {
                Some(Ok(size)) => size,
                _ => {
                    tracing::warn!(object = %item.name, size = ?item.size, "Skipping object with unreadable size");
                    return None;
                }
            };
            let updated = item.updated.unwrap_or_default();
            Some(FileRecord::new(item.name, size, updated))
        })
        .collect()
}

#[async_trait]
impl MetadataSource for GcsMetadataSource {
    fn name(&self) -> &str {
        "gcs"
    }

    async fn list_files(&self, bucket: &str, prefix: &str) -> Result<Vec<FileRecord>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self.fetch_page(bucket, prefix, page_token.as_deref()).await?;
            pages += 1;
            let next = page.next_page_token.clone();
            records.extend(records_from_page(page));

            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::info!(bucket, prefix, pages, files = records.len(), "Listed bucket");
        Ok(records)
    }
}
