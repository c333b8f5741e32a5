//! DigitalOcean v2 API implementation of [`SnapshotBackend`].

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cloud_storage::backend_trait::SnapshotBackend;
use crate::cloud_storage::types::{PageOptions, SnapshotPage, SnapshotRecord, Volume};
use crate::configuration::types::BackendSettings;
use crate::error_handling::types::BackendError;

#[derive(Debug, Deserialize)]
struct VolumeEnvelope {
    volume: Volume,
}

#[derive(Debug, Deserialize)]
struct SnapshotEnvelope {
    snapshot: SnapshotRecord,
}

#[derive(Debug, Deserialize)]
struct SnapshotListEnvelope {
    #[serde(default)]
    snapshots: Vec<SnapshotRecord>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateSnapshotRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: String,
}

/// Client for the DigitalOcean block-storage endpoints.
///
/// No request timeout is configured; calls wait for the server like the
/// underlying HTTP client does by default.
#[derive(Clone)]
pub struct DigitalOceanClient {
    http_client: Client,
    base_url: Url,
    token: String,
}

impl DigitalOceanClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        let http_client = Client::builder()
            .user_agent(concat!("snapshotter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(&settings.api_url)
            .map_err(|e| BackendError::InvalidBaseUrl(format!("{}: {}", settings.api_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidBaseUrl(settings.api_url.clone()));
        }

        Ok(Self {
            http_client,
            base_url,
            token: settings.token.clone(),
        })
    }

    /// Appends `v2` and `segments` to the base URL. Each segment is
    /// percent-encoded, so an id can never add path components or a query.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("v2")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (id, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => (err.id, err.message),
            Err(_) => (String::from("unknown"), body),
        };
        Err(BackendError::Api {
            status: status.as_u16(),
            id,
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SnapshotBackend for DigitalOceanClient {
    async fn get_volume(&self, volume_id: &str) -> Result<Volume, BackendError> {
        debug!("Fetching volume {}", volume_id);
        let request = self.http_client.get(self.url(&["volumes", volume_id])?);
        let envelope: VolumeEnvelope = Self::json(self.send(request).await?).await?;
        Ok(envelope.volume)
    }

    async fn create_snapshot(
        &self,
        volume_id: &str,
        name: &str,
    ) -> Result<SnapshotRecord, BackendError> {
        debug!("Requesting snapshot {} of volume {}", name, volume_id);
        let request = self
            .http_client
            .post(self.url(&["volumes", volume_id, "snapshots"])?)
            .json(&CreateSnapshotRequest { name });
        let envelope: SnapshotEnvelope = Self::json(self.send(request).await?).await?;
        Ok(envelope.snapshot)
    }

    async fn list_snapshots(
        &self,
        volume_id: &str,
        page: PageOptions,
    ) -> Result<SnapshotPage, BackendError> {
        debug!(
            "Listing snapshots of volume {} (page {}, {} per page)",
            volume_id, page.page, page.per_page
        );
        let request = self
            .http_client
            .get(self.url(&["volumes", volume_id, "snapshots"])?)
            .query(&[("page", page.page), ("per_page", page.per_page)]);
        let envelope: SnapshotListEnvelope = Self::json(self.send(request).await?).await?;

        let has_next = envelope
            .links
            .pages
            .and_then(|pages| pages.next)
            .is_some();
        Ok(SnapshotPage {
            snapshots: envelope.snapshots,
            has_next,
        })
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), BackendError> {
        debug!("Deleting snapshot {}", snapshot_id);
        let request = self
            .http_client
            .delete(self.url(&["snapshots", snapshot_id])?);
        self.send(request).await?;
        Ok(())
    }
}
