//! HTTP client for the reference point server.
//!
//! Contract:
//! - `GET    {base}/points?west=..&south=..&east=..&north=..` -> `[Point]`, newest first
//! - `POST   {base}/points` with a [`NewPoint`] body -> `Point`
//! - `DELETE {base}/points?owner_id=..` -> `{ "deleted": n }`

use foundation::{GeoBounds, OwnerId};
use serde::Deserialize;
use tracing::debug;

use crate::point::{NewPoint, Point};
use crate::store::{BoxFuture, PointStore, StoreError, StoreErrorKind};

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    deleted: u64,
}

pub struct HttpPointStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPointStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn points_url(&self) -> String {
        format!("{}/points", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let resp = request.send().await.map_err(|e| {
            StoreError::with_source(StoreErrorKind::Unreachable, "store request failed", e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::rejected(format!(
                "store answered HTTP {status}: {}",
                body.trim()
            )));
        }
        Ok(resp)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, StoreError> {
        resp.json::<T>().await.map_err(|e| {
            StoreError::with_source(StoreErrorKind::Decode, "store response was not valid", e)
        })
    }
}

impl PointStore for HttpPointStore {
    fn query_bounds(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, StoreError>> {
        Box::pin(async move {
            debug!(?bounds, url = %self.points_url(), "querying points");
            let request = self.client.get(self.points_url()).query(&[
                ("west", bounds.west),
                ("south", bounds.south),
                ("east", bounds.east),
                ("north", bounds.north),
            ]);
            let resp = self.send(request).await?;
            Self::decode(resp).await
        })
    }

    fn insert(&self, point: NewPoint) -> BoxFuture<'_, Result<Point, StoreError>> {
        Box::pin(async move {
            let request = self.client.post(self.points_url()).json(&point);
            let resp = self.send(request).await?;
            Self::decode(resp).await
        })
    }

    fn delete_owned(&self, owner: OwnerId) -> BoxFuture<'_, Result<u64, StoreError>> {
        Box::pin(async move {
            let request = self
                .client
                .delete(self.points_url())
                .query(&[("owner_id", owner.as_str())]);
            let resp = self.send(request).await?;
            let body: DeleteResponse = Self::decode(resp).await?;
            Ok(body.deleted)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::HttpPointStore;
    use crate::store::{PointStore, StoreErrorKind};
    use foundation::GeoBounds;

    #[test]
    fn trims_trailing_slash() {
        let store = HttpPointStore::new("http://localhost:9200/");
        assert_eq!(store.base_url(), "http://localhost:9200");
        assert_eq!(store.points_url(), "http://localhost:9200/points");
    }

    #[tokio::test]
    async fn unreachable_store_reports_unreachable() {
        // Port 9 (discard) on loopback is closed in test environments.
        let store = HttpPointStore::new("http://127.0.0.1:9");
        let err = store
            .query_bounds(GeoBounds::new(0.0, 0.0, 1.0, 1.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Unreachable);
    }
}
