use std::path::PathBuf;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use foundation::{GeoBounds, OwnerId, PointId, TimestampMs};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use streaming::{sort_newest_first, NewPoint, Point};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

#[derive(Debug, Error)]
pub enum PointsFileError {
    #[error("points file io: {0}")]
    Io(#[from] std::io::Error),
    #[error("points file is not valid json: {0}")]
    Corrupt(#[from] serde_json::Error),
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

fn storage_error(e: PointsFileError) -> ApiError {
    warn!(error = %e, "points file unavailable");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// JSON-file point store. Whole-file rewrites go through a temp file and a
/// rename, serialized by `lock`.
pub struct PointsFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PointsFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn load_unlocked(&self) -> Result<Vec<Point>, PointsFileError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) if s.trim().is_empty() => Ok(Vec::new()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_unlocked(&self, points: &[Point]) -> Result<(), PointsFileError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_string_pretty(points)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Points inside `bounds` (inclusive), newest first.
    pub async fn query(&self, bounds: &GeoBounds) -> Result<Vec<Point>, PointsFileError> {
        let _g = self.lock.lock().await;
        let mut hits: Vec<Point> = self
            .load_unlocked()
            .await?
            .into_iter()
            .filter(|p| p.within(bounds))
            .collect();
        sort_newest_first(&mut hits);
        Ok(hits)
    }

    /// Assigns a fresh id and `created_at`, then persists.
    pub async fn insert(
        &self,
        point: NewPoint,
        created_at: TimestampMs,
    ) -> Result<Point, PointsFileError> {
        let _g = self.lock.lock().await;
        let mut points = self.load_unlocked().await?;
        let stored = point.into_point(PointId::new(Uuid::new_v4().to_string()), created_at);
        points.push(stored.clone());
        self.save_unlocked(&points).await?;
        Ok(stored)
    }

    pub async fn delete_owned(&self, owner: &OwnerId) -> Result<u64, PointsFileError> {
        let _g = self.lock.lock().await;
        let mut points = self.load_unlocked().await?;
        let before = points.len();
        points.retain(|p| &p.owner_id != owner);
        let removed = (before - points.len()) as u64;
        if removed > 0 {
            self.save_unlocked(&points).await?;
        }
        Ok(removed)
    }
}

#[derive(Debug, Deserialize)]
pub struct BoundsQuery {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Deleted {
    pub deleted: u64,
}

pub async fn list_points(
    State(state): State<AppState>,
    Query(q): Query<BoundsQuery>,
) -> Result<Json<Vec<Point>>, ApiError> {
    let bounds = GeoBounds::new(q.west, q.south, q.east, q.north);
    bounds
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("invalid bounds: {e}")))?;

    let points = state.points.query(&bounds).await.map_err(storage_error)?;
    Ok(Json(points))
}

pub async fn create_point(
    State(state): State<AppState>,
    Json(point): Json<NewPoint>,
) -> Result<(StatusCode, Json<Point>), ApiError> {
    point
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("invalid submission: {e}")))?;

    let stored = state
        .points
        .insert(point, TimestampMs::now())
        .await
        .map_err(storage_error)?;
    info!(id = %stored.id, owner = %stored.owner_id, "point stored");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn delete_points(
    State(state): State<AppState>,
    Query(q): Query<OwnerQuery>,
) -> Result<Json<Deleted>, ApiError> {
    if q.owner_id.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "owner_id is required"));
    }

    let owner = OwnerId::new(q.owner_id);
    let deleted = state
        .points
        .delete_owned(&owner)
        .await
        .map_err(storage_error)?;
    info!(owner = %owner, deleted, "points purged");
    Ok(Json(Deleted { deleted }))
}
