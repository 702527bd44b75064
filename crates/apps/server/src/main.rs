use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod points;

use points::PointsFile;

#[derive(Clone)]
pub(crate) struct AppState {
    points: Arc<PointsFile>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = match env::var("SIGHTINGS_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9200".to_string())
        .parse()
    {
        Ok(addr) => addr,
        Err(e) => {
            error!("invalid SIGHTINGS_ADDR: {e}");
            std::process::exit(2);
        }
    };
    let data = env::var("SIGHTINGS_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/points.json"));

    let state = AppState {
        points: Arc::new(PointsFile::new(data)),
    };
    info!(path = %state.points.path().display(), "points file");

    let app = router(state);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("sightings store listening on http://{addr}");
    if let Err(e) = axum::serve(listener, app).await {
        error!("server stopped: {e}");
    }
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/points",
            get(points::list_points)
                .post(points::create_point)
                .delete(points::delete_points),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}
