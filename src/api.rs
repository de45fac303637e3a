//! HTTP surface.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | HTML index listing the registry's sources |
//! | `GET /fetch_news?source=&category=` | JSON array of [`Article`] |
//! | `GET /test_feed/{source}` | JSON [`FeedProbe`] |
//!
//! Both `source` and `category` default to `"all"`. An unregistered source
//! name yields `404 {"error": "Source not found"}` on either JSON route.

use crate::error::Result;
use crate::models::{Article, FeedProbe};
use crate::outputs::html::render_index;
use crate::pipeline::{ALL, Aggregator, Filter};
use crate::scrapers::{ContentExtractor, FeedFetcher};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

fn all() -> String {
    ALL.to_string()
}

#[derive(Debug, Deserialize)]
pub struct FetchNewsParams {
    #[serde(default = "all")]
    pub source: String,
    #[serde(default = "all")]
    pub category: String,
}

type SharedAggregator<F, E> = Arc<Aggregator<F, E>>;

pub fn router<F, E>(aggregator: Aggregator<F, E>) -> Router
where
    F: FeedFetcher + 'static,
    E: ContentExtractor + 'static,
{
    Router::new()
        .route("/", get(index::<F, E>))
        .route("/fetch_news", get(fetch_news::<F, E>))
        .route("/test_feed/:source", get(test_feed::<F, E>))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(aggregator))
}

async fn index<F, E>(State(aggregator): State<SharedAggregator<F, E>>) -> Html<String>
where
    F: FeedFetcher,
    E: ContentExtractor,
{
    Html(render_index(aggregator.registry().names()))
}

#[instrument(level = "info", skip(aggregator))]
async fn fetch_news<F, E>(
    State(aggregator): State<SharedAggregator<F, E>>,
    Query(params): Query<FetchNewsParams>,
) -> Result<Json<Vec<Article>>>
where
    F: FeedFetcher,
    E: ContentExtractor,
{
    let aggregation = aggregator
        .aggregate(
            &Filter::from(params.source.as_str()),
            &Filter::from(params.category.as_str()),
        )
        .await?;
    for failure in &aggregation.failures {
        warn!(%failure, "Partial result");
    }
    Ok(Json(aggregation.articles))
}

#[instrument(level = "info", skip(aggregator))]
async fn test_feed<F, E>(
    State(aggregator): State<SharedAggregator<F, E>>,
    Path(source): Path<String>,
) -> Result<Json<FeedProbe>>
where
    F: FeedFetcher,
    E: ContentExtractor,
{
    Ok(Json(aggregator.probe(&source).await?))
}

/// Serve `app` on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
}
