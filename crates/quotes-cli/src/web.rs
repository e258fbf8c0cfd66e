//! HTML quote browser over HTTP.
//!
//! The server starts answering immediately with an empty view; the quote
//! resource loads in a background task and is installed exactly once. The
//! selection lives in the query string, so every request rebuilds its view
//! from the shared base view plus its own parameters.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use quotes_core::{QuoteCollection, QuoteView, Selection, SubcategoryPolicy, ViewSnapshot};
use quotes_store::{Config, QuoteSource};
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::render;

#[derive(Clone)]
pub struct AppState {
    /// Base view with no selection; replaced once when the load finishes.
    view: Arc<RwLock<QuoteView>>,
}

impl AppState {
    pub fn new(policy: SubcategoryPolicy) -> Self {
        Self {
            view: Arc::new(RwLock::new(QuoteView::empty(policy))),
        }
    }

    pub async fn install(&self, quotes: QuoteCollection) {
        let mut view = self.view.write().await;
        *view = view.with_collection(quotes);
    }

    async fn view_for(&self, selection: Selection) -> QuoteView {
        self.view.read().await.with_selection(selection)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    category: Option<String>,
    subcategory: Option<String>,
    prev_category: Option<String>,
}

impl ViewParams {
    fn selection(&self) -> Selection {
        Selection::from_params(
            self.category.as_deref(),
            self.subcategory.as_deref(),
            self.prev_category.as_deref(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubcategoryParams {
    category: Option<String>,
}

async fn page(State(state): State<AppState>, Query(params): Query<ViewParams>) -> Html<String> {
    let view = state.view_for(params.selection()).await;
    Html(render::html_page(&view.snapshot()))
}

async fn api_view(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Json<ViewSnapshot> {
    Json(state.view_for(params.selection()).await.snapshot())
}

async fn api_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.view.read().await.categories().to_vec())
}

async fn api_subcategories(
    State(state): State<AppState>,
    Query(params): Query<SubcategoryParams>,
) -> Json<Vec<String>> {
    let view = state
        .view_for(Selection::new().select_category(params.category.as_deref()))
        .await;
    Json(view.subcategories())
}

async fn quotes_json(State(state): State<AppState>) -> Json<QuoteCollection> {
    Json(state.view.read().await.quotes().clone())
}

pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/view", get(api_view))
        .route("/categories", get(api_categories))
        .route("/subcategories", get(api_subcategories))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(page))
        .route("/quotes.json", get(quotes_json))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load `source` into `state` unless `cancel` fires first, in which case the
/// result is dropped.
pub fn spawn_loader(
    tracker: &TaskTracker,
    source: QuoteSource,
    state: AppState,
    cancel: CancellationToken,
) {
    tracker.spawn(async move {
        tokio::select! {
            quotes = source.load_or_empty() => state.install(quotes).await,
            _ = cancel.cancelled() => {
                tracing::debug!("shutdown before {source} finished loading; discarding");
            }
        }
    });
}

async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!("failed to listen for ctrl-c: {e}");
            }
        }
        _ = cancel.cancelled() => {}
    }
    cancel.cancel();
}

pub async fn run(config: &Config, bind: SocketAddr) -> Result<()> {
    let state = AppState::new(config.subcategory_policy);
    let cancel = CancellationToken::new();
    let tracker = TaskTracker::new();

    spawn_loader(&tracker, config.source.clone(), state.clone(), cancel.clone());

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let local = listener.local_addr().context("failed to read local address")?;
    tracing::info!("serving quotes from {} on http://{local}", config.source);
    eprintln!("listening on http://{local}");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .context("HTTP server failed")?;

    tracker.close();
    tracker.wait().await;
    Ok(())
}
