//! A small café lookup service with a single endpoint.
//!
//! ```not_rust
//! cargo run -p cafe-api
//! ```
//!
//! Then try it with:
//!
//! ```not_rust
//! curl 'http://localhost:3000/cafe?count=2&city=moscow'
//! ```

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .unwrap();

    tracing::debug!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app(CafeCatalog::default()))
        .await
        .unwrap();
}

/// Having a function that produces our app makes it easy to call it from
/// tests without having to create an HTTP server.
fn app(catalog: CafeCatalog) -> Router {
    Router::new()
        .route("/cafe", get(cafes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            catalog: Arc::new(catalog),
        })
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<CafeCatalog>,
}

/// City to café list mapping. Built once at startup and only read after
/// that, so handlers can share it without any synchronization.
struct CafeCatalog {
    cities: HashMap<String, Vec<String>>,
}

impl CafeCatalog {
    fn new(cities: HashMap<String, Vec<String>>) -> Self {
        Self { cities }
    }

    fn cafes(&self, city: &str) -> Option<&[String]> {
        self.cities.get(city).map(Vec::as_slice)
    }
}

impl Default for CafeCatalog {
    fn default() -> Self {
        Self::new(HashMap::from([(
            "moscow".to_owned(),
            vec![
                "Мир кофе".to_owned(),
                "Сладкоежка".to_owned(),
                "Кофе и завтраки".to_owned(),
                "Сытый студент".to_owned(),
            ],
        )]))
    }
}

/// Both parameters are required, but we extract them as `Option` so the
/// handler can answer with specific error bodies instead of the generic
/// `Query` rejection.
#[derive(Deserialize)]
struct CafeParams {
    count: Option<String>,
    city: Option<String>,
}

/// `GET /cafe?count=<n>&city=<name>`
///
/// Responds with the first `count` cafés of the city, comma separated.
/// A `count` larger than the list is clamped to the list length.
async fn cafes(
    State(state): State<AppState>,
    Query(params): Query<CafeParams>,
) -> Result<String, (StatusCode, &'static str)> {
    let count = match params.count.as_deref() {
        None | Some("") => return Err((StatusCode::BAD_REQUEST, "count missing")),
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| (StatusCode::BAD_REQUEST, "wrong count value"))?,
    };

    let cafes = params
        .city
        .as_deref()
        .and_then(|city| state.catalog.cafes(city))
        .ok_or((StatusCode::BAD_REQUEST, "wrong city value"))?;

    let count = count.min(cafes.len());
    Ok(cafes[..count].join(","))
}
