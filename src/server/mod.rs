//! HTTP server

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;

use crate::content::ResourceId;
use crate::{Error, Glug};

/// Server state: the application, immutable once serving starts
type AppState = Arc<Glug>;

/// Start serving `glug` until the process is stopped
pub async fn start(glug: Glug, ip: &str, port: u16) -> Result<()> {
    let app = router(Arc::new(glug));

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Routing table
pub fn router(glug: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/styles/:file", get(style_handler))
        .route("/:slug", get(page_handler))
        .route("/:year/:month/:day/:slug", get(post_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(glug)
}

async fn index_handler(State(glug): State<AppState>) -> Result<Html<String>, ServerError> {
    render(glug, |glug| glug.render_index()).await.map(Html)
}

async fn page_handler(
    State(glug): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, ServerError> {
    render(glug, move |glug| glug.render_page(&slug)).await.map(Html)
}

async fn post_handler(
    State(glug): State<AppState>,
    Path((year, month, day, slug)): Path<(String, String, String, String)>,
) -> Result<Html<String>, ServerError> {
    let dated = is_digits(&year, 4) && is_digits(&month, 2) && is_digits(&day, 2);
    if !dated {
        return Err(Error::NotFound {
            id: ResourceId::post(year, month, day, slug),
        }
        .into());
    }

    render(glug, move |glug| glug.render_post(&year, &month, &day, &slug))
        .await
        .map(Html)
}

async fn style_handler(
    State(glug): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, ServerError> {
    let Some(name) = file.strip_suffix(".css").map(str::to_string) else {
        return Err(Error::NotFound {
            id: ResourceId::style(file),
        }
        .into());
    };

    let css = render(glug, move |glug| glug.render_style(&name)).await?;
    Ok(([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css).into_response())
}

/// Run a blocking render on the blocking pool
async fn render<F>(glug: AppState, f: F) -> Result<String, ServerError>
where
    F: FnOnce(&Glug) -> crate::Result<String> + Send + 'static,
{
    let rendered = tokio::task::spawn_blocking(move || f(&glug)).await?;
    Ok(rendered?)
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Request failure, mapped onto a status code
#[derive(Debug)]
enum ServerError {
    Content(Error),
    Task(JoinError),
}

impl From<Error> for ServerError {
    fn from(err: Error) -> Self {
        ServerError::Content(err)
    }
}

impl From<JoinError> for ServerError {
    fn from(err: JoinError) -> Self {
        ServerError::Task(err)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Content(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServerError::Content(Error::PathTraversal { .. }) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ServerError::Content(err) if err.is_client_error() => tracing::warn!("{}", err),
            ServerError::Content(err) => tracing::error!("{}", error_chain(err)),
            ServerError::Task(err) => tracing::error!("Render task failed: {}", err),
        }

        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}

/// `err: source: source...` on one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
