mod config;
mod error;
mod models;
mod services;
mod utils;
mod views;

use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::{Html, Json, Redirect},
    routing::{get, post},
};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;
use crate::models::{AppMode, Attachment, SubmitRequest};
use crate::services::llm::{ContentGenerator, LLMClient};
use crate::services::results::Tab;
use crate::services::session::{Session, SessionSnapshot};

/// Inline attachments above this size are rejected by the backend anyway.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    generator: Arc<dyn ContentGenerator>,
    session: Arc<Mutex<Session>>,
}

impl AppState {
    fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            session: Arc::new(Mutex::new(Session::new())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // Missing credentials stop us here rather than at the first request
    let config = Config::from_env()?;
    let llm_client = Arc::new(LLMClient::new(&config)?);
    tracing::info!(model = %config.model, "Gemini client ready");

    let app = router(AppState::new(llm_client));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/generate", post(generate))
        .route("/mode", post(switch_mode))
        .route("/tab", post(select_tab))
        .route("/mcq/:index/select", post(select_option))
        .route("/mcq/:index/reveal", post(reveal))
        .route("/clear", post(clear))
        .route("/api/state", get(state_snapshot))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(views::render_page(&session))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn state_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.lock().await.snapshot())
}

async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, StatusCode> {
    let request = read_submission(multipart).await?;
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("generate", %request_id, mode = request.mode.slug());

    // Detached so a client that disconnects mid-call cannot leave its ticket pending
    let task = tokio::spawn(
        async move {
            let begun = state.session.lock().await.begin(&request);
            let ticket = match begun {
                Ok(ticket) => ticket,
                Err(err) => {
                    tracing::info!(%err, "Rejected submission");
                    return;
                }
            };

            tracing::info!(
                ticket = ticket.id(),
                has_file = request.attachment.is_some(),
                "Requesting study content"
            );
            let outcome = state.generator.generate_content(&request).await;
            let applied = state.session.lock().await.settle(ticket, outcome);
            tracing::info!(ticket = ticket.id(), applied, "Generation settled");
        }
        .instrument(span),
    );

    task.await.map_err(|err| {
        tracing::error!(%err, "Generation task failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Redirect::to("/"))
}

/// Switches the mode from the form, keeping the typed prompt.
async fn switch_mode(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, StatusCode> {
    let request = read_submission(multipart).await?;
    state
        .session
        .lock()
        .await
        .switch_mode(request.prompt, request.mode);
    Ok(Redirect::to("/"))
}

/// Reads the study form: `prompt`, `mode` and at most one `file`.
///
/// A repeated `mode` field overrides the earlier one; the pressed mode button
/// follows the hidden current-mode field.
async fn read_submission(mut multipart: Multipart) -> Result<SubmitRequest, StatusCode> {
    let mut request = SubmitRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or("unknown").to_string();
        match name.as_str() {
            "prompt" => {
                request.prompt = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            }
            "mode" => {
                let raw = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                request.mode = raw.parse().unwrap_or_else(|err| {
                    tracing::warn!(%err, "Falling back to the default mode");
                    AppMode::default()
                });
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                let media_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;

                // Browsers send an empty part when no file was picked
                if data.is_empty() {
                    continue;
                }
                if !utils::accepts_media_type(&media_type) {
                    tracing::warn!(%media_type, "Dropping attachment outside the accept filter");
                    continue;
                }
                request.attachment = Some(Attachment {
                    bytes: data.to_vec(),
                    media_type,
                    file_name,
                });
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(request)
}

#[derive(Deserialize)]
struct TabForm {
    tab: Tab,
}

async fn select_tab(State(state): State<AppState>, Form(form): Form<TabForm>) -> Redirect {
    if let Err(err) = state.session.lock().await.select_tab(form.tab) {
        tracing::warn!(%err, "Ignoring tab change");
    }
    Redirect::to("/")
}

#[derive(Deserialize)]
struct OptionForm {
    option: String,
}

async fn select_option(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<OptionForm>,
) -> Redirect {
    if let Err(err) = state.session.lock().await.select_option(index, &form.option) {
        tracing::warn!(%err, "Ignoring option pick");
    }
    Redirect::to("/")
}

async fn reveal(State(state): State<AppState>, Path(index): Path<usize>) -> Redirect {
    if let Err(err) = state.session.lock().await.reveal(index) {
        tracing::warn!(%err, "Ignoring answer check");
    }
    Redirect::to("/")
}

async fn clear(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.clear();
    Redirect::to("/")
}
