use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, options, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};

use common::ServerConfig;

use crate::analysis::{AnalysisRecord, Analyzer};
use crate::chat::{Analytics, ChatTurn, ConversationDispatcher};
use crate::error::{AnalysisError, ErrorBody};
use crate::llm::ChatMessage;

pub const WELCOME_MESSAGE: &str = "Welcome to the AI News Summarizer API!";

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub analyzer: Arc<Analyzer>,
    pub dispatcher: Arc<ConversationDispatcher>,
    /// Model name reported by `/api/v1/status`
    pub chat_model: Option<String>,
}

impl AppState {
    pub fn new(
        analyzer: Arc<Analyzer>,
        dispatcher: Arc<ConversationDispatcher>,
        chat_model: Option<String>,
    ) -> Self {
        Self {
            started_at: Utc::now(),
            analyzer,
            dispatcher,
            chat_model,
        }
    }
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    classifier_mode: &'static str,
    chat_model: Option<String>,
}

#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
}

#[derive(Deserialize)]
struct SummarizeRequest {
    url: Option<String>,
}

#[derive(Deserialize)]
struct ChatBody {
    #[serde(default)]
    history: Vec<ChatMessage>,
    message: Option<String>,
    analytics: Option<Analytics>,
}

impl<'r> Responder<'r, 'static> for AnalysisError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        Response::build_from(Json(self.body()).respond_to(req)?)
            .status(status)
            .ok()
    }
}

#[get("/")]
async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// Status endpoint returning simple JSON with uptime and model info.
#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    let classifier_mode = if state.analyzer.models().fake_news().is_ensemble() {
        "ensemble"
    } else {
        "single"
    };

    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        classifier_mode,
        chat_model: state.chat_model.clone(),
    })
}

/// One-shot analysis of a single article URL.
#[post("/summarize", data = "<body>")]
async fn summarize(
    state: &State<AppState>,
    body: Json<SummarizeRequest>,
) -> Result<Json<AnalysisRecord>, AnalysisError> {
    let url = body
        .into_inner()
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AnalysisError::Validation("url is required".to_string()))?;

    tracing::info!(%url, "summarize request");
    state.analyzer.analyze(&url).await.map(Json)
}

#[post("/chat", data = "<body>")]
async fn chat(state: &State<AppState>, body: Json<ChatBody>) -> Result<Json<ChatTurn>, AnalysisError> {
    let ChatBody {
        history,
        message,
        analytics,
    } = body.into_inner();
    tracing::debug!(turns = history.len(), has_message = message.is_some(), "chat request");
    state
        .dispatcher
        .dispatch(history, message, analytics)
        .await
        .map(Json)
}

#[options("/<_..>")]
async fn preflight() -> Status {
    Status::NoContent
}

/// Malformed bodies, unknown routes and panics all answer with the JSON error shape.
#[catch(default)]
fn json_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: status.reason().unwrap_or("request failed").to_string(),
        }),
    )
}

/// Adds CORS headers for the configured origins.
pub struct Cors {
    origins: Vec<String>,
}

impl Cors {
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    fn allowed_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.origins.iter().any(|o| o == "*") {
            return Some("*".to_string());
        }
        let origin = origin?;
        self.origins
            .iter()
            .find(|o| o.as_str() == origin)
            .cloned()
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let Some(origin) = self.allowed_origin(req.headers().get_one("Origin")) else {
            return;
        };
        res.set_header(Header::new("Access-Control-Allow-Origin", origin));
        res.set_header(Header::new("Access-Control-Allow-Methods", "GET, POST, OPTIONS"));
        res.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
    }
}

/// Build the Rocket instance without launching it (tests use this with a local client).
pub fn build_rocket(state: AppState, server: &ServerConfig) -> Rocket<Build> {
    let fig = rocket::Config::figment()
        .merge(("address", server.bind.clone()))
        .merge(("port", server.port));

    rocket::custom(fig)
        .manage(state)
        .attach(Cors::new(server.cors_origins.clone()))
        .mount("/", routes![index, health, status, summarize, chat, preflight])
        .register("/", catchers![json_catcher])
}

pub async fn launch_rocket(state: AppState, server: &ServerConfig) -> Result<()> {
    tracing::info!("Starting Rocket HTTP server on {}:{}", server.bind, server.port);
    build_rocket(state, server)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
