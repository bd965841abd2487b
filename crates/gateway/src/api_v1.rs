//! HTTP API v1: the chat widget over JSON.
//!
//! Endpoints:
//!
//! - `POST   /v1/session`           Start a new session
//! - `GET    /v1/conversation`      Current conversation as shown
//! - `POST   /v1/conversations`     Start a new conversation
//! - `POST   /v1/chat`              Ask a question, get the answer
//! - `POST   /v1/feedback`          Rate an answer (once)
//! - `DELETE /v1/history`           Forget this session's conversations
//! - `GET    /v1/suggestions`       Starter questions
//! - `GET    /v1/patterns`          Most asked questions
//! - `GET    /v1/knowledge/search`  Scored knowledge matches for `q`
//!
//! The session is picked by the `X-Session-Id` request header and echoed in
//! the response header of the same name.

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use dave_assistant::Assistant;
use dave_core::feedback::LearningPattern;
use dave_core::message::{Message, SessionId};

use crate::SharedState;
use crate::sessions::SessionHandle;

/// Header carrying the session id both ways.
pub const SESSION_HEADER: &str = "x-session-id";

const DEFAULT_PATTERN_LIMIT: usize = 10;
const MAX_PATTERN_LIMIT: usize = 200;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/session", post(open_session_handler))
        .route("/conversation", get(current_conversation_handler))
        .route("/conversations", post(new_conversation_handler))
        .route("/chat", post(chat_handler))
        .route("/feedback", post(feedback_handler))
        .route("/history", delete(clear_history_handler))
        .route("/suggestions", get(suggestions_handler))
        .route("/patterns", get(patterns_handler))
        .route("/knowledge/search", get(knowledge_search_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct ConversationView {
    session_id: String,
    conversation_id: String,
    messages: Vec<Message>,
    suggestions: Vec<String>,
}

impl ConversationView {
    fn of(assistant: &Assistant) -> Self {
        Self {
            session_id: assistant.session_id().to_string(),
            conversation_id: assistant.conversation_id().to_string(),
            messages: assistant.messages().to_vec(),
            suggestions: assistant.suggestions().to_vec(),
        }
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

#[derive(Serialize, Deserialize)]
struct ChatResponse {
    session_id: String,
    conversation_id: String,
    user: Message,
    assistant: Message,
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct FeedbackRequest {
    message_id: String,
    was_helpful: bool,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct FeedbackResponse {
    recorded: bool,
}

#[derive(Serialize, Deserialize)]
struct ClearHistoryResponse {
    removed: usize,
    conversation_id: String,
}

#[derive(Serialize, Deserialize)]
struct SuggestionsResponse {
    suggestions: Vec<String>,
}

#[derive(Deserialize)]
struct PatternsQuery {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize, Deserialize)]
struct PatternsResponse {
    patterns: Vec<LearningPattern>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Serialize, Deserialize)]
struct SearchResponse {
    query: String,
    results: Vec<SearchHitDto>,
}

#[derive(Serialize, Deserialize)]
struct SearchHitDto {
    id: String,
    category: String,
    question: String,
    score: u32,
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn internal(e: dave_core::Error) -> ApiError {
    error!(error = %e, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// Attach the session header to a JSON body.
fn with_session<T: Serialize>(session_id: &SessionId, status: StatusCode, body: T) -> Response {
    (
        status,
        [(SESSION_HEADER, session_id.as_str().to_string())],
        Json(body),
    )
        .into_response()
}

async fn session_from(
    state: &SharedState,
    headers: &HeaderMap,
) -> Result<(SessionId, SessionHandle), ApiError> {
    let requested = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
    state.sessions.resolve(requested).await.map_err(internal)
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn open_session_handler(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let (session_id, handle) = state.sessions.open_new().await.map_err(internal)?;
    let assistant = handle.lock().await;
    info!(session = %session_id, "v1/session opened");
    Ok(with_session(
        &session_id,
        StatusCode::CREATED,
        ConversationView::of(&assistant),
    ))
}

async fn current_conversation_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (session_id, handle) = session_from(&state, &headers).await?;
    let assistant = handle.lock().await;
    Ok(with_session(
        &session_id,
        StatusCode::OK,
        ConversationView::of(&assistant),
    ))
}

async fn new_conversation_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (session_id, handle) = session_from(&state, &headers).await?;
    let mut assistant = handle.lock().await;
    assistant.new_conversation().await.map_err(internal)?;
    Ok(with_session(
        &session_id,
        StatusCode::CREATED,
        ConversationView::of(&assistant),
    ))
}

async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    if payload.message.trim().is_empty() {
        warn!("v1/chat rejected empty message");
        return Err(bad_request("message must not be empty"));
    }

    let (session_id, handle) = session_from(&state, &headers).await?;
    let mut assistant = handle.lock().await;
    info!(session = %session_id, message_len = payload.message.len(), "v1/chat request");

    let reply = assistant
        .send(&payload.message)
        .await
        .map_err(internal)?
        .ok_or_else(|| bad_request("message must not be empty"))?;

    Ok(with_session(
        &session_id,
        StatusCode::OK,
        ChatResponse {
            session_id: session_id.to_string(),
            conversation_id: assistant.conversation_id().to_string(),
            user: reply.user,
            assistant: reply.assistant,
            suggestions: assistant.suggestions().to_vec(),
        },
    ))
}

async fn feedback_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Response, ApiError> {
    let (session_id, handle) = session_from(&state, &headers).await?;
    let mut assistant = handle.lock().await;
    let recorded = assistant
        .give_feedback(&payload.message_id, payload.was_helpful, payload.comment)
        .await
        .map_err(internal)?;
    if !recorded {
        warn!(message = %payload.message_id, "v1/feedback ignored");
    }
    Ok(with_session(
        &session_id,
        StatusCode::OK,
        FeedbackResponse { recorded },
    ))
}

async fn clear_history_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (session_id, handle) = session_from(&state, &headers).await?;
    let mut assistant = handle.lock().await;
    let removed = assistant.clear_history().await.map_err(internal)?;
    Ok(with_session(
        &session_id,
        StatusCode::OK,
        ClearHistoryResponse {
            removed,
            conversation_id: assistant.conversation_id().to_string(),
        },
    ))
}

async fn suggestions_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (session_id, handle) = session_from(&state, &headers).await?;
    let assistant = handle.lock().await;
    Ok(with_session(
        &session_id,
        StatusCode::OK,
        SuggestionsResponse {
            suggestions: assistant.suggestions().to_vec(),
        },
    ))
}

/// Patterns are store-wide, so no session is opened for them.
async fn patterns_handler(
    State(state): State<SharedState>,
    Query(query): Query<PatternsQuery>,
) -> Result<Json<PatternsResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PATTERN_LIMIT)
        .min(MAX_PATTERN_LIMIT);
    let reader = state.sessions.service(SessionId::new());
    let patterns = reader.top_patterns(limit).await.map_err(internal)?;
    Ok(Json(PatternsResponse { patterns }))
}

async fn knowledge_search_handler(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let results = state
        .sessions
        .knowledge()
        .search(&query.q)
        .into_iter()
        .map(|hit| SearchHitDto {
            id: hit.entry.id.clone(),
            category: hit.entry.category.clone(),
            question: hit.entry.question.clone(),
            score: hit.score,
        })
        .collect();

    Json(SearchResponse {
        query: query.q,
        results,
    })
}
