use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::http::{HttpRequest, HttpResponse};
use super::sessions::{session_cookie, SessionRegistry, SESSION_HEADER};
use crate::core::conversation::ReplyStatus;
use crate::utils::text::preview;

const INDEX_HTML: &str = include_str!("../../static/index.html");

const DEFAULT_PERSONALITY: &str = "default";
const MESSAGE_REQUIRED: &str = "Message is required";
const NO_PROVIDERS: &str =
    "No AI providers available. Set ANTHROPIC_API_KEY or OPENAI_API_KEY and restart the server.";
const EMPTY_REPLY: &str = "No response from the AI. Please check your API keys and try again.";

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: Option<String>,
    personality: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse<'a> {
    response: &'a str,
}

#[derive(Debug, Serialize)]
struct Health {
    ok: bool,
    message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Index,
    Health,
    Chat,
}

fn route(path: &str) -> Option<Route> {
    match path {
        "/" | "/index.html" => Some(Route::Index),
        "/api/health" | "/api/health/" => Some(Route::Health),
        "/api/chat" | "/api/chat/" => Some(Route::Chat),
        _ => None,
    }
}

pub async fn handle(registry: &SessionRegistry, request: HttpRequest) -> HttpResponse {
    let Some(target) = route(&request.path) else {
        return HttpResponse::error(404, "Not found");
    };

    match (target, request.method.as_str()) {
        (Route::Index, "GET") => HttpResponse::html(INDEX_HTML),
        (Route::Health, "GET") => HttpResponse::json(
            200,
            &Health {
                ok: true,
                message: "Chatbot server is running",
            },
        ),
        (Route::Chat, "OPTIONS") => HttpResponse::no_content(),
        (Route::Chat, "POST") => chat(registry, &request).await,
        _ => HttpResponse::error(405, "Method not allowed"),
    }
}

async fn chat(registry: &SessionRegistry, request: &HttpRequest) -> HttpResponse {
    let Ok(body) = serde_json::from_slice::<ChatRequest>(&request.body) else {
        return HttpResponse::error(400, MESSAGE_REQUIRED);
    };
    let message = body.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return HttpResponse::error(400, MESSAGE_REQUIRED);
    }

    if registry.providers().is_empty() {
        return HttpResponse::error(503, NO_PROVIDERS);
    }

    let lease = match registry.lease(request) {
        Ok(lease) => lease,
        Err(err) => {
            warn!(error = %err, "could not generate a session id");
            return HttpResponse::error(500, "Could not start a session");
        }
    };

    let personality = body
        .personality
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_PERSONALITY);

    let reply = {
        let mut session = lease.session.lock().await;
        session.apply_personality_keep_history(personality);
        session.get_response(message).await
    };
    info!(
        session = %lease.id,
        message = %preview(message, 40),
        provider = ?reply.provider,
        "answered chat request"
    );

    let response = match reply.status {
        ReplyStatus::Answered => HttpResponse::json(
            200,
            &ChatResponse {
                response: &reply.text,
            },
        ),
        ReplyStatus::Empty => HttpResponse::json(
            200,
            &ChatResponse {
                response: EMPTY_REPLY,
            },
        ),
        ReplyStatus::ProviderFailed(kind) => {
            warn!(session = %lease.id, ?kind, "provider call failed");
            HttpResponse::error(502, &reply.text)
        }
        ReplyStatus::NoProvider => HttpResponse::error(503, NO_PROVIDERS),
    };

    let response = response.with_header(SESSION_HEADER, lease.id.clone());
    if lease.issued {
        response.with_header("Set-Cookie", session_cookie(&lease.id))
    } else {
        response
    }
}
