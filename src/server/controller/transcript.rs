use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use dioxus_logger::tracing;
use reqwest::Method;
use serde_json::Value;
use url::form_urlencoded;

use crate::server::{
    middleware::auth::AuthGuard,
    model::session::Session,
    service::backend::PROBE_TIMEOUT,
    state::AppState,
    util::json::is_truthy,
};

/// Tag for grouping transcript endpoints in OpenAPI documentation
pub static TRANSCRIPT_TAG: &str = "transcript";

/// Ticket transcript of a bot, for its sellers.
///
/// Anonymous callers are sent through the Discord login and back. Any failure after
/// that (unknown bot, user not a seller of the bot, transcript missing, bot down)
/// drops the caller's session and redirects to the configured denial page.
#[utoipa::path(
    get,
    path = "/transcript/{bot}/{id}",
    tag = TRANSCRIPT_TAG,
    params(
        ("bot" = String, Path, description = "Bot name"),
        ("id" = String, Path, description = "Transcript identifier")
    ),
    responses(
        (status = 200, description = "Transcript HTML", content_type = "text/html"),
        (status = 307, description = "Login required, or access denied")
    ),
)]
pub async fn get_transcript(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((bot, id)): Path<(String, String)>,
) -> Response {
    let Some(session) = AuthGuard::new(&state, &headers).session().await else {
        let back = format!("/transcript/{}/{}", bot, id);
        let login = format!(
            "/auth/discord/login?redirect_url={}",
            form_urlencoded::byte_serialize(back.as_bytes()).collect::<String>()
        );
        return Redirect::temporary(&login).into_response();
    };

    match fetch_transcript(&state, &session, &bot, &id).await {
        Some(html) => {
            tracing::info!(
                "Transcript {} accessed by seller {} in bot {}",
                id,
                session.subject_id,
                bot
            );
            Html(html).into_response()
        }
        None => {
            state.sessions.delete(&session.session_id).await;
            Redirect::temporary(&state.config.transcript_denied_url).into_response()
        }
    }
}

async fn fetch_transcript(
    state: &AppState,
    session: &Session,
    bot: &str,
    id: &str,
) -> Option<String> {
    let port = match state.ports.get_port(bot).await {
        Ok(Some(port)) => port,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!("Transcript access error: {}", e);
            return None;
        }
    };

    let seller_check = format!(
        "/seller?user_id={}",
        form_urlencoded::byte_serialize(session.subject_id.as_bytes()).collect::<String>()
    );
    let is_seller = state
        .backend
        .request(port, &seller_check, Method::GET, PROBE_TIMEOUT, None)
        .await
        .ok()
        .is_some_and(|data| data.get("response").is_some_and(is_truthy));

    if !is_seller {
        tracing::info!(
            "Access denied: Discord user {} is not a seller in bot {}",
            session.subject_id,
            bot
        );
        return None;
    }

    let transcript = format!(
        "/transcript/{}.html",
        form_urlencoded::byte_serialize(id.as_bytes()).collect::<String>()
    );
    let response = state.backend.get(port, &transcript).await.ok()?;

    response
        .get("response")
        .and_then(Value::as_str)
        .filter(|html| !html.is_empty())
        .map(str::to_string)
}
