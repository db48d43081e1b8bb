//! HTTP routes: the HTML screens and the JSON API behind them.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Form, Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use maud::Markup;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use super::pages;
use crate::celebration::Celebration;
use crate::composer::{Clipboard, ComposerMode, ComposerState, ComposerView, ReportedClipboard};
use crate::config::ServerConfig;
use crate::error::{ComposeError, Error, SessionError};
use crate::invitation::Invitation;
use crate::link::{
    LinkParams, LinkPayload, LinkShape, LinkSource, build_link, share_message, token,
};
use crate::presentation::{
    DeclineOutcome, HoverQuery, Offset, PointerCapability, PresentationPhase, PresentationState,
    PresentationView, Relocation, Viewport, greeting_for,
};
use crate::reply::{DeviceClass, reply_uri};
use crate::sessions::{SessionStore, parse_session_id};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub composers: Arc<SessionStore<ComposerState>>,
    pub presentations: Arc<SessionStore<PresentationState>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let idle = config.session_idle_timeout;
        Self {
            config: Arc::new(config),
            composers: SessionStore::new("composer", idle),
            presentations: SessionStore::new("presentation", idle),
        }
    }

    /// Origin for generated links: configured, else taken from `Host`.
    fn origin(&self, headers: &HeaderMap) -> String {
        if let Some(origin) = &self.config.public_origin {
            return origin.clone();
        }
        headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(|host| format!("http://{host}"))
            .unwrap_or_default()
    }
}

fn device_class(headers: &HeaderMap) -> DeviceClass {
    headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(DeviceClass::from_user_agent)
        .unwrap_or_default()
}

/// Build the router with HTML and JSON routes.
pub fn app_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/links", post(create_link))
        .route("/api/invitations", get(read_invitation))
        .route("/api/composer", post(open_composer))
        .route("/api/composer/{id}/name", post(set_composer_name))
        .route("/api/composer/{id}/contact", post(set_composer_contact))
        .route("/api/composer/{id}/next", post(advance_composer))
        .route("/api/composer/{id}/copy", post(report_copy))
        .route("/api/composer/{id}/share", post(share_composer_link))
        .route("/api/presentations", post(open_presentation))
        .route("/api/presentations/{id}/decline", post(decline_presentation))
        .route("/api/presentations/{id}/accept", post(accept_presentation))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    Router::new()
        .route("/health", get(health))
        .route("/", get(composer_page))
        .route("/compose", post(compose_form))
        .route("/share", post(share_form))
        .route("/valentine", get(valentine_page))
        .route("/v/{token}", get(valentine_token_page))
        .route("/valentine/{id}/decline", post(decline_form))
        .route("/valentine/{id}/accept", post(accept_form))
        .merge(api)
        .with_state(state)
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Error wrapper that renders as a JSON `{"error": ...}` body.
pub struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Session(SessionError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Error::Session(SessionError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            Error::Compose(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Transition(_) => StatusCode::CONFLICT,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        debug!(status = %status, error = %self.0, "API request refused");
        (status, Json(serde_json::json!({"error": self.0.to_string()}))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

// ── Health ──────────────────────────────────────────────────────────────

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "valentine-link",
        "sessions": {
            "composer": state.composers.len().await,
            "presentation": state.presentations.len().await,
        }
    }))
}

// ── Links ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateLinkRequest {
    name: String,
    #[serde(default)]
    sender: String,
    #[serde(default)]
    shape: Option<LinkShape>,
}

#[derive(Serialize)]
struct CreateLinkResponse {
    token: String,
    link: String,
    invitation: Invitation,
}

async fn create_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateLinkRequest>,
) -> ApiResult<CreateLinkResponse> {
    let invitation = Invitation::new(&body.name, &body.sender);
    if !invitation.has_name() {
        return Err(ComposeError::MissingName.into());
    }
    let shape = body.shape.unwrap_or(state.config.link_shape);
    let link = build_link(&state.origin(&headers), &invitation, shape);
    info!(shape = %shape, has_contact = invitation.sender_contact().is_some(), "Link generated");
    Ok(Json(CreateLinkResponse {
        token: token::encode(&invitation),
        link,
        invitation,
    }))
}

#[derive(Serialize)]
struct InvitationResponse {
    status: &'static str,
    source: Option<LinkSource>,
    invitation: Invitation,
    greeting: String,
}

/// Links pass through messengers and trackers that append or repeat
/// parameters, so the query is read leniently: first occurrence wins and
/// unknown keys are ignored.
fn link_params(query: Option<String>) -> LinkParams {
    LinkParams::from_query(query.as_deref().unwrap_or_default())
}

async fn read_invitation(RawQuery(query): RawQuery) -> Json<InvitationResponse> {
    let payload = LinkPayload::from_params(&link_params(query));
    let invitation = payload.invitation();
    Json(InvitationResponse {
        status: payload.status(),
        source: payload.source(),
        greeting: greeting_for(&invitation),
        invitation,
    })
}

// ── Composer API ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct OpenComposerRequest {
    #[serde(default)]
    mode: Option<ComposerMode>,
}

#[derive(Serialize)]
struct ComposerResponse {
    id: uuid::Uuid,
    view: ComposerView,
}

#[derive(Deserialize)]
struct FieldRequest {
    value: String,
}

#[derive(Deserialize)]
struct CopyRequest {
    ok: bool,
}

#[derive(Deserialize)]
struct ShareRequest {
    recipient: String,
}

#[derive(Serialize)]
struct ShareResponse {
    /// `None` when the recipient number has no digits.
    reply_uri: Option<String>,
}

async fn open_composer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<OpenComposerRequest>,
) -> Json<ComposerResponse> {
    let composer = ComposerState::new(body.mode.unwrap_or_default(), state.config.link_shape);
    let view = composer.view(&state.origin(&headers), Instant::now());
    let id = state.composers.insert(composer).await;
    info!(session_id = %id, mode = ?view.mode, "Composer opened");
    Json(ComposerResponse { id, view })
}

async fn set_composer_name(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<FieldRequest>,
) -> ApiResult<ComposerResponse> {
    let id = parse_session_id(&id)?;
    let origin = state.origin(&headers);
    let view = state
        .composers
        .update(id, |c| {
            c.set_name(&body.value);
            c.view(&origin, Instant::now())
        })
        .await?;
    Ok(Json(ComposerResponse { id, view }))
}

async fn set_composer_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<FieldRequest>,
) -> ApiResult<ComposerResponse> {
    let id = parse_session_id(&id)?;
    let origin = state.origin(&headers);
    let view = state
        .composers
        .update(id, |c| {
            c.set_contact(&body.value);
            c.view(&origin, Instant::now())
        })
        .await?;
    Ok(Json(ComposerResponse { id, view }))
}

async fn advance_composer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<ComposerResponse> {
    let id = parse_session_id(&id)?;
    let origin = state.origin(&headers);
    let view = state
        .composers
        .update(id, |c| {
            c.advance()?;
            Ok::<_, ComposeError>(c.view(&origin, Instant::now()))
        })
        .await??;
    Ok(Json(ComposerResponse { id, view }))
}

/// The browser performs the clipboard write and reports the outcome here.
async fn report_copy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<CopyRequest>,
) -> ApiResult<ComposerResponse> {
    let id = parse_session_id(&id)?;
    let origin = state.origin(&headers);
    let link = state
        .composers
        .update(id, |c| c.require_link(&origin))
        .await??;

    let outcome = ReportedClipboard::new(body.ok).write_text(&link).await;
    let now = Instant::now();
    let view = state
        .composers
        .update(id, |c| {
            c.record_copy(&outcome, now);
            c.view(&origin, now)
        })
        .await?;
    Ok(Json(ComposerResponse { id, view }))
}

async fn share_composer_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ShareRequest>,
) -> ApiResult<ShareResponse> {
    let id = parse_session_id(&id)?;
    let origin = state.origin(&headers);
    let device = device_class(&headers);
    let reply_uri = state
        .composers
        .update(id, |c| {
            c.open_share()?;
            c.set_recipient(&body.recipient);
            Ok::<_, ComposeError>(c.share_to_recipient(&origin, device))
        })
        .await??;
    Ok(Json(ShareResponse { reply_uri }))
}

// ── Presentation API ────────────────────────────────────────────────────

#[derive(Serialize)]
struct PresentationResponse {
    id: uuid::Uuid,
    status: &'static str,
    view: PresentationView,
}

#[derive(Deserialize, Default)]
struct DeclineRequest {
    /// Result of the client's `(hover: hover)` media query.
    #[serde(default)]
    hover: Option<bool>,
    #[serde(default)]
    viewport: Option<Viewport>,
}

#[derive(Serialize)]
struct DeclineResponse {
    counted: bool,
    moves: Vec<Relocation>,
    view: PresentationView,
}

#[derive(Serialize)]
struct AcceptResponse {
    view: PresentationView,
    celebration: Celebration,
}

async fn open_presentation(
    State(state): State<AppState>,
    Json(params): Json<LinkParams>,
) -> Json<PresentationResponse> {
    let payload = LinkPayload::from_params(&params);
    let presentation = PresentationState::new(payload.invitation());
    let view = presentation.view();
    let id = state.presentations.insert(presentation).await;
    info!(session_id = %id, status = payload.status(), "Presentation opened");
    Json(PresentationResponse {
        id,
        status: payload.status(),
        view,
    })
}

async fn decline_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<DeclineRequest>,
) -> ApiResult<DeclineResponse> {
    let id = parse_session_id(&id)?;
    let hover = body
        .hover
        .unwrap_or_else(|| device_class(&headers).prefers_hover());
    let viewport = body.viewport.unwrap_or_default();
    let now = Instant::now();

    let (outcome, view) = state
        .presentations
        .update(id, |p| {
            let outcome = p.decline(&mut rand::thread_rng(), viewport, &HoverQuery(hover), now)?;
            Ok::<_, Error>((outcome, p.view()))
        })
        .await??;

    let (counted, moves) = match outcome {
        DeclineOutcome::Counted(moves) => (true, moves),
        DeclineOutcome::Ignored => (false, Vec::new()),
    };
    Ok(Json(DeclineResponse {
        counted,
        moves,
        view,
    }))
}

async fn accept_presentation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<AcceptResponse> {
    let id = parse_session_id(&id)?;
    let origin = state.origin(&headers);
    let device = device_class(&headers);
    let (view, celebration) = state
        .presentations
        .update(id, |p| {
            p.accept();
            let celebration =
                Celebration::new(p.invitation(), &mut rand::thread_rng(), Some(&origin), device);
            (p.view(), celebration)
        })
        .await?;
    Ok(Json(AcceptResponse { view, celebration }))
}

// ── HTML: composer ──────────────────────────────────────────────────────

async fn composer_page() -> Markup {
    pages::composer("", "", None)
}

#[derive(Deserialize)]
struct ComposeForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    contact: String,
}

async fn compose_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ComposeForm>,
) -> Response {
    let mut composer = ComposerState::new(ComposerMode::SingleStep, state.config.link_shape);
    composer.set_name(&form.name);
    composer.set_contact(&form.contact);

    let link = composer
        .advance()
        .and_then(|_| composer.require_link(&state.origin(&headers)));
    match link {
        Ok(link) => {
            info!(has_contact = composer.invitation().sender_contact().is_some(), "Link generated");
            pages::link_ready(&link).into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            pages::composer(&form.name, &form.contact, Some(&e.to_string())),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct ShareForm {
    link: String,
    #[serde(default)]
    recipient: String,
}

async fn share_form(headers: HeaderMap, Form(form): Form<ShareForm>) -> Redirect {
    match reply_uri(&form.recipient, &share_message(&form.link), device_class(&headers)) {
        Some(uri) => Redirect::to(&uri),
        None => {
            debug!("Share requested without a recipient number");
            Redirect::to("/")
        }
    }
}

// ── HTML: presentation ──────────────────────────────────────────────────

async fn open_question(state: &AppState, payload: LinkPayload) -> Markup {
    let presentation = PresentationState::new(payload.invitation());
    let view = presentation.view();
    let id = state.presentations.insert(presentation).await;
    info!(session_id = %id, status = payload.status(), source = ?payload.source(), "Presentation opened");
    pages::question(id, &view, Offset::default())
}

async fn valentine_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Markup {
    open_question(&state, LinkPayload::from_params(&link_params(query))).await
}

async fn valentine_token_page(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Markup {
    open_question(&state, LinkPayload::from_path_token(&token)).await
}

fn expired_page() -> Response {
    (StatusCode::NOT_FOUND, pages::not_found()).into_response()
}

fn celebration_page(state: &AppState, headers: &HeaderMap, invitation: &Invitation) -> Response {
    let origin = state.origin(headers);
    let celebration = Celebration::new(
        invitation,
        &mut rand::thread_rng(),
        Some(&origin),
        device_class(headers),
    );
    pages::celebration(&celebration).into_response()
}

async fn decline_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Ok(id) = parse_session_id(&id) else {
        return expired_page();
    };
    // Plain form posts can't report hover or viewport; infer from the UA.
    let device = device_class(&headers);
    let now = Instant::now();

    let result = state
        .presentations
        .update(id, |p| {
            let offset = match p.decline(&mut rand::thread_rng(), Viewport::default(), &device, now) {
                Ok(DeclineOutcome::Counted(moves)) => {
                    moves.last().map(|m| m.offset).unwrap_or_default()
                }
                Ok(DeclineOutcome::Ignored) | Err(_) => Offset::default(),
            };
            (p.phase(), p.view(), p.invitation().clone(), offset)
        })
        .await;

    match result {
        Ok((PresentationPhase::Accepted, _, invitation, _)) => {
            celebration_page(&state, &headers, &invitation)
        }
        Ok((PresentationPhase::Asking, view, _, offset)) => {
            pages::question(id, &view, offset).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Decline on unknown session");
            expired_page()
        }
    }
}

async fn accept_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Ok(id) = parse_session_id(&id) else {
        return expired_page();
    };
    match state
        .presentations
        .update(id, |p| {
            p.accept();
            p.invitation().clone()
        })
        .await
    {
        Ok(invitation) => celebration_page(&state, &headers, &invitation),
        Err(e) => {
            warn!(error = %e, "Accept on unknown session");
            expired_page()
        }
    }
}
