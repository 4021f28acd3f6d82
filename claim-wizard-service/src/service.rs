use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use claim_wizard::{
    ClaimFlow, FileOutcome, PreviewStore, SubmissionOutcome, UploadCandidate, WizardError,
    WizardSession,
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{
    AcceptedFile, CatalogResponse, CreateSessionResponse, RejectedFile, SelectContractRequest,
    SelectOptionRequest, SelectTreatmentRequest, SessionSnapshot, StepResponse, SubmitResponse,
    TreatmentResponse, UploadRequest, UploadResponse,
};
use crate::store::InMemorySessionStore;

type ApiResult<T> = Result<Json<T>, ApiError>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "id": id
        })),
    )
}

/// Map a library error onto the HTTP surface. Upstream trouble is the
/// gateway's fault, everything else is the request's.
fn wizard_error(error: WizardError) -> ApiError {
    let status = match &error {
        WizardError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        WizardError::ReferenceLoad(_) | WizardError::ReferenceUnavailable => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        WizardError::RequirementsLoad { .. } | WizardError::Submission(_) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(json!({ "error": error.to_string() })))
}

#[derive(Clone)]
pub struct AppState {
    pub flow: ClaimFlow,
    pub store: Arc<InMemorySessionStore>,
    pub previews: Arc<PreviewStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/catalog", get(get_catalog))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/contract", post(select_contract))
        .route("/sessions/{id}/option", post(select_option))
        .route("/sessions/{id}/treatment", post(select_treatment))
        .route("/sessions/{id}/advance", post(advance_step))
        .route("/sessions/{id}/back", post(back_step))
        .route(
            "/sessions/{id}/documents/{doc_type_id}",
            post(upload_documents),
        )
        .route(
            "/sessions/{id}/documents/{doc_type_id}/{file_id}",
            delete(remove_document),
        )
        .route("/sessions/{id}/submit", post(submit_claim))
        .route("/sessions/{id}/previews/{preview_id}", get(get_preview))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Insurance Claim Wizard",
        "version": "1.0.0",
        "description": "Three-step claim intake: pick a contract, pick a treatment type, upload documents, submit for adjudication",
        "endpoints": {
            "GET /catalog": "Contracts and treatment types",
            "POST /sessions": "Open a new, independent wizard session",
            "GET /sessions/{id}": "Session snapshot",
            "POST /sessions/{id}/contract": "Select a contract",
            "POST /sessions/{id}/option": "Select a contract sub-option",
            "POST /sessions/{id}/treatment": "Select a treatment type",
            "POST /sessions/{id}/documents/{doc_type_id}": "Upload files into a document slot",
            "DELETE /sessions/{id}/documents/{doc_type_id}/{file_id}": "Remove one uploaded file",
            "POST /sessions/{id}/submit": "Submit the claim for adjudication",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Reference data for the selection step. Re-attempts the upstream load while
/// it has never succeeded, and reports the outage instead of spinning.
async fn get_catalog(State(state): State<AppState>) -> ApiResult<CatalogResponse> {
    state.flow.ensure_reference().await.map_err(|e| {
        error!("failed to load reference data: {}", e);
        wizard_error(e)
    })?;

    let catalog = state.flow.catalog();
    Ok(Json(CatalogResponse {
        contracts: catalog.contracts().map_err(wizard_error)?,
        treatment_types: catalog.treatment_types().map_err(wizard_error)?,
    }))
}

async fn create_session(State(state): State<AppState>) -> ApiResult<CreateSessionResponse> {
    let session = WizardSession::new(
        Arc::clone(state.flow.catalog()),
        Arc::clone(&state.previews),
    );
    let session_id = session.id().to_string();
    state.store.insert(session);

    info!(%session_id, open_sessions = state.store.len(), "session created");
    Ok(Json(CreateSessionResponse { session_id }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let session = shared.lock().await;
    Ok(Json(SessionSnapshot::from_session(&session)))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.remove(&session_id) {
        info!(%session_id, "session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found_error("Session not found", &session_id))
    }
}

async fn select_contract(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SelectContractRequest>,
) -> ApiResult<SessionSnapshot> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;
    session
        .select_contract(&request.contract_id)
        .map_err(wizard_error)?;
    Ok(Json(SessionSnapshot::from_session(&session)))
}

async fn select_option(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SelectOptionRequest>,
) -> ApiResult<SessionSnapshot> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;
    session
        .select_option(&request.option_id)
        .map_err(wizard_error)?;
    Ok(Json(SessionSnapshot::from_session(&session)))
}

/// Select a treatment type. The first selection of a given type fetches its
/// document requirements from the adjudication service; later selections are
/// served from the catalog cache.
async fn select_treatment(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SelectTreatmentRequest>,
) -> ApiResult<TreatmentResponse> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;
    let requirements = state
        .flow
        .select_treatment(&mut session, &request.treatment_id)
        .await
        .map_err(|e| {
            error!(%session_id, "treatment selection failed: {}", e);
            wizard_error(e)
        })?;
    Ok(Json(TreatmentResponse { requirements }))
}

async fn advance_step(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<StepResponse> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;
    let step = session.advance().map_err(wizard_error)?;
    Ok(Json(StepResponse {
        step,
        step_number: step.number(),
    }))
}

async fn back_step(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<StepResponse> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;
    let step = session.go_back().map_err(wizard_error)?;
    Ok(Json(StepResponse {
        step,
        step_number: step.number(),
    }))
}

/// Upload a batch of files into one document slot. Acceptance is per file:
/// a bad payload or a policy violation rejects that file alone.
async fn upload_documents(
    State(state): State<AppState>,
    Path((session_id, doc_type_id)): Path<(String, String)>,
    Json(request): Json<UploadRequest>,
) -> ApiResult<UploadResponse> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;

    let mut rejected = Vec::new();
    let mut candidates = Vec::new();
    for file in request.files {
        match decode_payload(&file.data) {
            Ok(bytes) => candidates.push(UploadCandidate {
                file_name: file.file_name,
                media_type: file.media_type,
                bytes,
            }),
            Err(reason) => rejected.push(RejectedFile {
                file_name: file.file_name,
                reason,
            }),
        }
    }

    let outcomes = session
        .add_files(&doc_type_id, candidates)
        .map_err(wizard_error)?;

    let mut accepted = Vec::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Accepted {
                id,
                file_name,
                preview_id,
            } => accepted.push(AcceptedFile {
                id,
                file_name,
                preview_id,
            }),
            FileOutcome::Rejected {
                file_name,
                rejection,
            } => rejected.push(RejectedFile {
                file_name,
                reason: rejection.to_string(),
            }),
        }
    }

    info!(
        %session_id,
        %doc_type_id,
        accepted = accepted.len(),
        rejected = rejected.len(),
        "processed upload batch"
    );
    Ok(Json(UploadResponse { accepted, rejected }))
}

async fn remove_document(
    State(state): State<AppState>,
    Path((session_id, doc_type_id, file_id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let file_id = Uuid::parse_str(&file_id)
        .map_err(|_| bad_request_error("file id must be a UUID"))?;

    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;
    session
        .remove_file(&doc_type_id, file_id)
        .map_err(wizard_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit the claim. The session stays locked for the whole round trip, so
/// this session is busy until the verdict lands; any other session remains
/// fully usable in parallel.
async fn submit_claim(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SubmitResponse> {
    let shared = state
        .store
        .get(&session_id)
        .ok_or_else(|| not_found_error("Session not found", &session_id))?;
    let mut session = shared.lock().await;

    match state.flow.submit(&mut session).await {
        Ok(SubmissionOutcome::Completed { markdown }) => {
            info!(%session_id, "claim adjudicated");
            Ok(Json(SubmitResponse::Completed { markdown }))
        }
        Ok(SubmissionOutcome::InvalidDocuments { labels, message }) => {
            Ok(Json(SubmitResponse::InvalidDocuments {
                invalid_labels: labels,
                message,
            }))
        }
        Err(e) => {
            error!(%session_id, "claim submission failed: {}", e);
            Err(wizard_error(e))
        }
    }
}

async fn get_preview(
    State(state): State<AppState>,
    Path((session_id, preview_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let preview_id = Uuid::parse_str(&preview_id)
        .map_err(|_| bad_request_error("preview id must be a UUID"))?;
    if state.store.get(&session_id).is_none() {
        return Err(not_found_error("Session not found", &session_id));
    }
    let entry = state
        .previews
        .get(&preview_id)
        .ok_or_else(|| not_found_error("Preview not found", &preview_id.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, entry.media_type.as_mime())],
        entry.bytes.as_ref().clone(),
    ))
}

/// Accept both a bare base64 string and a full `data:` URL.
fn decode_payload(data: &str) -> Result<Vec<u8>, String> {
    let encoded = match data.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => data,
    };
    STANDARD
        .decode(encoded.trim())
        .map_err(|_| "payload is not valid base64".to_string())
}
