use std::collections::HashMap;

use claim_wizard::{
    Contract, DocumentRequirement, MediaType, TreatmentType, WizardSession, WizardStep,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectContractRequest {
    pub contract_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectOptionRequest {
    pub option_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectTreatmentRequest {
    pub treatment_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
}

/// One candidate file as the frontend sends it: declared MIME type plus the
/// payload as base64 (a `data:` URL prefix is tolerated and stripped).
#[derive(Debug, Deserialize)]
pub struct UploadFile {
    pub file_name: String,
    pub media_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub accepted: Vec<AcceptedFile>,
    pub rejected: Vec<RejectedFile>,
}

#[derive(Debug, Serialize)]
pub struct AcceptedFile {
    pub id: Uuid,
    pub file_name: String,
    pub preview_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub contracts: Vec<Contract>,
    pub treatment_types: Vec<TreatmentType>,
}

#[derive(Debug, Serialize)]
pub struct TreatmentResponse {
    pub requirements: Vec<DocumentRequirement>,
}

#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub step: WizardStep,
    pub step_number: u8,
}

#[derive(Debug, Serialize)]
pub struct FileSummary {
    pub id: Uuid,
    pub file_name: String,
    pub media_type: MediaType,
    pub size: u64,
    pub preview_id: Option<Uuid>,
}

/// Everything a frontend needs to render the wizard for one session.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub step: WizardStep,
    pub step_number: u8,
    pub contract_id: Option<String>,
    pub option_id: Option<String>,
    pub treatment_id: Option<String>,
    pub requirements: Vec<DocumentRequirement>,
    pub documents: HashMap<String, Vec<FileSummary>>,
    pub invalid_labels: Vec<String>,
    pub can_enter_treatment: bool,
    pub can_enter_documents: bool,
    pub ready_to_submit: bool,
    pub total_files: usize,
}

impl SessionSnapshot {
    pub fn from_session(session: &WizardSession) -> Self {
        let documents = session
            .documents()
            .iter()
            .map(|(doc_type_id, files)| {
                let summaries = files
                    .iter()
                    .map(|f| FileSummary {
                        id: f.id,
                        file_name: f.file_name.clone(),
                        media_type: f.media_type,
                        size: f.bytes.len() as u64,
                        preview_id: f.preview.as_ref().map(|p| p.id()),
                    })
                    .collect();
                (doc_type_id.clone(), summaries)
            })
            .collect();

        let mut invalid_labels: Vec<String> =
            session.invalid_labels().iter().cloned().collect();
        invalid_labels.sort();

        Self {
            session_id: session.id().to_string(),
            step: session.step(),
            step_number: session.step().number(),
            contract_id: session.contract_id().map(str::to_string),
            option_id: session.option_id().map(str::to_string),
            treatment_id: session.treatment_id().map(str::to_string),
            requirements: session
                .current_requirements()
                .map(|r| r.as_ref().clone())
                .unwrap_or_default(),
            documents,
            invalid_labels,
            can_enter_treatment: session.can_enter_treatment(),
            can_enter_documents: session.can_enter_documents(),
            ready_to_submit: session.ready_to_submit(),
            total_files: session.total_files(),
        }
    }
}

/// Terminal result shown in the overlay, mirroring the adjudication outcome.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResponse {
    Completed {
        markdown: String,
    },
    InvalidDocuments {
        invalid_labels: Vec<String>,
        message: String,
    },
}
