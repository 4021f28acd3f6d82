use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{
    Contract, DocumentRequirement, PackageOption, ReferenceData, TreatmentType,
    fallback_treatment_types,
};
use crate::error::{Result, WizardError};
use crate::validate::MediaType;

/// Default adjudication endpoint of the existing deployment.
pub const DEFAULT_BASE_URL: &str = "https://gamic-quiescent-juliane.ngrok-free.dev/api";

/// Environment variable overriding the adjudication base URL.
pub const BASE_URL_ENV: &str = "CLAIM_API_URL";

// The service is fronted by a tunneling host that interposes a browser
// warning page unless this header is present.
const TUNNEL_SKIP_HEADER: &str = "ngrok-skip-browser-warning";
const TUNNEL_SKIP_VALUE: &str = "69420";

const ENVELOPE_SUCCESS: &str = "success";

/// One file of a claim submission, still binary.
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    pub media_type: MediaType,
    pub bytes: Arc<Vec<u8>>,
}

/// A fully assembled claim, ready for encoding: contract and package are
/// referenced by display name, treatment by wire code, documents keyed by
/// document-type id in upload order.
#[derive(Debug, Clone)]
pub struct ClaimSubmission {
    pub contract_name: String,
    pub package_name: String,
    pub treatment_code: String,
    pub documents: HashMap<String, Vec<DocumentPayload>>,
}

/// The two successful adjudication outcomes. Transport and HTTP failures are
/// `WizardError::Submission` instead, so callers can tell a generic failure
/// from a semantic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The server rendered a markdown verdict.
    Completed { markdown: String },
    /// The server judged some uploads to be the wrong kind of document.
    /// Labels are passed through verbatim for slot highlighting.
    InvalidDocuments { labels: Vec<String>, message: String },
}

/// Client-side surface of the external adjudication service.
#[async_trait]
pub trait AdjudicationApi: Send + Sync {
    async fn fetch_reference_info(&self) -> Result<ReferenceData>;

    async fn fetch_document_requirements(&self, code: &str) -> Result<Vec<DocumentRequirement>>;

    async fn submit_claim(&self, submission: ClaimSubmission) -> Result<SubmissionOutcome>;
}

mod wire {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct InfoEnvelope {
        pub status: String,
        #[serde(default)]
        pub data: Option<InfoData>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct InfoData {
        #[serde(default)]
        pub loai_dieu_tri: Option<Vec<InfoTreatmentType>>,
        #[serde(default)]
        pub hop_dong: Vec<InfoContract>,
    }

    #[derive(Debug, Deserialize)]
    pub struct InfoTreatmentType {
        pub ma: String,
        pub ten: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct InfoContract {
        pub ten: String,
        #[serde(default)]
        pub cac_goi: Vec<InfoPackage>,
    }

    #[derive(Debug, Deserialize)]
    pub struct InfoPackage {
        pub ten: String,
        #[serde(default)]
        pub preview: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DocumentTypesEnvelope {
        pub status: String,
        #[serde(default)]
        pub data: Vec<DocumentTypeRecord>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DocumentTypeRecord {
        pub ma: String,
        pub ten: String,
        #[serde(default)]
        pub mo_ta: String,
        #[serde(default)]
        pub bat_buoc: bool,
    }

    #[derive(Debug, Serialize)]
    pub struct ClaimBody {
        pub hop_dong: ClaimContract,
        pub loai_dieu_tri: String,
        pub ho_so: HashMap<String, Vec<String>>,
    }

    #[derive(Debug, Serialize)]
    pub struct ClaimContract {
        pub ten: String,
        pub goi: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ClaimEnvelope {
        pub status: String,
        #[serde(default)]
        pub data: Option<String>,
        #[serde(default)]
        pub invalid_types: Option<Vec<String>>,
        #[serde(default)]
        pub message: Option<String>,
    }
}

/// `GET /info` envelope to domain data. Contract and option ids are derived
/// from list positions, matching what the frontend shows and sends back.
fn reference_from_info(envelope: wire::InfoEnvelope) -> Result<ReferenceData> {
    if envelope.status != ENVELOPE_SUCCESS {
        return Err(WizardError::ReferenceLoad(format!(
            "service answered with status '{}'",
            envelope.status
        )));
    }
    let data = envelope.data.unwrap_or_default();

    let treatment_types = match data.loai_dieu_tri {
        Some(list) if !list.is_empty() => list
            .into_iter()
            .map(|t| TreatmentType {
                id: t.ma.clone(),
                name: t.ten,
                code: t.ma,
            })
            .collect(),
        // Older deployments omit the list; fall back to the fixed pair.
        _ => fallback_treatment_types(),
    };

    let contracts = data
        .hop_dong
        .into_iter()
        .enumerate()
        .map(|(i, contract)| Contract {
            id: format!("contract_{i}"),
            name: contract.ten,
            options: contract
                .cac_goi
                .into_iter()
                .enumerate()
                .map(|(j, goi)| PackageOption {
                    id: format!("goi_{i}_{j}"),
                    name: goi.ten,
                    preview: goi.preview,
                })
                .collect(),
        })
        .collect();

    Ok(ReferenceData {
        treatment_types,
        contracts,
    })
}

fn requirements_from_response(
    code: &str,
    envelope: wire::DocumentTypesEnvelope,
) -> Result<Vec<DocumentRequirement>> {
    if envelope.status != ENVELOPE_SUCCESS {
        return Err(WizardError::RequirementsLoad {
            code: code.to_string(),
            reason: format!("service answered with status '{}'", envelope.status),
        });
    }
    Ok(envelope
        .data
        .into_iter()
        .map(|record| DocumentRequirement {
            id: record.ma,
            label: record.ten,
            required: record.bat_buoc,
            description: record.mo_ta,
        })
        .collect())
}

/// Encode the claim for the wire: every file becomes a base64 data URL inside
/// the JSON envelope. Wasteful on bandwidth, but it is the fixed contract of
/// the external service.
fn claim_body(submission: &ClaimSubmission) -> wire::ClaimBody {
    let ho_so = submission
        .documents
        .iter()
        .map(|(doc_type_id, files)| {
            let encoded = files
                .iter()
                .map(|f| {
                    format!(
                        "data:{};base64,{}",
                        f.media_type.as_mime(),
                        STANDARD.encode(f.bytes.as_ref())
                    )
                })
                .collect();
            (doc_type_id.clone(), encoded)
        })
        .collect();

    wire::ClaimBody {
        hop_dong: wire::ClaimContract {
            ten: submission.contract_name.clone(),
            goi: submission.package_name.clone(),
        },
        loai_dieu_tri: submission.treatment_code.clone(),
        ho_so,
    }
}

fn outcome_from_claim(envelope: wire::ClaimEnvelope) -> Result<SubmissionOutcome> {
    if envelope.status != ENVELOPE_SUCCESS {
        return Err(WizardError::Submission(
            envelope
                .message
                .unwrap_or_else(|| format!("service answered with status '{}'", envelope.status)),
        ));
    }
    match envelope.invalid_types {
        Some(labels) if !labels.is_empty() => Ok(SubmissionOutcome::InvalidDocuments {
            labels,
            message: envelope
                .message
                .unwrap_or_else(|| "Phát hiện tài liệu sai loại".to_string()),
        }),
        _ => match envelope.data {
            Some(markdown) => Ok(SubmissionOutcome::Completed { markdown }),
            None => Err(WizardError::Submission(
                "successful response carried no result".to_string(),
            )),
        },
    }
}

/// reqwest-backed client for the adjudication service.
pub struct HttpAdjudicationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAdjudicationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Base URL from `CLAIM_API_URL`, falling back to the fixed deployment.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AdjudicationApi for HttpAdjudicationClient {
    async fn fetch_reference_info(&self) -> Result<ReferenceData> {
        let url = format!("{}/info", self.base_url);
        debug!(%url, "fetching reference info");

        let response = self
            .http
            .get(&url)
            .header(TUNNEL_SKIP_HEADER, TUNNEL_SKIP_VALUE)
            .send()
            .await
            .map_err(|e| WizardError::ReferenceLoad(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WizardError::ReferenceLoad(format!(
                "unexpected HTTP status {}",
                response.status()
            )));
        }
        let envelope: wire::InfoEnvelope = response
            .json()
            .await
            .map_err(|e| WizardError::ReferenceLoad(e.to_string()))?;
        reference_from_info(envelope)
    }

    async fn fetch_document_requirements(&self, code: &str) -> Result<Vec<DocumentRequirement>> {
        let url = format!("{}/document-types", self.base_url);
        debug!(%url, code, "fetching document requirements");

        let requirements_error = |reason: String| WizardError::RequirementsLoad {
            code: code.to_string(),
            reason,
        };

        let response = self
            .http
            .get(&url)
            .query(&[("type", code)])
            .header(TUNNEL_SKIP_HEADER, TUNNEL_SKIP_VALUE)
            .send()
            .await
            .map_err(|e| requirements_error(e.to_string()))?;
        if !response.status().is_success() {
            return Err(requirements_error(format!(
                "unexpected HTTP status {}",
                response.status()
            )));
        }
        let envelope: wire::DocumentTypesEnvelope = response
            .json()
            .await
            .map_err(|e| requirements_error(e.to_string()))?;
        requirements_from_response(code, envelope)
    }

    async fn submit_claim(&self, submission: ClaimSubmission) -> Result<SubmissionOutcome> {
        let url = format!("{}/claim", self.base_url);
        let body = claim_body(&submission);
        debug!(
            %url,
            contract = %submission.contract_name,
            treatment = %submission.treatment_code,
            slots = body.ho_so.len(),
            "submitting claim"
        );

        let response = self
            .http
            .post(&url)
            .header(TUNNEL_SKIP_HEADER, TUNNEL_SKIP_VALUE)
            .json(&body)
            .send()
            .await
            .map_err(|e| WizardError::Submission(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WizardError::Submission(format!(
                "unexpected HTTP status {}",
                response.status()
            )));
        }
        let envelope: wire::ClaimEnvelope = response
            .json()
            .await
            .map_err(|e| WizardError::Submission(e.to_string()))?;
        outcome_from_claim(envelope)
    }
}
