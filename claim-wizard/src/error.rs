use thiserror::Error;

use crate::validate::FileRejection;

pub type Result<T> = std::result::Result<T, WizardError>;

/// Error type for the claim wizard
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("file rejected: {0}")]
    FileRejected(#[from] FileRejection),

    #[error("no documents uploaded")]
    NoDocuments,

    #[error("failed to load reference data: {0}")]
    ReferenceLoad(String),

    #[error("reference data is not loaded")]
    ReferenceUnavailable,

    #[error("failed to load document requirements for '{code}': {reason}")]
    RequirementsLoad { code: String, reason: String },

    #[error("claim submission failed: {0}")]
    Submission(String),

    #[error("unknown treatment type: {0}")]
    UnknownTreatmentType(String),

    #[error("unknown contract: {0}")]
    UnknownContract(String),

    #[error("contract '{contract}' has no option '{option}'")]
    UnknownOption { contract: String, option: String },

    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("step not ready: {0}")]
    StepNotReady(&'static str),

    #[error("session not found: {0}")]
    SessionNotFound(String),
}
