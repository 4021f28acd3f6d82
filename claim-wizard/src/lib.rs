pub mod catalog;
pub mod client;
pub mod error;
pub mod flow;
pub mod notify;
pub mod preview;
pub mod session;
pub mod validate;

// Re-export commonly used types
pub use catalog::{
    Catalog, Contract, DocumentRequirement, PackageOption, ReferenceData, TreatmentType,
    fallback_treatment_types,
};
pub use client::{
    AdjudicationApi, BASE_URL_ENV, ClaimSubmission, DEFAULT_BASE_URL, DocumentPayload,
    HttpAdjudicationClient, SubmissionOutcome,
};
pub use error::{Result, WizardError};
pub use flow::ClaimFlow;
pub use notify::{CompletionNotifier, LogNotifier};
pub use preview::{PreviewEntry, PreviewHandle, PreviewStore};
pub use session::{FileOutcome, UploadCandidate, UploadedFile, WizardSession, WizardStep};
pub use validate::{FileRejection, MAX_UPLOAD_BYTES, MediaType, format_size, validate_upload};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct ScriptedApi;

    #[async_trait]
    impl AdjudicationApi for ScriptedApi {
        async fn fetch_reference_info(&self) -> Result<ReferenceData> {
            Ok(ReferenceData {
                treatment_types: fallback_treatment_types(),
                contracts: vec![Contract {
                    id: "contract_0".to_string(),
                    name: "Gold".to_string(),
                    options: vec![],
                }],
            })
        }

        async fn fetch_document_requirements(
            &self,
            _code: &str,
        ) -> Result<Vec<DocumentRequirement>> {
            Ok(vec![DocumentRequirement {
                id: "hoa_don".to_string(),
                label: "Invoice".to_string(),
                required: true,
                description: "Hospital invoice with itemized costs".to_string(),
            }])
        }

        async fn submit_claim(&self, submission: ClaimSubmission) -> Result<SubmissionOutcome> {
            assert_eq!(submission.contract_name, "Gold");
            assert_eq!(submission.treatment_code, "inpatient");
            assert_eq!(submission.documents["hoa_don"].len(), 1);
            Ok(SubmissionOutcome::Completed {
                markdown: "# Verdict\n\nApproved.".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn whole_wizard_walkthrough() {
        let catalog = Arc::new(Catalog::new());
        let previews = Arc::new(PreviewStore::new());
        let flow = ClaimFlow::new(Arc::clone(&catalog), Arc::new(ScriptedApi));

        flow.ensure_reference().await.unwrap();

        let mut session = WizardSession::new(catalog, previews);
        assert_eq!(session.step(), WizardStep::PackageSelection);

        session.select_contract("contract_0").unwrap();
        session.advance().unwrap();

        let requirements = flow.select_treatment(&mut session, "inpatient").await.unwrap();
        assert_eq!(requirements[0].label, "Invoice");
        session.advance().unwrap();

        session
            .add_files(
                "hoa_don",
                vec![UploadCandidate {
                    file_name: "invoice.pdf".to_string(),
                    media_type: "application/pdf".to_string(),
                    bytes: vec![0u8; 256],
                }],
            )
            .unwrap();
        assert!(session.ready_to_submit());

        let outcome = flow.submit(&mut session).await.unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Completed { .. }));
        // The verdict overlays step 3; the wizard does not move.
        assert_eq!(session.step(), WizardStep::DocumentUpload);
    }
}
