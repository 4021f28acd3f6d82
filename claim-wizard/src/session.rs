use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Catalog, DocumentRequirement};
use crate::client::{ClaimSubmission, DocumentPayload};
use crate::error::{Result, WizardError};
use crate::preview::{PreviewHandle, PreviewStore};
use crate::validate::{FileRejection, MediaType, validate_upload};

/// The three wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PackageSelection,
    TreatmentSelection,
    DocumentUpload,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            Self::PackageSelection => 1,
            Self::TreatmentSelection => 2,
            Self::DocumentUpload => 3,
        }
    }
}

/// A candidate upload before validation: declared MIME type, not yet trusted.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// An accepted upload owned by the session's document map.
#[derive(Debug)]
pub struct UploadedFile {
    pub id: Uuid,
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Arc<Vec<u8>>,
    /// Present for image files; revokes the preview entry when the file is
    /// dropped from the map.
    pub preview: Option<PreviewHandle>,
}

/// Per-candidate result of an [`WizardSession::add_files`] batch.
#[derive(Debug)]
pub enum FileOutcome {
    Accepted {
        id: Uuid,
        file_name: String,
        preview_id: Option<Uuid>,
    },
    Rejected {
        file_name: String,
        rejection: FileRejection,
    },
}

/// One claim-intake session: current step, selections, and the uploaded
/// document map. Created empty, never persisted; a "new request" is a new,
/// fully independent session against the same shared catalog.
pub struct WizardSession {
    id: String,
    catalog: Arc<Catalog>,
    previews: Arc<PreviewStore>,
    step: WizardStep,
    contract_id: Option<String>,
    option_id: Option<String>,
    treatment_id: Option<String>,
    documents: HashMap<String, Vec<UploadedFile>>,
    invalid_labels: HashSet<String>,
}

impl WizardSession {
    pub fn new(catalog: Arc<Catalog>, previews: Arc<PreviewStore>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), catalog, previews)
    }

    pub fn with_id(id: String, catalog: Arc<Catalog>, previews: Arc<PreviewStore>) -> Self {
        Self {
            id,
            catalog,
            previews,
            step: WizardStep::PackageSelection,
            contract_id: None,
            option_id: None,
            treatment_id: None,
            documents: HashMap::new(),
            invalid_labels: HashSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn contract_id(&self) -> Option<&str> {
        self.contract_id.as_deref()
    }

    pub fn option_id(&self) -> Option<&str> {
        self.option_id.as_deref()
    }

    pub fn treatment_id(&self) -> Option<&str> {
        self.treatment_id.as_deref()
    }

    pub fn documents(&self) -> &HashMap<String, Vec<UploadedFile>> {
        &self.documents
    }

    pub fn invalid_labels(&self) -> &HashSet<String> {
        &self.invalid_labels
    }

    pub fn has_documents(&self) -> bool {
        self.documents.values().any(|files| !files.is_empty())
    }

    pub fn total_files(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }

    /// Select the top-level contract. A changed selection invalidates every
    /// dependent choice: sub-option, treatment type, uploads, and invalid
    /// markers. Re-selecting the current contract leaves them alone.
    pub fn select_contract(&mut self, contract_id: &str) -> Result<()> {
        self.catalog.contract(contract_id)?;
        if self.contract_id.as_deref() == Some(contract_id) {
            return Ok(());
        }
        self.contract_id = Some(contract_id.to_string());
        self.option_id = None;
        self.treatment_id = None;
        self.reset_documents();
        Ok(())
    }

    /// Select a sub-option of the current contract. Clears treatment type and
    /// uploads when the selection changes.
    pub fn select_option(&mut self, option_id: &str) -> Result<()> {
        let contract_id = self
            .contract_id
            .as_deref()
            .ok_or(WizardError::StepNotReady("no contract selected"))?;
        let contract = self.catalog.contract(contract_id)?;
        if contract.option(option_id).is_none() {
            return Err(WizardError::UnknownOption {
                contract: contract.name,
                option: option_id.to_string(),
            });
        }
        if self.option_id.as_deref() == Some(option_id) {
            return Ok(());
        }
        self.option_id = Some(option_id.to_string());
        self.treatment_id = None;
        self.reset_documents();
        Ok(())
    }

    /// Select the treatment type. Clears uploads and invalid markers when the
    /// selection changes. The lazy fetch of this type's document requirements
    /// is the flow layer's job.
    pub fn select_treatment(&mut self, treatment_id: &str) -> Result<()> {
        if !self.package_selection_complete() {
            return Err(WizardError::StepNotReady("package selection is not complete"));
        }
        self.catalog.treatment(treatment_id)?;
        if self.treatment_id.as_deref() == Some(treatment_id) {
            return Ok(());
        }
        self.treatment_id = Some(treatment_id.to_string());
        self.reset_documents();
        Ok(())
    }

    /// Validate and append a batch of candidate files to one document slot.
    /// Acceptance is per file: invalid candidates are reported individually
    /// and do not block the rest of the batch. Upload order is preserved and
    /// every accepted file gets a fresh id. Adding files is a corrective
    /// action, so the slot's invalid marker is cleared.
    pub fn add_files(
        &mut self,
        doc_type_id: &str,
        candidates: Vec<UploadCandidate>,
    ) -> Result<Vec<FileOutcome>> {
        let requirement = self.requirement(doc_type_id)?;

        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match validate_upload(&candidate.media_type, candidate.bytes.len() as u64) {
                Ok(media_type) => {
                    let bytes = Arc::new(candidate.bytes);
                    let preview = media_type.is_image().then(|| {
                        self.previews
                            .create(candidate.file_name.clone(), media_type, Arc::clone(&bytes))
                    });
                    let file = UploadedFile {
                        id: Uuid::new_v4(),
                        file_name: candidate.file_name,
                        media_type,
                        bytes,
                        preview,
                    };
                    outcomes.push(FileOutcome::Accepted {
                        id: file.id,
                        file_name: file.file_name.clone(),
                        preview_id: file.preview.as_ref().map(PreviewHandle::id),
                    });
                    self.documents
                        .entry(doc_type_id.to_string())
                        .or_default()
                        .push(file);
                }
                Err(rejection) => outcomes.push(FileOutcome::Rejected {
                    file_name: candidate.file_name,
                    rejection,
                }),
            }
        }

        self.invalid_labels.remove(&requirement.label);
        Ok(outcomes)
    }

    /// Remove exactly one file by identity, releasing its preview. Clears the
    /// slot's invalid marker like `add_files` does.
    pub fn remove_file(&mut self, doc_type_id: &str, file_id: Uuid) -> Result<()> {
        let requirement = self.requirement(doc_type_id)?;

        if let Some(files) = self.documents.get_mut(doc_type_id) {
            files.retain(|f| f.id != file_id);
            if files.is_empty() {
                self.documents.remove(doc_type_id);
            }
        }
        self.invalid_labels.remove(&requirement.label);
        Ok(())
    }

    /// Step 1 is complete iff a contract is chosen and a sub-option is chosen
    /// whenever the contract requires one.
    pub fn package_selection_complete(&self) -> bool {
        let Some(contract_id) = self.contract_id.as_deref() else {
            return false;
        };
        match self.catalog.contract(contract_id) {
            Ok(contract) => !contract.has_options() || self.option_id.is_some(),
            Err(_) => false,
        }
    }

    pub fn can_enter_treatment(&self) -> bool {
        self.package_selection_complete()
    }

    pub fn can_enter_documents(&self) -> bool {
        self.package_selection_complete() && self.treatment_id.is_some()
    }

    /// Submission readiness: on the upload step's preconditions, the selected
    /// treatment has a known, non-empty required set, and every required slot
    /// holds at least one file.
    pub fn ready_to_submit(&self) -> bool {
        if !self.can_enter_documents() {
            return false;
        }
        let Some(requirements) = self.current_requirements() else {
            return false;
        };
        let required: Vec<&DocumentRequirement> =
            requirements.iter().filter(|r| r.required).collect();
        !required.is_empty()
            && required.iter().all(|r| {
                self.documents
                    .get(&r.id)
                    .is_some_and(|files| !files.is_empty())
            })
    }

    /// Advance one step, gated on the current step's completion.
    pub fn advance(&mut self) -> Result<WizardStep> {
        self.step = match self.step {
            WizardStep::PackageSelection if self.can_enter_treatment() => {
                WizardStep::TreatmentSelection
            }
            WizardStep::PackageSelection => {
                return Err(WizardError::StepNotReady("package selection is not complete"));
            }
            WizardStep::TreatmentSelection if self.can_enter_documents() => {
                WizardStep::DocumentUpload
            }
            WizardStep::TreatmentSelection => {
                return Err(WizardError::StepNotReady("no treatment type selected"));
            }
            WizardStep::DocumentUpload => {
                return Err(WizardError::StepNotReady("already at the last step"));
            }
        };
        Ok(self.step)
    }

    pub fn go_back(&mut self) -> Result<WizardStep> {
        self.step = match self.step {
            WizardStep::PackageSelection => {
                return Err(WizardError::StepNotReady("already at the first step"));
            }
            WizardStep::TreatmentSelection => WizardStep::PackageSelection,
            WizardStep::DocumentUpload => WizardStep::TreatmentSelection,
        };
        Ok(self.step)
    }

    /// Replace the invalid markers with the labels the server reported.
    pub fn mark_invalid(&mut self, labels: impl IntoIterator<Item = String>) {
        self.invalid_labels = labels.into_iter().collect();
    }

    pub fn clear_invalid(&mut self) {
        self.invalid_labels.clear();
    }

    /// Requirement list for the currently selected treatment, if fetched.
    pub fn current_requirements(&self) -> Option<Arc<Vec<DocumentRequirement>>> {
        let treatment_id = self.treatment_id.as_deref()?;
        let treatment = self.catalog.treatment(treatment_id).ok()?;
        self.catalog.requirements(&treatment.code).ok().flatten()
    }

    /// Assemble the claim payload from the session and the shared catalog:
    /// contract and package referenced by name, treatment by wire code, and
    /// only the non-empty document slots, in upload order.
    pub fn build_submission(&self) -> Result<ClaimSubmission> {
        let contract_id = self
            .contract_id
            .as_deref()
            .ok_or(WizardError::StepNotReady("no contract selected"))?;
        let contract = self.catalog.contract(contract_id)?;
        let package_name = match self.option_id.as_deref() {
            Some(option_id) => {
                contract
                    .option(option_id)
                    .map(|o| o.name.clone())
                    .ok_or_else(|| WizardError::UnknownOption {
                        contract: contract.name.clone(),
                        option: option_id.to_string(),
                    })?
            }
            None => String::new(),
        };
        let treatment_id = self
            .treatment_id
            .as_deref()
            .ok_or(WizardError::StepNotReady("no treatment type selected"))?;
        let treatment = self.catalog.treatment(treatment_id)?;

        let documents = self
            .documents
            .iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(doc_type_id, files)| {
                let payloads = files
                    .iter()
                    .map(|f| DocumentPayload {
                        media_type: f.media_type,
                        bytes: Arc::clone(&f.bytes),
                    })
                    .collect();
                (doc_type_id.clone(), payloads)
            })
            .collect();

        Ok(ClaimSubmission {
            contract_name: contract.name,
            package_name,
            treatment_code: treatment.code,
            documents,
        })
    }

    fn requirement(&self, doc_type_id: &str) -> Result<DocumentRequirement> {
        if self.treatment_id.is_none() {
            return Err(WizardError::StepNotReady("no treatment type selected"));
        }
        let requirements = self
            .current_requirements()
            .ok_or(WizardError::StepNotReady("document requirements are not loaded"))?;
        requirements
            .iter()
            .find(|r| r.id == doc_type_id)
            .cloned()
            .ok_or_else(|| WizardError::UnknownDocumentType(doc_type_id.to_string()))
    }

    fn reset_documents(&mut self) {
        // Dropping the files releases their preview handles.
        self.documents.clear();
        self.invalid_labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Contract, PackageOption, ReferenceData, fallback_treatment_types};

    fn fixture() -> (Arc<Catalog>, Arc<PreviewStore>) {
        let catalog = Arc::new(Catalog::new());
        catalog.install_reference(ReferenceData {
            treatment_types: fallback_treatment_types(),
            contracts: vec![
                Contract {
                    id: "contract_0".to_string(),
                    name: "Gold".to_string(),
                    options: vec![],
                },
                Contract {
                    id: "contract_1".to_string(),
                    name: "Family".to_string(),
                    options: vec![PackageOption {
                        id: "goi_1_0".to_string(),
                        name: "Premium".to_string(),
                        preview: Some("Terms".to_string()),
                    }],
                },
            ],
        });
        catalog
            .insert_requirements(
                "inpatient",
                vec![
                    DocumentRequirement {
                        id: "hoa_don".to_string(),
                        label: "Invoice".to_string(),
                        required: true,
                        description: "Hospital invoice".to_string(),
                    },
                    DocumentRequirement {
                        id: "don_thuoc".to_string(),
                        label: "Prescription".to_string(),
                        required: false,
                        description: "Doctor's prescription".to_string(),
                    },
                ],
            )
            .unwrap();
        (catalog, Arc::new(PreviewStore::new()))
    }

    fn session_at_documents(catalog: &Arc<Catalog>, previews: &Arc<PreviewStore>) -> WizardSession {
        let mut session = WizardSession::new(Arc::clone(catalog), Arc::clone(previews));
        session.select_contract("contract_0").unwrap();
        session.select_treatment("inpatient").unwrap();
        session
    }

    fn pdf(name: &str) -> UploadCandidate {
        UploadCandidate {
            file_name: name.to_string(),
            media_type: "application/pdf".to_string(),
            bytes: vec![0u8; 64],
        }
    }

    fn jpeg(name: &str, size: usize) -> UploadCandidate {
        UploadCandidate {
            file_name: name.to_string(),
            media_type: "image/jpeg".to_string(),
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn step_gating_follows_selection_state() {
        let (catalog, previews) = fixture();
        let mut session = WizardSession::new(Arc::clone(&catalog), previews);

        assert!(!session.can_enter_treatment());
        assert!(session.advance().is_err());

        // A contract with options is incomplete until an option is chosen.
        session.select_contract("contract_1").unwrap();
        assert!(!session.can_enter_treatment());
        session.select_option("goi_1_0").unwrap();
        assert!(session.can_enter_treatment());
        assert!(!session.can_enter_documents());

        assert_eq!(session.advance().unwrap(), WizardStep::TreatmentSelection);
        assert!(session.advance().is_err());

        session.select_treatment("outpatient").unwrap();
        assert!(session.can_enter_documents());
        assert_eq!(session.advance().unwrap(), WizardStep::DocumentUpload);
        assert!(session.advance().is_err());

        assert_eq!(session.go_back().unwrap(), WizardStep::TreatmentSelection);
        assert_eq!(session.go_back().unwrap(), WizardStep::PackageSelection);
        assert!(session.go_back().is_err());
    }

    #[test]
    fn optionless_contract_completes_step_one_alone() {
        let (catalog, previews) = fixture();
        let mut session = WizardSession::new(catalog, previews);
        session.select_contract("contract_0").unwrap();
        assert!(session.can_enter_treatment());
    }

    #[test]
    fn selecting_an_option_requires_a_contract_that_has_it() {
        let (catalog, previews) = fixture();
        let mut session = WizardSession::new(catalog, previews);
        assert!(matches!(
            session.select_option("goi_1_0"),
            Err(WizardError::StepNotReady(_))
        ));
        session.select_contract("contract_0").unwrap();
        assert!(matches!(
            session.select_option("goi_1_0"),
            Err(WizardError::UnknownOption { .. })
        ));
    }

    #[test]
    fn changing_contract_clears_dependent_state() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        session.add_files("hoa_don", vec![pdf("invoice.pdf")]).unwrap();
        session.mark_invalid(["Invoice".to_string()]);

        session.select_contract("contract_1").unwrap();
        assert_eq!(session.option_id(), None);
        assert_eq!(session.treatment_id(), None);
        assert!(session.documents().is_empty());
        assert!(session.invalid_labels().is_empty());
    }

    #[test]
    fn reselecting_the_same_contract_is_a_no_op() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        session.add_files("hoa_don", vec![pdf("invoice.pdf")]).unwrap();

        session.select_contract("contract_0").unwrap();
        assert_eq!(session.treatment_id(), Some("inpatient"));
        assert_eq!(session.total_files(), 1);
    }

    #[test]
    fn changing_treatment_clears_documents_and_markers() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        session.add_files("hoa_don", vec![pdf("invoice.pdf")]).unwrap();
        session.mark_invalid(["Invoice".to_string()]);

        session.select_treatment("outpatient").unwrap();
        assert!(session.documents().is_empty());
        assert!(session.invalid_labels().is_empty());

        // Same treatment again: nothing to clear, nothing cleared.
        session.select_treatment("outpatient").unwrap();
    }

    #[test]
    fn batch_acceptance_is_per_file() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);

        let outcomes = session
            .add_files(
                "hoa_don",
                vec![
                    jpeg("too-big.jpg", 15 * 1024 * 1024),
                    jpeg("scan.jpg", 2 * 1024 * 1024),
                ],
            )
            .unwrap();

        assert!(matches!(
            outcomes[0],
            FileOutcome::Rejected {
                rejection: FileRejection::TooLarge { .. },
                ..
            }
        ));
        assert!(matches!(outcomes[1], FileOutcome::Accepted { .. }));

        let files = &session.documents()["hoa_don"];
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "scan.jpg");
    }

    #[test]
    fn files_keep_upload_order_and_unique_ids() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);

        session
            .add_files("hoa_don", vec![pdf("a.pdf"), pdf("b.pdf")])
            .unwrap();
        session.add_files("hoa_don", vec![pdf("c.pdf")]).unwrap();

        let files = &session.documents()["hoa_don"];
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);

        let ids: HashSet<Uuid> = files.iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn remove_file_takes_exactly_one_by_identity() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        session
            .add_files("hoa_don", vec![pdf("a.pdf"), pdf("b.pdf")])
            .unwrap();
        let doomed = session.documents()["hoa_don"][0].id;

        session.remove_file("hoa_don", doomed).unwrap();
        let files = &session.documents()["hoa_don"];
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "b.pdf");

        // Removing the last file drops the slot entirely.
        let last = files[0].id;
        session.remove_file("hoa_don", last).unwrap();
        assert!(!session.documents().contains_key("hoa_don"));
        assert!(!session.has_documents());
    }

    #[test]
    fn unknown_document_type_is_rejected() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        assert!(matches!(
            session.add_files("x_ray", vec![pdf("a.pdf")]),
            Err(WizardError::UnknownDocumentType(_))
        ));
    }

    #[test]
    fn corrective_actions_clear_the_invalid_marker() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        session.add_files("hoa_don", vec![pdf("a.pdf")]).unwrap();

        session.mark_invalid(["Invoice".to_string(), "Prescription".to_string()]);
        session.add_files("hoa_don", vec![pdf("b.pdf")]).unwrap();
        assert!(!session.invalid_labels().contains("Invoice"));
        assert!(session.invalid_labels().contains("Prescription"));

        session.mark_invalid(["Prescription".to_string()]);
        let file_id = session.documents()["hoa_don"][0].id;
        session.remove_file("hoa_don", file_id).unwrap();
        // Removing from the invoice slot clears only the invoice marker.
        assert!(session.invalid_labels().contains("Prescription"));
        session
            .add_files("don_thuoc", vec![pdf("rx.pdf")])
            .unwrap();
        assert!(session.invalid_labels().is_empty());
    }

    #[test]
    fn readiness_requires_every_required_slot_filled() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        assert!(!session.ready_to_submit());

        // An optional slot alone does not satisfy readiness.
        session.add_files("don_thuoc", vec![pdf("rx.pdf")]).unwrap();
        assert!(!session.ready_to_submit());

        session.add_files("hoa_don", vec![pdf("invoice.pdf")]).unwrap();
        assert!(session.ready_to_submit());
    }

    #[test]
    fn readiness_is_false_while_requirements_are_unfetched() {
        let (catalog, previews) = fixture();
        let mut session = WizardSession::new(Arc::clone(&catalog), previews);
        session.select_contract("contract_0").unwrap();
        // Requirements for "outpatient" were never inserted.
        session.select_treatment("outpatient").unwrap();
        assert!(!session.ready_to_submit());
        assert!(matches!(
            session.add_files("hoa_don", vec![pdf("a.pdf")]),
            Err(WizardError::StepNotReady(_))
        ));
    }

    #[test]
    fn image_uploads_register_previews_and_release_them() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);

        session
            .add_files("hoa_don", vec![jpeg("scan.jpg", 1024), pdf("invoice.pdf")])
            .unwrap();
        // Only the image gets a preview.
        assert_eq!(previews.len(), 1);

        let image_id = session.documents()["hoa_don"][0].id;
        session.remove_file("hoa_don", image_id).unwrap();
        assert!(previews.is_empty());

        session.add_files("hoa_don", vec![jpeg("scan2.jpg", 1024)]).unwrap();
        assert_eq!(previews.len(), 1);
        // A cascading reset releases previews too.
        session.select_contract("contract_1").unwrap();
        assert!(previews.is_empty());
    }

    #[test]
    fn dropping_the_session_releases_previews() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        session.add_files("hoa_don", vec![jpeg("scan.jpg", 512)]).unwrap();
        assert_eq!(previews.len(), 1);
        drop(session);
        assert!(previews.is_empty());
    }

    #[test]
    fn submission_payload_uses_names_and_wire_code() {
        let (catalog, previews) = fixture();
        let mut session = WizardSession::new(Arc::clone(&catalog), previews);
        session.select_contract("contract_1").unwrap();
        session.select_option("goi_1_0").unwrap();
        session.select_treatment("inpatient").unwrap();
        session.add_files("hoa_don", vec![pdf("invoice.pdf")]).unwrap();

        let submission = session.build_submission().unwrap();
        assert_eq!(submission.contract_name, "Family");
        assert_eq!(submission.package_name, "Premium");
        assert_eq!(submission.treatment_code, "inpatient");
        assert_eq!(submission.documents.len(), 1);
        assert_eq!(submission.documents["hoa_don"].len(), 1);
    }

    #[test]
    fn submission_package_name_is_empty_without_options() {
        let (catalog, previews) = fixture();
        let mut session = session_at_documents(&catalog, &previews);
        session.add_files("hoa_don", vec![pdf("invoice.pdf")]).unwrap();
        let submission = session.build_submission().unwrap();
        assert_eq!(submission.contract_name, "Gold");
        assert_eq!(submission.package_name, "");
    }
}
