use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{Catalog, DocumentRequirement};
use crate::client::{AdjudicationApi, SubmissionOutcome};
use crate::error::{Result, WizardError};
use crate::notify::{CompletionNotifier, LogNotifier};
use crate::session::WizardSession;

/// Orchestrates one wizard deployment: the shared catalog, the adjudication
/// client behind it, and the completion notifier. Sessions stay plain state;
/// everything that touches the network goes through here.
#[derive(Clone)]
pub struct ClaimFlow {
    catalog: Arc<Catalog>,
    api: Arc<dyn AdjudicationApi>,
    notifier: Arc<dyn CompletionNotifier>,
}

impl ClaimFlow {
    pub fn new(catalog: Arc<Catalog>, api: Arc<dyn AdjudicationApi>) -> Self {
        Self {
            catalog,
            api,
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn CompletionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Populate the catalog from the adjudication service. Loads once; until
    /// a load succeeds every call re-attempts, and the failure is returned to
    /// the caller rather than swallowed.
    pub async fn ensure_reference(&self) -> Result<()> {
        if self.catalog.is_loaded() {
            return Ok(());
        }
        let reference = self.api.fetch_reference_info().await?;
        info!(
            contracts = reference.contracts.len(),
            treatment_types = reference.treatment_types.len(),
            "reference data loaded"
        );
        self.catalog.install_reference(reference);
        Ok(())
    }

    /// Apply a treatment selection and return that treatment's document
    /// requirements, fetching and caching them on first use. A fetch failure
    /// leaves the cache untouched, so re-selecting the treatment retries.
    pub async fn select_treatment(
        &self,
        session: &mut WizardSession,
        treatment_id: &str,
    ) -> Result<Vec<DocumentRequirement>> {
        session.select_treatment(treatment_id)?;
        let code = self.catalog.treatment(treatment_id)?.code;

        if let Some(cached) = self.catalog.requirements(&code)? {
            return Ok(cached.as_ref().clone());
        }

        let fetched = self.api.fetch_document_requirements(&code).await?;
        info!(%code, count = fetched.len(), "document requirements loaded");
        self.catalog.insert_requirements(&code, fetched.clone())?;
        Ok(fetched)
    }

    /// Submit the session's claim. Fails fast, before any network call, when
    /// nothing was uploaded or a required slot is still empty. The wizard
    /// step is left alone: the verdict is presented over step 3.
    pub async fn submit(&self, session: &mut WizardSession) -> Result<SubmissionOutcome> {
        if !session.has_documents() {
            return Err(WizardError::NoDocuments);
        }
        if !session.ready_to_submit() {
            return Err(WizardError::StepNotReady(
                "a required document slot is still empty",
            ));
        }

        let submission = session.build_submission()?;
        let outcome = self.api.submit_claim(submission).await?;

        match &outcome {
            SubmissionOutcome::Completed { .. } => {
                session.clear_invalid();
                self.notifier.claim_completed(session.id()).await;
            }
            SubmissionOutcome::InvalidDocuments { labels, .. } => {
                warn!(
                    session_id = session.id(),
                    ?labels,
                    "server flagged documents as the wrong type"
                );
                session.mark_invalid(labels.iter().cloned());
            }
        }
        Ok(outcome)
    }
}
