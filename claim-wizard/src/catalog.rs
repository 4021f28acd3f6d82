use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WizardError};

/// Inpatient vs outpatient care classification. Drives the required document
/// set for a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentType {
    pub id: String,
    pub name: String,
    /// Wire code sent on submission and used to key the requirements cache.
    pub code: String,
}

/// A tier within a contract with its own preview terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOption {
    pub id: String,
    pub name: String,
    pub preview: Option<String>,
}

/// An insurance agreement, the top-level choice of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub name: String,
    pub options: Vec<PackageOption>,
}

impl Contract {
    /// A contract requires a sub-option selection iff it has options.
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn option(&self, option_id: &str) -> Option<&PackageOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// A required or optional evidence category for a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequirement {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub description: String,
}

/// Everything `GET /info` returns, in domain form.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub treatment_types: Vec<TreatmentType>,
    pub contracts: Vec<Contract>,
}

/// Fixed treatment-type pair used when the backend omits its own list.
pub fn fallback_treatment_types() -> Vec<TreatmentType> {
    vec![
        TreatmentType {
            id: "inpatient".to_string(),
            name: "Nội trú".to_string(),
            code: "inpatient".to_string(),
        },
        TreatmentType {
            id: "outpatient".to_string(),
            name: "Ngoại trú".to_string(),
            code: "outpatient".to_string(),
        },
    ]
}

/// Reference data for one process: contracts, treatment types, and the
/// per-treatment document requirements fetched lazily on first selection.
///
/// The catalog is an explicit context object: it is populated once through a
/// loader and handed to each session behind an `Arc`, so independent sessions
/// share it without any ambient global state. Requirement lookups are keyed
/// by the treatment codes known at load time; an unknown code is an error,
/// never a silent miss.
#[derive(Debug, Default)]
pub struct Catalog {
    reference: RwLock<Option<ReferenceData>>,
    requirements: DashMap<String, Arc<Vec<DocumentRequirement>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.reference.read().expect("catalog lock poisoned").is_some()
    }

    /// Install the loaded reference data. Later installs replace the earlier
    /// ones wholesale; the requirements cache is left alone because it is
    /// keyed by wire codes, which a re-load does not change.
    pub fn install_reference(&self, data: ReferenceData) {
        *self.reference.write().expect("catalog lock poisoned") = Some(data);
    }

    pub fn contracts(&self) -> Result<Vec<Contract>> {
        self.with_reference(|r| r.contracts.clone())
    }

    pub fn treatment_types(&self) -> Result<Vec<TreatmentType>> {
        self.with_reference(|r| r.treatment_types.clone())
    }

    pub fn contract(&self, contract_id: &str) -> Result<Contract> {
        self.with_reference(|r| r.contracts.iter().find(|c| c.id == contract_id).cloned())?
            .ok_or_else(|| WizardError::UnknownContract(contract_id.to_string()))
    }

    pub fn treatment(&self, treatment_id: &str) -> Result<TreatmentType> {
        self.with_reference(|r| {
            r.treatment_types
                .iter()
                .find(|t| t.id == treatment_id)
                .cloned()
        })?
        .ok_or_else(|| WizardError::UnknownTreatmentType(treatment_id.to_string()))
    }

    fn treatment_by_code(&self, code: &str) -> Result<TreatmentType> {
        self.with_reference(|r| r.treatment_types.iter().find(|t| t.code == code).cloned())?
            .ok_or_else(|| WizardError::UnknownTreatmentType(code.to_string()))
    }

    /// Cached document requirements for one treatment code. `Ok(None)` means
    /// the code is valid but its list has not been fetched yet.
    pub fn requirements(&self, code: &str) -> Result<Option<Arc<Vec<DocumentRequirement>>>> {
        self.treatment_by_code(code)?;
        Ok(self.requirements.get(code).map(|e| e.clone()))
    }

    /// Merge one treatment type's requirement list into the cache without
    /// disturbing other keys.
    pub fn insert_requirements(
        &self,
        code: &str,
        requirements: Vec<DocumentRequirement>,
    ) -> Result<()> {
        self.treatment_by_code(code)?;
        self.requirements.insert(code.to_string(), Arc::new(requirements));
        Ok(())
    }

    fn with_reference<T>(&self, f: impl FnOnce(&ReferenceData) -> T) -> Result<T> {
        let guard = self.reference.read().expect("catalog lock poisoned");
        match guard.as_ref() {
            Some(reference) => Ok(f(reference)),
            None => Err(WizardError::ReferenceUnavailable),
        }
    }
}
