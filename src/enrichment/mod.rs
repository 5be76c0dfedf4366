//! Enrichment Module
//!
//! Best-effort drug-information lookup appended to the LLM context. The
//! lookup never fails the chat request: every outcome is folded into a typed
//! [`Enrichment`] value.

mod openfda;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::ChatTurn;

pub use openfda::OpenFdaClient;

/// Source label added to responses that used drug data.
pub const OPENFDA_SOURCE: &str = "OpenFDA";

/// Words that make a message worth a drug lookup. Matched case-insensitively.
const TRIGGER_KEYWORDS: &[&str] = &[
    "médicament",
    "medicament",
    "medication",
    "medicine",
    "drug",
    "dosage",
    "posologie",
    "dose",
    "comprimé",
    "tablet",
    "pill",
    "gélule",
    "sirop",
    "effets secondaires",
    "effet secondaire",
    "side effect",
    "interaction",
    "paracetamol",
    "paracétamol",
    "acetaminophen",
    "ibuprofen",
    "ibuprofène",
    "aspirin",
    "aspirine",
    "amoxicilline",
    "amoxicillin",
    "antibiotique",
    "antibiotic",
    "metformine",
    "metformin",
    "insuline",
    "insulin",
];

/// Label data returned by the drug-information service.
#[derive(Debug, Clone, PartialEq)]
pub struct DrugInfo {
    /// The `openfda` object of the first matching label (empty object if absent)
    pub openfda: Value,
}

impl DrugInfo {
    /// System turn carrying the label data to the model.
    pub fn context_turn(&self) -> ChatTurn {
        ChatTurn::system(format!("Informations complémentaires FDA: {}", self.openfda))
    }
}

/// Outcome of the optional lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Found(DrugInfo),
    /// The message carries no trigger keyword
    NotRequested,
    /// The lookup ran but produced nothing usable
    Unavailable(String),
}

impl Enrichment {
    pub fn drug_info(&self) -> Option<&DrugInfo> {
        match self {
            Enrichment::Found(info) => Some(info),
            _ => None,
        }
    }
}

/// A drug-information service.
#[async_trait]
pub trait DrugLookup: Send + Sync {
    /// Searches for `term`. `Ok(None)` means no match.
    async fn lookup(&self, term: &str) -> Result<Option<DrugInfo>>;
}

/// Checks whether `text` mentions a medication topic.
pub fn needs_drug_lookup(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TRIGGER_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Runs the lookup for a user message when it is warranted.
///
/// Failures are logged and reported as [`Enrichment::Unavailable`].
pub async fn enrich(lookup: &dyn DrugLookup, text: &str) -> Enrichment {
    if !needs_drug_lookup(text) {
        return Enrichment::NotRequested;
    }

    match lookup.lookup(text).await {
        Ok(Some(info)) => {
            debug!("Drug lookup returned label data");
            Enrichment::Found(info)
        }
        Ok(None) => Enrichment::Unavailable("no matching label".to_string()),
        Err(e) => {
            warn!("Drug lookup failed: {}", e);
            Enrichment::Unavailable(e.to_string())
        }
    }
}
