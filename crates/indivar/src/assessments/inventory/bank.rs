use super::domain::{InventoryKind, Question};
use super::taxonomy::Taxonomy;

const BFI2_BANK_JSON: &str = include_str!("../../../banks/bfi2.json");
const HEXACO_BANK_JSON: &str = include_str!("../../../banks/hexaco.json");

/// Validated, immutable question bank for one inventory.
///
/// Loading is an explicit step: configuration problems (unknown taxonomy
/// keys, duplicate items, empty or uneven facets) surface here, never inside
/// a per-submission scoring pass. Items are held sorted by `item_number`.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    taxonomy: Taxonomy,
    questions: Vec<Question>,
}

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question bank contains no items")]
    Empty,
    #[error("duplicate item number {0} in question bank")]
    DuplicateItem(u32),
    #[error("item {item_number} references unknown domain '{domain}'")]
    UnknownDomain { item_number: u32, domain: String },
    #[error("item {item_number} references unknown facet '{facet}' under domain '{domain}'")]
    UnknownFacet {
        item_number: u32,
        domain: String,
        facet: String,
    },
    #[error("facet '{facet}' of domain '{domain}' has no items")]
    EmptyFacet { domain: String, facet: String },
    #[error("facets of domain '{domain}' have unequal item counts")]
    UnevenFacets { domain: String },
}

impl QuestionBank {
    /// Parse and validate a bank from its JSON document.
    pub fn from_json(taxonomy: Taxonomy, json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(taxonomy, questions)
    }

    pub fn new(taxonomy: Taxonomy, mut questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        questions.sort_by_key(|question| question.item_number);
        for pair in questions.windows(2) {
            if pair[0].item_number == pair[1].item_number {
                return Err(BankError::DuplicateItem(pair[0].item_number));
            }
        }

        for question in &questions {
            let spec = taxonomy.domain(&question.domain).ok_or_else(|| {
                BankError::UnknownDomain {
                    item_number: question.item_number,
                    domain: question.domain.clone(),
                }
            })?;
            if !spec.facets.iter().any(|facet| *facet == question.facet) {
                return Err(BankError::UnknownFacet {
                    item_number: question.item_number,
                    domain: question.domain.clone(),
                    facet: question.facet.clone(),
                });
            }
        }

        // The flat domain mean only equals the mean of facet means when every
        // facet of a domain carries the same item count; reject banks that
        // break that partition instead of scoring them.
        for spec in taxonomy.domains() {
            let mut counts = [0usize; super::taxonomy::FACETS_PER_DOMAIN];
            for question in &questions {
                if question.domain == spec.name {
                    if let Some(index) =
                        spec.facets.iter().position(|facet| *facet == question.facet)
                    {
                        counts[index] += 1;
                    }
                }
            }
            if let Some(index) = counts.iter().position(|count| *count == 0) {
                return Err(BankError::EmptyFacet {
                    domain: spec.name.to_string(),
                    facet: spec.facets[index].to_string(),
                });
            }
            if counts.iter().any(|count| *count != counts[0]) {
                return Err(BankError::UnevenFacets {
                    domain: spec.name.to_string(),
                });
            }
        }

        Ok(Self {
            taxonomy,
            questions,
        })
    }

    /// The BFI-2 short-form bank shipped with the library.
    pub fn bfi2() -> Result<Self, BankError> {
        Self::from_json(Taxonomy::bfi2(), BFI2_BANK_JSON)
    }

    /// The HEXACO short-form bank shipped with the library.
    pub fn hexaco() -> Result<Self, BankError> {
        Self::from_json(Taxonomy::hexaco(), HEXACO_BANK_JSON)
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn inventory(&self) -> InventoryKind {
        self.taxonomy.inventory()
    }

    /// Items sorted by item number.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, item_number: u32) -> Option<&Question> {
        self.questions
            .binary_search_by_key(&item_number, |question| question.item_number)
            .ok()
            .map(|index| &self.questions[index])
    }
}
