//! Inventory configuration and the scoring engine.
//!
//! A [`Taxonomy`] fixes an inventory's domain/facet partition, its level
//! bands, and its description table; a [`QuestionBank`] is the validated,
//! immutable item list for one taxonomy; [`score_responses`] turns a
//! completed [`ResponseSet`] into a [`ScoreReport`].

mod bank;
mod domain;
mod scoring;
mod taxonomy;

pub use bank::{BankError, QuestionBank};
pub use domain::{
    InvalidLikertValue, InventoryKind, LikertValue, Question, ResponseSet, SCALE_MAX, SCALE_MIN,
};
pub use scoring::{
    percentile_of, score_responses, validate_items, DomainScore, FacetScore, ScoreReport,
    ScoringError,
};
pub use taxonomy::{
    BandDescriptions, BandFloor, DomainSpec, LevelBands, ScoreBand, Taxonomy, TaxonomyError,
    FACETS_PER_DOMAIN,
};
