//! Deterministic SoVI score calculation: weight tables, aggregation, and
//! band classification.

mod config;
mod engine;

pub use config::{
    CompositeWeights, EconomicWeights, EducationWeights, FacilityWeights, HealthWeights,
    PopulationWeights, RatingBand, ScoringConfig,
};
pub use engine::{ImprovementDeltas, ImprovementValidation, ScoreEngine};

pub(crate) use engine::round2;
