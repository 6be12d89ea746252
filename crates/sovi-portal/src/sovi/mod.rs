//! District vulnerability domain: indicator records, the score engine,
//! input validation, the repository contract, the portal service, and the
//! HTTP router.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    BulkOutcome, CalculatedScores, CategoryScores, ComparativeAnalysis, CreateDistrict, District,
    DistrictDataRecord, DistrictDetail, DistrictListItem, IndicatorCategory, IndicatorSubmission,
    IndicatorValues, MapDistrict, TrendSeries, YearlyTrends,
};
pub use import::{parse_submissions, CsvImportError};
pub use repository::{DistrictRepository, RepositoryError};
pub use router::portal_router;
pub use scoring::{ImprovementDeltas, ImprovementValidation, RatingBand, ScoreEngine, ScoringConfig};
pub use service::{PortalService, PortalServiceError};
pub use validation::{declared_bounds, validate_submission, ValidationFailure};
