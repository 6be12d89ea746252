use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    BulkOutcome, CalculatedScores, ComparativeAnalysis, CreateDistrict, District, DistrictDataRecord,
    DistrictDetail, DistrictListItem, IndicatorSubmission, IndicatorValues, MapDistrict,
    TrendSeries, YearlyTrends,
};
use super::repository::{DistrictRepository, RepositoryError};
use super::scoring::{round2, ImprovementValidation, ScoreEngine, ScoringConfig};
use super::validation::{validate_submission, ValidationFailure};

/// Two latest scores within this distance count as "similar" districts.
const SIMILARITY_WINDOW: f64 = 5.0;
const SIMILAR_DISTRICT_LIMIT: usize = 5;

/// Service composing input validation, the score engine, and the repository.
/// Every create or update of survey data recomputes the derived scores and
/// refreshes the owning district's latest-score projection.
pub struct PortalService<R> {
    repository: Arc<R>,
    engine: ScoreEngine,
}

static DISTRICT_SEQUENCE: AtomicI64 = AtomicI64::new(1);
static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_district_id() -> i64 {
    DISTRICT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

fn next_record_id() -> u64 {
    RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

impl<R> PortalService<R>
where
    R: DistrictRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Self {
        Self {
            repository,
            engine: ScoreEngine::new(config),
        }
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Register a district. Scores stay empty until survey data arrives.
    pub fn create_district(&self, input: CreateDistrict) -> Result<District, PortalServiceError> {
        let name = input.name.trim().to_string();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push("District name is required".to_string());
        } else if name.len() > 100 {
            errors.push("District name must be less than 100 characters".to_string());
        }
        if input.province.as_deref().is_some_and(|p| p.len() > 50) {
            errors.push("Province name must be less than 50 characters".to_string());
        }
        if !errors.is_empty() {
            return Err(ValidationFailure { errors }.into());
        }

        let now = Utc::now();
        let district = District {
            id: next_district_id(),
            name,
            fid: input.fid,
            division: input.division,
            province: input.province,
            country: input.country.unwrap_or_else(|| "Pakistan".to_string()),
            sovi_score: None,
            rating: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_district(district)?;
        info!(district = %stored.name, id = stored.id, "district registered");
        Ok(stored)
    }

    pub fn list_districts(&self) -> Result<Vec<DistrictListItem>, PortalServiceError> {
        let districts = self.repository.districts()?;
        Ok(districts.iter().map(DistrictListItem::from_district).collect())
    }

    pub fn district_detail(&self, district_id: i64) -> Result<DistrictDetail, PortalServiceError> {
        let district = self
            .repository
            .fetch_district(district_id)?
            .ok_or(PortalServiceError::DistrictNotFound(district_id))?;
        let data = self.repository.records_for_district(district_id)?;
        Ok(DistrictDetail { district, data })
    }

    /// Persist one district-year of survey data: validate, score, upsert the
    /// (district, year) record, then refresh the district projection.
    pub fn submit_indicators(
        &self,
        submission: IndicatorSubmission,
    ) -> Result<DistrictDataRecord, PortalServiceError> {
        validate_submission(&submission)?;

        let district = self
            .repository
            .fetch_district(submission.district_id)?
            .ok_or(PortalServiceError::DistrictNotFound(submission.district_id))?;

        let scores = self.engine.calculate(&submission.indicators);
        let existing = self
            .repository
            .records_for_district(submission.district_id)?
            .into_iter()
            .find(|record| record.year == submission.year);

        let now = Utc::now();
        let updated = existing.is_some();
        let record = match existing {
            Some(previous) => DistrictDataRecord {
                id: previous.id,
                district_id: submission.district_id,
                year: submission.year,
                indicators: submission.indicators,
                scores,
                created_at: previous.created_at,
                updated_at: now,
            },
            None => DistrictDataRecord {
                id: next_record_id(),
                district_id: submission.district_id,
                year: submission.year,
                indicators: submission.indicators,
                scores,
                created_at: now,
                updated_at: now,
            },
        };

        let stored = self.repository.upsert_record(record)?;
        self.refresh_projection(district.id)?;

        info!(
            district = %district.name,
            year = stored.year,
            total_sovi = stored.scores.total,
            updated,
            "district survey data scored"
        );

        Ok(stored)
    }

    /// Remove a stored record and refresh the owning district's projection.
    pub fn delete_record(&self, record_id: u64) -> Result<(), PortalServiceError> {
        let record = self
            .repository
            .fetch_record(record_id)?
            .ok_or(PortalServiceError::RecordNotFound(record_id))?;

        self.repository.delete_record(record_id)?;
        self.refresh_projection(record.district_id)?;

        info!(record = record_id, district = record.district_id, "district survey data deleted");
        Ok(())
    }

    /// Copy the newest record's total and rating onto the district. When the
    /// history is empty the projection is left untouched, so a district
    /// keeps its last computed score after its final record is deleted.
    fn refresh_projection(&self, district_id: i64) -> Result<(), PortalServiceError> {
        let latest = self.latest_record(district_id)?;
        if let Some(latest) = latest {
            if let Some(mut district) = self.repository.fetch_district(district_id)? {
                district.sovi_score = Some(latest.scores.total);
                district.rating = Some(latest.scores.rating);
                district.updated_at = Utc::now();
                self.repository.update_district(district)?;
            }
        }
        Ok(())
    }

    fn latest_record(
        &self,
        district_id: i64,
    ) -> Result<Option<DistrictDataRecord>, PortalServiceError> {
        let mut records = self.repository.records_for_district(district_id)?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.remove(0)))
        }
    }

    /// Newest record for a district; an empty history is a not-found.
    pub fn latest(&self, district_id: i64) -> Result<DistrictDataRecord, PortalServiceError> {
        self.latest_record(district_id)?
            .ok_or(PortalServiceError::NoDataForDistrict(district_id))
    }

    /// Survey history newest year first, optionally narrowed to one year.
    pub fn history(
        &self,
        district_id: i64,
        year: Option<i32>,
    ) -> Result<Vec<DistrictDataRecord>, PortalServiceError> {
        let records = self.repository.records_for_district(district_id)?;
        Ok(match year {
            Some(year) => records.into_iter().filter(|r| r.year == year).collect(),
            None => records,
        })
    }

    /// Score series per year, oldest first, for charting.
    pub fn yearly_trends(&self, district_id: i64) -> Result<YearlyTrends, PortalServiceError> {
        let mut records = self.repository.records_for_district(district_id)?;
        records.sort_by_key(|record| record.year);

        let mut trends = YearlyTrends {
            years: Vec::with_capacity(records.len()),
            scores: Vec::with_capacity(records.len()),
            parameters: TrendSeries::default(),
        };
        for record in &records {
            trends.years.push(record.year);
            trends.scores.push(record.scores.total);
            trends.parameters.education.push(record.scores.education);
            trends.parameters.health.push(record.scores.health);
            trends.parameters.facility.push(record.scores.facility);
            trends.parameters.economic.push(record.scores.economic);
            trends.parameters.population.push(record.scores.population);
        }
        Ok(trends)
    }

    /// Every district with its latest score breakdown for the map layer.
    pub fn map_data(&self) -> Result<Vec<MapDistrict>, PortalServiceError> {
        let districts = self.repository.districts()?;
        let mut entries = Vec::with_capacity(districts.len());
        for district in &districts {
            let latest = self.latest_record(district.id)?;
            entries.push(MapDistrict::from_parts(district, latest.as_ref()));
        }
        Ok(entries)
    }

    /// A district's latest score against province and national averages,
    /// plus up to five districts scoring within the similarity window.
    pub fn comparative_analysis(
        &self,
        district_id: i64,
    ) -> Result<ComparativeAnalysis, PortalServiceError> {
        let all = self.map_data()?;
        let district = all
            .iter()
            .find(|entry| entry.id == district_id)
            .cloned()
            .ok_or(PortalServiceError::DistrictNotFound(district_id))?;

        let province_scores: Vec<f64> = all
            .iter()
            .filter(|entry| entry.id != district_id && entry.province == district.province)
            .filter(|entry| entry.scores.is_some())
            .map(|entry| entry.sovi_score)
            .collect();
        let national_scores: Vec<f64> = all
            .iter()
            .filter(|entry| entry.scores.is_some())
            .map(|entry| entry.sovi_score)
            .collect();

        let similar_districts: Vec<MapDistrict> = all
            .iter()
            .filter(|entry| {
                entry.id != district_id
                    && entry.scores.is_some()
                    && (entry.sovi_score - district.sovi_score).abs() <= SIMILARITY_WINDOW
            })
            .take(SIMILAR_DISTRICT_LIMIT)
            .cloned()
            .collect();

        Ok(ComparativeAnalysis {
            district,
            province_average: round2(mean(&province_scores)),
            national_average: round2(mean(&national_scores)),
            similar_districts,
        })
    }

    /// Submit many district-years; one bad row never aborts the batch.
    pub fn bulk_submit(&self, submissions: Vec<IndicatorSubmission>) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for submission in submissions {
            let district_id = submission.district_id;
            let year = submission.year;
            match self.submit_indicators(submission) {
                Ok(_) => outcome.success += 1,
                Err(error) => {
                    outcome.failed += 1;
                    outcome
                        .errors
                        .push(format!("district {district_id} year {year}: {error}"));
                }
            }
        }
        outcome
    }

    /// Dry-run calculation: scores a payload without persisting anything and
    /// without range validation, exactly like the preview endpoint.
    pub fn preview(&self, values: &IndicatorValues) -> CalculatedScores {
        self.engine.calculate(values)
    }

    /// Engine passthrough for the improvement sanity check.
    pub fn validate_improvement(
        &self,
        current: &IndicatorValues,
        proposed: &IndicatorValues,
    ) -> ImprovementValidation {
        self.engine.validate_improvement(current, proposed)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Error raised by the portal service.
#[derive(Debug, thiserror::Error)]
pub enum PortalServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("district {0} not found")]
    DistrictNotFound(i64),
    #[error("no survey data found for district {0}")]
    NoDataForDistrict(i64),
    #[error("district data record {0} not found")]
    RecordNotFound(u64),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
