use crate::sovi::domain::{District, DistrictDataRecord};

/// Storage abstraction so the portal service can be exercised in isolation.
/// Implementations supply districts and their per-year survey records; the
/// service owns identity assignment and score derivation.
pub trait DistrictRepository: Send + Sync {
    fn insert_district(&self, district: District) -> Result<District, RepositoryError>;
    fn update_district(&self, district: District) -> Result<(), RepositoryError>;
    fn fetch_district(&self, district_id: i64) -> Result<Option<District>, RepositoryError>;
    fn districts(&self) -> Result<Vec<District>, RepositoryError>;

    /// Insert or replace the record with the given id.
    fn upsert_record(&self, record: DistrictDataRecord) -> Result<DistrictDataRecord, RepositoryError>;
    fn fetch_record(&self, record_id: u64) -> Result<Option<DistrictDataRecord>, RepositoryError>;
    /// All records for one district, newest year first.
    fn records_for_district(
        &self,
        district_id: i64,
    ) -> Result<Vec<DistrictDataRecord>, RepositoryError>;
    fn delete_record(&self, record_id: u64) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
