use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::sovi::domain::{
    CreateDistrict, District, DistrictDataRecord, IndicatorSubmission, IndicatorValues,
};
use crate::sovi::repository::{DistrictRepository, RepositoryError};
use crate::sovi::scoring::{ScoreEngine, ScoringConfig};
use crate::sovi::service::PortalService;

pub(super) fn reference_engine() -> ScoreEngine {
    ScoreEngine::new(ScoringConfig::reference())
}

/// Survey values in the style of the Kasur seed row. Expected category
/// scores under the reference weights:
/// Sedu 63.75, Shealth 44.03, Sfacility 52.30, Seconomic 52.75,
/// Spopulation 40.81, totalSoVI 50.73, rating 3.
pub(super) fn kasur_indicators() -> IndicatorValues {
    let mut values = IndicatorValues::default();
    for (code, value) in [
        ("NOSCL", 75.0),
        ("PRIMSC", 65.0),
        ("ENRLPR", 70.0),
        ("ENRMA", 60.0),
        ("PATS", 45.0),
        ("ADLLIT", 55.0),
        ("DIARR", 25.0),
        ("IMMUN", 80.0),
        ("WTTI", 70.0),
        ("CbyladyH_W_PRE", 55.0),
        ("CbyladyH_W_POST", 50.0),
        ("PNCONSL", 60.0),
        ("FERTILITY", 3.8),
        ("CHDISABL", 8.0),
        ("TENURE", 70.0),
        ("ROOMS", 4.0),
        ("ELECTRIC", 90.0),
        ("TAPWATER", 65.0),
        ("MEDIA", 55.0),
        ("INTERNET", 35.0),
        ("QAGRI", 60.0),
        ("REMITT", 20.0),
        ("ECoH", 40.0),
        ("BHU_F", 65.0),
        ("Fmly_P", 50.0),
        ("Sch_F", 70.0),
        ("Vat_F", 45.0),
        ("Agro_F", 55.0),
        ("Pol_F", 30.0),
        ("QOLD", 35.0),
        ("QMID", 55.0),
        ("Fpop", 48.0),
        ("Rpop", 65.0),
        ("Upop", 35.0),
        ("QKIDS", 45.0),
        ("Growth_Rate", 2.4),
    ] {
        assert!(values.set(code, value), "unknown survey code {code}");
    }
    values
}

/// Indicator sets engineered so every category — and therefore the
/// composite — scores exactly `level`. Education and economic indicators
/// sit flat at `level` (their weights sum to 1.0); health, facility, and
/// population values are hand-picked per level so each stays within its
/// declared range, which lets these fixtures pass the write-path validator.
pub(super) fn survey_scoring(level: u32) -> IndicatorValues {
    let flat = level as f64;
    let mut values = IndicatorValues::default();
    for code in [
        "NOSCL", "PRIMSC", "ENRLPR", "ENRMA", "PATS", "ADLLIT", "ECoH", "BHU_F", "Fmly_P",
        "Sch_F", "Vat_F", "Agro_F", "Pol_F",
    ] {
        values.set(code, flat);
    }

    let (health, facility, population): (&[(&str, f64)], &[(&str, f64)], &[(&str, f64)]) =
        match level {
            5 => (
                &[("DIARR", 50.0)],
                &[("ELECTRIC", 25.0)],
                &[("QMID", 50.0)],
            ),
            15 => (
                &[("DIARR", 50.0), ("IMMUN", 80.0)],
                &[("ELECTRIC", 50.0), ("TAPWATER", 25.0)],
                &[("QMID", 100.0), ("Upop", 40.0)],
            ),
            50 => (
                &[
                    ("DIARR", 50.0),
                    ("IMMUN", 100.0),
                    ("WTTI", 100.0),
                    ("CbyladyH_W_PRE", 25.0),
                    ("PNCONSL", 100.0),
                ],
                &[
                    ("TENURE", 40.0),
                    ("ELECTRIC", 100.0),
                    ("TAPWATER", 100.0),
                    ("MEDIA", 40.0),
                ],
                &[
                    ("QOLD", 100.0),
                    ("QMID", 25.0),
                    ("Fpop", 100.0),
                    ("Rpop", 100.0),
                ],
            ),
            52 => (
                &[
                    ("DIARR", 50.0),
                    ("IMMUN", 100.0),
                    ("WTTI", 100.0),
                    ("CbyladyH_W_PRE", 45.0),
                    ("PNCONSL", 100.0),
                ],
                &[("ELECTRIC", 100.0), ("TAPWATER", 90.0), ("MEDIA", 80.0)],
                &[
                    ("QOLD", 100.0),
                    ("QMID", 45.0),
                    ("Fpop", 100.0),
                    ("Rpop", 100.0),
                ],
            ),
            65 => (
                &[
                    ("DIARR", 50.0),
                    ("IMMUN", 100.0),
                    ("WTTI", 100.0),
                    ("PNCONSL", 100.0),
                    ("CHDISABL", 100.0),
                ],
                &[
                    ("ELECTRIC", 100.0),
                    ("TAPWATER", 85.0),
                    ("MEDIA", 80.0),
                    ("INTERNET", 80.0),
                ],
                &[
                    ("QOLD", 100.0),
                    ("QMID", 50.0),
                    ("Fpop", 100.0),
                    ("Rpop", 100.0),
                    ("Upop", 100.0),
                ],
            ),
            other => panic!("no engineered survey fixture for level {other}"),
        };

    for (code, value) in health.iter().chain(facility).chain(population) {
        values.set(code, *value);
    }
    values
}

pub(super) fn submission(district_id: i64, year: i32) -> IndicatorSubmission {
    IndicatorSubmission {
        district_id,
        year,
        indicators: kasur_indicators(),
    }
}

pub(super) fn punjab_district(name: &str) -> CreateDistrict {
    CreateDistrict {
        name: name.to_string(),
        fid: Some(format!("district_boundary.{}", name.len())),
        division: Some("Lahore".to_string()),
        province: Some("Punjab".to_string()),
        country: None,
    }
}

pub(super) fn build_service() -> (PortalService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PortalService::new(repository.clone(), ScoringConfig::reference());
    (service, repository)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    districts: Arc<Mutex<HashMap<i64, District>>>,
    records: Arc<Mutex<HashMap<u64, DistrictDataRecord>>>,
}

impl DistrictRepository for MemoryRepository {
    fn insert_district(&self, district: District) -> Result<District, RepositoryError> {
        let mut guard = self.districts.lock().expect("district mutex poisoned");
        if guard.contains_key(&district.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(district.id, district.clone());
        Ok(district)
    }

    fn update_district(&self, district: District) -> Result<(), RepositoryError> {
        let mut guard = self.districts.lock().expect("district mutex poisoned");
        if guard.contains_key(&district.id) {
            guard.insert(district.id, district);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_district(&self, district_id: i64) -> Result<Option<District>, RepositoryError> {
        let guard = self.districts.lock().expect("district mutex poisoned");
        Ok(guard.get(&district_id).cloned())
    }

    fn districts(&self) -> Result<Vec<District>, RepositoryError> {
        let guard = self.districts.lock().expect("district mutex poisoned");
        let mut all: Vec<District> = guard.values().cloned().collect();
        all.sort_by_key(|district| district.id);
        Ok(all)
    }

    fn upsert_record(
        &self,
        record: DistrictDataRecord,
    ) -> Result<DistrictDataRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn fetch_record(&self, record_id: u64) -> Result<Option<DistrictDataRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard.get(&record_id).cloned())
    }

    fn records_for_district(
        &self,
        district_id: i64,
    ) -> Result<Vec<DistrictDataRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        let mut records: Vec<DistrictDataRecord> = guard
            .values()
            .filter(|record| record.district_id == district_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| std::cmp::Reverse(record.year));
        Ok(records)
    }

    fn delete_record(&self, record_id: u64) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        guard.remove(&record_id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
