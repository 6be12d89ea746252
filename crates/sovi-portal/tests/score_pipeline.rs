use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sovi_portal::sovi::{
    CreateDistrict, District, DistrictDataRecord, DistrictRepository, IndicatorSubmission,
    IndicatorValues, PortalService, RepositoryError, ScoringConfig,
};

#[derive(Default)]
struct MemoryRepository {
    districts: Mutex<HashMap<i64, District>>,
    records: Mutex<HashMap<u64, DistrictDataRecord>>,
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
        guard
            .remove(&record_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

fn kasur_2024(district_id: i64, year: i32) -> IndicatorSubmission {
    let mut indicators = IndicatorValues::default();
    indicators.noscl = Some(75.0);
    indicators.primsc = Some(65.0);
    indicators.enrlpr = Some(70.0);
    indicators.enrma = Some(60.0);
    indicators.pats = Some(45.0);
    indicators.adllit = Some(55.0);
    indicators.immun = Some(80.0);
    indicators.electric = Some(90.0);
    indicators.tapwater = Some(65.0);
    indicators.ecoh = Some(40.0);
    indicators.sch_f = Some(70.0);
    indicators.rpop = Some(65.0);
    indicators.growth_rate = Some(2.4);
    IndicatorSubmission {
        district_id,
        year,
        indicators,
    }
}

#[test]
fn survey_data_flows_from_submission_to_map_and_trends() {
    let repository = Arc::new(MemoryRepository::default());
    let service = PortalService::new(repository, ScoringConfig::reference());

    let kasur = service
        .create_district(CreateDistrict {
            name: "Kasur".to_string(),
            fid: Some("district_boundary.9".to_string()),
            division: Some("Lahore".to_string()),
            province: Some("Punjab".to_string()),
            country: None,
        })
        .expect("district registers");

    let first = service
        .submit_indicators(kasur_2024(kasur.id, 2023))
        .expect("2023 persists");
    assert!(first.scores.total > 0.0);
    assert!(first.scores.rating >= 1);

    let mut improved = kasur_2024(kasur.id, 2024);
    improved.indicators.adllit = Some(70.0);
    let second = service.submit_indicators(improved).expect("2024 persists");
    assert!(second.scores.education > first.scores.education);

    // projection follows the newest year
    let map = service.map_data().expect("map loads");
    let entry = map.iter().find(|d| d.id == kasur.id).expect("kasur mapped");
    assert_eq!(entry.sovi_score, second.scores.total);
    assert_eq!(entry.rating, second.scores.rating);

    // trends run oldest to newest
    let trends = service.yearly_trends(kasur.id).expect("trends load");
    assert_eq!(trends.years, vec![2023, 2024]);
    assert_eq!(trends.scores, vec![first.scores.total, second.scores.total]);

    // the dry-run path sees the same engine
    let preview = service.preview(&kasur_2024(kasur.id, 2024).indicators);
    assert_eq!(preview.total, first.scores.total);

    // a modest year-over-year change passes the improvement check
    let improvement = service.validate_improvement(
        &kasur_2024(kasur.id, 2023).indicators,
        &service.latest(kasur.id).expect("latest present").indicators,
    );
    assert!(improvement.is_valid);

    let label = service.engine().rating_label(second.scores.rating);
    assert_ne!(label, "Unknown");
}
