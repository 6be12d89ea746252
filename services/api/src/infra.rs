use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use sovi_portal::sovi::{
    CreateDistrict, District, DistrictDataRecord, DistrictRepository, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local storage backing the portal. The repository trait is the
/// persistence contract; swapping in a database adapter is a deployment
/// concern, not a portal one.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDistrictRepository {
    districts: Arc<Mutex<HashMap<i64, District>>>,
    records: Arc<Mutex<HashMap<u64, DistrictDataRecord>>>,
}

impl DistrictRepository for InMemoryDistrictRepository {
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

/// The district roster shipped with the portal's seed data.
pub(crate) fn reference_districts() -> Vec<CreateDistrict> {
    [
        ("Lahore", "Lahore", "Punjab"),
        ("Rawalpindi", "Rawalpindi", "Punjab"),
        ("Faisalabad", "Faisalabad", "Punjab"),
        ("Multan", "Multan", "Punjab"),
        ("Kasur", "Lahore", "Punjab"),
        ("Karachi", "Karachi", "Sindh"),
        ("Hyderabad", "Hyderabad", "Sindh"),
        ("Peshawar", "Peshawar", "Khyber Pakhtunkhwa"),
        ("Quetta", "Quetta", "Balochistan"),
        ("Gilgit", "Gilgit", "Gilgit-Baltistan"),
    ]
    .iter()
    .enumerate()
    .map(|(index, (name, division, province))| CreateDistrict {
        name: name.to_string(),
        fid: Some(format!("district_boundary.{}", index + 1)),
        division: Some(division.to_string()),
        province: Some(province.to_string()),
        country: None,
    })
    .collect()
}
