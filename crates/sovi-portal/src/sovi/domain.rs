use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five indicator groups a district is surveyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorCategory {
    Education,
    Health,
    Facility,
    Economic,
    Population,
}

impl IndicatorCategory {
    pub const ALL: [IndicatorCategory; 5] = [
        IndicatorCategory::Education,
        IndicatorCategory::Health,
        IndicatorCategory::Facility,
        IndicatorCategory::Economic,
        IndicatorCategory::Population,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IndicatorCategory::Education => "Education",
            IndicatorCategory::Health => "Health",
            IndicatorCategory::Facility => "Facility",
            IndicatorCategory::Economic => "Economic",
            IndicatorCategory::Population => "Population",
        }
    }
}

/// Raw survey indicators for one district-year. Field names follow the
/// survey codes on the wire; every indicator is optional and absent values
/// aggregate as zero downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValues {
    // Education
    #[serde(rename = "NOSCL", default)]
    pub noscl: Option<f64>,
    #[serde(rename = "PRIMSC", default)]
    pub primsc: Option<f64>,
    #[serde(rename = "ENRLPR", default)]
    pub enrlpr: Option<f64>,
    #[serde(rename = "ENRMA", default)]
    pub enrma: Option<f64>,
    #[serde(rename = "PATS", default)]
    pub pats: Option<f64>,
    #[serde(rename = "ADLLIT", default)]
    pub adllit: Option<f64>,

    // Health
    #[serde(rename = "DIARR", default)]
    pub diarr: Option<f64>,
    #[serde(rename = "IMMUN", default)]
    pub immun: Option<f64>,
    #[serde(rename = "WTTI", default)]
    pub wtti: Option<f64>,
    #[serde(rename = "CbyladyH_W_PRE", default)]
    pub cbylady_h_w_pre: Option<f64>,
    #[serde(rename = "CbyladyH_W_POST", default)]
    pub cbylady_h_w_post: Option<f64>,
    #[serde(rename = "PNCONSL", default)]
    pub pnconsl: Option<f64>,
    #[serde(rename = "FERTILITY", default)]
    pub fertility: Option<f64>,
    #[serde(rename = "CHDISABL", default)]
    pub chdisabl: Option<f64>,

    // Facility
    #[serde(rename = "TENURE", default)]
    pub tenure: Option<f64>,
    #[serde(rename = "ROOMS", default)]
    pub rooms: Option<f64>,
    #[serde(rename = "ELECTRIC", default)]
    pub electric: Option<f64>,
    #[serde(rename = "TAPWATER", default)]
    pub tapwater: Option<f64>,
    #[serde(rename = "MEDIA", default)]
    pub media: Option<f64>,
    #[serde(rename = "INTERNET", default)]
    pub internet: Option<f64>,

    // Economic (QAGRI and REMITT are surveyed but carry no weight)
    #[serde(rename = "QAGRI", default)]
    pub qagri: Option<f64>,
    #[serde(rename = "REMITT", default)]
    pub remitt: Option<f64>,
    #[serde(rename = "ECoH", default)]
    pub ecoh: Option<f64>,
    #[serde(rename = "BHU_F", default)]
    pub bhu_f: Option<f64>,
    #[serde(rename = "Fmly_P", default)]
    pub fmly_p: Option<f64>,
    #[serde(rename = "Sch_F", default)]
    pub sch_f: Option<f64>,
    #[serde(rename = "Vat_F", default)]
    pub vat_f: Option<f64>,
    #[serde(rename = "Agro_F", default)]
    pub agro_f: Option<f64>,
    #[serde(rename = "Pol_F", default)]
    pub pol_f: Option<f64>,

    // Population
    #[serde(rename = "QOLD", default)]
    pub qold: Option<f64>,
    #[serde(rename = "QMID", default)]
    pub qmid: Option<f64>,
    #[serde(rename = "Fpop", default)]
    pub fpop: Option<f64>,
    #[serde(rename = "Rpop", default)]
    pub rpop: Option<f64>,
    #[serde(rename = "Upop", default)]
    pub upop: Option<f64>,
    #[serde(rename = "QKIDS", default)]
    pub qkids: Option<f64>,
    #[serde(rename = "Growth_Rate", default)]
    pub growth_rate: Option<f64>,
}

impl IndicatorValues {
    /// Survey-code/value pairs, in declaration order.
    pub fn named_values(&self) -> [(&'static str, Option<f64>); 36] {
        [
            ("NOSCL", self.noscl),
            ("PRIMSC", self.primsc),
            ("ENRLPR", self.enrlpr),
            ("ENRMA", self.enrma),
            ("PATS", self.pats),
            ("ADLLIT", self.adllit),
            ("DIARR", self.diarr),
            ("IMMUN", self.immun),
            ("WTTI", self.wtti),
            ("CbyladyH_W_PRE", self.cbylady_h_w_pre),
            ("CbyladyH_W_POST", self.cbylady_h_w_post),
            ("PNCONSL", self.pnconsl),
            ("FERTILITY", self.fertility),
            ("CHDISABL", self.chdisabl),
            ("TENURE", self.tenure),
            ("ROOMS", self.rooms),
            ("ELECTRIC", self.electric),
            ("TAPWATER", self.tapwater),
            ("MEDIA", self.media),
            ("INTERNET", self.internet),
            ("QAGRI", self.qagri),
            ("REMITT", self.remitt),
            ("ECoH", self.ecoh),
            ("BHU_F", self.bhu_f),
            ("Fmly_P", self.fmly_p),
            ("Sch_F", self.sch_f),
            ("Vat_F", self.vat_f),
            ("Agro_F", self.agro_f),
            ("Pol_F", self.pol_f),
            ("QOLD", self.qold),
            ("QMID", self.qmid),
            ("Fpop", self.fpop),
            ("Rpop", self.rpop),
            ("Upop", self.upop),
            ("QKIDS", self.qkids),
            ("Growth_Rate", self.growth_rate),
        ]
    }

    /// Assign an indicator by survey code. Returns false for unknown codes.
    pub fn set(&mut self, code: &str, value: f64) -> bool {
        let slot = match code {
            "NOSCL" => &mut self.noscl,
            "PRIMSC" => &mut self.primsc,
            "ENRLPR" => &mut self.enrlpr,
            "ENRMA" => &mut self.enrma,
            "PATS" => &mut self.pats,
            "ADLLIT" => &mut self.adllit,
            "DIARR" => &mut self.diarr,
            "IMMUN" => &mut self.immun,
            "WTTI" => &mut self.wtti,
            "CbyladyH_W_PRE" => &mut self.cbylady_h_w_pre,
            "CbyladyH_W_POST" => &mut self.cbylady_h_w_post,
            "PNCONSL" => &mut self.pnconsl,
            "FERTILITY" => &mut self.fertility,
            "CHDISABL" => &mut self.chdisabl,
            "TENURE" => &mut self.tenure,
            "ROOMS" => &mut self.rooms,
            "ELECTRIC" => &mut self.electric,
            "TAPWATER" => &mut self.tapwater,
            "MEDIA" => &mut self.media,
            "INTERNET" => &mut self.internet,
            "QAGRI" => &mut self.qagri,
            "REMITT" => &mut self.remitt,
            "ECoH" => &mut self.ecoh,
            "BHU_F" => &mut self.bhu_f,
            "Fmly_P" => &mut self.fmly_p,
            "Sch_F" => &mut self.sch_f,
            "Vat_F" => &mut self.vat_f,
            "Agro_F" => &mut self.agro_f,
            "Pol_F" => &mut self.pol_f,
            "QOLD" => &mut self.qold,
            "QMID" => &mut self.qmid,
            "Fpop" => &mut self.fpop,
            "Rpop" => &mut self.rpop,
            "Upop" => &mut self.upop,
            "QKIDS" => &mut self.qkids,
            "Growth_Rate" => &mut self.growth_rate,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Create-or-update payload for one district-year of survey data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSubmission {
    #[serde(rename = "districtId")]
    pub district_id: i64,
    pub year: i32,
    #[serde(flatten)]
    pub indicators: IndicatorValues,
}

/// Derived scores. Always recomputed from [`IndicatorValues`], never edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatedScores {
    #[serde(rename = "Sedu")]
    pub education: f64,
    #[serde(rename = "Shealth")]
    pub health: f64,
    #[serde(rename = "Sfacility")]
    pub facility: f64,
    #[serde(rename = "Seconomic")]
    pub economic: f64,
    #[serde(rename = "Spopulation")]
    pub population: f64,
    #[serde(rename = "totalSoVI")]
    pub total: f64,
    pub rating: u8,
}

impl CalculatedScores {
    pub fn category(&self, category: IndicatorCategory) -> f64 {
        match category {
            IndicatorCategory::Education => self.education,
            IndicatorCategory::Health => self.health,
            IndicatorCategory::Facility => self.facility,
            IndicatorCategory::Economic => self.economic,
            IndicatorCategory::Population => self.population,
        }
    }
}

/// A district known to the portal, carrying the denormalized latest score
/// used by list and map queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: i64,
    pub name: String,
    pub fid: Option<String>,
    pub division: Option<String>,
    pub province: Option<String>,
    pub country: String,
    pub sovi_score: Option<f64>,
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDistrict {
    pub name: String,
    #[serde(default)]
    pub fid: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// One stored district-year: raw indicators plus the scores derived from
/// them at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictDataRecord {
    pub id: u64,
    #[serde(rename = "districtId")]
    pub district_id: i64,
    pub year: i32,
    #[serde(flatten)]
    pub indicators: IndicatorValues,
    #[serde(flatten)]
    pub scores: CalculatedScores,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Compact district row for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictListItem {
    pub id: i64,
    pub name: String,
    pub province: Option<String>,
    pub sovi_score: Option<f64>,
    pub rating: Option<u8>,
}

impl DistrictListItem {
    pub fn from_district(district: &District) -> Self {
        Self {
            id: district.id,
            name: district.name.clone(),
            province: district.province.clone(),
            sovi_score: district.sovi_score,
            rating: district.rating,
        }
    }
}

/// District plus its full survey history, newest year first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictDetail {
    #[serde(flatten)]
    pub district: District,
    pub data: Vec<DistrictDataRecord>,
}

/// Per-category breakdown attached to map entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    #[serde(rename = "Sedu")]
    pub education: f64,
    #[serde(rename = "Shealth")]
    pub health: f64,
    #[serde(rename = "Sfacility")]
    pub facility: f64,
    #[serde(rename = "Seconomic")]
    pub economic: f64,
    #[serde(rename = "Spopulation")]
    pub population: f64,
}

/// Map layer entry: district metadata with its latest score, defaulting to
/// score 0 / rating 1 when the district has no survey data yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDistrict {
    pub id: i64,
    pub name: String,
    pub fid: Option<String>,
    pub division: Option<String>,
    pub province: Option<String>,
    pub country: String,
    pub sovi_score: f64,
    pub rating: u8,
    pub scores: Option<CategoryScores>,
}

impl MapDistrict {
    pub fn from_parts(district: &District, latest: Option<&DistrictDataRecord>) -> Self {
        Self {
            id: district.id,
            name: district.name.clone(),
            fid: district.fid.clone(),
            division: district.division.clone(),
            province: district.province.clone(),
            country: district.country.clone(),
            sovi_score: latest.map(|record| record.scores.total).unwrap_or(0.0),
            rating: latest.map(|record| record.scores.rating).unwrap_or(1),
            scores: latest.map(|record| CategoryScores {
                education: record.scores.education,
                health: record.scores.health,
                facility: record.scores.facility,
                economic: record.scores.economic,
                population: record.scores.population,
            }),
        }
    }
}

/// Score series per year for charting, oldest year first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTrends {
    pub years: Vec<i32>,
    pub scores: Vec<f64>,
    pub parameters: TrendSeries,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    #[serde(rename = "Sedu")]
    pub education: Vec<f64>,
    #[serde(rename = "Shealth")]
    pub health: Vec<f64>,
    #[serde(rename = "Sfacility")]
    pub facility: Vec<f64>,
    #[serde(rename = "Seconomic")]
    pub economic: Vec<f64>,
    #[serde(rename = "Spopulation")]
    pub population: Vec<f64>,
}

/// A district's latest score against its province and national peers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeAnalysis {
    pub district: MapDistrict,
    pub province_average: f64,
    pub national_average: f64,
    pub similar_districts: Vec<MapDistrict>,
}

/// Outcome of a bulk submission; failed rows never abort the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}
