use serde::{Deserialize, Serialize};

use super::config::{RatingBand, ScoringConfig};
use crate::sovi::domain::{CalculatedScores, IndicatorCategory, IndicatorValues};

/// Accepted range for a single-update change of the composite score.
/// Policy constants, not derived from the weight tables.
const IMPROVEMENT_FLOOR: f64 = -10.0;
const IMPROVEMENT_CEILING: f64 = 50.0;

/// Stateless calculator turning raw indicators into SoVI scores.
///
/// Every operation is a pure function of its inputs and the bound
/// [`ScoringConfig`]; the engine never validates ranges and never fails on
/// finite numeric input.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Engine bound to the published reference configuration.
    pub fn reference() -> Self {
        Self::new(ScoringConfig::reference())
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Weighted sum of one category's indicators, absent values counting as
    /// zero, rounded to two decimals.
    pub fn category_score(&self, category: IndicatorCategory, values: &IndicatorValues) -> f64 {
        let raw = match category {
            IndicatorCategory::Education => {
                let w = &self.config.education;
                coalesce(values.noscl) * w.noscl
                    + coalesce(values.primsc) * w.primsc
                    + coalesce(values.enrlpr) * w.enrlpr
                    + coalesce(values.enrma) * w.enrma
                    + coalesce(values.pats) * w.pats
                    + coalesce(values.adllit) * w.adllit
            }
            IndicatorCategory::Health => {
                let w = &self.config.health;
                coalesce(values.diarr) * w.diarr
                    + coalesce(values.immun) * w.immun
                    + coalesce(values.wtti) * w.wtti
                    + coalesce(values.cbylady_h_w_pre) * w.cbylady_h_w_pre
                    + coalesce(values.cbylady_h_w_post) * w.cbylady_h_w_post
                    + coalesce(values.pnconsl) * w.pnconsl
                    + coalesce(values.fertility) * w.fertility
                    + coalesce(values.chdisabl) * w.chdisabl
            }
            IndicatorCategory::Facility => {
                let w = &self.config.facility;
                coalesce(values.tenure) * w.tenure
                    + coalesce(values.rooms) * w.rooms
                    + coalesce(values.electric) * w.electric
                    + coalesce(values.tapwater) * w.tapwater
                    + coalesce(values.media) * w.media
                    + coalesce(values.internet) * w.internet
            }
            IndicatorCategory::Economic => {
                let w = &self.config.economic;
                coalesce(values.ecoh) * w.ecoh
                    + coalesce(values.bhu_f) * w.bhu_f
                    + coalesce(values.fmly_p) * w.fmly_p
                    + coalesce(values.sch_f) * w.sch_f
                    + coalesce(values.vat_f) * w.vat_f
                    + coalesce(values.agro_f) * w.agro_f
                    + coalesce(values.pol_f) * w.pol_f
            }
            IndicatorCategory::Population => {
                let w = &self.config.population;
                coalesce(values.qold) * w.qold
                    + coalesce(values.qmid) * w.qmid
                    + coalesce(values.fpop) * w.fpop
                    + coalesce(values.rpop) * w.rpop
                    + coalesce(values.upop) * w.upop
                    + coalesce(values.qkids) * w.qkids
                    + coalesce(values.growth_rate) * w.growth_rate
            }
        };
        round2(raw)
    }

    /// All five category scores, the composite total, and the rating.
    ///
    /// The total composes the rounded category scores, so assembling scores
    /// one category at a time gives the same result.
    pub fn calculate(&self, values: &IndicatorValues) -> CalculatedScores {
        let education = self.category_score(IndicatorCategory::Education, values);
        let health = self.category_score(IndicatorCategory::Health, values);
        let facility = self.category_score(IndicatorCategory::Facility, values);
        let economic = self.category_score(IndicatorCategory::Economic, values);
        let population = self.category_score(IndicatorCategory::Population, values);

        let composite = &self.config.composite;
        let total = round2(
            education * composite.education
                + health * composite.health
                + facility * composite.facility
                + economic * composite.economic
                + population * composite.population,
        );

        let rating = self.classify(total).map(|band| band.rating).unwrap_or_default();

        CalculatedScores {
            education,
            health,
            facility,
            economic,
            population,
            total,
            rating,
        }
    }

    /// Band for a composite total. Totals outside every band (negative, or
    /// above 100 from unclamped inputs) deliberately classify as the FIRST
    /// band rather than the nearest one. None only for a configuration with
    /// no bands at all.
    pub fn classify(&self, total: f64) -> Option<&RatingBand> {
        let bands = &self.config.bands;
        bands
            .iter()
            .find(|band| total >= band.floor && total <= band.ceiling)
            .or_else(|| bands.first())
    }

    /// Display label for an integer rating, "Unknown" when no band carries it.
    pub fn rating_label(&self, rating: u8) -> &str {
        self.config
            .bands
            .iter()
            .find(|band| band.rating == rating)
            .map(|band| band.label.as_str())
            .unwrap_or("Unknown")
    }

    /// Score both records and judge whether the composite change stays
    /// within the accepted single-update window. Always returns a result;
    /// an out-of-window change is a normal `is_valid: false` outcome.
    pub fn validate_improvement(
        &self,
        current: &IndicatorValues,
        proposed: &IndicatorValues,
    ) -> ImprovementValidation {
        let current_scores = self.calculate(current);
        let proposed_scores = self.calculate(proposed);

        let improvements = ImprovementDeltas {
            education: round2(proposed_scores.education - current_scores.education),
            health: round2(proposed_scores.health - current_scores.health),
            economic: round2(proposed_scores.economic - current_scores.economic),
            facility: round2(proposed_scores.facility - current_scores.facility),
            population: round2(proposed_scores.population - current_scores.population),
            total: round2(proposed_scores.total - current_scores.total),
        };

        let is_valid =
            improvements.total >= IMPROVEMENT_FLOOR && improvements.total <= IMPROVEMENT_CEILING;

        let message = if is_valid {
            "Score improvement is within acceptable range".to_string()
        } else {
            "Score improvement is outside acceptable range".to_string()
        };

        ImprovementValidation {
            is_valid,
            message,
            improvements,
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::reference()
    }
}

/// Outcome of comparing two scored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementValidation {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub message: String,
    pub improvements: ImprovementDeltas,
}

/// Per-score deltas (proposed minus current), rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImprovementDeltas {
    #[serde(rename = "Sedu")]
    pub education: f64,
    #[serde(rename = "Shealth")]
    pub health: f64,
    #[serde(rename = "Seconomic")]
    pub economic: f64,
    #[serde(rename = "Sfacility")]
    pub facility: f64,
    #[serde(rename = "Spopulation")]
    pub population: f64,
    #[serde(rename = "totalSoVI")]
    pub total: f64,
}

fn coalesce(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Round to two decimals, ties away from zero.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
