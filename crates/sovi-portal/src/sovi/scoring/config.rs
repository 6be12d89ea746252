use serde::{Deserialize, Serialize};

/// Immutable weight and threshold tables driving one engine instance.
///
/// Weights are applied exactly as given; the engine never normalizes or
/// checks that a category sums to 1.0 (the reference facility weights sum
/// to 0.9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub education: EducationWeights,
    pub health: HealthWeights,
    pub facility: FacilityWeights,
    pub economic: EconomicWeights,
    pub population: PopulationWeights,
    pub composite: CompositeWeights,
    pub bands: Vec<RatingBand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EducationWeights {
    pub noscl: f64,
    pub primsc: f64,
    pub enrlpr: f64,
    pub enrma: f64,
    pub pats: f64,
    pub adllit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    pub diarr: f64,
    pub immun: f64,
    pub wtti: f64,
    pub cbylady_h_w_pre: f64,
    pub cbylady_h_w_post: f64,
    pub pnconsl: f64,
    pub fertility: f64,
    pub chdisabl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacilityWeights {
    pub tenure: f64,
    pub rooms: f64,
    pub electric: f64,
    pub tapwater: f64,
    pub media: f64,
    pub internet: f64,
}

/// QAGRI and REMITT are surveyed alongside these but deliberately carry no
/// weight in the economic score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicWeights {
    pub ecoh: f64,
    pub bhu_f: f64,
    pub fmly_p: f64,
    pub sch_f: f64,
    pub vat_f: f64,
    pub agro_f: f64,
    pub pol_f: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationWeights {
    pub qold: f64,
    pub qmid: f64,
    pub fpop: f64,
    pub rpop: f64,
    pub upop: f64,
    pub qkids: f64,
    pub growth_rate: f64,
}

/// Weight of each category score in the composite SoVI total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub education: f64,
    pub health: f64,
    pub facility: f64,
    pub economic: f64,
    pub population: f64,
}

/// One vulnerability band: an inclusive score range mapped to an integer
/// rating and a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBand {
    pub floor: f64,
    pub ceiling: f64,
    pub rating: u8,
    pub label: String,
}

impl RatingBand {
    fn new(floor: f64, ceiling: f64, rating: u8, label: &str) -> Self {
        Self {
            floor,
            ceiling,
            rating,
            label: label.to_string(),
        }
    }
}

impl ScoringConfig {
    /// The published SoVI reference configuration.
    ///
    /// Band floors sit at x.01 because composite scores are rounded to two
    /// decimals before classification; totals outside [0, 100] fall back to
    /// the first band.
    pub fn reference() -> Self {
        Self {
            education: EducationWeights {
                noscl: 0.3,
                primsc: 0.15,
                enrlpr: 0.15,
                enrma: 0.1,
                pats: 0.15,
                adllit: 0.15,
            },
            health: HealthWeights {
                diarr: 0.1,
                immun: 0.125,
                wtti: 0.125,
                cbylady_h_w_pre: 0.1,
                cbylady_h_w_post: 0.1,
                pnconsl: 0.175,
                fertility: 0.1,
                chdisabl: 0.175,
            },
            facility: FacilityWeights {
                tenure: 0.075,
                rooms: 0.075,
                electric: 0.2,
                tapwater: 0.2,
                media: 0.175,
                internet: 0.175,
            },
            economic: EconomicWeights {
                ecoh: 0.2,
                bhu_f: 0.15,
                fmly_p: 0.15,
                sch_f: 0.2,
                vat_f: 0.05,
                agro_f: 0.15,
                pol_f: 0.1,
            },
            population: PopulationWeights {
                qold: 0.15,
                qmid: 0.1,
                fpop: 0.15,
                rpop: 0.175,
                upop: 0.125,
                qkids: 0.15,
                growth_rate: 0.15,
            },
            composite: CompositeWeights {
                education: 0.2,
                health: 0.2,
                facility: 0.2,
                economic: 0.2,
                population: 0.2,
            },
            bands: vec![
                RatingBand::new(0.0, 20.0, 1, "Very-Low"),
                RatingBand::new(20.01, 40.0, 2, "Low"),
                RatingBand::new(40.01, 60.0, 3, "Medium"),
                RatingBand::new(60.01, 80.0, 4, "High"),
                RatingBand::new(80.01, 100.0, 5, "Extreme"),
            ],
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::reference()
    }
}
