use crate::sovi::domain::IndicatorSubmission;

/// Accumulated input violations for a rejected submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("validation failed: {}", .errors.join(", "))]
pub struct ValidationFailure {
    pub errors: Vec<String>,
}

/// Declared bounds per survey code. Most indicators are percentages; the
/// fertility rate, room count, and growth rate use their own scales.
pub fn declared_bounds(code: &str) -> (f64, f64) {
    match code {
        "FERTILITY" | "ROOMS" => (0.0, 10.0),
        "Growth_Rate" => (-10.0, 10.0),
        _ => (0.0, 100.0),
    }
}

/// Range and identity checks for the persisting write path. Runs before the
/// engine; the engine itself performs no validation. Collects every
/// violation rather than stopping at the first.
pub fn validate_submission(submission: &IndicatorSubmission) -> Result<(), ValidationFailure> {
    let mut errors = Vec::new();

    if submission.district_id <= 0 {
        errors.push("District ID is required".to_string());
    }
    if !(2000..=2100).contains(&submission.year) {
        errors.push("Year must be between 2000 and 2100".to_string());
    }

    for (code, value) in submission.indicators.named_values() {
        if let Some(value) = value {
            let (min, max) = declared_bounds(code);
            if !value.is_finite() || value < min || value > max {
                errors.push(format!("{code} must be between {min} and {max}"));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure { errors })
    }
}
