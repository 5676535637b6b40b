//! 비율 및 범위 검증.

use crate::error::ValidationError;

/// 비율을 `[min, max]` 범위 안에서 검증합니다.
///
/// 비율은 0.0~1.0 스케일입니다 (0.05 = 5%).
pub fn validate_percentage(
    value: f64,
    min: f64,
    max: f64,
    name: &str,
) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::Percentage(format!(
            "{} must be numeric, got {}",
            name, value
        )));
    }
    if value < min || value > max {
        return Err(ValidationError::Percentage(format!(
            "{} must be between {}% and {}%, got {}%",
            name,
            min * 100.0,
            max * 100.0,
            value * 100.0
        )));
    }

    Ok(value)
}

/// 값이 `[min, max]` 범위 안에 있는지 검증합니다.
pub fn validate_range(value: f64, min: f64, max: f64, name: &str) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::Value(format!(
            "{} must be numeric, got {}",
            name, value
        )));
    }
    if value < min || value > max {
        return Err(ValidationError::Value(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }

    Ok(value)
}

/// 양의 정수인지 검증합니다.
pub fn validate_positive_integer(value: i64, name: &str) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::Value(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }

    Ok(value)
}
