//! 날짜 및 타임프레임 검증.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ValidationError;

/// 기본 날짜 형식.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// 시장 데이터 요청에 허용되는 타임프레임.
pub const VALID_TIMEFRAMES: [&str; 9] = [
    "1Min", "5Min", "15Min", "30Min", "1Hour", "4Hour", "1Day", "1Week", "1Month",
];

/// 날짜 문자열을 파싱합니다.
///
/// 시간 성분이 없는 형식(예: `%Y-%m-%d`)은 자정으로 해석됩니다.
pub fn validate_date(date: &str, format: &str) -> Result<NaiveDateTime, ValidationError> {
    if date.is_empty() {
        return Err(ValidationError::Date("date must not be empty".into()));
    }

    NaiveDateTime::parse_from_str(date, format)
        .or_else(|err| {
            NaiveDate::parse_from_str(date, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or(err)
        })
        .map_err(|e| {
            ValidationError::Date(format!(
                "'{}' does not match format '{}': {}",
                date, format, e
            ))
        })
}

/// 날짜 범위를 검증합니다. 시작일이 종료일보다 늦으면 실패합니다.
pub fn validate_date_range(
    start: &str,
    end: &str,
    format: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), ValidationError> {
    let start_dt = validate_date(start, format)?;
    let end_dt = validate_date(end, format)?;

    if start_dt > end_dt {
        return Err(ValidationError::Date(format!(
            "start date ({}) must not be after end date ({})",
            start, end
        )));
    }

    Ok((start_dt, end_dt))
}

/// 타임프레임 문자열을 검증합니다.
pub fn validate_timeframe(timeframe: &str) -> Result<String, ValidationError> {
    if timeframe.is_empty() {
        return Err(ValidationError::Date("timeframe must not be empty".into()));
    }
    if !VALID_TIMEFRAMES.contains(&timeframe) {
        return Err(ValidationError::Date(format!(
            "timeframe '{}' must be one of: {}",
            timeframe,
            VALID_TIMEFRAMES.join(", ")
        )));
    }

    Ok(timeframe.to_string())
}
