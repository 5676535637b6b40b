//! 원시 설정 테이블에서 타입이 있는 필드를 읽는 도구.
//!
//! 소스 로더는 값을 검증하지 않고 그대로 모으기 때문에, 여기서 타입 변환과
//! 필드 단위 제약 검사를 수행합니다. 모든 실패는 섹션과 필드 이름이 붙은
//! [`SchemaError`]로 보고됩니다.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{SchemaError, ValidationError};

/// 타입이 없는 중첩 설정 테이블.
///
/// 최상위 키는 섹션 이름입니다 (예: `broker`, `database`).
pub type RawTable = serde_json::Map<String, Value>;

/// 실수 범위의 한쪽 경계.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// 경계값 포함 (`>=`, `<=`)
    Inclusive(f64),
    /// 경계값 제외 (`>`, `<`)
    Exclusive(f64),
    /// 제한 없음
    Unbounded,
}

impl Bound {
    fn allows_above(self, value: f64) -> bool {
        match self {
            Bound::Inclusive(min) => value >= min,
            Bound::Exclusive(min) => value > min,
            Bound::Unbounded => true,
        }
    }

    fn allows_below(self, value: f64) -> bool {
        match self {
            Bound::Inclusive(max) => value <= max,
            Bound::Exclusive(max) => value < max,
            Bound::Unbounded => true,
        }
    }
}

/// 실수 값이 `(lower, upper)` 경계 안에 있는지 검사합니다.
pub fn check_bounds(value: f64, lower: Bound, upper: Bound) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::Config(format!(
            "must be a finite number, got {}",
            value
        )));
    }
    if !lower.allows_above(value) {
        let op = match lower {
            Bound::Exclusive(_) => ">",
            _ => ">=",
        };
        let min = match lower {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
            Bound::Unbounded => f64::NEG_INFINITY,
        };
        return Err(ValidationError::Config(format!(
            "must be {} {}, got {}",
            op, min, value
        )));
    }
    if !upper.allows_below(value) {
        let op = match upper {
            Bound::Exclusive(_) => "<",
            _ => "<=",
        };
        let max = match upper {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
            Bound::Unbounded => f64::INFINITY,
        };
        return Err(ValidationError::Config(format!(
            "must be {} {}, got {}",
            op, max, value
        )));
    }

    Ok(value)
}

/// 루트 테이블에서 섹션 테이블을 찾습니다.
///
/// 섹션이 없거나 `null`이면 `None`을 반환합니다. 테이블이 아닌 값이면 실패합니다.
pub fn section_table<'a>(
    raw: &'a RawTable,
    section: &'static str,
) -> Result<Option<&'a RawTable>, SchemaError> {
    match raw.get(section) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(table)) => Ok(Some(table)),
        Some(other) => Err(SchemaError::new(
            section,
            "*",
            ValidationError::Config(format!(
                "section must be a table, got {}",
                type_name(other)
            )),
        )),
    }
}

/// 한 섹션의 필드를 읽는 리더.
#[derive(Debug, Clone, Copy)]
pub struct SectionReader<'a> {
    section: &'static str,
    table: &'a RawTable,
}

impl<'a> SectionReader<'a> {
    /// 새 섹션 리더를 생성합니다.
    pub fn new(section: &'static str, table: &'a RawTable) -> Self {
        Self { section, table }
    }

    /// 섹션 이름을 반환합니다.
    pub fn section(&self) -> &'static str {
        self.section
    }

    /// 필드에 대한 스키마 에러를 생성합니다.
    pub fn error(&self, field: &'static str, source: ValidationError) -> SchemaError {
        SchemaError::new(self.section, field, source)
    }

    /// 검증 결과에 필드 정보를 붙입니다.
    pub fn check<T>(
        &self,
        field: &'static str,
        result: Result<T, ValidationError>,
    ) -> Result<T, SchemaError> {
        result.map_err(|e| self.error(field, e))
    }

    fn raw(&self, field: &str) -> Option<&'a Value> {
        self.table.get(field).filter(|v| !v.is_null())
    }

    fn type_error(&self, field: &'static str, expected: &str, got: &Value) -> SchemaError {
        self.error(
            field,
            ValidationError::Config(format!("expected {}, got {}", expected, describe(got))),
        )
    }

    /// 문자열 필드를 읽습니다. 스칼라 값은 문자열로 변환됩니다.
    pub fn string(&self, field: &'static str, default: &str) -> Result<String, SchemaError> {
        match self.raw(field) {
            None => Ok(default.to_string()),
            Some(value) => self.coerce_string(field, value),
        }
    }

    /// 기본값이 없는 필수 문자열 필드를 읽습니다.
    pub fn required_string(&self, field: &'static str) -> Result<String, SchemaError> {
        match self.raw(field) {
            None => Err(self.error(
                field,
                ValidationError::Config("field is required".into()),
            )),
            Some(value) => self.coerce_string(field, value),
        }
    }

    fn coerce_string(&self, field: &'static str, value: &Value) -> Result<String, SchemaError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(self.type_error(field, "a string", other)),
        }
    }

    /// 불리언 필드를 읽습니다.
    pub fn bool(&self, field: &'static str, default: bool) -> Result<bool, SchemaError> {
        let Some(value) = self.raw(field) else {
            return Ok(default);
        };

        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
            Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(self.type_error(field, "a boolean", value)),
            },
            other => Err(self.type_error(field, "a boolean", other)),
        }
    }

    /// 정수 필드를 읽고 `[min, max]` 범위를 검사합니다.
    pub fn int(
        &self,
        field: &'static str,
        default: i64,
        min: i64,
        max: Option<i64>,
    ) -> Result<i64, SchemaError> {
        let value = match self.raw(field) {
            None => default,
            Some(value) => self.coerce_int(field, value)?,
        };

        if value < min {
            return Err(self.error(
                field,
                ValidationError::Config(format!("must be >= {}, got {}", min, value)),
            ));
        }
        if let Some(max) = max {
            if value > max {
                return Err(self.error(
                    field,
                    ValidationError::Config(format!("must be <= {}, got {}", max, value)),
                ));
            }
        }

        Ok(value)
    }

    fn coerce_int(&self, field: &'static str, value: &Value) -> Result<i64, SchemaError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .ok_or_else(|| self.type_error(field, "an integer", value)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.type_error(field, "an integer", value)),
            other => Err(self.type_error(field, "an integer", other)),
        }
    }

    /// 실수 필드를 읽고 경계를 검사합니다.
    pub fn float(
        &self,
        field: &'static str,
        default: f64,
        lower: Bound,
        upper: Bound,
    ) -> Result<f64, SchemaError> {
        let value = match self.raw(field) {
            None => default,
            Some(value) => self.coerce_float(field, value)?,
        };

        self.check(field, check_bounds(value, lower, upper))
    }

    fn coerce_float(&self, field: &'static str, value: &Value) -> Result<f64, SchemaError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| self.type_error(field, "a number", value)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.type_error(field, "a number", value)),
            other => Err(self.type_error(field, "a number", other)),
        }
    }

    /// 문자열 목록 필드를 읽습니다.
    ///
    /// 배열 또는 쉼표로 구분된 문자열을 받습니다.
    pub fn string_list(
        &self,
        field: &'static str,
        default: &[&str],
    ) -> Result<Vec<String>, SchemaError> {
        let Some(value) = self.raw(field) else {
            return Ok(default.iter().map(|s| s.to_string()).collect());
        };

        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.coerce_string(field, item))
                .collect(),
            Value::String(s) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()),
            other => Err(self.type_error(field, "a list of strings", other)),
        }
    }

    /// 경로 필드를 읽습니다.
    pub fn path(&self, field: &'static str, default: &str) -> Result<PathBuf, SchemaError> {
        self.string(field, default).map(PathBuf::from)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => type_name(value).to_string(),
        scalar => format!("{} ({})", type_name(scalar), scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: Value) -> RawTable {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_defaults_when_absent_or_null() {
        let raw = table(json!({ "port": null }));
        let reader = SectionReader::new("database", &raw);

        assert_eq!(reader.int("port", 5432, 1, Some(65535)).unwrap(), 5432);
        assert_eq!(reader.string("host", "localhost").unwrap(), "localhost");
        assert!(!reader.bool("enabled", false).unwrap());
    }

    #[test]
    fn test_int_coercion_from_string() {
        let raw = table(json!({ "port": "6543", "bad": "abc", "float": 5.0 }));
        let reader = SectionReader::new("database", &raw);

        assert_eq!(reader.int("port", 5432, 1, Some(65535)).unwrap(), 6543);
        assert_eq!(reader.int("float", 1, 1, None).unwrap(), 5);

        let err = reader.int("bad", 1, 1, None).unwrap_err();
        assert_eq!(err.section, "database");
        assert_eq!(err.field, "bad");
    }

    #[test]
    fn test_int_range() {
        let raw = table(json!({ "port": 70000 }));
        let reader = SectionReader::new("database", &raw);

        let err = reader.int("port", 5432, 1, Some(65535)).unwrap_err();
        assert!(err.to_string().contains("must be <= 65535"));
    }

    #[test]
    fn test_float_bounds() {
        let raw = table(json!({ "zero": 0.0, "one": 1, "text": "0.25" }));
        let reader = SectionReader::new("trading", &raw);

        assert!(reader
            .float("zero", 0.1, Bound::Exclusive(0.0), Bound::Inclusive(1.0))
            .is_err());
        assert_eq!(
            reader
                .float("one", 0.1, Bound::Exclusive(0.0), Bound::Inclusive(1.0))
                .unwrap(),
            1.0
        );
        assert!(reader
            .float("one", 0.1, Bound::Exclusive(0.0), Bound::Exclusive(1.0))
            .is_err());
        assert_eq!(
            reader
                .float("text", 0.1, Bound::Unbounded, Bound::Unbounded)
                .unwrap(),
            0.25
        );
    }

    #[test]
    fn test_bool_coercion() {
        let raw = table(json!({ "a": "yes", "b": "FALSE", "c": 1, "d": "maybe", "e": "on", "f": "off" }));
        let reader = SectionReader::new("app", &raw);

        assert!(reader.bool("a", false).unwrap());
        assert!(!reader.bool("b", true).unwrap());
        assert!(reader.bool("c", false).unwrap());
        assert!(reader.bool("d", false).is_err());
        assert!(reader.bool("e", false).is_err());
        assert!(reader.bool("f", true).is_err());
    }

    #[test]
    fn test_string_list() {
        let raw = table(json!({ "list": ["rsi", "macd"], "csv": "rsi, macd,,", "bad": {} }));
        let reader = SectionReader::new("trading", &raw);

        assert_eq!(reader.string_list("list", &[]).unwrap(), vec!["rsi", "macd"]);
        assert_eq!(reader.string_list("csv", &[]).unwrap(), vec!["rsi", "macd"]);
        assert_eq!(reader.string_list("missing", &["rsi"]).unwrap(), vec!["rsi"]);
        assert!(reader.string_list("bad", &[]).is_err());
    }

    #[test]
    fn test_required_string() {
        let raw = table(json!({ "key": 12345 }));
        let reader = SectionReader::new("broker", &raw);

        assert_eq!(reader.required_string("key").unwrap(), "12345");
        let err = reader.required_string("secret").unwrap_err();
        assert_eq!(err.field, "secret");
    }

    #[test]
    fn test_section_table() {
        let raw = table(json!({ "broker": { "provider": "alpaca" }, "risk": 3, "app": null }));

        assert!(section_table(&raw, "broker").unwrap().is_some());
        assert!(section_table(&raw, "app").unwrap().is_none());
        assert!(section_table(&raw, "trading").unwrap().is_none());
        assert_eq!(section_table(&raw, "risk").unwrap_err().section, "risk");
    }
}
