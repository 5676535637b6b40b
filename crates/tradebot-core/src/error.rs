//! 설정 엔진의 에러 타입.
//!
//! 세 단계로 구성됩니다:
//! - [`ValidationError`] - 단일 값 검증 실패 (심볼, 주문, 날짜, 비율, 설정 값)
//! - [`SchemaError`] - 섹션 생성 실패 (어떤 섹션의 어떤 필드인지 포함)
//! - [`ConfigError`] - 로드 파이프라인 전체의 실패

use std::path::PathBuf;

use thiserror::Error;

/// 검증 에러 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// 심볼 형식
    Symbol,
    /// 주문 파라미터
    Order,
    /// 날짜 및 타임프레임
    Date,
    /// 비율 범위
    Percentage,
    /// 설정 값 (API 키, URL, 섹션 필드)
    Config,
    /// 일반 값 (범위, 양의 정수)
    Value,
}

/// 값 검증 에러.
///
/// 모든 검증기는 이 하나의 타입을 반환합니다. 호출자는 `Err(_)`로 넓게
/// 잡거나 `Err(ValidationError::Symbol(_))`처럼 좁게 잡을 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 심볼 검증 에러
    #[error("invalid symbol: {0}")]
    Symbol(String),

    /// 주문 검증 에러
    #[error("invalid order: {0}")]
    Order(String),

    /// 날짜 검증 에러
    #[error("invalid date: {0}")]
    Date(String),

    /// 비율 검증 에러
    #[error("invalid percentage: {0}")]
    Percentage(String),

    /// 설정 검증 에러
    #[error("invalid configuration value: {0}")]
    Config(String),

    /// 일반 값 검증 에러
    #[error("invalid value: {0}")]
    Value(String),
}

impl ValidationError {
    /// 에러 분류를 반환합니다.
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::Symbol(_) => ValidationKind::Symbol,
            ValidationError::Order(_) => ValidationKind::Order,
            ValidationError::Date(_) => ValidationKind::Date,
            ValidationError::Percentage(_) => ValidationKind::Percentage,
            ValidationError::Config(_) => ValidationKind::Config,
            ValidationError::Value(_) => ValidationKind::Value,
        }
    }

    /// 분류 접두어 없이 메시지만 반환합니다.
    pub fn message(&self) -> &str {
        match self {
            ValidationError::Symbol(msg)
            | ValidationError::Order(msg)
            | ValidationError::Date(msg)
            | ValidationError::Percentage(msg)
            | ValidationError::Config(msg)
            | ValidationError::Value(msg) => msg,
        }
    }
}

/// 섹션 생성 실패.
///
/// 첫 번째로 위반된 필드 제약 또는 교차 필드 규칙을 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{section}.{field}: {source}")]
pub struct SchemaError {
    /// 섹션 이름 (예: "trading")
    pub section: &'static str,
    /// 필드 이름 (예: "position_size_pct")
    pub field: &'static str,
    /// 원인 검증 에러
    pub source: ValidationError,
}

impl SchemaError {
    /// 새 스키마 에러를 생성합니다.
    pub fn new(section: &'static str, field: &'static str, source: ValidationError) -> Self {
        Self {
            section,
            field,
            source,
        }
    }
}

/// 설정 로드 파이프라인 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 설정 파일을 읽거나 파싱하지 못함
    #[error("failed to read config file {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    /// dotenv 파일을 읽지 못함
    #[error("failed to load dotenv file {}: {source}", path.display())]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// 병합된 설정이 스키마 검증에 실패함
    #[error("configuration validation failed: {0}")]
    Schema(#[from] SchemaError),
}

/// 설정 작업을 위한 Result 타입.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// 스키마 검증 실패라면 해당 에러를 반환합니다.
    pub fn as_schema(&self) -> Option<&SchemaError> {
        match self {
            ConfigError::Schema(err) => Some(err),
            _ => None,
        }
    }
}
