//! 트레이딩 봇 설정 스키마.
//!
//! 일곱 개의 섹션(app, data, broker, trading, risk, logging, database)과
//! 이를 묶는 루트 [`TradingBotConfig`]를 정의합니다.
//!
//! 각 섹션은 원시 테이블에서 생성되며, 다음 순서로 검증합니다:
//! 1. 필드별 타입 변환 및 제약 검사
//! 2. 섹션 단위 교차 필드 규칙 ([`TradingConfig::validate`])
//!
//! 첫 번째 위반에서 즉시 실패하며, 부분적으로 유효한 섹션은 반환하지 않습니다.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use super::fields::{section_table, Bound, RawTable, SectionReader};
use crate::error::{SchemaError, ValidationError};
use crate::validators::{is_placeholder, validate_api_key, validate_url};

/// 브로커 자격증명 최소 길이 (비어 있지 않음).
const MIN_CREDENTIAL_LEN: usize = 1;

/// 실행 환경.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// 개발
    #[default]
    Development,
    /// 테스트
    Testing,
    /// 운영
    Production,
}

impl Environment {
    /// 소문자 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "testing" => Ok(Self::Testing),
            "production" => Ok(Self::Production),
            _ => Err(ValidationError::Config(format!(
                "environment '{}' must be one of: development, testing, production",
                s
            ))),
        }
    }
}

/// 로그 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// 허용되는 레벨 이름 (대문자).
    pub const NAMES: [&'static str; 5] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

    /// 대문자 이름을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// 대응하는 tracing 레벨을 반환합니다.
    ///
    /// tracing에는 CRITICAL이 없으므로 ERROR로 매핑됩니다.
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ValidationError::Config(format!(
                "level '{}' must be one of: {}",
                s,
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// 애플리케이션 일반 설정.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    /// 애플리케이션 이름
    pub name: String,
    /// 버전
    pub version: String,
    /// 실행 환경
    pub environment: Environment,
    /// 디버그 모드
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Hybrid Trading Bot".to_string(),
            version: "0.1.0".to_string(),
            environment: Environment::Development,
            debug: false,
        }
    }
}

impl AppConfig {
    pub const SECTION: &'static str = "app";

    /// 원시 테이블에서 섹션을 생성합니다.
    pub fn from_raw(table: &RawTable) -> Result<Self, SchemaError> {
        let r = SectionReader::new(Self::SECTION, table);
        let d = Self::default();

        let environment = r.string("environment", d.environment.as_str())?;

        Ok(Self {
            name: r.string("name", &d.name)?,
            version: r.string("version", &d.version)?,
            environment: r.check("environment", environment.parse())?,
            debug: r.bool("debug", d.debug)?,
        })
    }

    /// 운영 환경인지 확인합니다.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// 데이터 저장 경로 설정.
///
/// 생성 시 두 디렉토리가 없으면 만듭니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataConfig {
    /// 데이터 저장 경로
    pub storage_path: PathBuf,
    /// 로그 경로
    pub log_path: PathBuf,
    /// 캐시 TTL (초)
    pub cache_ttl: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("data/"),
            log_path: PathBuf::from("logs/"),
            cache_ttl: 300,
        }
    }
}

impl DataConfig {
    pub const SECTION: &'static str = "data";

    /// 원시 테이블에서 섹션을 생성하고 디렉토리를 준비합니다.
    ///
    /// 디렉토리는 뒤따르는 섹션(broker 등)이 검증되기 전에 만들어지므로, 이후
    /// 검증이 실패해도 남아 있습니다.
    pub fn from_raw(table: &RawTable) -> Result<Self, SchemaError> {
        let r = SectionReader::new(Self::SECTION, table);
        let d = Self::default();

        let storage_path = r.path("storage_path", &d.storage_path.to_string_lossy())?;
        r.check("storage_path", ensure_dir(&storage_path))?;

        let log_path = r.path("log_path", &d.log_path.to_string_lossy())?;
        r.check("log_path", ensure_dir(&log_path))?;

        Ok(Self {
            storage_path,
            log_path,
            cache_ttl: r.int("cache_ttl", d.cache_ttl as i64, 0, None)? as u64,
        })
    }
}

fn ensure_dir(path: &Path) -> Result<(), ValidationError> {
    std::fs::create_dir_all(path).map_err(|e| {
        ValidationError::Config(format!(
            "failed to create directory {}: {}",
            path.display(),
            e
        ))
    })
}

/// 브로커(Alpaca) 설정.
///
/// 자격증명에는 기본값이 없으므로 `Default`를 구현하지 않습니다.
/// `Debug` 출력에서 자격증명은 가려집니다.
#[derive(Clone, PartialEq, Serialize)]
pub struct BrokerConfig {
    /// 브로커 제공자
    pub provider: String,
    /// 모의투자 사용 여부
    pub paper_trading: bool,
    /// API 키 ID
    pub api_key_id: String,
    /// API 시크릿 키
    pub api_secret_key: String,
    /// REST API 기본 URL
    pub base_url: String,
}

impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("provider", &self.provider)
            .field("paper_trading", &self.paper_trading)
            .field("api_key_id", &mask_secret(&self.api_key_id))
            .field("api_secret_key", &mask_secret(&self.api_secret_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BrokerConfig {
    pub const SECTION: &'static str = "broker";
    pub const DEFAULT_PROVIDER: &'static str = "alpaca";
    pub const DEFAULT_BASE_URL: &'static str = "https://paper-api.alpaca.markets";

    /// 원시 테이블에서 섹션을 생성합니다.
    pub fn from_raw(table: &RawTable) -> Result<Self, SchemaError> {
        let r = SectionReader::new(Self::SECTION, table);

        let provider = r.string("provider", Self::DEFAULT_PROVIDER)?;
        if provider.trim().is_empty() {
            return Err(r.error(
                "provider",
                ValidationError::Config("provider must not be empty".into()),
            ));
        }

        let api_key_id = r.required_string("api_key_id")?;
        let api_secret_key = r.required_string("api_secret_key")?;
        let base_url = r.string("base_url", Self::DEFAULT_BASE_URL)?;

        Ok(Self {
            provider,
            paper_trading: r.bool("paper_trading", true)?,
            api_key_id: r.check(
                "api_key_id",
                validate_api_key(&api_key_id, MIN_CREDENTIAL_LEN),
            )?,
            api_secret_key: r.check(
                "api_secret_key",
                validate_api_key(&api_secret_key, MIN_CREDENTIAL_LEN),
            )?,
            base_url: r.check("base_url", validate_url(&base_url, true))?,
        })
    }
}

/// 트레이딩 설정.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingConfig {
    /// 최대 동시 포지션 수
    pub max_positions: u32,
    /// 포지션 크기 (자본 대비 비율)
    pub position_size_pct: f64,
    /// 손절 비율
    pub stop_loss_pct: f64,
    /// 익절 비율
    pub take_profit_pct: f64,
    /// 활성화된 전략
    pub enabled_strategies: Vec<String>,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            max_positions: 5,
            position_size_pct: 0.2,
            stop_loss_pct: 0.02,
            take_profit_pct: 0.05,
            enabled_strategies: vec!["rsi".to_string(), "ma_crossover".to_string()],
        }
    }
}

impl TradingConfig {
    pub const SECTION: &'static str = "trading";

    /// 원시 테이블에서 섹션을 생성합니다.
    pub fn from_raw(table: &RawTable) -> Result<Self, SchemaError> {
        let r = SectionReader::new(Self::SECTION, table);
        let d = Self::default();
        let strategies: Vec<&str> = d.enabled_strategies.iter().map(String::as_str).collect();

        let config = Self {
            max_positions: r.int("max_positions", d.max_positions as i64, 1, Some(20))? as u32,
            position_size_pct: r.float(
                "position_size_pct",
                d.position_size_pct,
                Bound::Exclusive(0.0),
                Bound::Inclusive(1.0),
            )?,
            stop_loss_pct: r.float(
                "stop_loss_pct",
                d.stop_loss_pct,
                Bound::Exclusive(0.0),
                Bound::Exclusive(1.0),
            )?,
            take_profit_pct: r.float(
                "take_profit_pct",
                d.take_profit_pct,
                Bound::Exclusive(0.0),
                Bound::Unbounded,
            )?,
            enabled_strategies: r.string_list("enabled_strategies", &strategies)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// 교차 필드 규칙을 검증합니다.
    ///
    /// 모든 포지션을 채웠을 때 자본의 100%를 넘지 않아야 합니다:
    /// `position_size_pct * max_positions <= 1.0`
    pub fn validate(&self) -> Result<(), SchemaError> {
        let exposure = self.position_size_pct * self.max_positions as f64;
        if exposure > 1.0 {
            return Err(SchemaError::new(
                Self::SECTION,
                "position_size_pct",
                ValidationError::Config(format!(
                    "position_size_pct ({}) * max_positions ({}) > 100%",
                    self.position_size_pct, self.max_positions
                )),
            ));
        }

        Ok(())
    }

    /// 모든 포지션을 채웠을 때의 총 노출 비율.
    pub fn max_exposure_pct(&self) -> f64 {
        self.position_size_pct * self.max_positions as f64
    }
}

/// 리스크 관리 설정.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskConfig {
    /// 최대 일일 손실 비율
    pub max_daily_loss_pct: f64,
    /// 포지션당 최대 리스크 비율
    pub max_position_risk_pct: f64,
    /// 포트폴리오 최대 리스크 비율
    pub max_portfolio_risk_pct: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_daily_loss_pct: 0.05,
            max_position_risk_pct: 0.02,
            max_portfolio_risk_pct: 0.1,
        }
    }
}

impl RiskConfig {
    pub const SECTION: &'static str = "risk";

    /// 원시 테이블에서 섹션을 생성합니다.
    pub fn from_raw(table: &RawTable) -> Result<Self, SchemaError> {
        let r = SectionReader::new(Self::SECTION, table);
        let d = Self::default();

        Ok(Self {
            max_daily_loss_pct: r.float(
                "max_daily_loss_pct",
                d.max_daily_loss_pct,
                Bound::Exclusive(0.0),
                Bound::Inclusive(0.2),
            )?,
            max_position_risk_pct: r.float(
                "max_position_risk_pct",
                d.max_position_risk_pct,
                Bound::Exclusive(0.0),
                Bound::Inclusive(0.1),
            )?,
            max_portfolio_risk_pct: r.float(
                "max_portfolio_risk_pct",
                d.max_portfolio_risk_pct,
                Bound::Exclusive(0.0),
                Bound::Inclusive(0.3),
            )?,
        })
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨 (대문자 정규화)
    pub level: LogLevel,
    /// 사람이 읽는 로그 형식 문자열
    pub format: String,
    /// 파일 로그 활성화
    pub file_enabled: bool,
    /// 콘솔 로그 활성화
    pub console_enabled: bool,
    /// 파일 회전 크기 (MB)
    pub rotation_size_mb: u64,
    /// 보관할 백업 파일 수
    pub backup_count: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: "%(asctime)s - %(name)s - %(levelname)s - %(message)s".to_string(),
            file_enabled: true,
            console_enabled: true,
            rotation_size_mb: 10,
            backup_count: 5,
        }
    }
}

impl LoggingConfig {
    pub const SECTION: &'static str = "logging";

    /// 회전 크기 상한 (MB, 1 TiB).
    pub const MAX_ROTATION_SIZE_MB: u64 = 1024 * 1024;

    /// 원시 테이블에서 섹션을 생성합니다.
    pub fn from_raw(table: &RawTable) -> Result<Self, SchemaError> {
        let r = SectionReader::new(Self::SECTION, table);
        let d = Self::default();

        let level = r.string("level", d.level.as_str())?;

        Ok(Self {
            level: r.check("level", level.parse())?,
            format: r.string("format", &d.format)?,
            file_enabled: r.bool("file_enabled", d.file_enabled)?,
            console_enabled: r.bool("console_enabled", d.console_enabled)?,
            rotation_size_mb: r.int(
                "rotation_size_mb",
                d.rotation_size_mb as i64,
                1,
                Some(Self::MAX_ROTATION_SIZE_MB as i64),
            )? as u64,
            backup_count: r.int(
                "backup_count",
                d.backup_count as i64,
                1,
                Some(u32::MAX as i64),
            )? as u32,
        })
    }

    /// 회전 크기를 바이트로 반환합니다.
    pub fn rotation_size_bytes(&self) -> u64 {
        self.rotation_size_mb.saturating_mul(1024 * 1024)
    }
}

/// 데이터베이스(PostgreSQL) 설정.
#[derive(Clone, PartialEq, Serialize)]
pub struct DatabaseConfig {
    /// 데이터베이스 사용 여부
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// 데이터베이스 이름
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "localhost".to_string(),
            port: 5432,
            user: "user".to_string(),
            password: "password".to_string(),
            database: "trading_bot".to_string(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("enabled", &self.enabled)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .finish()
    }
}

impl DatabaseConfig {
    pub const SECTION: &'static str = "database";

    /// 원시 테이블에서 섹션을 생성합니다.
    pub fn from_raw(table: &RawTable) -> Result<Self, SchemaError> {
        let r = SectionReader::new(Self::SECTION, table);
        let d = Self::default();

        Ok(Self {
            enabled: r.bool("enabled", d.enabled)?,
            host: r.string("host", &d.host)?,
            port: r.int("port", d.port as i64, 1, Some(65535))? as u16,
            user: r.string("user", &d.user)?,
            password: r.string("password", &d.password)?,
            database: r.string("database", &d.database)?,
        })
    }

    /// PostgreSQL 연결 문자열을 생성합니다.
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// 트레이딩 봇 전체 설정.
///
/// 일곱 섹션이 항상 모두 존재하며, 생성에 성공한 뒤에는 변경되지 않습니다.
/// 레지스트리는 이 값을 `Arc`로 공유합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingBotConfig {
    pub app: AppConfig,
    pub data: DataConfig,
    pub broker: BrokerConfig,
    pub trading: TradingConfig,
    pub risk: RiskConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

impl TradingBotConfig {
    /// 섹션 이름 (생성 순서).
    pub const SECTIONS: [&'static str; 7] = [
        AppConfig::SECTION,
        DataConfig::SECTION,
        BrokerConfig::SECTION,
        TradingConfig::SECTION,
        RiskConfig::SECTION,
        LoggingConfig::SECTION,
        DatabaseConfig::SECTION,
    ];

    /// 병합된 원시 테이블에서 전체 설정을 생성합니다.
    ///
    /// 섹션이 없으면 기본값으로 채웁니다. 첫 번째 위반에서 실패합니다.
    pub fn from_raw(raw: &RawTable) -> Result<Self, SchemaError> {
        let empty = RawTable::new();
        let table = |name: &'static str| -> Result<&RawTable, SchemaError> {
            Ok(section_table(raw, name)?.unwrap_or(&empty))
        };

        Ok(Self {
            app: AppConfig::from_raw(table(AppConfig::SECTION)?)?,
            data: DataConfig::from_raw(table(DataConfig::SECTION)?)?,
            broker: BrokerConfig::from_raw(table(BrokerConfig::SECTION)?)?,
            trading: TradingConfig::from_raw(table(TradingConfig::SECTION)?)?,
            risk: RiskConfig::from_raw(table(RiskConfig::SECTION)?)?,
            logging: LoggingConfig::from_raw(table(LoggingConfig::SECTION)?)?,
            database: DatabaseConfig::from_raw(table(DatabaseConfig::SECTION)?)?,
        })
    }

    /// 자격증명과 비밀번호를 가린 직렬화 값을 반환합니다.
    pub fn masked(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);

        if let Some(broker) = value.get_mut(BrokerConfig::SECTION) {
            broker["api_key_id"] = Value::String(mask_secret(&self.broker.api_key_id));
            broker["api_secret_key"] = Value::String(mask_secret(&self.broker.api_secret_key));
        }
        if let Some(database) = value.get_mut(DatabaseConfig::SECTION) {
            database["password"] = Value::String(mask_secret(&self.database.password));
        }

        value
    }
}

impl fmt::Display for TradingBotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TradingBotConfig(app={}, env={})",
            self.app.name, self.app.environment
        )
    }
}

/// 비밀 값을 앞 네 글자만 남기고 가립니다.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 || is_placeholder(secret) {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}
