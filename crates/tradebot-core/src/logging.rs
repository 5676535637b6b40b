//! tracing을 사용한 로깅 인프라.
//!
//! 검증된 `logging`/`data` 섹션으로 로깅을 초기화합니다. 콘솔 출력은 다음
//! 형식을 지원합니다:
//! - **pretty**: 개발용 사람이 읽기 쉬운 형식
//! - **json**: 운영환경/로그 집계용 JSON 형식
//! - **compact**: 로그 크기를 줄이기 위한 간결한 형식
//!
//! 파일 출력은 항상 JSON 한 줄 형식입니다. 파일 회전은 이 모듈의 범위가 아니며,
//! 회전 크기와 백업 수는 외부 도구를 위해 [`LogConfig`]에 그대로 전달됩니다.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::{DataConfig, LogLevel, LoggingConfig};

/// 기본 로그 파일 이름 (확장자 제외).
pub const DEFAULT_LOG_FILE_NAME: &str = "tradebot";

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식 (개발용)
    #[default]
    Pretty,
    /// 로그 집계용 JSON 형식 (운영용)
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 로그 레벨 필터 (예: "info", "debug", "tradebot_core=debug")
    pub level: String,
    /// 콘솔 출력 형식
    pub format: LogFormat,
    /// 콘솔 출력 여부
    pub console: bool,
    /// JSON 로그 파일 경로 (없으면 파일 출력 안 함)
    pub file: Option<PathBuf>,
    /// 파일 회전 크기 (바이트)
    pub rotation_size_bytes: u64,
    /// 보관할 백업 파일 수
    pub backup_count: u32,
    /// span 이벤트 포함 여부 (진입/종료)
    pub with_span_events: bool,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            console: true,
            file: None,
            rotation_size_bytes: 10 * 1024 * 1024,
            backup_count: 5,
            with_span_events: false,
            with_file: true,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 새 로그 설정을 생성합니다.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// span 이벤트를 활성화합니다.
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// 검증된 설정 섹션에서 로그 설정을 만듭니다.
    ///
    /// 파일 출력이 켜져 있으면 `<log_path>/tradebot.log`에 기록합니다.
    pub fn from_settings(logging: &LoggingConfig, data: &DataConfig) -> Self {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            level: level_directive(logging.level).to_string(),
            format,
            console: logging.console_enabled,
            file: logging
                .file_enabled
                .then(|| data.log_path.join(format!("{}.log", DEFAULT_LOG_FILE_NAME))),
            rotation_size_bytes: logging.rotation_size_bytes(),
            backup_count: logging.backup_count,
            ..Default::default()
        }
    }
}

/// 설정 레벨을 `EnvFilter` 지시어로 변환합니다.
pub fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error | LogLevel::Critical => "error",
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// 주어진 설정으로 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG`가 설정되어 있으면 설정 레벨보다 우선합니다.
///
/// # 예제
///
/// ```no_run
/// use tradebot_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let config = LogConfig::new("debug").with_format(LogFormat::Json);
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let span_events = if config.with_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console {
        let layer = match config.format {
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target)
                .with_span_events(span_events.clone())
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target)
                .with_span_events(span_events.clone())
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target)
                .with_span_events(span_events.clone())
                .boxed(),
        };
        layers.push(layer);
    }

    if let Some(path) = &config.file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target)
                .with_span_events(span_events)
                .with_writer(Mutex::new(file))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    tracing::info!(
        format = ?config.format,
        level = %config.level,
        console = config.console,
        file = ?config.file,
        "Logging initialized"
    );

    Ok(())
}

/// 검증된 설정 섹션으로 로깅을 초기화합니다.
pub fn init_logging_from_settings(
    logging: &LoggingConfig,
    data: &DataConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogConfig::from_settings(logging, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("PRETTY".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("invalid".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_span_events(true);

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_span_events);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive(LogLevel::Warning), "warn");
        assert_eq!(level_directive(LogLevel::Critical), "error");
        assert_eq!(level_directive(LogLevel::Debug), "debug");
    }

    #[test]
    fn test_from_settings() {
        let logging = LoggingConfig {
            level: LogLevel::Warning,
            rotation_size_mb: 2,
            backup_count: 3,
            ..Default::default()
        };
        let data = DataConfig {
            log_path: PathBuf::from("var/log"),
            ..Default::default()
        };

        let config = LogConfig::from_settings(&logging, &data);
        assert_eq!(config.level, "warn");
        assert!(config.console);
        assert_eq!(config.file.as_deref(), Some(Path::new("var/log/tradebot.log")));
        assert_eq!(config.rotation_size_bytes, 2 * 1024 * 1024);
        assert_eq!(config.backup_count, 3);
    }

    #[test]
    fn test_from_settings_file_disabled() {
        let logging = LoggingConfig {
            file_enabled: false,
            console_enabled: false,
            ..Default::default()
        };

        let config = LogConfig::from_settings(&logging, &DataConfig::default());
        assert!(config.file.is_none());
        assert!(!config.console);
    }
}
