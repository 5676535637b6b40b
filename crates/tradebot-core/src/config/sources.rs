//! 설정 소스 로더.
//!
//! 두 개의 독립적인 읽기 작업을 제공하며, 각각 타입이 없는 [`RawTable`]을
//! 만듭니다:
//! - 파일 소스: 고정된 상대 경로의 구조화된 파일 (없으면 빈 테이블)
//! - 환경 변수 소스: [`ENV_BINDINGS`]에 등록된 변수만 읽음
//!
//! 어느 쪽도 값을 검증하지 않습니다. 기본값 적용과 검증은 스키마의 몫입니다.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::fields::RawTable;
use crate::error::{ConfigError, ConfigResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_FILE: &str = "configs/config.yaml";

/// 기본 dotenv 파일 경로.
pub const DEFAULT_DOTENV_FILE: &str = "configs/.env";

/// 설정 파일 경로를 재정의하는 환경 변수.
pub const CONFIG_FILE_ENV: &str = "TRADEBOT_CONFIG_FILE";

/// 환경 변수 읽기 추상화.
pub trait EnvSource: Send + Sync + fmt::Debug {
    /// 변수 값을 반환합니다. 설정되지 않았으면 `None`.
    fn var(&self, key: &str) -> Option<String>;
}

/// 프로세스 환경 변수.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// 메모리 기반 환경 변수 (테스트 및 임베딩용).
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// 빈 환경을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 변수를 추가합니다.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 환경 변수와 설정 필드의 대응.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvBinding {
    /// 환경 변수 이름
    pub var: &'static str,
    /// 대상 섹션
    pub section: &'static str,
    /// 대상 필드
    pub field: &'static str,
}

impl EnvBinding {
    const fn new(var: &'static str, section: &'static str, field: &'static str) -> Self {
        Self {
            var,
            section,
            field,
        }
    }
}

/// 인식하는 환경 변수 목록. 그 외의 변수는 무시됩니다.
pub const ENV_BINDINGS: &[EnvBinding] = &[
    EnvBinding::new("ALPACA_API_KEY_ID", "broker", "api_key_id"),
    EnvBinding::new("ALPACA_API_SECRET_KEY", "broker", "api_secret_key"),
    EnvBinding::new("ALPACA_BASE_URL", "broker", "base_url"),
    EnvBinding::new("DB_HOST", "database", "host"),
    EnvBinding::new("DB_PORT", "database", "port"),
    EnvBinding::new("DB_USER", "database", "user"),
    EnvBinding::new("DB_PASS", "database", "password"),
    EnvBinding::new("DB_NAME", "database", "database"),
];

/// 구조화된 설정 파일을 읽습니다.
///
/// 형식(YAML, TOML, JSON)은 확장자로 판별합니다. 파일이 없으면 빈 테이블을
/// 반환합니다. 파일은 있지만 파싱할 수 없으면 실패합니다.
pub fn load_file_fragment(path: &Path) -> ConfigResult<RawTable> {
    if !path.is_file() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(RawTable::new());
    }

    let to_error = |source| ConfigError::Source {
        path: path.to_path_buf(),
        source,
    };

    let fragment: RawTable = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .build()
        .map_err(to_error)?
        .try_deserialize()
        .map_err(to_error)?;

    debug!(
        path = %path.display(),
        sections = fragment.len(),
        "Loaded config file"
    );

    Ok(fragment)
}

/// dotenv 파일을 프로세스 환경에 적재합니다.
///
/// 이미 설정된 변수는 덮어쓰지 않습니다. 파일이 없으면 `false`를 반환합니다.
pub fn load_dotenv(path: &Path) -> ConfigResult<bool> {
    if !path.is_file() {
        return Ok(false);
    }

    dotenvy::from_path(path).map_err(|source| ConfigError::Dotenv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Loaded dotenv file");

    Ok(true)
}

/// 환경 변수에서 설정 조각을 만듭니다.
///
/// 설정되지 않았거나 공백뿐인 변수는 생략합니다. 값은 문자열 그대로 둡니다.
pub fn load_env_fragment(env: &dyn EnvSource) -> RawTable {
    let mut fragment = RawTable::new();

    for binding in ENV_BINDINGS {
        let Some(value) = env.var(binding.var).filter(|v| !v.trim().is_empty()) else {
            continue;
        };

        let section = fragment
            .entry(binding.section)
            .or_insert_with(|| Value::Object(RawTable::new()));
        if let Value::Object(table) = section {
            table.insert(binding.field.to_string(), Value::String(value));
        }
    }

    let variables: usize = fragment
        .values()
        .filter_map(serde_json::Value::as_object)
        .map(RawTable::len)
        .sum();
    debug!(variables, "Collected environment overrides");

    fragment
}

/// 로드 파이프라인이 읽을 소스 묶음.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// 구조화된 설정 파일 경로
    pub config_file: PathBuf,
    /// dotenv 파일 경로 (선택)
    pub dotenv_file: Option<PathBuf>,
    /// 환경 변수 소스
    pub env: Arc<dyn EnvSource>,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            dotenv_file: Some(PathBuf::from(DEFAULT_DOTENV_FILE)),
            env: Arc::new(ProcessEnv),
        }
    }
}

impl ConfigSources {
    /// 주어진 설정 파일과 프로세스 환경을 사용하는 소스를 생성합니다.
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            dotenv_file: None,
            env: Arc::new(ProcessEnv),
        }
    }

    /// 기본 경로로 소스를 생성합니다.
    ///
    /// `TRADEBOT_CONFIG_FILE`이 설정되어 있으면 설정 파일 경로로 사용합니다.
    pub fn from_env() -> Self {
        let mut sources = Self::default();
        if let Some(path) = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            sources.config_file = PathBuf::from(path);
        }
        sources
    }

    /// dotenv 파일 경로를 설정합니다.
    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_file = Some(path.into());
        self
    }

    /// 환경 변수 소스를 설정합니다.
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// 모든 소스를 읽어 (파일 조각, 환경 변수 조각)을 반환합니다.
    pub fn read(&self) -> ConfigResult<(RawTable, RawTable)> {
        if let Some(dotenv) = &self.dotenv_file {
            load_dotenv(dotenv)?;
        }

        let file = load_file_fragment(&self.config_file)?;
        let env = load_env_fragment(self.env.as_ref());

        Ok((file, env))
    }
}
