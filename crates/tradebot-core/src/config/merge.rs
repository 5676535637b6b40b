//! 설정 조각 병합 및 검증.
//!
//! 우선순위: 환경 변수 > 설정 파일 > 스키마 기본값.
//!
//! 파일 조각을 뼈대로 삼고 환경 변수 조각을 그 위에 덮어씁니다. 설정되지 않은
//! 환경 변수는 조각에 아예 없으므로 파일 값을 빈 값으로 덮어쓰지 않습니다.

use serde_json::Value;
use tracing::{debug, info};

use super::fields::RawTable;
use super::schema::TradingBotConfig;
use super::sources::ConfigSources;
use crate::error::{ConfigResult, SchemaError};

/// 두 조각을 병합합니다. 같은 키에서는 `env`가 이깁니다.
///
/// 순수 함수이므로 같은 입력에 대해 항상 같은 결과를 반환합니다.
pub fn merge_fragments(file: &RawTable, env: &RawTable) -> RawTable {
    let mut merged = file.clone();
    for (key, value) in env {
        overlay_entry(&mut merged, key, value);
    }
    merged
}

fn overlay_entry(target: &mut RawTable, key: &str, value: &Value) {
    if let (Some(Value::Object(existing)), Value::Object(incoming)) = (target.get_mut(key), value)
    {
        for (k, v) in incoming {
            overlay_entry(existing, k, v);
        }
        return;
    }

    target.insert(key.to_string(), value.clone());
}

/// 두 조각을 병합하고 스키마로 검증합니다.
///
/// 스키마 에러는 수정 없이 그대로 반환합니다.
pub fn build_config(file: &RawTable, env: &RawTable) -> Result<TradingBotConfig, SchemaError> {
    let merged = merge_fragments(file, env);
    debug!(sections = merged.len(), "Merged configuration fragments");
    TradingBotConfig::from_raw(&merged)
}

/// 전체 로드 파이프라인을 실행합니다: 소스 읽기 → 병합 → 검증.
pub fn load_config(sources: &ConfigSources) -> ConfigResult<TradingBotConfig> {
    let (file, env) = sources.read()?;
    let config = build_config(&file, &env)?;

    info!(
        config_file = %sources.config_file.display(),
        app = %config.app.name,
        environment = %config.app.environment,
        "Configuration loaded"
    );

    Ok(config)
}
