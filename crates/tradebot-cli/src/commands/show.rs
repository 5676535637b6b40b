//! 최종 설정 출력.

use std::io::Write;

use anyhow::{Context, Result};
use tradebot_core::{load_config, ConfigSources};

/// 병합과 검증을 마친 설정을 JSON으로 출력합니다.
///
/// 브로커 자격증명과 데이터베이스 비밀번호는 가려서 출력합니다.
pub fn show_config(sources: &ConfigSources, out: &mut impl Write) -> Result<()> {
    let config = load_config(sources).with_context(|| {
        format!(
            "failed to load configuration ({})",
            sources.config_file.display()
        )
    })?;

    serde_json::to_writer_pretty(&mut *out, &config.masked())
        .context("failed to serialize configuration")?;
    writeln!(out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradebot_core::MapEnv;

    #[test]
    fn test_show_masks_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            format!(
                "data:\n  storage_path: {}\n  log_path: {}\ndatabase:\n  password: hunter2-hunter2\n",
                dir.path().join("data").display(),
                dir.path().join("logs").display(),
            ),
        )
        .unwrap();

        let sources = ConfigSources::new(path).with_env(
            MapEnv::new()
                .with("ALPACA_API_KEY_ID", "PKTEST1234567890")
                .with("ALPACA_API_SECRET_KEY", "secret-abcdefghijklmnop"),
        );

        let mut out = Vec::new();
        show_config(&sources, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["broker"]["api_key_id"], "PKTE****");
        assert_eq!(value["database"]["password"], "hunt****");
        assert_eq!(value["trading"]["max_positions"], 5);
        assert_eq!(value["logging"]["level"], "INFO");
    }
}
