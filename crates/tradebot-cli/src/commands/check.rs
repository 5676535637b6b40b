//! 설정 검증.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;
use tradebot_core::{ConfigRegistry, ConfigSources};

/// 설정을 로드하고 검증한 뒤 요약을 출력합니다.
///
/// 검증에 실패하면 어떤 섹션의 어떤 필드가 문제인지 에러로 반환합니다.
pub fn check_config(sources: ConfigSources, out: &mut impl Write) -> Result<()> {
    let path = sources.config_file.clone();
    let registry = ConfigRegistry::new(sources);

    let config = registry
        .get()
        .with_context(|| format!("invalid configuration ({})", path.display()))?;

    info!(config = %config, "Configuration check passed");

    writeln!(out, "✅ configuration is valid: {}", path.display())?;
    writeln!(
        out,
        "  app:      {} v{} ({})",
        config.app.name, config.app.version, config.app.environment
    )?;
    writeln!(
        out,
        "  broker:   {} {} (paper: {})",
        config.broker.provider, config.broker.base_url, config.broker.paper_trading
    )?;
    writeln!(
        out,
        "  trading:  {} positions x {:.1}% = {:.1}% max exposure",
        config.trading.max_positions,
        config.trading.position_size_pct * 100.0,
        config.trading.max_exposure_pct() * 100.0
    )?;
    writeln!(out, "  logging:  {}", config.logging.level)?;
    writeln!(
        out,
        "  database: {}",
        if config.database.enabled {
            "enabled"
        } else {
            "disabled"
        }
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradebot_core::MapEnv;

    fn sources(dir: &std::path::Path, body: &str) -> ConfigSources {
        let path = dir.join("config.yaml");
        let content = format!(
            "data:\n  storage_path: {}\n  log_path: {}\n{}",
            dir.join("data").display(),
            dir.join("logs").display(),
            body
        );
        std::fs::write(&path, content).unwrap();

        ConfigSources::new(path).with_env(
            MapEnv::new()
                .with("ALPACA_API_KEY_ID", "PKTEST1234567890")
                .with("ALPACA_API_SECRET_KEY", "secret-abcdefghijklmnop"),
        )
    }

    #[test]
    fn test_check_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        check_config(sources(dir.path(), ""), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("configuration is valid"));
        assert!(text.contains("5 positions x 20.0% = 100.0% max exposure"));
        assert!(text.contains("database: disabled"));
    }

    #[test]
    fn test_check_reports_failing_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let err = check_config(
            sources(dir.path(), "trading:\n  max_positions: 10\n  position_size_pct: 0.15\n"),
            &mut out,
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains("trading.position_size_pct"));
        assert!(out.is_empty());
    }
}
