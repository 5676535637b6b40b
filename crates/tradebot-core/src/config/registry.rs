//! 설정 레지스트리.
//!
//! 검증된 [`TradingBotConfig`]를 하나만 보관하는 저장소입니다.
//!
//! # 상태
//! - `empty`: 아직 로드되지 않음 (또는 첫 로드가 실패함)
//! - `ready`: 유효한 설정을 보관 중
//!
//! 첫 로드가 실패하면 `empty`로 남으므로 다음 [`ConfigRegistry::get`]이
//! 파이프라인 전체를 다시 시도합니다.
//!
//! # 동시성
//! - 스냅샷은 `ArcSwapOption`에 보관되어 읽기에 잠금이 필요 없습니다.
//! - `empty → ready` 전환과 [`ConfigRegistry::reload`]는 하나의 뮤텍스로
//!   직렬화되어 동시에 두 번 로드되지 않습니다.
//! - 리로드는 참조를 원자적으로 교체합니다. 이전 `Arc`를 가진 쪽은 계속
//!   이전 스냅샷을 사용할 수 있습니다.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;
use once_cell::sync::OnceCell;
use tracing::{error, info};

use super::merge::load_config;
use super::schema::TradingBotConfig;
use super::sources::ConfigSources;
use crate::error::ConfigResult;

/// 설정 레지스트리.
///
/// 소비자에게 명시적으로 전달해 사용합니다. 프로세스 전역 인스턴스가
/// 필요하면 [`global_registry`]를 사용하세요.
#[derive(Debug)]
pub struct ConfigRegistry {
    sources: ConfigSources,
    current: ArcSwapOption<TradingBotConfig>,
    load_lock: Mutex<()>,
}

impl ConfigRegistry {
    /// 비어 있는 레지스트리를 생성합니다. 소스는 첫 `get()`에서 읽습니다.
    pub fn new(sources: ConfigSources) -> Self {
        Self {
            sources,
            current: ArcSwapOption::empty(),
            load_lock: Mutex::new(()),
        }
    }

    /// 레지스트리가 읽는 소스를 반환합니다.
    pub fn sources(&self) -> &ConfigSources {
        &self.sources
    }

    /// 현재 설정을 반환합니다.
    ///
    /// 비어 있으면 로드 파이프라인을 한 번 실행합니다. 이후 호출은 소스를
    /// 다시 읽지 않고 같은 `Arc`를 반환합니다.
    pub fn get(&self) -> ConfigResult<Arc<TradingBotConfig>> {
        if let Some(config) = self.current.load_full() {
            return Ok(config);
        }

        let _guard = self.lock();

        // 잠금을 기다리는 동안 다른 호출자가 로드했을 수 있음
        if let Some(config) = self.current.load_full() {
            return Ok(config);
        }

        let config = Arc::new(self.load()?);
        self.current.store(Some(Arc::clone(&config)));
        Ok(config)
    }

    /// 소스를 다시 읽어 설정을 교체합니다.
    ///
    /// 실패하면 에러를 반환하고 기존 스냅샷은 그대로 둡니다.
    pub fn reload(&self) -> ConfigResult<Arc<TradingBotConfig>> {
        let _guard = self.lock();

        let config = Arc::new(self.load()?);
        self.current.store(Some(Arc::clone(&config)));
        info!(config = %config, "Configuration reloaded");
        Ok(config)
    }

    /// 로드를 시도하지 않고 현재 스냅샷을 반환합니다.
    pub fn current(&self) -> Option<Arc<TradingBotConfig>> {
        self.current.load_full()
    }

    /// 설정이 로드되어 있는지 확인합니다.
    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.load_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> ConfigResult<TradingBotConfig> {
        load_config(&self.sources).map_err(|e| {
            error!(
                config_file = %self.sources.config_file.display(),
                error = %e,
                "Failed to load configuration"
            );
            e
        })
    }
}

/// 전역 설정 레지스트리.
static GLOBAL_REGISTRY: OnceCell<ConfigRegistry> = OnceCell::new();

/// 전역 레지스트리를 주어진 소스로 초기화합니다.
///
/// 이미 초기화되었으면 `false`를 반환하고 아무것도 바꾸지 않습니다.
pub fn init_global_registry(sources: ConfigSources) -> bool {
    GLOBAL_REGISTRY.set(ConfigRegistry::new(sources)).is_ok()
}

/// 전역 레지스트리를 가져옵니다. 초기화되지 않았으면 기본 소스를 사용합니다.
pub fn global_registry() -> &'static ConfigRegistry {
    GLOBAL_REGISTRY.get_or_init(|| ConfigRegistry::new(ConfigSources::from_env()))
}

/// 전역 레지스트리에서 설정을 가져옵니다.
pub fn get_config() -> ConfigResult<Arc<TradingBotConfig>> {
    global_registry().get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sources::MapEnv;
    use std::fs;
    use std::path::Path;

    fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
        let path = dir.join("config.yaml");
        let body = format!(
            "data:\n  storage_path: {}\n  log_path: {}\n{}",
            dir.join("data").display(),
            dir.join("logs").display(),
            extra
        );
        fs::write(&path, body).unwrap();
        path
    }

    fn credentials() -> MapEnv {
        MapEnv::new()
            .with("ALPACA_API_KEY_ID", "PKTEST1234567890")
            .with("ALPACA_API_SECRET_KEY", "secret-abcdefghijklmnop")
    }

    #[test]
    fn test_get_returns_same_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let registry = ConfigRegistry::new(ConfigSources::new(path).with_env(credentials()));

        assert!(!registry.is_ready());
        let first = registry.get().unwrap();
        let second = registry.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.is_ready());
    }

    #[test]
    fn test_get_does_not_reread_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "app:\n  name: First\n");
        let registry = ConfigRegistry::new(ConfigSources::new(&path).with_env(credentials()));

        assert_eq!(registry.get().unwrap().app.name, "First");

        write_config(dir.path(), "app:\n  name: Second\n");
        assert_eq!(registry.get().unwrap().app.name, "First");

        let reloaded = registry.reload().unwrap();
        assert_eq!(reloaded.app.name, "Second");
        assert_eq!(registry.get().unwrap().app.name, "Second");
    }

    #[test]
    fn test_failed_load_leaves_registry_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "trading:\n  max_positions: 10\n  position_size_pct: 0.15\n");
        let registry = ConfigRegistry::new(ConfigSources::new(&path).with_env(credentials()));

        assert!(registry.get().is_err());
        assert!(!registry.is_ready());
        assert!(registry.current().is_none());

        // 소스를 고치면 다음 호출이 성공
        write_config(dir.path(), "trading:\n  max_positions: 5\n  position_size_pct: 0.2\n");
        assert!(registry.get().is_ok());
        assert!(registry.is_ready());
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let registry = ConfigRegistry::new(ConfigSources::new(&path).with_env(credentials()));

        let before = registry.get().unwrap();
        write_config(dir.path(), "logging:\n  level: verbose\n");

        assert!(registry.reload().is_err());
        let after = registry.get().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_reload_swaps_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let registry = ConfigRegistry::new(ConfigSources::new(path).with_env(credentials()));

        let old = registry.get().unwrap();
        let new = registry.reload().unwrap();

        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(*old, *new);
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let registry = Arc::new(ConfigRegistry::new(
            ConfigSources::new(path).with_env(credentials()),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get().unwrap())
            })
            .collect();

        let configs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for config in &configs[1..] {
            assert!(Arc::ptr_eq(&configs[0], config));
        }
    }
}
