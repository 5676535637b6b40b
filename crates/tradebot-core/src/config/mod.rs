//! 계층형 설정 엔진.
//!
//! # 데이터 흐름
//! ```text
//! configs/.env ─┐
//!               ├→ sources.rs (환경 변수 조각) ─┐
//! 프로세스 환경 ─┘                               ├→ merge.rs (환경 변수 > 파일)
//! configs/config.yaml → sources.rs (파일 조각) ──┘
//!     → schema.rs (필드 검증 + 교차 필드 규칙, 기본값 적용)
//!     → TradingBotConfig (검증 완료, 불변)
//!     → registry.rs (Arc로 공유, 명시적 reload)
//! ```
//!
//! 실패 시 파이프라인 전체가 중단되며 어떤 부분 상태도 게시되지 않습니다.

pub mod fields;
pub mod merge;
pub mod registry;
pub mod schema;
pub mod sources;

pub use fields::{Bound, RawTable, SectionReader};
pub use merge::{build_config, load_config, merge_fragments};
pub use registry::{get_config, global_registry, init_global_registry, ConfigRegistry};
pub use schema::{
    mask_secret, AppConfig, BrokerConfig, DataConfig, DatabaseConfig, Environment, LogLevel,
    LoggingConfig, RiskConfig, TradingBotConfig, TradingConfig,
};
pub use sources::{
    load_dotenv, load_env_fragment, load_file_fragment, ConfigSources, EnvBinding, EnvSource,
    MapEnv, ProcessEnv, CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE, DEFAULT_DOTENV_FILE, ENV_BINDINGS,
};
