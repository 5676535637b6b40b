//! # Tradebot Core
//!
//! 트레이딩 봇의 계층형 설정 엔진을 제공합니다.
//!
//! 이 크레이트는 봇의 모든 구성 요소가 공유하는 설정을 다룹니다:
//! - 설정 파일과 환경 변수 소스 로드
//! - 우선순위 기반 병합 (환경 변수 > 파일 > 기본값)
//! - 섹션별 스키마 검증
//! - 프로세스 전역 설정 레지스트리
//! - 재사용 가능한 입력 검증기
//! - 로깅 인프라
//!
//! # 예제
//!
//! ```no_run
//! use tradebot_core::{get_config, init_logging_from_settings};
//!
//! let config = get_config()?;
//! init_logging_from_settings(&config.logging, &config.data)?;
//! tracing::info!(config = %config, "Ready");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod validators;

pub use config::*;
pub use error::*;
pub use logging::*;
