//! 설정 점검 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 사용할 설정 파일 경로 확인
//! - 설정 로드 및 검증
//! - 자격증명을 가린 최종 설정 출력

pub mod commands;
