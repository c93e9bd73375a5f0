//! 스크리너 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 스크리닝 실행 및 결과 출력
//! - 유니버스 종목 조회
//! - 설정/알림 연결

pub mod commands;

pub use commands::*;
