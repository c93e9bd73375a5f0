//! # Screener Risk
//!
//! 스크리닝된 기회에 대한 리스크 제안을 계산합니다.
//!
//! - 변동성 구간별 추적 손절 비율
//! - ATR 기반 손절 가격
//! - 상승 여력 기반 익절 가격

pub mod suggestion;

pub use suggestion::{RiskParams, RiskSuggester, RiskSuggestion, TrailingTier};
