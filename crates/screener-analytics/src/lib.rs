//! # Screener Analytics
//!
//! 캔들 시리즈를 스크리닝 판단 재료로 바꾸는 계산 계층입니다.
//!
//! - **indicators**: 시리즈 지표 엔진 (EMA, RSI, MACD, ATR, ADX, OBV,
//!   볼린저 밴드, 피보나치 되돌림)
//! - **patterns**: 캔들 패턴 감지 (망치형, 강세 장악형)
//! - **backtest**: 전방 수익 규칙의 과거 적중률 추정
//! - **scoring**: 정책 기반 점수 산정 + 기준별 브레이크다운
//! - **market_regime**: 기준 종목 MACD 기반 시장 레짐 필터
//!
//! 모든 계산기는 상태가 없고 입력에만 의존합니다.

pub mod backtest;
pub mod indicators;
pub mod market_regime;
pub mod patterns;
pub mod scoring;

pub use backtest::{BacktestEvaluator, BacktestRule};
pub use indicators::{
    AnalysisParams, IndicatorError, IndicatorResult, IndicatorSeries, IndicatorSnapshot,
    SeriesIndicatorEngine,
};
pub use market_regime::{MarketRegime, MarketRegimeFilter};
pub use patterns::PatternDetector;
pub use scoring::{ScorePolicy, ScoreResult, ScoringEngine, ScoringParams};
