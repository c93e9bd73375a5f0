//! # Screener Pipeline
//!
//! 유니버스 조회 → 종목별 평가 → 제외 → 순위 → 최우선 종목 선정까지의
//! 실행 계층입니다.
//!
//! - **evaluate**: 종목 하나의 평가 단계 (지표, 제외 규칙, 점수, 리스크)
//! - **pipeline**: 한정된 동시성의 팬아웃과 순위 산정
//! - **report**: 실행 보고서와 최우선 종목 선정 정책
//! - **stats**: 실행 통계
//!
//! 종목 하나의 실패는 레코드 없음으로 강등되고, 유니버스 조회 실패만
//! 실행 전체의 에러입니다.

pub mod evaluate;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use evaluate::{DropReason, Evaluation, ExclusionParams, InstrumentEvaluator};
pub use pipeline::{rank_records, OpportunityPipeline};
pub use report::{ScreenReport, SelectionPolicy};
pub use stats::RunStats;
