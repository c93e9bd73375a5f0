//! 스크리닝 결과 도메인 모델.
//!
//! 이 모듈은 파이프라인 경계를 넘는 유일한 산출물을 정의합니다:
//! - `CriteriaBreakdown` - 평가 기준별 충족 여부 (삽입 순서 유지)
//! - `VolumeTier` - 거래대금 등급
//! - `OpportunityRecord` - 종목별 스크리닝 결과 레코드

use crate::types::{Percentage, Price, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 기준 라벨 -> 충족 여부 매핑. 삽입 순서를 유지합니다.
///
/// 보고서와 알림 메시지는 이 순서를 그대로 따르므로
/// 평가 순서가 곧 표시 순서입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaBreakdown(Vec<(String, bool)>);

impl CriteriaBreakdown {
    /// 빈 브레이크다운을 생성합니다.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 기준 평가 결과를 추가합니다.
    pub fn push(&mut self, label: impl Into<String>, passed: bool) {
        self.0.push((label.into(), passed));
    }

    /// 라벨로 결과를 조회합니다.
    pub fn get(&self, label: &str) -> Option<bool> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, passed)| *passed)
    }

    /// 충족된 기준 수를 반환합니다.
    pub fn passed_count(&self) -> usize {
        self.0.iter().filter(|(_, passed)| *passed).count()
    }

    /// 전체 기준 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 기준이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// (라벨, 충족 여부) 순서쌍 이터레이터를 반환합니다.
    pub fn iter(&self) -> impl Iterator<Item = &(String, bool)> {
        self.0.iter()
    }
}

/// 거래대금 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTier {
    /// 낮음
    Low,
    /// 중간 (> 1천만)
    Medium,
    /// 높음 (> 5천만)
    High,
}

impl VolumeTier {
    /// 호가 자산 기준 거래대금으로 등급을 분류합니다.
    pub fn classify(quote_volume: Decimal) -> Self {
        if quote_volume > dec!(50_000_000) {
            VolumeTier::High
        } else if quote_volume > dec!(10_000_000) {
            VolumeTier::Medium
        } else {
            VolumeTier::Low
        }
    }
}

impl fmt::Display for VolumeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeTier::Low => write!(f, "Low"),
            VolumeTier::Medium => write!(f, "Medium"),
            VolumeTier::High => write!(f, "High"),
        }
    }
}

/// 종목별 스크리닝 결과 레코드.
///
/// 파이프라인 실행당 종목별로 한 번 생성되며 생성 후 변경되지 않습니다.
/// 실행이 끝나면 폐기됩니다 (영속화 없음).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityRecord {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 마지막 종가
    pub last_price: Price,
    /// 점수
    pub score: Decimal,
    /// 기준별 충족 여부
    pub breakdown: CriteriaBreakdown,
    /// 마지막 바의 RSI
    pub rsi: Decimal,
    /// 마지막 바의 MACD 라인
    pub macd: Decimal,
    /// 거래대금 등급
    pub volume_tier: VolumeTier,
    /// 거래대금 (호가 자산 단위)
    pub quote_volume: Decimal,
    /// 상단 밴드까지의 상승 여력 (%)
    pub potential_pct: Percentage,
    /// 제안 손절 가격
    pub stop_loss: Price,
    /// 제안 추적 손절 비율 (%)
    pub trailing_stop_pct: Percentage,
    /// 제안 익절 가격
    pub take_profit: Price,
}
