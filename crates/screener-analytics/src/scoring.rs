//! 점수 산정 엔진.
//!
//! 마지막 바의 지표 스냅샷, 패턴 플래그, 과거 적중률을 단일 점수와
//! 기준별 브레이크다운으로 종합합니다. 세 가지 점수 정책을 명시적
//! 설정으로 선택합니다. 같은 입력에 대해 항상 같은 점수를 반환하는
//! 순수 함수입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use screener_core::config::ScoringConfig;
use screener_core::domain::CriteriaBreakdown;

use crate::indicators::IndicatorSnapshot;

/// 점수 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// 4기준 가중 정책 (최대 6.0).
    FourCriterion,
    /// 7기준 단위 가중 정책 (최대 7.0).
    SevenCriterion,
    /// 연속 점수 정책 (스윙 변형).
    Continuous,
}

impl FromStr for ScorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "four_criterion" => Ok(Self::FourCriterion),
            "seven_criterion" => Ok(Self::SevenCriterion),
            "continuous" => Ok(Self::Continuous),
            _ => Err(format!("알 수 없는 점수 정책: {}", s)),
        }
    }
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorePolicy::FourCriterion => write!(f, "four_criterion"),
            ScorePolicy::SevenCriterion => write!(f, "seven_criterion"),
            ScorePolicy::Continuous => write!(f, "continuous"),
        }
    }
}

/// 점수 산정 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringParams {
    /// 선택된 점수 정책.
    pub policy: ScorePolicy,
    /// 저변동성 기준 임계값 (기본: 0.015).
    pub volatility_threshold: Decimal,
    /// 레짐 우호 시 연속 점수 배수 (기본: 1.1).
    pub regime_boost: Decimal,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            policy: ScorePolicy::FourCriterion,
            volatility_threshold: dec!(0.015),
            regime_boost: dec!(1.1),
        }
    }
}

impl TryFrom<&ScoringConfig> for ScoringParams {
    type Error = String;

    fn try_from(config: &ScoringConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            policy: config.policy.parse()?,
            volatility_threshold: config.volatility_threshold,
            regime_boost: config.regime_boost,
        })
    }
}

/// 점수 산정 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 최종 점수.
    pub score: Decimal,
    /// 평가 순서대로의 기준별 충족 여부.
    pub breakdown: CriteriaBreakdown,
}

/// 점수 산정 엔진.
#[derive(Debug, Default)]
pub struct ScoringEngine {
    params: ScoringParams,
}

impl ScoringEngine {
    /// 새로운 점수 산정 엔진 생성.
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// 점수 산정 파라미터.
    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    /// 스냅샷을 점수로 평가합니다.
    ///
    /// # 인자
    /// * `snapshot` - 워밍업이 끝난 마지막 바의 지표 스냅샷
    /// * `hit_rate` - 과거 적중률 [0, 1] (연속 정책에서만 사용)
    /// * `regime_favorable` - 시장 레짐 우호 여부 (연속 정책에서만 사용)
    pub fn score(
        &self,
        snapshot: &IndicatorSnapshot,
        hit_rate: Decimal,
        regime_favorable: bool,
    ) -> ScoreResult {
        match self.params.policy {
            ScorePolicy::FourCriterion => self.score_four_criterion(snapshot),
            ScorePolicy::SevenCriterion => self.score_seven_criterion(snapshot),
            ScorePolicy::Continuous => {
                self.score_continuous(snapshot, hit_rate, regime_favorable)
            }
        }
    }

    /// 4기준 가중 정책.
    ///
    /// RSI < 50 → 1.5, EMA 단기 > 장기 → 2.0, 저변동성 → 1.0,
    /// MACD > 0 → 1.5. 최대 6.0.
    fn score_four_criterion(&self, snapshot: &IndicatorSnapshot) -> ScoreResult {
        let criteria = self.base_criteria(snapshot);
        let weights = [dec!(1.5), dec!(2.0), dec!(1.0), dec!(1.5)];

        let mut score = Decimal::ZERO;
        let mut breakdown = CriteriaBreakdown::new();
        for ((label, passed), weight) in criteria.into_iter().zip(weights) {
            if passed {
                score += weight;
            }
            breakdown.push(label, passed);
        }

        ScoreResult { score, breakdown }
    }

    /// 7기준 단위 가중 정책.
    ///
    /// 4기준을 각 1.0으로 환산하고 OBV 상승, 종가 > 볼린저 중간 밴드,
    /// 망치형을 각 1.0씩 추가합니다. 최대 7.0.
    fn score_seven_criterion(&self, snapshot: &IndicatorSnapshot) -> ScoreResult {
        let mut criteria = self.base_criteria(snapshot);
        criteria.push(("OBV rising", snapshot.obv > snapshot.prev_obv));
        criteria.push(("Close > BB middle", snapshot.close > snapshot.bb_middle));
        criteria.push(("Hammer", snapshot.hammer));

        let mut score = Decimal::ZERO;
        let mut breakdown = CriteriaBreakdown::new();
        for (label, passed) in criteria {
            if passed {
                score += Decimal::ONE;
            }
            breakdown.push(label, passed);
        }

        ScoreResult { score, breakdown }
    }

    /// 연속 점수 정책.
    ///
    /// score = (RSI − 50) × 1.2 + (MACD − 시그널) × 200
    ///       + ((종가 − 장기 EMA) / 장기 EMA) × 100 × 1.5
    ///       + 적중률 × 100,
    /// 레짐 우호 시 × regime_boost.
    ///
    /// 브레이크다운은 각 가산 항의 양수 기여 여부를 기록합니다.
    fn score_continuous(
        &self,
        snapshot: &IndicatorSnapshot,
        hit_rate: Decimal,
        regime_favorable: bool,
    ) -> ScoreResult {
        let rsi_term = (snapshot.rsi - dec!(50)) * dec!(1.2);
        let macd_term = (snapshot.macd - snapshot.macd_signal) * dec!(200);
        let ema_term = if snapshot.ema_long.is_zero() {
            Decimal::ZERO
        } else {
            (snapshot.close - snapshot.ema_long) / snapshot.ema_long * dec!(100) * dec!(1.5)
        };
        let backtest_term = hit_rate * dec!(100);

        let mut score = rsi_term + macd_term + ema_term + backtest_term;
        if regime_favorable {
            score *= self.params.regime_boost;
        }

        let mut breakdown = CriteriaBreakdown::new();
        breakdown.push("RSI momentum > 0", rsi_term > Decimal::ZERO);
        breakdown.push("MACD > signal", macd_term > Decimal::ZERO);
        breakdown.push("Close > EMA long", ema_term > Decimal::ZERO);
        breakdown.push("Hit rate > 0", backtest_term > Decimal::ZERO);
        breakdown.push("Regime favorable", regime_favorable);

        ScoreResult { score, breakdown }
    }

    /// 네 가지 공통 기준의 평가 결과 (라벨, 충족 여부).
    fn base_criteria(&self, snapshot: &IndicatorSnapshot) -> Vec<(&'static str, bool)> {
        vec![
            ("RSI < 50", snapshot.rsi < dec!(50)),
            ("EMA short > EMA long", snapshot.ema_short > snapshot.ema_long),
            (
                "Low volatility",
                snapshot.volatility < self.params.volatility_threshold,
            ),
            ("MACD > 0", snapshot.macd > Decimal::ZERO),
        ]
    }
}
