//! 리스크 제안 계산.
//!
//! 변동성과 ATR로부터 손절 가격, 추적 손절 비율, 익절 가격을
//! 제안합니다. 포지션이나 주문을 만들지 않는 순수 계산입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use screener_core::config::RiskConfig;
use screener_core::types::{round_dp, Percentage, Price};

/// 추적 손절 구간.
///
/// 변동성이 `min_volatility`를 초과하면 `stop_pct`가 적용됩니다.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailingTier {
    /// 구간 하한 (초과 비교).
    pub min_volatility: Decimal,
    /// 추적 손절 비율 (%).
    pub stop_pct: Decimal,
}

/// 리스크 제안 파라미터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskParams {
    /// 손절 계산용 ATR 배수 (기본: 2).
    pub atr_multiplier: Decimal,
    /// 손절 가격 하한 (기본: 0.001).
    pub stop_loss_floor: Decimal,
    /// 변동성 내림차순의 추적 손절 구간.
    pub trailing_tiers: Vec<TrailingTier>,
    /// 어느 구간에도 해당하지 않을 때의 비율 (%).
    pub default_trailing_pct: Decimal,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            atr_multiplier: dec!(2),
            stop_loss_floor: dec!(0.001),
            trailing_tiers: vec![
                TrailingTier { min_volatility: dec!(0.05), stop_pct: dec!(10) },
                TrailingTier { min_volatility: dec!(0.03), stop_pct: dec!(7) },
                TrailingTier { min_volatility: dec!(0.02), stop_pct: dec!(5) },
            ],
            default_trailing_pct: dec!(3),
        }
    }
}

impl From<&RiskConfig> for RiskParams {
    fn from(config: &RiskConfig) -> Self {
        Self {
            atr_multiplier: config.atr_multiplier,
            stop_loss_floor: config.stop_loss_floor,
            trailing_tiers: config
                .trailing_tiers
                .iter()
                .map(|tier| TrailingTier {
                    min_volatility: tier.min_volatility,
                    stop_pct: tier.stop_pct,
                })
                .collect(),
            default_trailing_pct: config.default_trailing_pct,
        }
    }
}

/// 종목별 리스크 제안.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSuggestion {
    /// 제안 손절 가격 (소수점 4자리).
    pub stop_loss: Price,
    /// 제안 추적 손절 비율 (%).
    pub trailing_stop_pct: Percentage,
    /// 제안 익절 가격.
    pub take_profit: Price,
    /// 상단 밴드까지의 상승 여력 (%).
    pub potential_pct: Percentage,
}

/// 리스크 제안 계산기.
#[derive(Debug, Default)]
pub struct RiskSuggester {
    params: RiskParams,
}

impl RiskSuggester {
    /// 새로운 리스크 제안 계산기 생성.
    pub fn new(params: RiskParams) -> Self {
        Self { params }
    }

    /// 변동성에 해당하는 추적 손절 비율을 반환합니다.
    ///
    /// 구간 테이블은 변동성 내림차순이며 첫 번째로 초과하는 구간이
    /// 적용됩니다. 기본 테이블: >0.05 → 10, >0.03 → 7, >0.02 → 5,
    /// 그 외 → 3.
    pub fn trailing_stop_pct(&self, volatility: Decimal) -> Percentage {
        self.params
            .trailing_tiers
            .iter()
            .find(|tier| volatility > tier.min_volatility)
            .map(|tier| tier.stop_pct)
            .unwrap_or(self.params.default_trailing_pct)
    }

    /// ATR 기반 손절 가격을 계산합니다.
    ///
    /// stop = max(하한, 종가 − 배수 × ATR), 소수점 4자리 반올림.
    pub fn stop_loss(&self, close: Price, atr: Decimal) -> Price {
        let raw = close - self.params.atr_multiplier * atr;
        round_dp(raw.max(self.params.stop_loss_floor), 4)
    }

    /// 상승 여력 기반 익절 가격을 계산합니다.
    ///
    /// take_profit = 종가 × (1 + 여력% / 100).
    pub fn take_profit(&self, close: Price, potential_pct: Percentage) -> Price {
        close * (Decimal::ONE + potential_pct / dec!(100))
    }

    /// 상단 밴드까지의 상승 여력(%)을 계산합니다.
    ///
    /// 종가가 0이면 0을 반환합니다.
    pub fn potential_pct(&self, close: Price, bb_upper: Price) -> Percentage {
        if close.is_zero() {
            return Decimal::ZERO;
        }
        (bb_upper - close) / close * dec!(100)
    }

    /// 전체 리스크 제안을 계산합니다.
    ///
    /// # 인자
    /// * `close` - 마지막 종가
    /// * `atr` - 마지막 바의 ATR
    /// * `volatility` - 변동성 비율 (ATR / 종가)
    /// * `bb_upper` - 볼린저 상단 밴드
    pub fn suggest(
        &self,
        close: Price,
        atr: Decimal,
        volatility: Decimal,
        bb_upper: Price,
    ) -> RiskSuggestion {
        let potential_pct = self.potential_pct(close, bb_upper);

        RiskSuggestion {
            stop_loss: self.stop_loss(close, atr),
            trailing_stop_pct: self.trailing_stop_pct(volatility),
            take_profit: self.take_profit(close, potential_pct),
            potential_pct,
        }
    }
}
