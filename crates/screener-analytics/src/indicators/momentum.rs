//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표를 제공합니다.
//! - RSI (Relative Strength Index)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭 (단순 윈도우 평균)
    ///
    /// 평균 하락폭이 0이면 RS가 무한대로 발산하므로 RSI를 100으로
    /// 포화시키고 나눗셈은 수행하지 않습니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - RSI 파라미터
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들. 가격 변화는 두 번째 바부터 정의되므로
    /// 인덱스 `period` 이전은 None.
    pub fn rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        // 상승/하락 분리 (인덱스 0은 변화량이 정의되지 않음)
        let mut gains = vec![Decimal::ZERO; prices.len()];
        let mut losses = vec![Decimal::ZERO; prices.len()];
        for i in 1..prices.len() {
            let delta = prices[i] - prices[i - 1];
            if delta > Decimal::ZERO {
                gains[i] = delta;
            } else {
                losses[i] = -delta;
            }
        }

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            // 윈도우가 정의되지 않은 첫 변화량(인덱스 0)을 포함하면 미정의
            if i < period {
                result.push(None);
                continue;
            }

            let start = i + 1 - period;
            let avg_gain: Decimal = gains[start..=i].iter().sum::<Decimal>() / period_decimal;
            let avg_loss: Decimal = losses[start..=i].iter().sum::<Decimal>() / period_decimal;

            if avg_loss == Decimal::ZERO {
                result.push(Some(dec!(100)));
            } else {
                let rs = avg_gain / avg_loss;
                let rsi = dec!(100) - (dec!(100) / (Decimal::ONE + rs));
                result.push(Some(rsi));
            }
        }

        Ok(result)
    }
}
