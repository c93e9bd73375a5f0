//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표들을 제공합니다.
//! - ATR (Average True Range, 평균 실제 범위)
//! - 변동성 비율 (ATR / 종가)
//! - Bollinger Bands (볼린저 밴드)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2).
    pub multiplier: Decimal,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: dec!(2),
        }
    }
}

/// 볼린저 밴드 계산 결과.
///
/// 세 시리즈 모두 입력과 같은 길이, 처음 period-1개는 None.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerSeries {
    /// 중간 밴드 (단순 이동평균).
    pub middle: Vec<Option<Decimal>>,
    /// 상단 밴드 (MA + k × σ).
    pub upper: Vec<Option<Decimal>>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Vec<Option<Decimal>>,
}

/// True Range 시리즈 계산.
///
/// TR = max(고가 - 저가, |고가 - 전일종가|, |저가 - 전일종가|)
/// 첫 바는 전일 종가가 없으므로 고가 - 저가.
pub(crate) fn true_ranges(high: &[Decimal], low: &[Decimal], close: &[Decimal]) -> Vec<Decimal> {
    let len = high.len().min(low.len()).min(close.len());
    let mut result = Vec::with_capacity(len);

    if len == 0 {
        return result;
    }

    result.push(high[0] - low[0]);
    for i in 1..len {
        let hl = high[i] - low[i];
        let hc = (high[i] - close[i - 1]).abs();
        let lc = (low[i] - close[i - 1]).abs();
        result.push(hl.max(hc).max(lc));
    }

    result
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// ATR (Average True Range) 계산.
    ///
    /// ATR = True Range의 단순 윈도우 평균.
    ///
    /// # 인자
    /// * `high` - 고가 데이터
    /// * `low` - 저가 데이터
    /// * `close` - 종가 데이터
    /// * `params` - ATR 파라미터
    ///
    /// # 반환
    /// ATR 값들 (처음 period-1개는 None)
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let len = high.len().min(low.len()).min(close.len());
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if len < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: len,
            });
        }

        let tr = true_ranges(high, low, close);
        let period_decimal = Decimal::from(period);

        let mut result = Vec::with_capacity(len);
        for i in 0..len {
            if i < period - 1 {
                result.push(None);
            } else {
                let sum: Decimal = tr[i + 1 - period..=i].iter().sum();
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 변동성 비율 (ATR / 종가) 계산.
    ///
    /// ATR이 미정의이거나 종가가 0인 시점은 None.
    ///
    /// # 인자
    /// * `atr` - ATR 시리즈
    /// * `close` - 종가 데이터
    ///
    /// # 반환
    /// 각 시점의 변동성 비율
    pub fn volatility_ratio(
        &self,
        atr: &[Option<Decimal>],
        close: &[Decimal],
    ) -> Vec<Option<Decimal>> {
        atr.iter()
            .zip(close.iter())
            .map(|(atr_value, close_value)| match atr_value {
                Some(value) if !close_value.is_zero() => Some(value / close_value),
                _ => None,
            })
            .collect()
    }

    /// 볼린저 밴드 계산.
    ///
    /// 중간 밴드 = 단순 이동평균
    /// 상단/하단 밴드 = MA ± (k × 표본 표준편차)
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - 볼린저 밴드 파라미터
    ///
    /// # 반환
    /// 상단, 중간, 하단 밴드 시리즈
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerParams,
    ) -> IndicatorResult<BollingerSeries> {
        let period = params.period;

        if period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "표본 표준편차를 위해 기간은 2 이상이어야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let period_decimal = Decimal::from(period);
        let sample_size = Decimal::from(period - 1);

        let mut middle = Vec::with_capacity(prices.len());
        let mut upper = Vec::with_capacity(prices.len());
        let mut lower = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i < period - 1 {
                middle.push(None);
                upper.push(None);
                lower.push(None);
                continue;
            }

            let window = &prices[i + 1 - period..=i];
            let ma: Decimal = window.iter().sum::<Decimal>() / period_decimal;

            // 표본 분산 (n-1)
            let variance: Decimal = window
                .iter()
                .map(|&p| {
                    let diff = p - ma;
                    diff * diff
                })
                .sum::<Decimal>()
                / sample_size;

            let deviation = params.multiplier * self.sqrt_decimal(variance);

            middle.push(Some(ma));
            upper.push(Some(ma + deviation));
            lower.push(Some(ma - deviation));
        }

        Ok(BollingerSeries {
            middle,
            upper,
            lower,
        })
    }

    /// Decimal 제곱근 계산 (Newton-Raphson 방법).
    ///
    /// Decimal 타입은 기본 제곱근 함수가 없으므로 직접 구현합니다.
    /// 최대 32회 반복, 고정점에 도달하면 조기 종료합니다.
    fn sqrt_decimal(&self, value: Decimal) -> Decimal {
        if value <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let two = dec!(2);
        // 1보다 작은 값은 1에서 시작해야 수렴이 빠르다
        let mut x = if value > Decimal::ONE {
            value
        } else {
            Decimal::ONE
        };

        for _ in 0..32 {
            let next = (x + value / x) / two;
            if next == x {
                break;
            }
            x = next;
        }

        x
    }
}
