//! 방향성 지표 (Directional Indicators).
//!
//! 추세의 강도를 측정하는 ADX (Average Directional Index)를 제공합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::volatility::true_ranges;
use super::{IndicatorError, IndicatorResult};

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// ADX 기간 (기본: 14).
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 방향성 지표 계산기.
#[derive(Debug, Default)]
pub struct DirectionalIndicators;

impl DirectionalIndicators {
    /// 새로운 방향성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// ADX (Average Directional Index) 계산.
    ///
    /// +DM = 고가 상승폭 (하락폭보다 크고 양수일 때만)
    /// -DM = 저가 하락폭 (상승폭보다 크고 양수일 때만)
    /// ±DI = 100 × 평활화(±DM) / 평활화(TR)
    /// DX = 100 × |+DI − −DI| / (+DI + −DI)
    /// ADX = DX의 단순 윈도우 평균
    ///
    /// 평활화는 전 구간 단순 윈도우 평균을 사용합니다. DI 합이 0이거나
    /// 평활화된 TR이 0이면 DX는 0으로 처리합니다 (나눗셈 없음).
    ///
    /// # 인자
    /// * `high` - 고가 데이터
    /// * `low` - 저가 데이터
    /// * `close` - 종가 데이터
    /// * `params` - ADX 파라미터
    ///
    /// # 반환
    /// ADX 값들 (인덱스 2 × period − 1 이전은 None)
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let len = high.len().min(low.len()).min(close.len());
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        // DX 평활화까지 거치면 2 × period 바가 필요하다
        if len < 2 * period {
            return Err(IndicatorError::InsufficientData {
                required: 2 * period,
                provided: len,
            });
        }

        // 방향성 이동 (인덱스 0은 정의되지 않음)
        let mut plus_dm = vec![Decimal::ZERO; len];
        let mut minus_dm = vec![Decimal::ZERO; len];
        for i in 1..len {
            let up = high[i] - high[i - 1];
            let down = low[i - 1] - low[i];

            if up > down && up > Decimal::ZERO {
                plus_dm[i] = up;
            }
            if down > up && down > Decimal::ZERO {
                minus_dm[i] = down;
            }
        }

        let tr = true_ranges(high, low, close);
        let period_decimal = Decimal::from(period);
        let hundred = dec!(100);

        // DX: 방향성 이동이 인덱스 1부터 정의되므로 첫 윈도우는 인덱스 period
        let mut dx: Vec<Option<Decimal>> = vec![None; len];
        for i in period..len {
            let start = i + 1 - period;
            let smoothed_plus: Decimal =
                plus_dm[start..=i].iter().sum::<Decimal>() / period_decimal;
            let smoothed_minus: Decimal =
                minus_dm[start..=i].iter().sum::<Decimal>() / period_decimal;
            let smoothed_tr: Decimal = tr[start..=i].iter().sum::<Decimal>() / period_decimal;

            if smoothed_tr == Decimal::ZERO {
                dx[i] = Some(Decimal::ZERO);
                continue;
            }

            let plus_di = hundred * smoothed_plus / smoothed_tr;
            let minus_di = hundred * smoothed_minus / smoothed_tr;
            let di_sum = plus_di + minus_di;

            dx[i] = if di_sum == Decimal::ZERO {
                Some(Decimal::ZERO)
            } else {
                Some(hundred * (plus_di - minus_di).abs() / di_sum)
            };
        }

        // ADX = DX의 윈도우 평균 (윈도우 전체가 정의된 경우에만)
        let mut result: Vec<Option<Decimal>> = vec![None; len];
        for i in (2 * period - 1)..len {
            let window = &dx[i + 1 - period..=i];
            if window.iter().all(|v| v.is_some()) {
                let sum: Decimal = window.iter().flatten().sum();
                result[i] = Some(sum / period_decimal);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_adx_warmup_boundary() {
        let directional = DirectionalIndicators::new();
        let period = 3;

        let high: Vec<Decimal> = (0..10).map(|i| Decimal::from(101 + i)).collect();
        let low: Vec<Decimal> = (0..10).map(|i| Decimal::from(99 + i)).collect();
        let close: Vec<Decimal> = (0..10).map(|i| Decimal::from(100 + i)).collect();

        let adx = directional
            .adx(&high, &low, &close, AdxParams { period })
            .unwrap();

        // 첫 정의 인덱스는 2 × period − 1
        assert!(adx[2 * period - 2].is_none());
        assert!(adx[2 * period - 1].is_some());
    }

    #[test]
    fn test_adx_pure_uptrend_is_100() {
        let directional = DirectionalIndicators::new();

        // 일정 보폭의 상승: -DM이 전혀 없으므로 DX = 100
        let high: Vec<Decimal> = (0..12).map(|i| Decimal::from(101 + i)).collect();
        let low: Vec<Decimal> = (0..12).map(|i| Decimal::from(99 + i)).collect();
        let close: Vec<Decimal> = (0..12).map(|i| Decimal::from(100 + i)).collect();

        let adx = directional
            .adx(&high, &low, &close, AdxParams { period: 3 })
            .unwrap();

        assert_eq!(*adx.last().unwrap(), Some(dec!(100)));
    }

    #[test]
    fn test_adx_constant_series_is_zero() {
        let directional = DirectionalIndicators::new();

        let high = vec![dec!(100); 30];
        let low = vec![dec!(100); 30];
        let close = vec![dec!(100); 30];

        let adx = directional
            .adx(&high, &low, &close, AdxParams { period: 14 })
            .unwrap();

        // TR이 0이어도 패닉 없이 0으로 처리
        assert_eq!(*adx.last().unwrap(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_adx_in_range() {
        let directional = DirectionalIndicators::new();

        // 등락이 섞인 시리즈
        let close: Vec<Decimal> = (0..40)
            .map(|i| Decimal::from(100 + (i % 7) - (i % 3)))
            .collect();
        let high: Vec<Decimal> = close.iter().map(|c| c + dec!(1)).collect();
        let low: Vec<Decimal> = close.iter().map(|c| c - dec!(1)).collect();

        let adx = directional
            .adx(&high, &low, &close, AdxParams { period: 14 })
            .unwrap();

        for value in adx.iter().flatten() {
            assert!(*value >= Decimal::ZERO);
            assert!(*value <= dec!(100));
        }
    }

    #[test]
    fn test_adx_insufficient_data() {
        let directional = DirectionalIndicators::new();

        let high = vec![dec!(101); 27];
        let low = vec![dec!(99); 27];
        let close = vec![dec!(100); 27];

        let result = directional.adx(&high, &low, &close, AdxParams { period: 14 });
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData {
                required: 28,
                provided: 27
            })
        ));
    }
}
