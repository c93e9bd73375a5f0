//! 피보나치 되돌림 레벨.
//!
//! 시리즈 전체의 최고가/최저가 범위에서 한 번 계산하는 지지/저항
//! 가격 레벨입니다. 바 단위로 갱신되지 않습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 피보나치 되돌림 레벨.
///
/// level(r) = 최고가 − (최고가 − 최저가) × r
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    /// 시리즈 최고가.
    pub high: Decimal,
    /// 시리즈 최저가.
    pub low: Decimal,
    /// 23.6% 되돌림.
    pub level_236: Decimal,
    /// 38.2% 되돌림.
    pub level_382: Decimal,
    /// 50% 되돌림.
    pub level_500: Decimal,
    /// 61.8% 되돌림.
    pub level_618: Decimal,
    /// 78.6% 되돌림.
    pub level_786: Decimal,
}

impl FibonacciLevels {
    /// 고가/저가 범위에서 레벨을 계산합니다.
    pub fn from_range(high: Decimal, low: Decimal) -> Self {
        let range = high - low;
        let level = |ratio: Decimal| high - range * ratio;

        Self {
            high,
            low,
            level_236: level(dec!(0.236)),
            level_382: level(dec!(0.382)),
            level_500: level(dec!(0.5)),
            level_618: level(dec!(0.618)),
            level_786: level(dec!(0.786)),
        }
    }

    /// 시리즈의 최고 고가와 최저 저가에서 레벨을 계산합니다.
    ///
    /// # 인자
    /// * `high` - 고가 데이터
    /// * `low` - 저가 데이터
    pub fn from_series(high: &[Decimal], low: &[Decimal]) -> IndicatorResult<Self> {
        let max_high = high.iter().max();
        let min_low = low.iter().min();

        match (max_high, min_low) {
            (Some(h), Some(l)) => Ok(Self::from_range(*h, *l)),
            _ => Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_levels_formula() {
        let levels = FibonacciLevels::from_range(dec!(200), dec!(100));

        assert_eq!(levels.level_236, dec!(176.4));
        assert_eq!(levels.level_382, dec!(161.8));
        assert_eq!(levels.level_500, dec!(150));
        assert_eq!(levels.level_618, dec!(138.2));
        assert_eq!(levels.level_786, dec!(121.4));
    }

    #[test]
    fn test_levels_ordering() {
        let levels = FibonacciLevels::from_range(dec!(55000), dec!(48000));

        assert!(levels.high > levels.level_236);
        assert!(levels.level_236 > levels.level_382);
        assert!(levels.level_382 > levels.level_500);
        assert!(levels.level_500 > levels.level_618);
        assert!(levels.level_618 > levels.level_786);
        assert!(levels.level_786 > levels.low);
    }

    #[test]
    fn test_from_series_uses_extremes() {
        let high = vec![dec!(110), dec!(150), dec!(120)];
        let low = vec![dec!(100), dec!(130), dec!(90)];

        let levels = FibonacciLevels::from_series(&high, &low).unwrap();

        assert_eq!(levels.high, dec!(150));
        assert_eq!(levels.low, dec!(90));
        assert_eq!(levels.level_500, dec!(120));
    }

    #[test]
    fn test_from_empty_series_error() {
        let result = FibonacciLevels::from_series(&[], &[]);
        assert!(result.is_err());
    }
}
