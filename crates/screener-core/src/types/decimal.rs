//! 정밀한 금융 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래량을 위한 타입.
pub type Quantity = Decimal;

/// 퍼센트 타입 (0.01 = 1%).
pub type Percentage = Decimal;

/// 지정된 소수점 자릿수로 반올림합니다 (사사오입).
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(dec!(1.23456), 4), dec!(1.2346));
        assert_eq!(round_dp(dec!(1.23455), 4), dec!(1.2346));
        assert_eq!(round_dp(dec!(-1.23455), 4), dec!(-1.2346));
    }
}
