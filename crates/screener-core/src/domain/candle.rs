//! 캔들스틱 시장 데이터 타입.
//!
//! 이 모듈은 지표 계산의 입력이 되는 OHLCV 캔들을 정의합니다.
//! 캔들 시퀀스는 시간 오름차순으로 정렬되어 있어야 합니다.

use crate::types::{Price, Quantity, Symbol, Timeframe};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들스틱 데이터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kline {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (기준 자산 단위)
    pub volume: Quantity,
    /// 캔들 종료 시간
    pub close_time: DateTime<Utc>,
    /// 거래대금 (호가 자산 단위)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_volume: Option<Decimal>,
    /// 체결 건수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_trades: Option<u32>,
}

impl Kline {
    /// 새 캔들을 생성합니다.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: Symbol,
        timeframe: Timeframe,
        open_time: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        close_time: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol,
            timeframe,
            open_time,
            open,
            high,
            low,
            close,
            volume,
            close_time,
            quote_volume: None,
            num_trades: None,
        }
    }

    /// 캔들 몸통 크기(절대값)를 반환합니다.
    pub fn body_size(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 직전 캔들 대비 종가 변화율을 반환합니다.
    ///
    /// 직전 종가가 0이면 `None`을 반환합니다.
    pub fn pct_change_from(&self, prev: &Kline) -> Option<Decimal> {
        if prev.close.is_zero() {
            return None;
        }
        Some((self.close - prev.close) / prev.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_kline(open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Kline {
        let now = Utc::now();
        Kline::new(
            Symbol::new("BTC", "USDT"),
            Timeframe::H4,
            now,
            open,
            high,
            low,
            close,
            dec!(100),
            now,
        )
    }

    #[test]
    fn test_kline_shape() {
        let kline = sample_kline(dec!(50000), dec!(51000), dec!(49500), dec!(50500));

        assert!(kline.is_bullish());
        assert!(!kline.is_bearish());
        assert_eq!(kline.body_size(), dec!(500));
        assert_eq!(kline.range(), dec!(1500));
    }

    #[test]
    fn test_pct_change_from() {
        let prev = sample_kline(dec!(100), dec!(105), dec!(95), dec!(100));
        let curr = sample_kline(dec!(100), dec!(110), dec!(99), dec!(102));

        assert_eq!(curr.pct_change_from(&prev), Some(dec!(0.02)));

        let zero = sample_kline(dec!(0), dec!(0), dec!(0), dec!(0));
        assert_eq!(curr.pct_change_from(&zero), None);
    }
}
