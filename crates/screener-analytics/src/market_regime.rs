//! 시장 레짐 필터.
//!
//! 기준 종목(기본: BTC/USDT)의 MACD가 시그널 라인 위에 있는지로
//! 시장 전체의 우호 여부를 판정합니다. 연속 점수 정책의 배수에만
//! 영향을 주며, 실행당 한 번만 평가합니다.

use tracing::debug;

use screener_core::domain::Kline;

use crate::indicators::{MacdParams, TrendIndicators};

/// 시장 레짐 판정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketRegime {
    /// 우호적 (MACD > 시그널).
    Favorable,
    /// 비우호적.
    Unfavorable,
}

impl MarketRegime {
    /// 우호적인지 확인.
    pub fn is_favorable(&self) -> bool {
        matches!(self, MarketRegime::Favorable)
    }
}

/// 시장 레짐 필터.
#[derive(Debug, Default)]
pub struct MarketRegimeFilter {
    params: MacdParams,
    trend: TrendIndicators,
}

impl MarketRegimeFilter {
    /// 새로운 레짐 필터 생성.
    pub fn new(params: MacdParams) -> Self {
        Self {
            params,
            trend: TrendIndicators::new(),
        }
    }

    /// 기준 종목 시리즈에서 레짐을 판정합니다.
    ///
    /// 시리즈가 MACD 계산에 충분하지 않으면 비우호적으로 처리합니다.
    /// 기준 시리즈를 구할 수 없는 실행은 배수 없이 계속됩니다.
    pub fn evaluate(&self, klines: &[Kline]) -> MarketRegime {
        if klines.len() < self.params.slow_span {
            debug!(
                provided = klines.len(),
                required = self.params.slow_span,
                "레짐 판정에 필요한 캔들 부족, 비우호로 처리"
            );
            return MarketRegime::Unfavorable;
        }

        let close: Vec<_> = klines.iter().map(|k| k.close).collect();
        let Ok(macd) = self.trend.macd(&close, self.params) else {
            return MarketRegime::Unfavorable;
        };

        match (macd.line.last(), macd.signal.last()) {
            (Some(line), Some(signal)) if line > signal => MarketRegime::Favorable,
            _ => MarketRegime::Unfavorable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use screener_core::types::{Symbol, Timeframe};

    fn klines_with_closes(closes: &[Decimal]) -> Vec<Kline> {
        let open_time = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        closes
            .iter()
            .map(|close| {
                Kline::new(
                    Symbol::new("BTC", "USDT"),
                    Timeframe::H4,
                    open_time,
                    *close,
                    *close + dec!(1),
                    *close - dec!(1),
                    *close,
                    dec!(1000),
                    open_time,
                )
            })
            .collect()
    }

    #[test]
    fn test_rising_series_is_favorable() {
        // 단기 EMA가 장기보다 빨리 반응하므로 상승 시리즈는 MACD > 시그널
        let closes: Vec<Decimal> = (0..60).map(|i| dec!(100) + Decimal::from(i)).collect();
        let filter = MarketRegimeFilter::new(MacdParams::default());

        assert_eq!(filter.evaluate(&klines_with_closes(&closes)), MarketRegime::Favorable);
        assert!(filter.evaluate(&klines_with_closes(&closes)).is_favorable());
    }

    #[test]
    fn test_falling_series_is_unfavorable() {
        let closes: Vec<Decimal> = (0..60).map(|i| dec!(200) - Decimal::from(i)).collect();
        let filter = MarketRegimeFilter::new(MacdParams::default());

        assert_eq!(
            filter.evaluate(&klines_with_closes(&closes)),
            MarketRegime::Unfavorable
        );
    }

    #[test]
    fn test_short_series_is_unfavorable() {
        let closes: Vec<Decimal> = (0..10).map(|i| dec!(100) + Decimal::from(i)).collect();
        let filter = MarketRegimeFilter::new(MacdParams::default());

        assert_eq!(
            filter.evaluate(&klines_with_closes(&closes)),
            MarketRegime::Unfavorable
        );
        assert_eq!(filter.evaluate(&[]), MarketRegime::Unfavorable);
    }
}
