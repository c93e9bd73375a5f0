//! 과거 적중률 백테스트.
//!
//! 지표 시리즈 위에서 단순 전방 수익 규칙의 과거 적중률을 추정합니다.
//! 포지션 크기나 수수료가 없는 빈도 추정이며 시뮬레이션이 아닙니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use screener_core::config::BacktestRuleConfig;

use crate::indicators::IndicatorSeries;

/// 백테스트 진입 규칙.
///
/// 진입 조건: MACD > 시그널 AND rsi_lower < RSI < rsi_upper.
/// 성공 조건: horizon 바 뒤 종가 > 진입 종가 × (1 + min_gain).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BacktestRule {
    /// 평가 시작 인덱스 (기본: 20).
    pub start_index: usize,
    /// RSI 하한 (기본: 45, 미포함).
    pub rsi_lower: Decimal,
    /// RSI 상한 (기본: 70, 미포함).
    pub rsi_upper: Decimal,
    /// 전방 바 수 (기본: 2).
    pub horizon: usize,
    /// 최소 상승률 (기본: 0.03).
    pub min_gain: Decimal,
}

impl Default for BacktestRule {
    fn default() -> Self {
        Self {
            start_index: 20,
            rsi_lower: dec!(45),
            rsi_upper: dec!(70),
            horizon: 2,
            min_gain: dec!(0.03),
        }
    }
}

impl From<&BacktestRuleConfig> for BacktestRule {
    fn from(config: &BacktestRuleConfig) -> Self {
        Self {
            start_index: config.start_index,
            rsi_lower: config.rsi_lower,
            rsi_upper: config.rsi_upper,
            horizon: config.horizon,
            min_gain: config.min_gain,
        }
    }
}

/// 과거 적중률 평가기.
#[derive(Debug, Default)]
pub struct BacktestEvaluator {
    rule: BacktestRule,
}

impl BacktestEvaluator {
    /// 새로운 평가기 생성.
    pub fn new(rule: BacktestRule) -> Self {
        Self { rule }
    }

    /// 적중률 계산.
    ///
    /// 진입 조건을 만족하는 바를 시도로 세고, 그중 성공 조건을 만족한
    /// 비율을 반환합니다. RSI가 미정의인 바는 시도가 아닙니다.
    ///
    /// # 인자
    /// * `series` - 완전히 계산된 지표 시리즈
    ///
    /// # 반환
    /// [0, 1] 범위의 적중률. 시도가 없으면 정확히 0.
    pub fn hit_rate(&self, series: &IndicatorSeries) -> Decimal {
        let len = series.len();
        let end = len.saturating_sub(self.rule.horizon + 1);

        let mut trials = 0u32;
        let mut successes = 0u32;
        let gain_multiplier = Decimal::ONE + self.rule.min_gain;

        for i in self.rule.start_index..end {
            let Some(rsi) = series.rsi[i] else {
                continue;
            };

            let entered = series.macd[i] > series.macd_signal[i]
                && rsi > self.rule.rsi_lower
                && rsi < self.rule.rsi_upper;
            if !entered {
                continue;
            }

            trials += 1;
            if series.close[i + self.rule.horizon] > series.close[i] * gain_multiplier {
                successes += 1;
            }
        }

        if trials == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(successes) / Decimal::from(trials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::FibonacciLevels;
    use rust_decimal_macros::dec;

    /// 종가·MACD·RSI만 의미 있는 테스트용 시리즈.
    fn series_with(
        close: Vec<Decimal>,
        macd: Vec<Decimal>,
        macd_signal: Vec<Decimal>,
        rsi: Vec<Option<Decimal>>,
    ) -> IndicatorSeries {
        let len = close.len();
        IndicatorSeries {
            close,
            ema_short: vec![Decimal::ZERO; len],
            ema_long: vec![Decimal::ZERO; len],
            macd,
            macd_signal,
            macd_histogram: vec![Decimal::ZERO; len],
            obv: vec![Decimal::ZERO; len],
            rsi,
            atr: vec![None; len],
            volatility: vec![None; len],
            adx: vec![None; len],
            bb_middle: vec![None; len],
            bb_upper: vec![None; len],
            bb_lower: vec![None; len],
            fibonacci: FibonacciLevels::from_range(dec!(1), dec!(0)),
            hammer: vec![false; len],
            bullish_engulfing: vec![false; len],
        }
    }

    #[test]
    fn test_hit_rate_counts_trials_and_successes() {
        let len = 30;
        // 인덱스 24부터 10% 상승: i=22, 23 진입 건만 성공
        let close: Vec<Decimal> = (0..len)
            .map(|i| if i < 24 { dec!(100) } else { dec!(110) })
            .collect();
        let macd = vec![dec!(1); len];
        let macd_signal = vec![Decimal::ZERO; len];
        let rsi = vec![Some(dec!(50)); len];

        let evaluator = BacktestEvaluator::new(BacktestRule::default());
        let rate = evaluator.hit_rate(&series_with(close, macd, macd_signal, rsi));

        // 시도: i = 20..27 중 horizon 경계로 20..=26 → 7건, 성공 2건
        assert_eq!(rate, Decimal::from(2) / Decimal::from(7));
        assert!(rate >= Decimal::ZERO && rate <= Decimal::ONE);
    }

    #[test]
    fn test_hit_rate_zero_when_no_trials() {
        let len = 30;
        let close = vec![dec!(100); len];
        // MACD가 시그널 아래면 진입 없음
        let macd = vec![Decimal::ZERO; len];
        let macd_signal = vec![dec!(1); len];
        let rsi = vec![Some(dec!(50)); len];

        let evaluator = BacktestEvaluator::new(BacktestRule::default());
        let rate = evaluator.hit_rate(&series_with(close, macd, macd_signal, rsi));

        assert_eq!(rate, Decimal::ZERO);
    }

    #[test]
    fn test_rsi_band_is_exclusive() {
        let len = 30;
        let close = vec![dec!(100); len];
        let macd = vec![dec!(1); len];
        let macd_signal = vec![Decimal::ZERO; len];
        // 경계값 45와 70은 진입하지 않는다
        let rsi = vec![Some(dec!(45)); len];

        let evaluator = BacktestEvaluator::new(BacktestRule::default());
        let rate = evaluator.hit_rate(&series_with(close, macd, macd_signal, rsi));
        assert_eq!(rate, Decimal::ZERO);

        let rsi_upper = vec![Some(dec!(70)); len];
        let close = vec![dec!(100); len];
        let macd = vec![dec!(1); len];
        let macd_signal = vec![Decimal::ZERO; len];
        let rate = evaluator.hit_rate(&series_with(close, macd, macd_signal, rsi_upper));
        assert_eq!(rate, Decimal::ZERO);
    }

    #[test]
    fn test_short_series_returns_zero() {
        let len = 10;
        let close = vec![dec!(100); len];
        let macd = vec![dec!(1); len];
        let macd_signal = vec![Decimal::ZERO; len];
        let rsi = vec![Some(dec!(50)); len];

        let evaluator = BacktestEvaluator::new(BacktestRule::default());
        let rate = evaluator.hit_rate(&series_with(close, macd, macd_signal, rsi));

        assert_eq!(rate, Decimal::ZERO);
    }

    #[test]
    fn test_undefined_rsi_is_not_a_trial() {
        let len = 30;
        let close: Vec<Decimal> = (0..len).map(|_| dec!(100)).collect();
        let macd = vec![dec!(1); len];
        let macd_signal = vec![Decimal::ZERO; len];
        let rsi = vec![None; len];

        let evaluator = BacktestEvaluator::new(BacktestRule::default());
        let rate = evaluator.hit_rate(&series_with(close, macd, macd_signal, rsi));

        assert_eq!(rate, Decimal::ZERO);
    }

    #[test]
    fn test_rule_from_config() {
        let config = screener_core::config::BacktestRuleConfig::default();
        let rule = BacktestRule::from(&config);

        assert_eq!(rule.start_index, 20);
        assert_eq!(rule.rsi_lower, dec!(45));
        assert_eq!(rule.rsi_upper, dec!(70));
        assert_eq!(rule.horizon, 2);
        assert_eq!(rule.min_gain, dec!(0.03));
    }
}
