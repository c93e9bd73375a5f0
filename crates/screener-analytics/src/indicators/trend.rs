//! 추세 지표 (Trend Indicators).
//!
//! 지수 이동평균 기반의 추세 지표들을 제공합니다.
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 스팬 (α = 2 / (span + 1)).
    pub span: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { span: 9 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 스팬 (기본: 12).
    pub fast_span: usize,
    /// 장기 EMA 스팬 (기본: 26).
    pub slow_span: usize,
    /// 시그널 라인 스팬 (기본: 9).
    pub signal_span: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_span: 12,
            slow_span: 26,
            signal_span: 9,
        }
    }
}

/// MACD 계산 결과.
///
/// 세 시리즈 모두 입력과 같은 길이이며 첫 바부터 정의됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdSeries {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub line: Vec<Decimal>,
    /// 시그널 라인 (MACD 라인의 EMA).
    pub signal: Vec<Decimal>,
    /// 히스토그램 (MACD 라인 - 시그널 라인).
    pub histogram: Vec<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × α) + (이전 EMA × (1 - α))
    /// α = 2 / (span + 1)
    ///
    /// 첫 값을 시드로 사용하므로 워밍업 구간 없이 첫 바부터 정의됩니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터
    /// * `params` - EMA 파라미터
    ///
    /// # 반환
    /// 각 시점의 EMA 값 (입력과 같은 길이)
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Decimal>> {
        if params.span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "스팬은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }

        let alpha = dec!(2) / Decimal::from(params.span + 1);
        let one_minus_alpha = Decimal::ONE - alpha;

        let mut result = Vec::with_capacity(prices.len());
        let mut prev_ema = prices[0];
        result.push(prev_ema);

        for price in &prices[1..] {
            let ema = (*price * alpha) + (prev_ema * one_minus_alpha);
            result.push(ema);
            prev_ema = ema;
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// # 인자
    /// * `prices` - 가격 데이터
    /// * `params` - MACD 파라미터
    ///
    /// # 반환
    /// MACD 라인, 시그널 라인, 히스토그램 시리즈
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<MacdSeries> {
        let fast_ema = self.ema(
            prices,
            EmaParams {
                span: params.fast_span,
            },
        )?;
        let slow_ema = self.ema(
            prices,
            EmaParams {
                span: params.slow_span,
            },
        )?;

        let line: Vec<Decimal> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| fast - slow)
            .collect();

        let signal = self.ema(
            &line,
            EmaParams {
                span: params.signal_span,
            },
        )?;

        let histogram: Vec<Decimal> = line
            .iter()
            .zip(signal.iter())
            .map(|(l, s)| l - s)
            .collect();

        Ok(MacdSeries {
            line,
            signal,
            histogram,
        })
    }
}
