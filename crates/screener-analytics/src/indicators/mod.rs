//! 기술적 지표 모듈.
//!
//! 캔들 시리즈를 지표 시리즈로 변환하는 순수 계산 함수들을 제공합니다.
//! 모든 수치는 `rust_decimal::Decimal`로 계산합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **EMA**: 지수 이동평균 (첫 값 시드, 워밍업 없음)
//! - **MACD**: 이동평균 수렴/확산 + 시그널 라인
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (단순 윈도우 평균 방식)
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **ATR**: 평균 실제 범위 (True Range 기반)
//! - **변동성 비율**: ATR / 종가
//! - **Bollinger Bands**: 볼린저 밴드 (표본 표준편차)
//!
//! ## 방향성 / 거래량 지표
//! - **ADX**: 평균 방향성 지수
//! - **OBV**: 누적 거래량 균형
//! - **피보나치 되돌림**: 시리즈 고저 범위에서 1회 계산
//!
//! # 사용 예시
//!
//! ```ignore
//! use screener_analytics::indicators::{AnalysisParams, SeriesIndicatorEngine};
//!
//! let engine = SeriesIndicatorEngine::new(AnalysisParams::default());
//! let series = engine.compute(&klines)?;
//! let snapshot = series.latest_snapshot();
//! ```

pub mod directional;
pub mod fibonacci;
pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use screener_core::config::AnalysisConfig;
use screener_core::domain::Kline;

use crate::patterns::PatternDetector;

pub use directional::{AdxParams, DirectionalIndicators};
pub use fibonacci::FibonacciLevels;
pub use momentum::{MomentumCalculator, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdSeries, TrendIndicators};
pub use volatility::{AtrParams, BollingerParams, BollingerSeries, VolatilityIndicators};
pub use volume::VolumeIndicators;

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 시리즈 지표 계산 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// 단기 EMA (기본: 9).
    pub ema_short: EmaParams,
    /// 장기 EMA (기본: 50).
    pub ema_long: EmaParams,
    /// RSI 파라미터.
    pub rsi: RsiParams,
    /// ATR 파라미터.
    pub atr: AtrParams,
    /// ADX 파라미터.
    pub adx: AdxParams,
    /// MACD 파라미터.
    pub macd: MacdParams,
    /// 볼린저 밴드 파라미터.
    pub bollinger: BollingerParams,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            ema_short: EmaParams { span: 9 },
            ema_long: EmaParams { span: 50 },
            rsi: RsiParams::default(),
            atr: AtrParams::default(),
            adx: AdxParams::default(),
            macd: MacdParams::default(),
            bollinger: BollingerParams::default(),
        }
    }
}

impl AnalysisParams {
    /// 모든 지표의 워밍업을 만족하는 최소 시리즈 길이.
    ///
    /// RSI는 변화량 기준이라 period + 1, ADX는 DX 평활화까지
    /// 2 × period가 필요합니다. 직전 바 비교 때문에 하한은 2입니다.
    pub fn min_required_len(&self) -> usize {
        (self.rsi.period + 1)
            .max(self.atr.period)
            .max(2 * self.adx.period)
            .max(self.bollinger.period)
            .max(2)
    }
}

impl From<&AnalysisConfig> for AnalysisParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            ema_short: EmaParams {
                span: config.ema_short,
            },
            ema_long: EmaParams {
                span: config.ema_long,
            },
            rsi: RsiParams {
                period: config.rsi_period,
            },
            atr: AtrParams {
                period: config.atr_period,
            },
            adx: AdxParams {
                period: config.adx_period,
            },
            macd: MacdParams {
                fast_span: config.macd_fast,
                slow_span: config.macd_slow,
                signal_span: config.macd_signal,
            },
            bollinger: BollingerParams {
                period: config.bollinger_period,
                multiplier: config.bollinger_multiplier,
            },
        }
    }
}

/// 바 단위 지표 시리즈.
///
/// 모든 컬럼은 입력 캔들과 같은 길이입니다. EMA/MACD/OBV는 첫 바부터
/// 정의되고, 윈도우 기반 지표는 워밍업 구간이 None입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSeries {
    /// 종가.
    pub close: Vec<Decimal>,
    /// 단기 EMA.
    pub ema_short: Vec<Decimal>,
    /// 장기 EMA.
    pub ema_long: Vec<Decimal>,
    /// MACD 라인.
    pub macd: Vec<Decimal>,
    /// MACD 시그널 라인.
    pub macd_signal: Vec<Decimal>,
    /// MACD 히스토그램.
    pub macd_histogram: Vec<Decimal>,
    /// 누적 OBV.
    pub obv: Vec<Decimal>,
    /// RSI.
    pub rsi: Vec<Option<Decimal>>,
    /// ATR.
    pub atr: Vec<Option<Decimal>>,
    /// 변동성 비율 (ATR / 종가).
    pub volatility: Vec<Option<Decimal>>,
    /// ADX.
    pub adx: Vec<Option<Decimal>>,
    /// 볼린저 중간 밴드.
    pub bb_middle: Vec<Option<Decimal>>,
    /// 볼린저 상단 밴드.
    pub bb_upper: Vec<Option<Decimal>>,
    /// 볼린저 하단 밴드.
    pub bb_lower: Vec<Option<Decimal>>,
    /// 피보나치 되돌림 레벨 (시리즈당 1회).
    pub fibonacci: FibonacciLevels,
    /// 망치형 플래그.
    pub hammer: Vec<bool>,
    /// 강세 장악형 플래그.
    pub bullish_engulfing: Vec<bool>,
}

impl IndicatorSeries {
    /// 시리즈 길이.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// 시리즈가 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// 지정한 바의 스냅샷을 반환합니다.
    ///
    /// 직전 바 비교가 필요하므로 인덱스 0은 항상 None이며, 윈도우
    /// 지표가 하나라도 미정의인 바도 None입니다. 워밍업이 끝나지 않은
    /// 바는 이 가드를 통해 점수 계산에서 배제됩니다.
    pub fn snapshot_at(&self, index: usize) -> Option<IndicatorSnapshot> {
        if index == 0 || index >= self.len() {
            return None;
        }

        let rsi = self.rsi.get(index).copied().flatten()?;
        let atr = self.atr.get(index).copied().flatten()?;
        let volatility = self.volatility.get(index).copied().flatten()?;
        let adx = self.adx.get(index).copied().flatten()?;
        let bb_middle = self.bb_middle.get(index).copied().flatten()?;
        let bb_upper = self.bb_upper.get(index).copied().flatten()?;
        let bb_lower = self.bb_lower.get(index).copied().flatten()?;

        Some(IndicatorSnapshot {
            close: self.close[index],
            prev_close: self.close[index - 1],
            ema_short: self.ema_short[index],
            ema_long: self.ema_long[index],
            rsi,
            atr,
            volatility,
            macd: self.macd[index],
            macd_signal: self.macd_signal[index],
            macd_histogram: self.macd_histogram[index],
            adx,
            obv: self.obv[index],
            prev_obv: self.obv[index - 1],
            bb_middle,
            bb_upper,
            bb_lower,
            fibonacci: self.fibonacci,
            hammer: self.hammer[index],
            bullish_engulfing: self.bullish_engulfing[index],
        })
    }

    /// 마지막 바의 스냅샷을 반환합니다.
    pub fn latest_snapshot(&self) -> Option<IndicatorSnapshot> {
        self.len().checked_sub(1).and_then(|i| self.snapshot_at(i))
    }
}

/// 단일 바의 지표 스냅샷.
///
/// 모든 워밍업이 끝난 바에서만 생성되므로 모든 필드가 정의되어
/// 있습니다. 점수 계산과 리스크 제안의 입력입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// 종가.
    pub close: Decimal,
    /// 직전 바 종가.
    pub prev_close: Decimal,
    /// 단기 EMA.
    pub ema_short: Decimal,
    /// 장기 EMA.
    pub ema_long: Decimal,
    /// RSI.
    pub rsi: Decimal,
    /// ATR.
    pub atr: Decimal,
    /// 변동성 비율 (ATR / 종가).
    pub volatility: Decimal,
    /// MACD 라인.
    pub macd: Decimal,
    /// MACD 시그널 라인.
    pub macd_signal: Decimal,
    /// MACD 히스토그램.
    pub macd_histogram: Decimal,
    /// ADX.
    pub adx: Decimal,
    /// 누적 OBV.
    pub obv: Decimal,
    /// 직전 바 OBV.
    pub prev_obv: Decimal,
    /// 볼린저 중간 밴드.
    pub bb_middle: Decimal,
    /// 볼린저 상단 밴드.
    pub bb_upper: Decimal,
    /// 볼린저 하단 밴드.
    pub bb_lower: Decimal,
    /// 피보나치 되돌림 레벨.
    pub fibonacci: FibonacciLevels,
    /// 망치형 패턴 여부.
    pub hammer: bool,
    /// 강세 장악형 패턴 여부.
    pub bullish_engulfing: bool,
}

/// 시리즈 지표 엔진.
///
/// 캔들 시리즈 하나를 받아 전체 지표 시리즈를 계산하는 통합
/// 인터페이스입니다. 내부 계산기들은 상태가 없으며 결과는 입력에만
/// 의존합니다.
#[derive(Debug, Default)]
pub struct SeriesIndicatorEngine {
    params: AnalysisParams,
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    directional: DirectionalIndicators,
    volume: VolumeIndicators,
    patterns: PatternDetector,
}

impl SeriesIndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new(params: AnalysisParams) -> Self {
        Self {
            params,
            trend: TrendIndicators::new(),
            momentum: MomentumCalculator::new(),
            volatility: VolatilityIndicators::new(),
            directional: DirectionalIndicators::new(),
            volume: VolumeIndicators::new(),
            patterns: PatternDetector::new(),
        }
    }

    /// 지표 계산 파라미터.
    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// 캔들 시리즈에서 전체 지표 시리즈를 계산합니다.
    ///
    /// # 인자
    /// * `klines` - 시간 오름차순 캔들 시리즈
    ///
    /// # 반환
    /// 입력과 같은 길이의 지표 시리즈. 모든 워밍업을 만족할 수 없는
    /// 길이면 `InsufficientData`.
    pub fn compute(&self, klines: &[Kline]) -> IndicatorResult<IndicatorSeries> {
        let required = self.params.min_required_len();
        if klines.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                provided: klines.len(),
            });
        }

        let high: Vec<Decimal> = klines.iter().map(|k| k.high).collect();
        let low: Vec<Decimal> = klines.iter().map(|k| k.low).collect();
        let close: Vec<Decimal> = klines.iter().map(|k| k.close).collect();
        let volume: Vec<Decimal> = klines.iter().map(|k| k.volume).collect();

        // 추세 지표
        let ema_short = self.trend.ema(&close, self.params.ema_short)?;
        let ema_long = self.trend.ema(&close, self.params.ema_long)?;
        let macd = self.trend.macd(&close, self.params.macd)?;

        // 모멘텀 / 변동성 지표
        let rsi = self.momentum.rsi(&close, self.params.rsi)?;
        let atr = self.volatility.atr(&high, &low, &close, self.params.atr)?;
        let volatility = self.volatility.volatility_ratio(&atr, &close);
        let bollinger = self.volatility.bollinger_bands(&close, self.params.bollinger)?;

        // 방향성 / 거래량 지표
        let adx = self.directional.adx(&high, &low, &close, self.params.adx)?;
        let obv = self.volume.obv(&close, &volume)?;

        // 시리즈 단위 산출물
        let fibonacci = FibonacciLevels::from_series(&high, &low)?;
        let hammer = self.patterns.hammer_flags(klines);
        let bullish_engulfing = self.patterns.engulfing_flags(klines);

        Ok(IndicatorSeries {
            close,
            ema_short,
            ema_long,
            macd: macd.line,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
            obv,
            rsi,
            atr,
            volatility,
            adx,
            bb_middle: bollinger.middle,
            bb_upper: bollinger.upper,
            bb_lower: bollinger.lower,
            fibonacci,
            hammer,
            bullish_engulfing,
        })
    }
}
