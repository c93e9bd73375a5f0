//! 종목별 평가 단계.
//!
//! 캔들 시리즈 하나를 받아 지표 계산, 제외 규칙, 적중률, 점수,
//! 리스크 제안을 순서대로 적용하고 기회 레코드 하나 또는 탈락
//! 사유를 반환합니다. 어떤 입력도 에러로 배치를 중단시키지 않습니다.

use rust_decimal::Decimal;
use tracing::debug;

use screener_analytics::backtest::BacktestEvaluator;
use screener_analytics::indicators::{IndicatorError, SeriesIndicatorEngine};
use screener_analytics::scoring::ScoringEngine;
use screener_core::config::PipelineConfig;
use screener_core::domain::{Kline, OpportunityRecord, VolumeTier};
use screener_exchange::InstrumentInfo;
use screener_risk::RiskSuggester;

/// 제외 규칙 파라미터.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionParams {
    /// 변동성 하한 (미만이면 제외).
    pub volatility_floor: Decimal,
    /// 급등 제외 임계값 (최근 변화율 합이 초과하면 제외).
    pub pump_threshold: Decimal,
    /// 급등 판정에 사용하는 변화율 수.
    pub pump_window: usize,
}

impl From<&PipelineConfig> for ExclusionParams {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            volatility_floor: config.volatility_floor,
            pump_threshold: config.pump_threshold,
            pump_window: config.pump_window,
        }
    }
}

/// 종목 탈락 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// 캔들 시리즈가 비어 있음.
    EmptySeries,
    /// 지표 워밍업에 필요한 캔들 미달.
    Insufficient,
    /// 변동성 하한 미달.
    TooFlat,
    /// 최근 급등으로 제외.
    PumpedUp,
    /// 계산 실패.
    Failed,
}

/// 종목별 평가 결과.
#[derive(Debug)]
pub enum Evaluation {
    /// 기회 레코드 생성.
    Accepted(Box<OpportunityRecord>),
    /// 사유와 함께 탈락.
    Dropped(DropReason),
}

/// 최근 `window`개 캔들 간 종가 변화율의 합.
///
/// 변화율 n개를 보려면 캔들 n + 1개가 필요하며, 시리즈가 더 짧으면
/// 있는 만큼만 합산합니다. 직전 종가가 0인 구간은 건너뜁니다.
pub fn recent_pct_change_sum(klines: &[Kline], window: usize) -> Decimal {
    if klines.len() < 2 || window == 0 {
        return Decimal::ZERO;
    }

    let tail_start = klines.len().saturating_sub(window + 1);
    klines[tail_start..]
        .windows(2)
        .filter_map(|pair| pair[1].pct_change_from(&pair[0]))
        .sum()
}

/// 종목 평가기.
///
/// 계산 단계들을 하나로 묶은 상태 없는 조립체입니다. 파이프라인
/// 생성 시점에 한 번 만들어 모든 종목에 재사용합니다.
#[derive(Debug)]
pub struct InstrumentEvaluator {
    indicators: SeriesIndicatorEngine,
    backtest: BacktestEvaluator,
    scoring: ScoringEngine,
    risk: RiskSuggester,
    exclusion: ExclusionParams,
}

impl InstrumentEvaluator {
    /// 새로운 종목 평가기 생성.
    pub fn new(
        indicators: SeriesIndicatorEngine,
        backtest: BacktestEvaluator,
        scoring: ScoringEngine,
        risk: RiskSuggester,
        exclusion: ExclusionParams,
    ) -> Self {
        Self {
            indicators,
            backtest,
            scoring,
            risk,
            exclusion,
        }
    }

    /// 변동성 하한 미달 여부 (미만 비교).
    pub fn is_too_flat(&self, volatility: Decimal) -> bool {
        volatility < self.exclusion.volatility_floor
    }

    /// 최근 급등 여부 (변화율 합의 초과 비교).
    pub fn is_pumped_up(&self, klines: &[Kline]) -> bool {
        recent_pct_change_sum(klines, self.exclusion.pump_window) > self.exclusion.pump_threshold
    }

    /// 종목 하나를 평가합니다.
    ///
    /// # 인자
    /// * `instrument` - 유니버스 종목 정보
    /// * `klines` - 시간 오름차순 캔들 시리즈
    /// * `regime_favorable` - 시장 레짐 우호 여부
    pub fn evaluate(
        &self,
        instrument: &InstrumentInfo,
        klines: &[Kline],
        regime_favorable: bool,
    ) -> Evaluation {
        if klines.is_empty() {
            return Evaluation::Dropped(DropReason::EmptySeries);
        }

        let series = match self.indicators.compute(klines) {
            Ok(series) => series,
            Err(IndicatorError::InsufficientData { required, provided }) => {
                debug!(
                    symbol = %instrument.symbol,
                    required,
                    provided,
                    "워밍업 미달로 탈락"
                );
                return Evaluation::Dropped(DropReason::Insufficient);
            }
            Err(err) => {
                debug!(symbol = %instrument.symbol, error = %err, "지표 계산 실패");
                return Evaluation::Dropped(DropReason::Failed);
            }
        };

        // 마지막 바의 워밍업이 끝나지 않은 시리즈도 미달로 처리
        let Some(snapshot) = series.latest_snapshot() else {
            return Evaluation::Dropped(DropReason::Insufficient);
        };

        if self.is_too_flat(snapshot.volatility) {
            debug!(symbol = %instrument.symbol, volatility = %snapshot.volatility, "변동성 미달로 제외");
            return Evaluation::Dropped(DropReason::TooFlat);
        }

        if self.is_pumped_up(klines) {
            debug!(symbol = %instrument.symbol, "급등 직후로 제외");
            return Evaluation::Dropped(DropReason::PumpedUp);
        }

        let hit_rate = self.backtest.hit_rate(&series);
        let score = self.scoring.score(&snapshot, hit_rate, regime_favorable);
        let suggestion = self.risk.suggest(
            snapshot.close,
            snapshot.atr,
            snapshot.volatility,
            snapshot.bb_upper,
        );

        // 거래대금은 마지막 캔들 우선, 없으면 24시간 티커 값
        let quote_volume = klines
            .last()
            .and_then(|k| k.quote_volume)
            .unwrap_or(instrument.quote_volume);

        Evaluation::Accepted(Box::new(OpportunityRecord {
            symbol: instrument.symbol.clone(),
            last_price: snapshot.close,
            score: score.score,
            breakdown: score.breakdown,
            rsi: snapshot.rsi,
            macd: snapshot.macd,
            volume_tier: VolumeTier::classify(quote_volume),
            quote_volume,
            potential_pct: suggestion.potential_pct,
            stop_loss: suggestion.stop_loss,
            trailing_stop_pct: suggestion.trailing_stop_pct,
            take_profit: suggestion.take_profit,
        }))
    }
}
