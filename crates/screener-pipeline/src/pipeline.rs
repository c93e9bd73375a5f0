//! 기회 파이프라인.
//!
//! 유니버스 조회부터 순위 목록과 최우선 종목까지의 실행 단위입니다.
//! 종목 간 평가는 한정된 동시성으로 팬아웃하고, 종목 하나의 실패는
//! 해당 종목의 레코드가 없는 것으로 강등합니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{info, warn};

use screener_analytics::indicators::AnalysisParams;
use screener_analytics::scoring::{ScoringEngine, ScoringParams};
use screener_analytics::{BacktestEvaluator, BacktestRule, MarketRegimeFilter, SeriesIndicatorEngine};
use screener_core::config::AppConfig;
use screener_core::domain::OpportunityRecord;
use screener_core::error::{ScreenerError, ScreenerResult};
use screener_core::types::{Symbol, Timeframe};
use screener_exchange::{InstrumentInfo, MarketDataProvider};
use screener_risk::{RiskParams, RiskSuggester};

use crate::evaluate::{DropReason, Evaluation, ExclusionParams, InstrumentEvaluator};
use crate::report::{ScreenReport, SelectionPolicy};
use crate::stats::RunStats;

/// 기회 파이프라인.
pub struct OpportunityPipeline {
    provider: Arc<dyn MarketDataProvider>,
    evaluator: InstrumentEvaluator,
    regime_filter: MarketRegimeFilter,
    regime_symbol: Symbol,
    timeframe: Timeframe,
    lookback: u32,
    min_quote_volume: Decimal,
    exclude_bases: Vec<String>,
    parallelism: usize,
    request_delay: Duration,
    top_n: usize,
    selection: SelectionPolicy,
    potential_min: Decimal,
    potential_max: Decimal,
}

impl OpportunityPipeline {
    /// 설정과 제공자로부터 파이프라인을 조립합니다.
    ///
    /// 문자열 설정(타임프레임, 점수 정책, 선정 정책, 레짐 심볼)은 이
    /// 시점에 전부 검증되므로 실행 중에는 파싱 실패가 없습니다.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        config: &AppConfig,
    ) -> ScreenerResult<Self> {
        let timeframe = config
            .analysis
            .interval
            .parse::<Timeframe>()
            .map_err(ScreenerError::Config)?;
        let scoring_params =
            ScoringParams::try_from(&config.scoring).map_err(ScreenerError::Config)?;
        let selection = config
            .pipeline
            .selection
            .parse::<SelectionPolicy>()
            .map_err(ScreenerError::Config)?;
        let regime_symbol = Symbol::from_string(&config.scoring.regime_symbol).ok_or_else(|| {
            ScreenerError::Config(format!(
                "잘못된 레짐 심볼: {}",
                config.scoring.regime_symbol
            ))
        })?;

        let analysis_params = AnalysisParams::from(&config.analysis);
        let evaluator = InstrumentEvaluator::new(
            SeriesIndicatorEngine::new(analysis_params),
            BacktestEvaluator::new(BacktestRule::from(&config.scoring.backtest)),
            ScoringEngine::new(scoring_params),
            RiskSuggester::new(RiskParams::from(&config.risk)),
            ExclusionParams::from(&config.pipeline),
        );

        Ok(Self {
            provider,
            evaluator,
            regime_filter: MarketRegimeFilter::new(analysis_params.macd),
            regime_symbol,
            timeframe,
            lookback: config.analysis.lookback,
            min_quote_volume: config.universe.min_quote_volume,
            exclude_bases: config.universe.exclude_bases.clone(),
            parallelism: config.pipeline.parallelism,
            request_delay: Duration::from_millis(config.pipeline.request_delay_ms),
            top_n: config.pipeline.top_n,
            selection,
            potential_min: config.pipeline.potential_min,
            potential_max: config.pipeline.potential_max,
        })
    }

    /// 선정 정책.
    pub fn selection(&self) -> SelectionPolicy {
        self.selection
    }

    /// 스크리닝을 한 번 실행합니다.
    ///
    /// 유니버스 조회 실패만 에러입니다. 종목별 실패는 통계에 집계되고
    /// 실행은 계속됩니다.
    pub async fn run(&self) -> ScreenerResult<ScreenReport> {
        let started = Instant::now();

        let instruments = self
            .provider
            .list_instruments(self.min_quote_volume, &self.exclude_bases)
            .await
            .map_err(|err| ScreenerError::Provider(err.to_string()))?;

        info!(
            provider = self.provider.name(),
            universe = instruments.len(),
            parallelism = self.parallelism,
            "스크리닝 시작"
        );

        // 레짐은 실행당 한 번만 판정. 기준 시리즈를 구할 수 없으면
        // 비우호로 계속한다.
        let regime_favorable = self.evaluate_regime().await;

        let mut stats = RunStats::new();
        stats.total = instruments.len();

        let outcomes = if self.parallelism > 1 {
            self.run_parallel(instruments, regime_favorable).await
        } else {
            self.run_sequential(instruments, regime_favorable).await
        };

        let mut records = Vec::new();
        for outcome in outcomes {
            match outcome {
                Evaluation::Accepted(record) => {
                    stats.evaluated += 1;
                    stats.accepted += 1;
                    records.push(*record);
                }
                Evaluation::Dropped(reason) => {
                    match reason {
                        DropReason::EmptySeries => stats.empty_series += 1,
                        DropReason::Insufficient => stats.insufficient += 1,
                        DropReason::TooFlat => stats.excluded_flat += 1,
                        DropReason::PumpedUp => stats.excluded_pump += 1,
                        DropReason::Failed => stats.failed += 1,
                    }
                    if reason != DropReason::Failed {
                        stats.evaluated += 1;
                    }
                }
            }
        }

        let ranked = rank_records(records, self.top_n);
        let best_pick = self
            .selection
            .select(&ranked, self.potential_min, self.potential_max);

        stats.elapsed = started.elapsed();
        stats.log_summary("screen");

        Ok(ScreenReport {
            ranked,
            best_pick,
            stats,
        })
    }

    /// 한정된 동시성으로 팬아웃합니다. 완료 순서는 무관하며 정렬이
    /// 결과 순서를 결정합니다.
    async fn run_parallel(
        &self,
        instruments: Vec<InstrumentInfo>,
        regime_favorable: bool,
    ) -> Vec<Evaluation> {
        stream::iter(
            instruments
                .into_iter()
                .map(|instrument| self.evaluate_one(instrument, regime_favorable)),
        )
        .buffer_unordered(self.parallelism)
        .collect()
        .await
    }

    /// 요청 간 지연을 두고 순차 평가합니다.
    async fn run_sequential(
        &self,
        instruments: Vec<InstrumentInfo>,
        regime_favorable: bool,
    ) -> Vec<Evaluation> {
        let mut outcomes = Vec::with_capacity(instruments.len());
        let last = instruments.len().saturating_sub(1);
        for (i, instrument) in instruments.into_iter().enumerate() {
            outcomes.push(self.evaluate_one(instrument, regime_favorable).await);
            if i < last {
                tokio::time::sleep(self.request_delay).await;
            }
        }
        outcomes
    }

    async fn evaluate_one(
        &self,
        instrument: InstrumentInfo,
        regime_favorable: bool,
    ) -> Evaluation {
        match self
            .provider
            .get_candles(&instrument.symbol, self.timeframe, self.lookback)
            .await
        {
            Ok(klines) => self
                .evaluator
                .evaluate(&instrument, &klines, regime_favorable),
            Err(err) => {
                warn!(symbol = %instrument.symbol, error = %err, "캔들 조회 실패, 종목 건너뜀");
                Evaluation::Dropped(DropReason::Failed)
            }
        }
    }

    async fn evaluate_regime(&self) -> bool {
        match self
            .provider
            .get_candles(&self.regime_symbol, self.timeframe, self.lookback)
            .await
        {
            Ok(klines) => {
                let regime = self.regime_filter.evaluate(&klines);
                info!(symbol = %self.regime_symbol, favorable = regime.is_favorable(), "시장 레짐 판정");
                regime.is_favorable()
            }
            Err(err) => {
                warn!(symbol = %self.regime_symbol, error = %err, "레짐 시리즈 조회 실패, 비우호로 계속");
                false
            }
        }
    }
}

/// 점수 내림차순 안정 정렬 후 상위 `top_n`개로 자릅니다.
///
/// 동점 종목은 평가 완료 순서가 아니라 입력 순서를 유지해야 하므로
/// 안정 정렬이 필수입니다.
pub fn rank_records(mut records: Vec<OpportunityRecord>, top_n: usize) -> Vec<OpportunityRecord> {
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records.truncate(top_n);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use screener_core::domain::{CriteriaBreakdown, Kline, VolumeTier};
    use screener_exchange::{ProviderError, ProviderResult};
    use std::collections::HashMap;

    /// 심볼별로 미리 정한 캔들을 돌려주는 테스트 제공자.
    struct FixtureProvider {
        instruments: Vec<InstrumentInfo>,
        candles: HashMap<Symbol, Vec<Kline>>,
        failing: Vec<Symbol>,
    }

    #[async_trait]
    impl MarketDataProvider for FixtureProvider {
        async fn list_instruments(
            &self,
            _min_quote_volume: Decimal,
            _exclude_bases: &[String],
        ) -> ProviderResult<Vec<InstrumentInfo>> {
            Ok(self.instruments.clone())
        }

        async fn get_candles(
            &self,
            symbol: &Symbol,
            _timeframe: Timeframe,
            _limit: u32,
        ) -> ProviderResult<Vec<Kline>> {
            if self.failing.contains(symbol) {
                return Err(ProviderError::Network("connection reset".to_string()));
            }
            Ok(self.candles.get(symbol).cloned().unwrap_or_default())
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }

    fn kline(symbol: &Symbol, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Kline {
        let open_time = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Kline::new(
            symbol.clone(),
            Timeframe::H4,
            open_time,
            open,
            high,
            low,
            close,
            dec!(1000),
            open_time,
        )
    }

    /// 등락이 섞인 평가 가능 시리즈.
    fn mixed_klines(symbol: &Symbol, n: usize) -> Vec<Kline> {
        (0..n)
            .map(|i| {
                let base =
                    Decimal::from(100 + (i % 7) as i64) + Decimal::from(i as i64) * dec!(0.1);
                let close = base + dec!(0.5) - Decimal::from((i % 3) as i64) * dec!(0.4);
                let high = base.max(close) + dec!(1);
                let low = base.min(close) - dec!(1);
                kline(symbol, base, high, low, close)
            })
            .collect()
    }

    /// 모든 바가 동일한 무변동 시리즈.
    fn flat_klines(symbol: &Symbol, n: usize) -> Vec<Kline> {
        (0..n)
            .map(|_| kline(symbol, dec!(100), dec!(100), dec!(100), dec!(100)))
            .collect()
    }

    fn instrument(base: &str) -> InstrumentInfo {
        InstrumentInfo {
            symbol: Symbol::new(base, "USDT"),
            quote_volume: dec!(20_000_000),
        }
    }

    fn provider_with(
        entries: Vec<(InstrumentInfo, Vec<Kline>)>,
        failing: Vec<Symbol>,
    ) -> Arc<FixtureProvider> {
        let mut instruments = Vec::new();
        let mut candles = HashMap::new();
        for (info, klines) in entries {
            candles.insert(info.symbol.clone(), klines);
            instruments.push(info);
        }
        // 레짐 기준 시리즈는 항상 제공
        let regime = Symbol::new("BTC", "USDT");
        candles
            .entry(regime.clone())
            .or_insert_with(|| mixed_klines(&regime, 60));
        Arc::new(FixtureProvider {
            instruments,
            candles,
            failing,
        })
    }

    fn record(base: &str, score: Decimal, quote_volume: Decimal) -> OpportunityRecord {
        OpportunityRecord {
            symbol: Symbol::new(base, "USDT"),
            last_price: dec!(100),
            score,
            breakdown: CriteriaBreakdown::new(),
            rsi: dec!(45),
            macd: dec!(0.5),
            volume_tier: VolumeTier::classify(quote_volume),
            quote_volume,
            potential_pct: dec!(10),
            stop_loss: dec!(95),
            trailing_stop_pct: dec!(3),
            take_profit: dec!(110),
        }
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let records = vec![
            record("AAA", dec!(4), dec!(1_000_000)),
            record("BBB", dec!(6), dec!(2_000_000)),
            record("CCC", dec!(4), dec!(3_000_000)),
            record("DDD", dec!(4), dec!(4_000_000)),
        ];

        let ranked = rank_records(records, 25);

        let bases: Vec<String> = ranked.iter().map(|r| r.symbol.base.clone()).collect();
        // 동점(4.0)은 입력 순서 유지
        assert_eq!(bases, vec!["BBB", "AAA", "CCC", "DDD"]);
    }

    #[test]
    fn test_rank_truncates_to_top_n() {
        let records: Vec<OpportunityRecord> = (0..40)
            .map(|i| record(&format!("C{i}"), Decimal::from(i), dec!(1_000_000)))
            .collect();

        let ranked = rank_records(records, 25);

        assert_eq!(ranked.len(), 25);
        assert_eq!(ranked[0].score, dec!(39));
        // 점수 내림차순 불변식
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_run_collects_and_counts() {
        let eth = instrument("ETH");
        let sol = instrument("SOL");
        let flat = instrument("FLAT");
        let broken = instrument("BRK");

        let provider = provider_with(
            vec![
                (eth.clone(), mixed_klines(&eth.symbol, 60)),
                (sol.clone(), mixed_klines(&sol.symbol, 60)),
                (flat.clone(), flat_klines(&flat.symbol, 40)),
                (broken.clone(), Vec::new()),
            ],
            vec![broken.symbol.clone()],
        );

        let pipeline = OpportunityPipeline::new(provider, &AppConfig::default()).unwrap();
        let report = pipeline.run().await.unwrap();

        // 실패한 종목이 있어도 실행은 끝까지 간다
        assert_eq!(report.stats.total, 4);
        assert_eq!(report.stats.accepted, 2);
        assert_eq!(report.stats.excluded_flat, 1);
        assert_eq!(report.stats.failed, 1);
        assert_eq!(report.stats.evaluated, 3);
        assert_eq!(report.ranked.len(), 2);
        assert!(report.best_pick.is_some());
    }

    #[tokio::test]
    async fn test_empty_series_counted_not_errored() {
        let ghost = instrument("GHOST");
        let provider = provider_with(vec![(ghost, Vec::new())], Vec::new());

        let pipeline = OpportunityPipeline::new(provider, &AppConfig::default()).unwrap();
        let report = pipeline.run().await.unwrap();

        assert_eq!(report.stats.empty_series, 1);
        assert_eq!(report.stats.accepted, 0);
        assert!(report.is_empty());
        assert!(report.best_pick.is_none());
    }

    #[tokio::test]
    async fn test_sequential_path_matches_parallel() {
        let eth = instrument("ETH");
        let sol = instrument("SOL");
        let entries = vec![
            (eth.clone(), mixed_klines(&eth.symbol, 60)),
            (sol.clone(), mixed_klines(&sol.symbol, 60)),
        ];

        let mut config = AppConfig::default();
        let parallel =
            OpportunityPipeline::new(provider_with(entries.clone(), Vec::new()), &config)
                .unwrap();

        config.pipeline.parallelism = 1;
        config.pipeline.request_delay_ms = 1;
        let sequential =
            OpportunityPipeline::new(provider_with(entries, Vec::new()), &config).unwrap();

        let a = parallel.run().await.unwrap();
        let b = sequential.run().await.unwrap();

        assert_eq!(a.stats.accepted, b.stats.accepted);
        let symbols = |report: &ScreenReport| {
            report
                .ranked
                .iter()
                .map(|r| r.symbol.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(symbols(&a), symbols(&b));
    }

    #[tokio::test]
    async fn test_universe_failure_is_an_error() {
        struct DownProvider;

        #[async_trait]
        impl MarketDataProvider for DownProvider {
            async fn list_instruments(
                &self,
                _min_quote_volume: Decimal,
                _exclude_bases: &[String],
            ) -> ProviderResult<Vec<InstrumentInfo>> {
                Err(ProviderError::Network("dns failure".to_string()))
            }

            async fn get_candles(
                &self,
                _symbol: &Symbol,
                _timeframe: Timeframe,
                _limit: u32,
            ) -> ProviderResult<Vec<Kline>> {
                Ok(Vec::new())
            }

            fn name(&self) -> &str {
                "down"
            }
        }

        let pipeline =
            OpportunityPipeline::new(Arc::new(DownProvider), &AppConfig::default()).unwrap();

        let result = pipeline.run().await;
        assert!(matches!(result, Err(ScreenerError::Provider(_))));
    }

    #[test]
    fn test_invalid_config_rejected_at_build() {
        let provider = provider_with(Vec::new(), Vec::new());

        let mut config = AppConfig::default();
        config.pipeline.selection = "best".to_string();
        assert!(matches!(
            OpportunityPipeline::new(provider.clone(), &config),
            Err(ScreenerError::Config(_))
        ));

        let mut config = AppConfig::default();
        config.analysis.interval = "9h".to_string();
        assert!(matches!(
            OpportunityPipeline::new(provider.clone(), &config),
            Err(ScreenerError::Config(_))
        ));

        let mut config = AppConfig::default();
        config.scoring.regime_symbol = "BTCUSDT".to_string();
        assert!(matches!(
            OpportunityPipeline::new(provider, &config),
            Err(ScreenerError::Config(_))
        ));
    }
}
