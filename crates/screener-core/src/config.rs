//! 설정 관리.
//!
//! 이 모듈은 스크리너의 전체 설정 트리를 정의합니다. 모든 임계값은
//! 프로세스 전역 상태가 아니라 이 트리를 통해 파이프라인 생성 시점에
//! 주입됩니다.
//!
//! 로드 순서: 기본값 -> 설정 파일(선택) -> `SCREENER__` 환경 변수.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 거래소 설정
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// 종목 유니버스 필터 설정
    #[serde(default)]
    pub universe: UniverseConfig,
    /// 지표 계산 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 점수 산정 설정
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// 리스크 제안 설정
    #[serde(default)]
    pub risk: RiskConfig,
    /// 파이프라인 실행 설정
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 거래소 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// 종목 유니버스 필터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UniverseConfig {
    /// 호가 자산 (이 자산으로 끝나는 페어만 대상)
    pub quote_asset: String,
    /// 최소 24시간 거래대금 (호가 자산 단위)
    pub min_quote_volume: Decimal,
    /// 제외할 기준 자산 (스테이블코인 등)
    pub exclude_bases: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            quote_asset: "USDT".to_string(),
            min_quote_volume: dec!(200_000),
            exclude_bases: vec![
                "USDT".to_string(),
                "BUSD".to_string(),
                "USDC".to_string(),
                "DAI".to_string(),
                "TUSD".to_string(),
                "PAX".to_string(),
                "GUSD".to_string(),
                "UST".to_string(),
            ],
        }
    }
}

/// 지표 계산 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// 캔들 타임프레임 (바이낸스 간격 문자열)
    pub interval: String,
    /// 조회할 캔들 수
    pub lookback: u32,
    /// 단기 EMA 기간
    pub ema_short: usize,
    /// 장기 EMA 기간
    pub ema_long: usize,
    /// RSI 기간
    pub rsi_period: usize,
    /// ATR 기간
    pub atr_period: usize,
    /// ADX 기간
    pub adx_period: usize,
    /// MACD 단기 EMA 기간
    pub macd_fast: usize,
    /// MACD 장기 EMA 기간
    pub macd_slow: usize,
    /// MACD 시그널 EMA 기간
    pub macd_signal: usize,
    /// 볼린저 밴드 기간
    pub bollinger_period: usize,
    /// 볼린저 밴드 표준편차 배수
    pub bollinger_multiplier: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            interval: "4h".to_string(),
            lookback: 200,
            ema_short: 9,
            ema_long: 50,
            rsi_period: 14,
            atr_period: 14,
            adx_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_multiplier: dec!(2),
        }
    }
}

/// 점수 산정 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// 점수 정책 (four_criterion, seven_criterion, continuous)
    pub policy: String,
    /// 저변동성 기준 임계값
    pub volatility_threshold: Decimal,
    /// 시장 레짐 기준 심볼
    pub regime_symbol: String,
    /// 레짐 우호 시 연속 점수 배수
    pub regime_boost: Decimal,
    /// 과거 적중률 평가 규칙
    #[serde(default)]
    pub backtest: BacktestRuleConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: "four_criterion".to_string(),
            volatility_threshold: dec!(0.015),
            regime_symbol: "BTC/USDT".to_string(),
            regime_boost: dec!(1.1),
            backtest: BacktestRuleConfig::default(),
        }
    }
}

/// 과거 적중률 평가 규칙 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestRuleConfig {
    /// 평가 시작 인덱스 (워밍업 구간 제외)
    pub start_index: usize,
    /// 진입 조건 RSI 하한 (초과)
    pub rsi_lower: Decimal,
    /// 진입 조건 RSI 상한 (미만)
    pub rsi_upper: Decimal,
    /// 성공 판정까지의 캔들 수
    pub horizon: usize,
    /// 성공 판정 최소 상승률 (0.03 = 3%)
    pub min_gain: Decimal,
}

impl Default for BacktestRuleConfig {
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

/// 리스크 제안 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskConfig {
    /// 손절 계산용 ATR 배수
    pub atr_multiplier: Decimal,
    /// 손절 가격 하한
    pub stop_loss_floor: Decimal,
    /// 변동성 구간별 추적 손절 비율 (변동성 내림차순)
    pub trailing_tiers: Vec<TrailingTier>,
    /// 어느 구간에도 해당하지 않을 때의 추적 손절 비율 (%)
    pub default_trailing_pct: Decimal,
}

/// 추적 손절 구간.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrailingTier {
    /// 이 구간이 적용되는 변동성 하한 (초과 비교)
    pub min_volatility: Decimal,
    /// 추적 손절 비율 (%)
    pub stop_pct: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            atr_multiplier: dec!(2),
            stop_loss_floor: dec!(0.001),
            trailing_tiers: vec![
                TrailingTier { min_volatility: dec!(0.05), stop_pct: dec!(10) },
                TrailingTier { min_volatility: dec!(0.03), stop_pct: dec!(7) },
                TrailingTier { min_volatility: dec!(0.02), stop_pct: dec!(5) },
            ],
            default_trailing_pct: dec!(3),
        }
    }
}

/// 파이프라인 실행 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// 동시 평가 종목 수 (1 이하이면 순차 실행)
    pub parallelism: usize,
    /// 순차 실행 시 요청 간 지연 (밀리초)
    pub request_delay_ms: u64,
    /// 변동성 하한 (미만이면 제외)
    pub volatility_floor: Decimal,
    /// 급등 제외 임계값 (최근 변화율 합이 초과하면 제외)
    pub pump_threshold: Decimal,
    /// 급등 판정에 사용하는 캔들 수
    pub pump_window: usize,
    /// 순위 목록 최대 길이
    pub top_n: usize,
    /// 최우선 종목 선정 정책 (max_score, potential_band)
    pub selection: String,
    /// potential_band 정책의 상승 여력 하한 (%)
    pub potential_min: Decimal,
    /// potential_band 정책의 상승 여력 상한 (%)
    pub potential_max: Decimal,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallelism: 8,
            request_delay_ms: 200,
            volatility_floor: dec!(0.005),
            pump_threshold: dec!(0.10),
            pump_window: 5,
            top_n: 25,
            selection: "max_score".to_string(),
            potential_min: dec!(10),
            potential_max: dec!(30),
        }
    }
}

/// 알림 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// 알림 활성화 여부
    pub enabled: bool,
    /// 알림을 보낼 최소 점수
    pub min_score_alert: Decimal,
    /// 텔레그램 설정
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_score_alert: dec!(5),
            telegram: TelegramConfig::default(),
        }
    }
}

/// 텔레그램 알림 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 봇 토큰
    #[serde(default)]
    pub bot_token: String,
    /// 채팅 ID
    #[serde(default)]
    pub chat_id: String,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일(선택)과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값 위에 환경 변수만 적용됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("SCREENER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
