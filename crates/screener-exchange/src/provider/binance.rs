//! Binance 시장 데이터 제공자.
//!
//! 공개 REST 엔드포인트만 사용합니다 (서명 불필요):
//! - `/api/v3/ticker/24hr` - 유니버스 필터링용 24시간 티커
//! - `/api/v3/klines` - 캔들 시리즈

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, error, warn};

use screener_core::domain::Kline;
use screener_core::types::{Symbol, Timeframe};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{InstrumentInfo, MarketDataProvider};

/// Binance 시장 데이터 설정.
#[derive(Debug, Clone)]
pub struct BinanceMarketConfig {
    /// REST API 기본 URL (테스트에서 모의 서버로 교체 가능)
    pub base_url: String,
    /// 대상 호가 자산 (예: "USDT")
    pub quote_asset: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for BinanceMarketConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            quote_asset: "USDT".to_string(),
            timeout_secs: 30,
        }
    }
}

impl BinanceMarketConfig {
    /// 새 설정 생성.
    pub fn new(base_url: impl Into<String>, quote_asset: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            quote_asset: quote_asset.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Binance24hTicker {
    symbol: String,
    quote_volume: String,
}

/// 바이낸스 klines 응답의 위치 기반 배열.
#[derive(Debug, Deserialize)]
struct BinanceKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    i64,    // 8: Number of trades
    String, // 9: Taker buy base asset volume
    String, // 10: Taker buy quote asset volume
    String, // 11: Ignore
);

#[derive(Debug, Deserialize)]
struct BinanceApiError {
    code: i32,
    msg: String,
}

// ============================================================================
// 제공자 구현
// ============================================================================

/// Binance 공개 REST 기반 시장 데이터 제공자.
pub struct BinanceMarketData {
    config: BinanceMarketConfig,
    client: Client,
}

impl BinanceMarketData {
    /// 새 제공자 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ProviderError::Network`.
    pub fn new(config: BinanceMarketConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { config, client })
    }

    /// 공개 GET 요청.
    async fn public_get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ProviderResult<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let full_url = if query.is_empty() {
            url
        } else {
            format!("{}?{}", url, query)
        };

        debug!("GET {}", full_url);

        let response = self.client.get(&full_url).send().await?;
        self.handle_response(response).await
    }

    /// API 응답 처리.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> ProviderResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                error!("응답 파싱 실패: {} - Body: {}", e, body);
                ProviderError::Parse(e.to_string())
            })
        } else if status.as_u16() == 429 {
            warn!("Binance 요청 한도 초과");
            Err(ProviderError::RateLimited)
        } else if let Ok(api_error) = serde_json::from_str::<BinanceApiError>(&body) {
            Err(ProviderError::Api {
                code: api_error.code,
                message: api_error.msg,
            })
        } else {
            Err(ProviderError::Api {
                code: status.as_u16() as i32,
                message: body,
            })
        }
    }

    /// 문자열에서 Decimal 파싱. 파싱 실패는 0으로 처리합니다.
    fn parse_decimal(s: &str) -> Decimal {
        s.parse().unwrap_or(Decimal::ZERO)
    }

    /// 밀리초 타임스탬프를 UTC 시각으로 변환.
    fn parse_timestamp(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
    }

    /// klines 응답 한 건을 내부 캔들로 변환.
    fn to_kline(&self, raw: BinanceKline, symbol: &Symbol, timeframe: Timeframe) -> Kline {
        let mut kline = Kline::new(
            symbol.clone(),
            timeframe,
            Self::parse_timestamp(raw.0),
            Self::parse_decimal(&raw.1),
            Self::parse_decimal(&raw.2),
            Self::parse_decimal(&raw.3),
            Self::parse_decimal(&raw.4),
            Self::parse_decimal(&raw.5),
            Self::parse_timestamp(raw.6),
        );
        kline.quote_volume = Some(Self::parse_decimal(&raw.7));
        kline.num_trades = u32::try_from(raw.8).ok();
        kline
    }
}

#[async_trait]
impl MarketDataProvider for BinanceMarketData {
    async fn list_instruments(
        &self,
        min_quote_volume: Decimal,
        exclude_bases: &[String],
    ) -> ProviderResult<Vec<InstrumentInfo>> {
        let tickers: Vec<Binance24hTicker> = self.public_get("/api/v3/ticker/24hr", &[]).await?;

        let instruments: Vec<InstrumentInfo> = tickers
            .into_iter()
            .filter_map(|ticker| {
                let symbol =
                    Symbol::from_exchange_string(&ticker.symbol, &self.config.quote_asset)?;
                if exclude_bases.iter().any(|base| *base == symbol.base) {
                    return None;
                }

                let quote_volume = Self::parse_decimal(&ticker.quote_volume);
                if quote_volume <= min_quote_volume {
                    return None;
                }

                Some(InstrumentInfo {
                    symbol,
                    quote_volume,
                })
            })
            .collect();

        debug!(count = instruments.len(), "유니버스 조회 완료");
        Ok(instruments)
    }

    async fn get_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: u32,
    ) -> ProviderResult<Vec<Kline>> {
        let params = [
            ("symbol", symbol.to_exchange_string()),
            ("interval", timeframe.to_binance_interval().to_string()),
            ("limit", limit.to_string()),
        ];

        let raw: Vec<BinanceKline> = self.public_get("/api/v3/klines", &params).await?;

        Ok(raw
            .into_iter()
            .map(|k| self.to_kline(k, symbol, timeframe))
            .collect())
    }

    fn name(&self) -> &str {
        "binance"
    }
}
