//! # Screener Exchange
//!
//! 시장 데이터 제공자 추상화와 Binance 공개 REST 구현을 제공합니다.
//!
//! 파이프라인은 `MarketDataProvider` trait만 알고, 실제 HTTP 통신은
//! 이 크레이트 안에 격리됩니다.

pub mod error;
pub mod provider;

pub use error::{ProviderError, ProviderResult};
pub use provider::binance::{BinanceMarketConfig, BinanceMarketData};
pub use provider::{InstrumentInfo, MarketDataProvider};
