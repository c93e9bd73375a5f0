//! 시장 데이터 제공자 추상화.
//!
//! 파이프라인은 이 trait을 통해서만 외부 데이터를 봅니다. 빈 결과는
//! "데이터 없음"이지 에러가 아니며, 제공자 실패는 해당 종목의 평가를
//! 건너뛰게 할 뿐 배치를 중단시키지 않습니다.

pub mod binance;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use screener_core::domain::Kline;
use screener_core::types::{Symbol, Timeframe};

use crate::error::ProviderResult;

/// 유니버스에 포함된 종목 정보.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentInfo {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 24시간 거래대금 (호가 자산 단위)
    pub quote_volume: Decimal,
}

/// 시장 데이터 제공자 trait.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 필터 조건을 만족하는 종목 유니버스를 반환합니다.
    ///
    /// # 인자
    /// * `min_quote_volume` - 최소 24시간 거래대금
    /// * `exclude_bases` - 제외할 기준 자산 (스테이블코인 등)
    async fn list_instruments(
        &self,
        min_quote_volume: Decimal,
        exclude_bases: &[String],
    ) -> ProviderResult<Vec<InstrumentInfo>>;

    /// 종목의 캔들 시리즈를 시간 오름차순으로 반환합니다.
    ///
    /// 데이터가 없으면 빈 벡터를 반환합니다 (에러가 아님).
    async fn get_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: u32,
    ) -> ProviderResult<Vec<Kline>>;

    /// 제공자 이름.
    fn name(&self) -> &str;
}
