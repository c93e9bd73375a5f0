//! 유니버스 종목 목록 조회 명령.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use screener_core::config::AppConfig;
use screener_exchange::{
    BinanceMarketConfig, BinanceMarketData, InstrumentInfo, MarketDataProvider,
};

/// 출력 형식.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 행 단위 출력용 종목 정보.
#[derive(Debug, Serialize)]
struct SymbolRow {
    symbol: String,
    quote_volume: String,
}

/// 필터를 통과한 유니버스를 조회해 출력합니다.
pub async fn list_symbols(config: AppConfig, format: OutputFormat) -> Result<usize> {
    let provider = BinanceMarketData::new(BinanceMarketConfig {
        base_url: config.exchange.base_url.clone(),
        quote_asset: config.universe.quote_asset.clone(),
        timeout_secs: config.exchange.timeout_secs,
    })
    .context("시장 데이터 제공자 생성 실패")?;

    let instruments = provider
        .list_instruments(
            config.universe.min_quote_volume,
            &config.universe.exclude_bases,
        )
        .await
        .context("유니버스 조회 실패")?;

    info!(count = instruments.len(), "유니버스 조회 완료");
    print_instruments(&instruments, format)?;

    Ok(instruments.len())
}

fn print_instruments(instruments: &[InstrumentInfo], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("\n{:<14} {:>20}", "SYMBOL", "QUOTE_VOLUME");
            println!("{}", "-".repeat(35));
            for info in instruments {
                println!("{:<14} {:>20}", info.symbol.to_string(), info.quote_volume);
            }
            println!("\nTotal: {} symbols", instruments.len());
        }
        OutputFormat::Json => {
            let rows: Vec<SymbolRow> = instruments
                .iter()
                .map(|info| SymbolRow {
                    symbol: info.symbol.to_string(),
                    quote_volume: info.quote_volume.to_string(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("JSON 직렬화 실패")?
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert!(matches!(
            OutputFormat::parse("table").unwrap(),
            OutputFormat::Table
        ));
        assert!(matches!(
            OutputFormat::parse("JSON").unwrap(),
            OutputFormat::Json
        ));
        assert!(OutputFormat::parse("csv").is_err());
    }
}
