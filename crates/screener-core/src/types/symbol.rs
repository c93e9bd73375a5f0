//! 거래 심볼 정의.
//!
//! 스크리너가 다루는 현물 페어를 기준 자산/호가 자산 쌍으로 표현합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 거래 가능한 현물 페어를 나타내는 심볼.
///
/// 기준 자산과 호가 자산으로 구성됩니다. 예: BTC/USDT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// 기준 자산 (예: BTC, ETH)
    pub base: String,
    /// 호가 자산 (예: USDT)
    pub quote: String,
}

impl Symbol {
    /// 새 심볼을 생성합니다. 자산 코드는 대문자로 정규화됩니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// "BASE/QUOTE" 형식 문자열에서 심볼을 파싱합니다.
    pub fn from_string(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }

    /// 거래소 연접 형식("BTCUSDT")에서 심볼을 파싱합니다.
    ///
    /// # 인자
    /// - `s`: 거래소 심볼 문자열
    /// - `quote`: 기대하는 호가 자산 (접미사)
    ///
    /// # 반환
    /// 접미사가 일치하고 기준 자산이 비어 있지 않으면 `Some(Symbol)`.
    pub fn from_exchange_string(s: &str, quote: &str) -> Option<Self> {
        let upper = s.to_uppercase();
        let quote = quote.to_uppercase();
        let base = upper.strip_suffix(quote.as_str())?;
        if base.is_empty() {
            return None;
        }
        Some(Self::new(base, quote))
    }

    /// 거래소 연접 형식 문자열을 반환합니다. ("BTC/USDT" -> "BTCUSDT")
    pub fn to_exchange_string(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    /// 표준 심볼 문자열 형식을 반환합니다.
    pub fn to_standard_string(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::new("btc", "usdt");
        assert_eq!(symbol.base, "BTC");
        assert_eq!(symbol.quote, "USDT");
    }

    #[test]
    fn test_symbol_display() {
        let symbol = Symbol::new("BTC", "USDT");
        assert_eq!(symbol.to_string(), "BTC/USDT");
        assert_eq!(symbol.to_exchange_string(), "BTCUSDT");
    }

    #[test]
    fn test_symbol_from_string() {
        let symbol = Symbol::from_string("ETH/USDT").unwrap();
        assert_eq!(symbol.base, "ETH");
        assert_eq!(symbol.quote, "USDT");

        assert!(Symbol::from_string("ETHUSDT").is_none());
        assert!(Symbol::from_string("/USDT").is_none());
    }

    #[test]
    fn test_symbol_from_exchange_string() {
        let symbol = Symbol::from_exchange_string("SOLUSDT", "USDT").unwrap();
        assert_eq!(symbol.base, "SOL");
        assert_eq!(symbol.quote, "USDT");

        // 접미사 불일치
        assert!(Symbol::from_exchange_string("SOLBTC", "USDT").is_none());
        // 기준 자산 없음
        assert!(Symbol::from_exchange_string("USDT", "USDT").is_none());
    }
}
