//! 스크리닝 보고서와 최우선 종목 선정.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use screener_core::domain::OpportunityRecord;

use crate::stats::RunStats;

/// 최우선 종목 선정 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// 최고 점수 종목.
    MaxScore,
    /// 상승 여력 구간 내 최대 여력 종목.
    PotentialBand,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max_score" => Ok(Self::MaxScore),
            "potential_band" => Ok(Self::PotentialBand),
            _ => Err(format!("알 수 없는 선정 정책: {}", s)),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::MaxScore => write!(f, "max_score"),
            SelectionPolicy::PotentialBand => write!(f, "potential_band"),
        }
    }
}

impl SelectionPolicy {
    /// 순위 목록에서 최우선 종목을 선정합니다.
    ///
    /// `MaxScore`는 목록의 첫 레코드(점수 내림차순 정렬 기준 최고점),
    /// `PotentialBand`는 상승 여력이 [min, max] 구간에 드는 레코드 중
    /// 여력이 가장 큰 것을 반환합니다. 구간에 드는 레코드가 없으면
    /// 목록이 비어 있지 않아도 `None`입니다.
    pub fn select(
        &self,
        ranked: &[OpportunityRecord],
        potential_min: Decimal,
        potential_max: Decimal,
    ) -> Option<OpportunityRecord> {
        match self {
            SelectionPolicy::MaxScore => ranked.first().cloned(),
            SelectionPolicy::PotentialBand => ranked
                .iter()
                .filter(|r| r.potential_pct >= potential_min && r.potential_pct <= potential_max)
                .max_by(|a, b| a.potential_pct.cmp(&b.potential_pct))
                .cloned(),
        }
    }
}

/// 스크리닝 실행 보고서.
///
/// 실행당 하나 생성되며 순위 목록, 최우선 종목, 실행 통계를 담습니다.
/// 영속화되지 않는 일회성 산출물입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenReport {
    /// 점수 내림차순 순위 목록 (최대 top_n개)
    pub ranked: Vec<OpportunityRecord>,
    /// 선정 정책에 따른 최우선 종목
    pub best_pick: Option<OpportunityRecord>,
    /// 실행 통계
    pub stats: RunStats,
}

impl ScreenReport {
    /// 순위 목록이 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use screener_core::domain::{CriteriaBreakdown, VolumeTier};
    use screener_core::types::Symbol;

    fn record(base: &str, score: Decimal, potential_pct: Decimal) -> OpportunityRecord {
        OpportunityRecord {
            symbol: Symbol::new(base, "USDT"),
            last_price: dec!(100),
            score,
            breakdown: CriteriaBreakdown::new(),
            rsi: dec!(45),
            macd: dec!(0.5),
            volume_tier: VolumeTier::Low,
            quote_volume: dec!(500_000),
            potential_pct,
            stop_loss: dec!(95),
            trailing_stop_pct: dec!(3),
            take_profit: dec!(110),
        }
    }

    #[test]
    fn test_max_score_takes_first() {
        let ranked = vec![
            record("BTC", dec!(6), dec!(5)),
            record("ETH", dec!(4), dec!(15)),
        ];

        let pick = SelectionPolicy::MaxScore.select(&ranked, dec!(10), dec!(30));
        assert_eq!(pick.unwrap().symbol, Symbol::new("BTC", "USDT"));
    }

    #[test]
    fn test_potential_band_picks_max_within_band() {
        let ranked = vec![
            record("BTC", dec!(6), dec!(5)),   // 구간 밖 (아래)
            record("ETH", dec!(5), dec!(15)),
            record("SOL", dec!(4), dec!(25)),
            record("ADA", dec!(3), dec!(40)),  // 구간 밖 (위)
        ];

        let pick = SelectionPolicy::PotentialBand
            .select(&ranked, dec!(10), dec!(30))
            .unwrap();
        assert_eq!(pick.symbol, Symbol::new("SOL", "USDT"));
        assert!(pick.potential_pct >= dec!(10) && pick.potential_pct <= dec!(30));
    }

    #[test]
    fn test_potential_band_boundaries_inclusive() {
        let ranked = vec![
            record("BTC", dec!(6), dec!(10)),
            record("ETH", dec!(5), dec!(30)),
        ];

        let pick = SelectionPolicy::PotentialBand
            .select(&ranked, dec!(10), dec!(30))
            .unwrap();
        assert_eq!(pick.potential_pct, dec!(30));
    }

    #[test]
    fn test_potential_band_none_when_band_empty() {
        // 순위 목록은 비어 있지 않지만 구간에 드는 종목이 없다
        let ranked = vec![record("BTC", dec!(6), dec!(5))];

        let pick = SelectionPolicy::PotentialBand.select(&ranked, dec!(10), dec!(30));
        assert!(pick.is_none());

        let report = ScreenReport {
            ranked,
            best_pick: pick,
            stats: RunStats::new(),
        };
        assert!(!report.is_empty());
        assert!(report.best_pick.is_none());
    }

    #[test]
    fn test_selection_policy_parsing() {
        assert_eq!(
            "max_score".parse::<SelectionPolicy>().unwrap(),
            SelectionPolicy::MaxScore
        );
        assert_eq!(
            "POTENTIAL_BAND".parse::<SelectionPolicy>().unwrap(),
            SelectionPolicy::PotentialBand
        );
        assert!("best".parse::<SelectionPolicy>().is_err());
    }
}
