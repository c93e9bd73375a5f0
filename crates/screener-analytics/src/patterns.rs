//! 캔들 패턴 감지.
//!
//! 시리즈 꼬리의 반전 시그널을 불리언 플래그로 제공합니다.
//! - 망치형 (Hammer): 몸통 대비 전체 범위가 3배를 넘는 상승 캔들
//! - 강세 장악형 (Bullish Engulfing): 직전 하락 캔들의 몸통을 감싸는 상승 캔들

use rust_decimal_macros::dec;
use screener_core::domain::Kline;

/// 캔들 패턴 감지기.
#[derive(Debug, Default)]
pub struct PatternDetector;

impl PatternDetector {
    /// 새로운 캔들 패턴 감지기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 마지막 캔들이 망치형인지 확인.
    ///
    /// 조건: 종가 > 시가 AND (고가 − 저가) > 3 × |종가 − 시가|
    pub fn is_hammer(&self, klines: &[Kline]) -> bool {
        klines.last().is_some_and(|k| hammer(k))
    }

    /// 마지막 두 캔들이 강세 장악형인지 확인.
    ///
    /// 조건: 직전 캔들 하락, 현재 캔들 상승, 현재 종가 > 직전 시가,
    /// 현재 시가 < 직전 종가.
    pub fn is_bullish_engulfing(&self, klines: &[Kline]) -> bool {
        if klines.len() < 2 {
            return false;
        }
        let prev = &klines[klines.len() - 2];
        let curr = &klines[klines.len() - 1];
        bullish_engulfing(prev, curr)
    }

    /// 각 바를 마지막 캔들로 간주했을 때의 망치형 플래그.
    pub fn hammer_flags(&self, klines: &[Kline]) -> Vec<bool> {
        klines.iter().map(hammer).collect()
    }

    /// 각 바를 마지막 캔들로 간주했을 때의 강세 장악형 플래그.
    ///
    /// 첫 바는 비교할 직전 캔들이 없으므로 항상 false.
    pub fn engulfing_flags(&self, klines: &[Kline]) -> Vec<bool> {
        (0..klines.len())
            .map(|i| i > 0 && bullish_engulfing(&klines[i - 1], &klines[i]))
            .collect()
    }
}

fn hammer(kline: &Kline) -> bool {
    kline.is_bullish() && kline.range() > dec!(3) * kline.body_size()
}

fn bullish_engulfing(prev: &Kline, curr: &Kline) -> bool {
    prev.is_bearish() && curr.is_bullish() && curr.close > prev.open && curr.open < prev.close
}
