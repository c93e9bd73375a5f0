//! 거래량 지표 (Volume Indicators).
//!
//! 거래량 흐름으로 가격 움직임의 신뢰도를 측정합니다.
//! - OBV (On-Balance Volume)

use rust_decimal::Decimal;

use super::{IndicatorError, IndicatorResult};

/// 거래량 지표 계산기.
#[derive(Debug, Default)]
pub struct VolumeIndicators;

impl VolumeIndicators {
    /// 새로운 거래량 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// OBV (On-Balance Volume) 계산.
    ///
    /// 종가 상승 바는 +거래량, 하락 바는 -거래량, 동일하면 0을
    /// 누적합니다. 첫 바는 기여분이 없으므로 0에서 시작합니다.
    ///
    /// # 인자
    /// * `close` - 종가 데이터
    /// * `volume` - 거래량 데이터
    ///
    /// # 반환
    /// 각 시점의 누적 OBV 값 (입력과 같은 길이)
    pub fn obv(&self, close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Vec<Decimal>> {
        if close.len() != volume.len() {
            return Err(IndicatorError::InvalidParameter(
                "종가와 거래량 데이터의 길이가 일치하지 않습니다".to_string(),
            ));
        }

        if close.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }

        let mut result = Vec::with_capacity(close.len());
        let mut current = Decimal::ZERO;
        result.push(current);

        for i in 1..close.len() {
            if close[i] > close[i - 1] {
                current += volume[i];
            } else if close[i] < close[i - 1] {
                current -= volume[i];
            }
            result.push(current);
        }

        Ok(result)
    }
}
