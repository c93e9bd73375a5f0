//! 실행 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 스크리닝 실행 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// 유니버스 종목 수
    pub total: usize,
    /// 평가까지 도달한 종목 수 (캔들 조회 성공)
    pub evaluated: usize,
    /// 레코드가 생성된 종목 수
    pub accepted: usize,
    /// 빈 캔들 시리즈 (조회 성공, 데이터 없음)
    pub empty_series: usize,
    /// 워밍업 미달 시리즈
    pub insufficient: usize,
    /// 변동성 하한 미달로 제외
    pub excluded_flat: usize,
    /// 급등 직후로 제외
    pub excluded_pump: usize,
    /// 제공자 실패로 건너뜀
    pub failed: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 채택률 계산 (%)
    pub fn acceptance_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.accepted as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            evaluated = self.evaluated,
            accepted = self.accepted,
            empty_series = self.empty_series,
            insufficient = self.insufficient,
            excluded_flat = self.excluded_flat,
            excluded_pump = self.excluded_pump,
            failed = self.failed,
            acceptance_rate = format!("{:.1}%", self.acceptance_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "스크리닝 완료"
        );
    }
}
