//! 알림 타입 및 trait 정의.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use screener_core::domain::{OpportunityRecord, VolumeTier};
use screener_core::types::Symbol;

/// 알림 우선순위 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// 낮은 우선순위 (정보성)
    Low,
    /// 일반 우선순위 (일반 업데이트)
    Normal,
    /// 높은 우선순위 (중요 이벤트)
    High,
}

impl Default for NotificationPriority {
    fn default() -> Self {
        Self::Normal
    }
}

/// 알림 이벤트 타입.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// 매수 후보 알림
    OpportunityAlert {
        symbol: Symbol,
        price: Decimal,
        score: Decimal,
        rsi: Decimal,
        macd: Decimal,
        potential_pct: Decimal,
        volume_tier: VolumeTier,
        stop_loss: Decimal,
        trailing_stop_pct: Decimal,
    },
    /// 스크리닝 실행 요약
    ScreenSummary {
        universe: usize,
        accepted: usize,
        alerts: usize,
        best_symbol: Option<Symbol>,
        elapsed_secs: f64,
    },
    /// 시스템 오류
    SystemError { error_code: String, message: String },
}

/// 알림 메시지.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// 알림 이벤트
    pub event: NotificationEvent,
    /// 우선순위 레벨
    pub priority: NotificationPriority,
    /// 타임스탬프
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// 새 알림을 생성합니다.
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            event,
            priority: NotificationPriority::Normal,
            timestamp: Utc::now(),
        }
    }

    /// 우선순위 레벨을 설정합니다.
    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    /// 기회 레코드에서 매수 후보 알림을 생성합니다.
    pub fn opportunity(record: &OpportunityRecord) -> Self {
        Self::new(NotificationEvent::OpportunityAlert {
            symbol: record.symbol.clone(),
            price: record.last_price,
            score: record.score,
            rsi: record.rsi,
            macd: record.macd,
            potential_pct: record.potential_pct,
            volume_tier: record.volume_tier,
            stop_loss: record.stop_loss,
            trailing_stop_pct: record.trailing_stop_pct,
        })
        .with_priority(NotificationPriority::High)
    }
}

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 알림 전송기 trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 알림을 전송합니다.
    async fn send(&self, notification: &Notification) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
