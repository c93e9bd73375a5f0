//! 텔레그램 알림 서비스.
//!
//! Telegram Bot API를 통해 스크리닝 결과 알림을 전송합니다.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use screener_core::config::TelegramConfig;
use screener_core::domain::OpportunityRecord;
use screener_core::types::round_dp;

use crate::types::{
    Notification, NotificationError, NotificationEvent, NotificationPriority, NotificationResult,
    NotificationSender,
};

/// 텔레그램 알림 전송기.
pub struct TelegramSender {
    config: TelegramConfig,
    parse_mode: String,
    client: reqwest::Client,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            parse_mode: "HTML".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// 알림을 텔레그램 메시지로 포맷합니다.
    fn format_message(&self, notification: &Notification) -> String {
        let priority_emoji = match notification.priority {
            NotificationPriority::Low => "ℹ️",
            NotificationPriority::Normal => "📊",
            NotificationPriority::High => "⚠️",
        };

        let content = match &notification.event {
            NotificationEvent::OpportunityAlert {
                symbol,
                price,
                score,
                rsi,
                macd,
                potential_pct,
                volume_tier,
                stop_loss,
                trailing_stop_pct,
            } => {
                format!(
                    "🎯 <b>매수 후보</b>\n\n\
                     심볼: <code>{symbol}</code>\n\
                     가격: {price}\n\
                     점수: <b>{score}</b>\n\
                     RSI: {}\n\
                     MACD: {}\n\
                     상승 여력: {}%\n\
                     거래대금 등급: {volume_tier}\n\
                     손절 제안: {stop_loss}\n\
                     추적 손절: {trailing_stop_pct}%",
                    round_dp(*rsi, 1),
                    round_dp(*macd, 4),
                    round_dp(*potential_pct, 2),
                )
            }

            NotificationEvent::ScreenSummary {
                universe,
                accepted,
                alerts,
                best_symbol,
                elapsed_secs,
            } => {
                let best = best_symbol
                    .as_ref()
                    .map(|s| format!("\n최우선: <code>{s}</code>"))
                    .unwrap_or_default();
                format!(
                    "📋 <b>스크리닝 요약</b>\n\n\
                     유니버스: {universe}개\n\
                     후보: {accepted}개\n\
                     알림: {alerts}건{best}\n\
                     소요: {elapsed_secs:.1}초"
                )
            }

            NotificationEvent::SystemError {
                error_code,
                message,
            } => {
                format!(
                    "🚨 <b>시스템 오류</b>\n\n\
                     코드: <code>{error_code}</code>\n\
                     메시지: {message}"
                )
            }
        };

        let timestamp = notification.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
        format!("{priority_emoji} {content}\n\n<i>🕐 {timestamp}</i>")
    }

    /// 텔레그램에 원시 메시지를 전송합니다.
    async fn send_message(&self, text: &str) -> NotificationResult<()> {
        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            self.config.bot_token
        );

        let params = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": self.parse_mode,
            "disable_web_page_preview": true,
        });

        debug!(chat_id = %self.config.chat_id, "텔레그램 메시지 전송");

        let response = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            info!("텔레그램 알림 전송 완료");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // 요청 한도 제한 확인
            if status.as_u16() == 429 {
                warn!("텔레그램 요청 한도 초과");
                return Err(NotificationError::RateLimited(60));
            }

            error!(%status, body, "텔레그램 메시지 전송 실패");
            Err(NotificationError::SendFailed(format!(
                "HTTP {}: {}",
                status, body
            )))
        }
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send(&self, notification: &Notification) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("텔레그램 알림이 비활성화되어 있어 건너뜀");
            return Ok(());
        }

        let message = self.format_message(notification);
        self.send_message(&message).await
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.bot_token.is_empty() && !self.config.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// 여러 전송기를 관리하는 알림 관리자.
pub struct NotificationManager {
    senders: Vec<Box<dyn NotificationSender>>,
}

impl NotificationManager {
    /// 새 알림 관리자를 생성합니다.
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// 알림 전송기를 추가합니다.
    pub fn add_sender<S: NotificationSender + 'static>(&mut self, sender: S) {
        self.senders.push(Box::new(sender));
    }

    /// 활성화된 전송기 수.
    pub fn enabled_count(&self) -> usize {
        self.senders.iter().filter(|s| s.is_enabled()).count()
    }

    /// 활성화된 모든 전송기를 통해 알림을 전송합니다.
    pub async fn notify(&self, notification: &Notification) -> NotificationResult<()> {
        let mut last_error = None;

        for sender in &self.senders {
            if sender.is_enabled() {
                if let Err(e) = sender.send(notification).await {
                    error!(sender = sender.name(), error = %e, "알림 전송 실패");
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            // 전송기가 하나뿐이면 실패를 그대로 전달
            if self.enabled_count() == 1 {
                return Err(e);
            }
        }

        Ok(())
    }

    /// 매수 후보 알림을 전송합니다.
    pub async fn notify_opportunity(&self, record: &OpportunityRecord) -> NotificationResult<()> {
        self.notify(&Notification::opportunity(record)).await
    }

    /// 스크리닝 요약 알림을 전송합니다.
    pub async fn notify_summary(
        &self,
        universe: usize,
        accepted: usize,
        alerts: usize,
        best_symbol: Option<screener_core::types::Symbol>,
        elapsed_secs: f64,
    ) -> NotificationResult<()> {
        let notification = Notification::new(NotificationEvent::ScreenSummary {
            universe,
            accepted,
            alerts,
            best_symbol,
            elapsed_secs,
        })
        .with_priority(NotificationPriority::Low);

        self.notify(&notification).await
    }

    /// 시스템 오류 알림을 전송합니다.
    pub async fn notify_system_error(
        &self,
        error_code: &str,
        message: &str,
    ) -> NotificationResult<()> {
        let notification = Notification::new(NotificationEvent::SystemError {
            error_code: error_code.to_string(),
            message: message.to_string(),
        })
        .with_priority(NotificationPriority::High);

        self.notify(&notification).await
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use screener_core::domain::{CriteriaBreakdown, VolumeTier};
    use screener_core::types::Symbol;

    fn sender() -> TelegramSender {
        TelegramSender::new(TelegramConfig {
            enabled: true,
            bot_token: "test_token".to_string(),
            chat_id: "123456".to_string(),
        })
    }

    fn sample_record() -> OpportunityRecord {
        OpportunityRecord {
            symbol: Symbol::new("ETH", "USDT"),
            last_price: dec!(3150.5),
            score: dec!(5.5),
            breakdown: CriteriaBreakdown::new(),
            rsi: dec!(47.25),
            macd: dec!(0.82),
            volume_tier: VolumeTier::High,
            quote_volume: dec!(80_000_000),
            potential_pct: dec!(12.345),
            stop_loss: dec!(2980.1234),
            trailing_stop_pct: dec!(5),
            take_profit: dec!(3539.5),
        }
    }

    #[test]
    fn test_format_opportunity_alert() {
        let notification = Notification::opportunity(&sample_record());
        let message = sender().format_message(&notification);

        assert!(message.contains("매수 후보"));
        assert!(message.contains("ETH/USDT"));
        assert!(message.contains("점수: <b>5.5</b>"));
        assert!(message.contains("RSI: 47.3"));
        assert!(message.contains("상승 여력: 12.35%"));
        assert!(message.contains("거래대금 등급: High"));
        assert!(message.contains("추적 손절: 5%"));
    }

    #[test]
    fn test_format_summary_with_and_without_best() {
        let sender = sender();

        let with_best = Notification::new(NotificationEvent::ScreenSummary {
            universe: 120,
            accepted: 18,
            alerts: 3,
            best_symbol: Some(Symbol::new("SOL", "USDT")),
            elapsed_secs: 42.5,
        });
        let message = sender.format_message(&with_best);
        assert!(message.contains("유니버스: 120개"));
        assert!(message.contains("최우선: <code>SOL/USDT</code>"));
        assert!(message.contains("42.5초"));

        let without_best = Notification::new(NotificationEvent::ScreenSummary {
            universe: 120,
            accepted: 0,
            alerts: 0,
            best_symbol: None,
            elapsed_secs: 10.0,
        });
        let message = sender.format_message(&without_best);
        assert!(!message.contains("최우선"));
    }

    #[test]
    fn test_sender_disabled_without_credentials() {
        let empty = TelegramSender::new(TelegramConfig {
            enabled: true,
            bot_token: String::new(),
            chat_id: "123".to_string(),
        });
        assert!(!empty.is_enabled());

        let off = TelegramSender::new(TelegramConfig {
            enabled: false,
            bot_token: "token".to_string(),
            chat_id: "123".to_string(),
        });
        assert!(!off.is_enabled());

        assert!(sender().is_enabled());
    }

    #[tokio::test]
    async fn test_manager_skips_disabled_senders() {
        struct FailingSender;

        #[async_trait]
        impl NotificationSender for FailingSender {
            async fn send(&self, _notification: &Notification) -> NotificationResult<()> {
                Err(NotificationError::SendFailed("unreachable".to_string()))
            }

            fn is_enabled(&self) -> bool {
                false
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        let mut manager = NotificationManager::new();
        manager.add_sender(FailingSender);
        assert_eq!(manager.enabled_count(), 0);

        // 비활성 전송기는 호출되지 않으므로 성공
        let result = manager.notify_opportunity(&sample_record()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_manager_propagates_single_sender_failure() {
        struct BrokenSender;

        #[async_trait]
        impl NotificationSender for BrokenSender {
            async fn send(&self, _notification: &Notification) -> NotificationResult<()> {
                Err(NotificationError::SendFailed("boom".to_string()))
            }

            fn is_enabled(&self) -> bool {
                true
            }

            fn name(&self) -> &str {
                "broken"
            }
        }

        let mut manager = NotificationManager::new();
        manager.add_sender(BrokenSender);

        let result = manager.notify_system_error("E01", "테스트").await;
        assert!(matches!(result, Err(NotificationError::SendFailed(_))));
    }
}
