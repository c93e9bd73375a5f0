//! # Screener Notification
//!
//! 스크리닝 결과 알림 서비스.
//!
//! 지원 채널:
//! - Telegram
//!
//! 전송기는 `NotificationSender` trait 뒤에 있고, 파이프라인 결과는
//! `NotificationManager`를 통해 활성화된 채널로 전달됩니다. 알림
//! 실패는 스크리닝 실행을 중단시키지 않습니다.

pub mod telegram;
pub mod types;

pub use telegram::*;
pub use types::*;
