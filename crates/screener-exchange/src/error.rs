//! 시장 데이터 제공자 에러 타입.

use thiserror::Error;

/// 시장 데이터 제공자 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크/연결 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 파싱/역직렬화 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// API 에러 코드
    #[error("API 에러 {code}: {message}")]
    Api { code: i32, message: String },

    /// 요청 한도 초과
    #[error("요청 한도 초과")]
    RateLimited,

    /// 타임아웃
    #[error("요청 타임아웃: {0}")]
    Timeout(String),
}

/// 제공자 작업을 위한 Result 타입.
pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Network(_) | ProviderError::RateLimited | ProviderError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}
