//! 스크리닝 운영을 위한 도메인 모델.

mod candle;
mod opportunity;

pub use candle::*;
pub use opportunity::*;
