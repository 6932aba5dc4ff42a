//! # Cyber Security Payload Library
//!
//! 攻撃ログのペイロードに対するXSSパターン検知とサニタイズ
//! 集計エンジンからは独立したステートレスなテキスト分類ユーティリティ

pub mod patterns;
pub mod sanitizer;

pub use patterns::*;
pub use sanitizer::*;

/// Errors raised while building classifiers
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Invalid pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}
