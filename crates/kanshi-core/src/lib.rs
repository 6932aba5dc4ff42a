//! # Kanshi Core
//!
//! 侵入検知イベント（攻撃ログ）のデータモデル
//! 集計エンジンとストリーム生成器が共有するカテゴリ定義を提供

pub mod model;
pub mod clock;
pub mod error;

pub use model::*;
pub use clock::*;
pub use error::*;
