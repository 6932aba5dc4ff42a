//! # Kanshi CLI Library
//!
//! 攻撃ログダッシュボードのコマンドラインインターフェース
//! シミュレーション・集計・ペイロード分類をコマンドラインから実行

pub mod commands;
pub mod render;

pub use commands::*;
pub use render::*;
