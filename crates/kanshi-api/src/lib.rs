//! # Kanshi API Library
//!
//! ダッシュボード集計ビューを提供する Web API
//! RESTful API で時系列トレンド・ステータス分布・攻撃ログを配信

pub mod handlers;
pub mod models;
pub mod monitoring;
pub mod routes;
pub mod server;

pub use handlers::*;
pub use models::*;
pub use monitoring::*;
pub use routes::*;
pub use server::*;
