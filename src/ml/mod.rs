//! 機械学習の評価機能を提供するモジュール
//!
//! 回帰メトリクス、スコアラーアダプター、交差検証ハーネスを含みます。

pub mod metrics;
pub mod models;
pub mod scorer;
