//! 料理写真をエンドポイントへ送信し、検出結果を表示するクライアント

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod selection;
pub mod submit;
pub mod transport;
pub mod workflow;
