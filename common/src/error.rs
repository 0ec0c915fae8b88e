//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// ワークフローの状態遷移エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Please select an image first")]
    NoImageSelected,

    #[error("A detection request is already in flight")]
    AlreadyInFlight,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
