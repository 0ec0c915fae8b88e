use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodDetectError {
    #[error("API Gateway URL not configured. Please set FOOD_DETECT_INVOKE_URL (or FOOD_DETECT_API_URL), or run `food-detect config --set-endpoint URL`")]
    MissingEndpoint,

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Failed to convert image to base64: {0}")]
    Encoding(String),

    #[error("API returned {status}: {body}")]
    Request { status: u16, body: String },

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    Parse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] food_detect_common::Error),
}

pub type Result<T> = std::result::Result<T, FoodDetectError>;
