//! HTTP送信
//!
//! 送信処理は `Transport` トレイトの背後に置き、本番では reqwest を使う。

use crate::error::{FoodDetectError, Result};
use food_detect_common::AnalyzeRequest;

/// 受信したHTTP応答（ステータスと生ボディ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    /// `request` をJSONボディとして `url` へPOSTする
    async fn post_json(&self, url: &str, request: &AnalyzeRequest) -> Result<HttpReply>;
}

/// reqwestによる実装
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn post_json(&self, url: &str, request: &AnalyzeRequest) -> Result<HttpReply> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| FoodDetectError::ApiCall(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FoodDetectError::ApiCall(format!("レスポンス読み込みエラー: {}", e)))?;

        Ok(HttpReply { status, body })
    }
}
