//! 送信処理
//!
//! 1. Base64エンコードとcontent_type決定
//! 2. エンドポイント解決（なければ通信せずに失敗）
//! 3. POST
//! 4. ステータス確認
//! 5. JSONパースと正規化

use crate::error::{FoodDetectError, Result};
use crate::transport::Transport;
use food_detect_common::{parse_response_body, AnalysisResponse, AnalyzeRequest, SelectedImage};
use tracing::{debug, info};

pub struct Submitter<T> {
    transport: T,
    endpoint: Option<String>,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: T, endpoint: Option<String>) -> Self {
        Self { transport, endpoint }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// 選択画像を1回だけ送信して正規化済み応答を返す
    pub async fn submit(&self, image: &SelectedImage) -> Result<AnalysisResponse> {
        let request = AnalyzeRequest::new(&image.bytes, &image.file_name, &image.mime_type);
        let url = self.endpoint.as_deref().ok_or(FoodDetectError::MissingEndpoint)?;

        info!(
            file = %request.image_name,
            content_type = %request.content_type,
            payload_len = request.image_data.len(),
            "sending image to endpoint"
        );

        let reply = self.transport.post_json(url, &request).await?;

        if !reply.is_success() {
            return Err(FoodDetectError::Request {
                status: reply.status,
                body: reply.body,
            });
        }

        debug!(status = reply.status, body = %preview_text(&reply.body, 200), "raw API response");

        let (rule, response) = parse_response_body(&reply.body).map_err(|e| match e {
            food_detect_common::Error::Parse(msg) => FoodDetectError::Parse(msg),
            other => FoodDetectError::Common(other),
        })?;

        debug!(rule = rule.name(), "normalized response");
        info!(
            success = ?response.success,
            detections = response.detections().len(),
            "detection finished"
        );
        Ok(response)
    }
}

/// ログ用に先頭だけを切り出す
fn preview_text(text: &str, max_chars: usize) -> String {
    let head: String = text.chars().take(max_chars).collect();
    if head.len() < text.len() {
        format!("{}...", head)
    } else {
        head
    }
}
