//! テスト用のTransportとフィクスチャ

#![allow(dead_code)]

use food_detect::error::{FoodDetectError, Result};
use food_detect::transport::{HttpReply, Transport};
use food_detect_common::{AnalyzeRequest, Preview, SelectedImage};
use std::io::Cursor;
use std::sync::Mutex;

/// 送信内容を記録し、用意した応答を返す
pub struct RecordingTransport {
    reply: std::result::Result<HttpReply, String>,
    calls: Mutex<Vec<(String, AnalyzeRequest)>>,
}

impl RecordingTransport {
    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: Ok(HttpReply {
                status,
                body: body.into(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, AnalyzeRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn post_json(&self, url: &str, request: &AnalyzeRequest) -> Result<HttpReply> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), request.clone()));
        self.reply.clone().map_err(FoodDetectError::ApiCall)
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
    buffer.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Jpeg).unwrap();
    buffer.into_inner()
}

pub fn selected(file_name: &str, mime_type: &str, bytes: &[u8]) -> SelectedImage {
    SelectedImage {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        bytes: bytes.to_vec(),
        preview: Preview::Unavailable {
            reason: "fixture".to_string(),
        },
    }
}

pub const PLOV_RESPONSE: &str = r#"{
    "success": true,
    "image": "aGVsbG8=",
    "details": [{"class": "plov", "top_confidence": 0.92, "bbox": [10, 20, 100, 120]}],
    "details_count": 1
}"#;
