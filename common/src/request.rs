//! エンドポイントへ送るリクエストの組み立て

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// リクエストの `content_type` トークン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Jpeg,
    Png,
    Gif,
}

impl ContentType {
    /// 宣言MIMEタイプからトークンを決定
    ///
    /// 部分一致を jpeg → png → gif の順で判定し、どれにも当たらなければ jpeg。
    /// 大文字小文字は区別する。
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.contains("jpeg") {
            ContentType::Jpeg
        } else if mime_type.contains("png") {
            ContentType::Png
        } else if mime_type.contains("gif") {
            ContentType::Gif
        } else {
            ContentType::Jpeg
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Jpeg => "jpeg",
            ContentType::Png => "png",
            ContentType::Gif => "gif",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POSTボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64画像（Data URLプレフィックスなし）
    pub image_data: String,
    pub image_name: String,
    pub content_type: ContentType,
}

impl AnalyzeRequest {
    pub fn new(bytes: &[u8], image_name: &str, mime_type: &str) -> Self {
        Self {
            image_data: STANDARD.encode(bytes),
            image_name: image_name.to_string(),
            content_type: ContentType::from_mime(mime_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_mime() {
        assert_eq!(ContentType::from_mime("image/jpeg"), ContentType::Jpeg);
        assert_eq!(ContentType::from_mime("image/pjpeg"), ContentType::Jpeg);
        assert_eq!(ContentType::from_mime("image/png"), ContentType::Png);
        assert_eq!(ContentType::from_mime("image/apng"), ContentType::Png);
        assert_eq!(ContentType::from_mime("image/gif"), ContentType::Gif);
    }

    #[test]
    fn test_content_type_defaults_to_jpeg() {
        assert_eq!(ContentType::from_mime(""), ContentType::Jpeg);
        assert_eq!(ContentType::from_mime("image/webp"), ContentType::Jpeg);
        assert_eq!(ContentType::from_mime("image/jpg"), ContentType::Jpeg);
        assert_eq!(ContentType::from_mime("application/octet-stream"), ContentType::Jpeg);
    }

    #[test]
    fn test_content_type_is_case_sensitive() {
        assert_eq!(ContentType::from_mime("IMAGE/PNG"), ContentType::Jpeg);
    }

    #[test]
    fn test_request_body_shape() {
        let request = AnalyzeRequest::new(b"hello", "plov.png", "image/png");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "image_data": "aGVsbG8=",
                "image_name": "plov.png",
                "content_type": "png"
            })
        );
    }
}
