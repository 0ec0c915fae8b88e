//! 解析結果の型定義
//!
//! CLIとデスクトップで共有される型:
//! - Detection: 検出された料理1件
//! - AnalysisResponse: 正規化済みのエンドポイント応答
//! - SelectedImage / Preview: 選択中の画像とプレビュー

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 加工済み画像の表示に使う固定プレフィックス
pub const ANNOTATED_IMAGE_PREFIX: &str = "data:image/jpeg;base64,";

/// 検出結果1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Detection {
    /// 料理クラス名（例: "plov", "beshbarmak-w-kazy"）
    pub class: String,
    /// 最高信頼度 (0.0-1.0)
    pub top_confidence: f64,
    /// [x_min, y_min, x_max, y_max]（元画像のピクセル座標）
    pub bbox: [f64; 4],
}

impl Detection {
    /// 表示用ラベル（`-` と `_` を空白に置換）
    pub fn display_label(&self) -> String {
        self.class.replace(|c: char| c == '-' || c == '_', " ")
    }

    /// 信頼度をパーセント表記（小数1桁）
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.top_confidence * 100.0)
    }

    /// 座標を整数に丸めた表記
    pub fn bbox_display(&self) -> String {
        let coords: Vec<String> = self.bbox.iter().map(|n| format!("{:.0}", n)).collect();
        format!("[{}]", coords.join(", "))
    }
}

/// エンドポイント応答（正規化後）
///
/// すべてのフィールドは省略可能。欠けているフィールドはエラーではなく「未提供」として扱う。
/// 型の合わないフィールドも未提供扱いにし、他のフィールドは残す。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResponse {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub success: Option<bool>,

    /// 加工済み画像（Base64 JPEG、プレフィックスなし）
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub details: Option<Vec<Detection>>,

    /// `1.0` のような整数値の浮動小数も件数として読む
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_count")]
    pub details_count: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub msg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub error: Option<String>,
}

/// 型が合わなければ `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64)
    }))
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }

    pub fn detections(&self) -> &[Detection] {
        self.details.as_deref().unwrap_or(&[])
    }

    /// 見出しに表示する件数（`details_count` が0または未提供なら配列長）
    pub fn display_count(&self) -> usize {
        match self.details_count {
            Some(count) if count > 0 => count as usize,
            _ => self.detections().len(),
        }
    }

    pub fn annotated_image_data_uri(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|image| format!("{}{}", ANNOTATED_IMAGE_PREFIX, image))
    }

    /// 加工済み画像をデコード
    pub fn decode_annotated_image(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        self.image.as_ref().map(|image| STANDARD.decode(image.trim()))
    }
}

/// プレビューの生成結果
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Ready {
        data_uri: String,
        width: u32,
        height: u32,
    },
    /// 読み込めない画像。選択自体は有効で、警告として表示する
    Unavailable { reason: String },
}

impl Preview {
    pub fn data_uri(&self) -> Option<&str> {
        match self {
            Preview::Ready { data_uri, .. } => Some(data_uri),
            Preview::Unavailable { .. } => None,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Preview::Ready { .. } => None,
            Preview::Unavailable { reason } => Some(reason),
        }
    }
}

/// 選択中の画像
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    /// 宣言されたMIMEタイプ（不明なら空文字列）
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub preview: Preview,
}

/// `data:<mime>;base64,<data>` 形式のData URLを生成
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}
