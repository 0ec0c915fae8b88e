//! 画像選択とプレビュー生成

use crate::error::{FoodDetectError, Result};
use food_detect_common::{encode_data_uri, Preview, SelectedImage};
use std::path::Path;
use tracing::{debug, warn};

/// 拡張子から宣言MIMEタイプを推定（不明なら空文字列）
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "",
    }
}

/// プレビューを生成
///
/// 画像としてデコードできればData URLと寸法を返す。
/// デコードに失敗しても選択は有効なので `Preview::Unavailable` を返す。
pub fn build_preview(bytes: &[u8], mime_type: &str) -> Preview {
    match image::load_from_memory(bytes) {
        Ok(img) => {
            let mime = if mime_type.is_empty() {
                "application/octet-stream"
            } else {
                mime_type
            };
            Preview::Ready {
                data_uri: encode_data_uri(mime, bytes),
                width: img.width(),
                height: img.height(),
            }
        }
        Err(e) => Preview::Unavailable {
            reason: format!("プレビューを生成できません: {}", e),
        },
    }
}

/// ファイルを読み込んで選択画像を作る
pub async fn select_image(path: &Path, mime_override: Option<&str>) -> Result<SelectedImage> {
    if !path.is_file() {
        return Err(FoodDetectError::FileNotFound(path.display().to_string()));
    }

    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = mime_override
        .map(str::to_string)
        .unwrap_or_else(|| guess_mime_type(path).to_string());

    debug!(file = %file_name, mime = %mime_type, size = bytes.len(), "image selected");

    let mime_for_preview = mime_type.clone();
    let (bytes, preview) = tokio::task::spawn_blocking(move || {
        let preview = build_preview(&bytes, &mime_for_preview);
        (bytes, preview)
    })
    .await
    .map_err(|e| FoodDetectError::Encoding(format!("preview worker failed: {}", e)))?;

    if let Some(reason) = preview.warning() {
        warn!(file = %file_name, "{}", reason);
    }

    Ok(SelectedImage {
        file_name,
        mime_type,
        bytes,
        preview,
    })
}
