//! 検出枠付き画像の保存

use crate::error::{FoodDetectError, Result};
use food_detect_common::AnalysisResponse;
use std::path::Path;

/// レスポンスの加工済み画像をデコードしてファイルに書き出す
pub async fn save_annotated_image(response: &AnalysisResponse, path: &Path) -> Result<usize> {
    let bytes = match response.decode_annotated_image() {
        Some(Ok(bytes)) => bytes,
        Some(Err(e)) => return Err(FoodDetectError::Encoding(format!("加工済み画像のデコードに失敗: {}", e))),
        None => return Err(FoodDetectError::Encoding("No processed image returned".into())),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;
    Ok(bytes.len())
}
