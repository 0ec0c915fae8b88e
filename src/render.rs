//! 結果パネルのターミナル表示

use console::style;
use food_detect_common::{AnalysisResponse, Detection, Preview, SelectedImage};

const BAR_WIDTH: usize = 20;

/// 信頼度バー
pub fn confidence_bar(confidence: f64) -> String {
    let filled = (confidence.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn render_detection(index: usize, detection: &Detection) -> String {
    format!(
        "  {:>2}. {:<24} {:>6}  {}  bbox {}",
        index + 1,
        style(detection.display_label()).bold(),
        style(detection.confidence_percent()).red().bold(),
        style(confidence_bar(detection.top_confidence)).yellow(),
        detection.bbox_display()
    )
}

/// 選択画像の行
pub fn render_selection(image: &SelectedImage) -> String {
    match &image.preview {
        Preview::Ready { width, height, .. } => format!(
            "{} Selected: {} ({}x{}, {} bytes)",
            style("✔").green(),
            image.file_name,
            width,
            height,
            image.bytes.len()
        ),
        Preview::Unavailable { reason } => format!(
            "{} Selected: {} ({} bytes)\n{} {}",
            style("✔").green(),
            image.file_name,
            image.bytes.len(),
            style("⚠").yellow(),
            reason
        ),
    }
}

/// 結果パネル
pub fn render_response(response: &AnalysisResponse, original: Option<&SelectedImage>) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{}", style("✨ Detection Results ✨").bold()));
    if response.is_success() {
        lines.push(format!("{}", style("✅ Detection Successful").green().bold()));
    } else {
        lines.push(format!("{}", style("❌ Detection Failed").red().bold()));
    }
    lines.push(String::new());

    let original_line = match original {
        Some(image) if image.preview.data_uri().is_some() => image.file_name.clone(),
        _ => "No image selected".to_string(),
    };
    lines.push(format!("📷 Original Image: {}", original_line));

    let processed_line = match &response.image {
        Some(image) => format!("annotated JPEG returned ({} base64 chars)", image.len()),
        None => "No processed image returned".to_string(),
    };
    lines.push(format!("🎯 Detected Cuisine: {}", processed_line));

    let detections = response.detections();
    if !detections.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{}",
            style(format!("🍴 Identified Dishes ({})", response.display_count())).bold()
        ));
        for (index, detection) in detections.iter().enumerate() {
            lines.push(render_detection(index, detection));
        }
    }

    if let Some(msg) = &response.msg {
        lines.push(String::new());
        lines.push(format!("{} {}", style("ℹ").blue(), style(msg).blue()));
    }

    lines.join("\n")
}

/// エラーパネル
pub fn render_error(message: &str) -> String {
    format!(
        "{}\n  {}",
        style("⚠️  Error Occurred").red().bold(),
        style(message).red()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    fn plain(text: String) -> String {
        strip_ansi_codes(&text).to_string()
    }

    fn plov_response() -> AnalysisResponse {
        AnalysisResponse {
            success: Some(true),
            image: Some("aGVsbG8=".to_string()),
            details: Some(vec![Detection {
                class: "lagman-w-soup".to_string(),
                top_confidence: 0.92,
                bbox: [10.0, 20.0, 100.0, 120.0],
            }]),
            details_count: Some(1),
            msg: Some("Found 1 items".to_string()),
            error: None,
        }
    }

    #[test]
    fn test_confidence_bar() {
        assert_eq!(confidence_bar(0.0), "░".repeat(20));
        assert_eq!(confidence_bar(1.0), "█".repeat(20));
        assert_eq!(confidence_bar(0.5), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(confidence_bar(1.7), "█".repeat(20));
    }

    #[test]
    fn test_render_success_panel() {
        let text = plain(render_response(&plov_response(), None));
        assert!(text.contains("Detection Successful"));
        assert!(text.contains("Identified Dishes (1)"));
        assert!(text.contains("lagman w soup"));
        assert!(text.contains("92.0%"));
        assert!(text.contains("[10, 20, 100, 120]"));
        assert!(text.contains("Found 1 items"));
        assert!(text.contains("No image selected"));
        assert!(text.contains("annotated JPEG returned"));
    }

    #[test]
    fn test_render_failure_panel() {
        let response = AnalysisResponse {
            success: Some(false),
            error: Some("Error processing image: cannot identify image file".to_string()),
            msg: Some("Error processing the image".to_string()),
            ..Default::default()
        };
        let text = plain(render_response(&response, None));
        assert!(text.contains("Detection Failed"));
        assert!(text.contains("No processed image returned"));
        assert!(!text.contains("Identified Dishes"));
        assert!(text.contains("Error processing the image"));
    }

    #[test]
    fn test_render_selection_with_warning() {
        let image = SelectedImage {
            file_name: "broken.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes: vec![1, 2, 3],
            preview: Preview::Unavailable {
                reason: "プレビューを生成できません".to_string(),
            },
        };
        let text = plain(render_selection(&image));
        assert!(text.contains("broken.jpg"));
        assert!(text.contains("3 bytes"));
        assert!(text.contains("プレビューを生成できません"));
    }

    #[test]
    fn test_render_error() {
        let text = plain(render_error("API returned 500: server error"));
        assert!(text.contains("Error Occurred"));
        assert!(text.contains("API returned 500: server error"));
    }
}
