use food_detect_common::{AnalysisResponse, SelectedImage, Ticket};

/// テクスチャ化する前のRGBA画像
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// ワーカースレッドからUIへの通知
pub enum UiMessage {
    Selected {
        outcome: Result<SelectedImage, String>,
        decoded: Option<DecodedImage>,
    },
    Finished {
        ticket: Ticket,
        outcome: Result<AnalysisResponse, String>,
        annotated: Option<DecodedImage>,
    },
}
