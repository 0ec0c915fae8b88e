use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use anyhow::{Context, Result};
use food_detect::selection::select_image;
use food_detect::submit::Submitter;
use food_detect::transport::ReqwestTransport;
use food_detect_common::{SelectedImage, Ticket};

use crate::model::{DecodedImage, UiMessage};

const MAX_TEXTURE_SIDE: u32 = 960;

/// ワーカースレッド上で1つのFutureを完了まで実行
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    Ok(runtime.block_on(future))
}

pub fn decode_rgba(bytes: &[u8]) -> Option<DecodedImage> {
    let image = image::load_from_memory(bytes).ok()?;
    let image = image.thumbnail(MAX_TEXTURE_SIDE, MAX_TEXTURE_SIDE);
    Some(DecodedImage {
        size: [image.width() as usize, image.height() as usize],
        pixels: image.to_rgba8().into_raw(),
    })
}

/// ファイルを読み込んでプレビューを作る
pub fn spawn_select(path: PathBuf, sender: Sender<UiMessage>) {
    std::thread::spawn(move || {
        let outcome = match block_on(select_image(&path, None)) {
            Ok(Ok(image)) => Ok(image),
            Ok(Err(err)) => Err(err.to_string()),
            Err(err) => Err(format!("{err:#}")),
        };
        let decoded = outcome
            .as_ref()
            .ok()
            .filter(|image| image.preview.data_uri().is_some())
            .and_then(|image| decode_rgba(&image.bytes));
        let _ = sender.send(UiMessage::Selected { outcome, decoded });
    });
}

/// 送信して結果をチケット付きで返す
pub fn spawn_submit(
    ticket: Ticket,
    image: SelectedImage,
    endpoint: Option<String>,
    sender: Sender<UiMessage>,
) {
    std::thread::spawn(move || {
        let submitter = Submitter::new(ReqwestTransport::new(), endpoint);
        let outcome = match block_on(submitter.submit(&image)) {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(err.to_string()),
            Err(err) => Err(format!("{err:#}")),
        };
        let annotated = outcome
            .as_ref()
            .ok()
            .and_then(|response| response.decode_annotated_image())
            .and_then(|decoded| decoded.ok())
            .and_then(|bytes| decode_rgba(&bytes));
        let _ = sender.send(UiMessage::Finished {
            ticket,
            outcome,
            annotated,
        });
    });
}
