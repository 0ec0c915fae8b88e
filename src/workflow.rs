//! 選択 → 送信 → 結果記録 を1つの状態にまとめて進める

use crate::error::Result;
use crate::selection::select_image;
use crate::submit::Submitter;
use crate::transport::Transport;
use food_detect_common::{AnalysisResponse, SelectedImage, WorkflowError, WorkflowState};
use std::path::Path;
use tracing::debug;

pub struct Workflow<T> {
    state: WorkflowState,
    submitter: Submitter<T>,
}

impl<T: Transport> Workflow<T> {
    pub fn new(submitter: Submitter<T>) -> Self {
        Self {
            state: WorkflowState::new(),
            submitter,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn submitter(&self) -> &Submitter<T> {
        &self.submitter
    }

    /// ファイルを読み込んで選択（以前の結果は破棄）
    pub async fn select(&mut self, path: &Path, mime_override: Option<&str>) -> Result<()> {
        let image = select_image(path, mime_override).await?;
        self.state.select(image);
        Ok(())
    }

    /// 読み込み済みの画像を選択
    pub fn select_image(&mut self, image: SelectedImage) {
        self.state.select(image);
    }

    /// 選択中の画像を送信し、結果またはエラーを状態に記録する
    pub async fn submit(&mut self) -> Result<AnalysisResponse> {
        let selected = self.state.selected().cloned();
        let ticket = self
            .state
            .begin_submit()
            .map_err(food_detect_common::Error::from)?;
        let image = selected
            .ok_or_else(|| food_detect_common::Error::from(WorkflowError::NoImageSelected))?;
        debug!(ticket = ticket.value(), file = %image.file_name, "submission started");

        match self.submitter.submit(&image).await {
            Ok(response) => {
                if !self.state.resolve(ticket, response.clone()) {
                    debug!(ticket = ticket.value(), "stale response discarded");
                }
                Ok(response)
            }
            Err(e) => {
                if !self.state.fail(ticket, e.to_string()) {
                    debug!(ticket = ticket.value(), "stale error discarded");
                }
                Err(e)
            }
        }
    }
}
