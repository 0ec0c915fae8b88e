//! アップロードワークフローの状態
//!
//! 状態は `Phase` の4値のいずれか1つだけを取り、変更は遷移関数
//! (`select` / `begin_submit` / `resolve` / `fail`) を通してのみ行う。
//! 送信ごとに単調増加の `Ticket` を払い出し、最新でないチケットの結果は捨てる。

use crate::error::WorkflowError;
use crate::types::{AnalysisResponse, SelectedImage};

/// 送信1回を識別する番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// ワークフローの局面
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    /// まだ送信していない（または新しい画像を選択した直後）
    #[default]
    Idle,
    InFlight { ticket: Ticket },
    Resolved(AnalysisResponse),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowState {
    selected: Option<SelectedImage>,
    phase: Phase,
    last_ticket: u64,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像を選択。以前の結果とエラーは破棄し、送信中のチケットは無効になる
    pub fn select(&mut self, image: SelectedImage) {
        self.selected = Some(image);
        self.phase = Phase::Idle;
    }

    /// 送信開始
    pub fn begin_submit(&mut self) -> Result<Ticket, WorkflowError> {
        if self.selected.is_none() {
            return Err(WorkflowError::NoImageSelected);
        }
        if self.is_in_flight() {
            return Err(WorkflowError::AlreadyInFlight);
        }

        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.phase = Phase::InFlight { ticket };
        Ok(ticket)
    }

    /// 応答を記録。チケットが現在の送信でなければ何もせず `false`
    pub fn resolve(&mut self, ticket: Ticket, response: AnalysisResponse) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = Phase::Resolved(response);
        true
    }

    /// エラーを記録。チケットが現在の送信でなければ何もせず `false`
    pub fn fail(&mut self, ticket: Ticket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = Phase::Failed(message.into());
        true
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        matches!(self.phase, Phase::InFlight { ticket: current } if current == ticket)
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, Phase::InFlight { .. })
    }

    pub fn response(&self) -> Option<&AnalysisResponse> {
        match &self.phase {
            Phase::Resolved(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// 送信ボタンを押せるか
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_in_flight()
    }
}
