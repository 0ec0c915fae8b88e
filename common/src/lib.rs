//! Food Detect Common Library
//!
//! CLIとデスクトップで共有される型とユーティリティ

pub mod error;
pub mod normalize;
pub mod request;
pub mod types;
pub mod workflow;

pub use error::{Error, Result, WorkflowError};
pub use normalize::{normalize, parse_response_body, select_rule, EnvelopeRule, ENVELOPE_RULES};
pub use request::{AnalyzeRequest, ContentType};
pub use types::{encode_data_uri, AnalysisResponse, Detection, Preview, SelectedImage};
pub use workflow::{Phase, Ticket, WorkflowState};
