//! trendlens: client core for an image-analysis service.
//!
//! Users stage trend-chart images, tick analysis styles, submit, and browse
//! a persisted history of past analyses. This crate is only the core of
//! that client: the UI layer stays outside and feeds plain data in (files,
//! style picks, free text), rendering whatever HTML and records come back.
//!
//! - `markdown` - fixed-pipeline Markdown-to-HTML rendering of analysis text
//! - `session` - staged attachments, submission lifecycle, history cache
//! - `styles` - selection axes and composite-key construction
//! - `service` - backend contracts plus the reqwest implementation
//! - `types` - the data crossing those seams

pub mod markdown;
pub mod service;
pub mod session;
pub mod styles;
pub mod types;

pub use markdown::render;
pub use service::{AnalysisApiClient, AnalysisService, HistoryStore, ServiceError, ServiceResult};
pub use session::{SessionError, SessionState, SubmissionPhase};
pub use styles::{ReportFormat, StyleInfo, StyleSelection, Tone, Viewpoint};
pub use types::{AnalysisResult, HistoryRecord, ImageAttachment, IncomingFile, SubmissionPayload};
