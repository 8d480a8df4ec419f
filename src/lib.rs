pub mod db;
pub mod error;
pub mod export;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod preferences;
pub mod service;
pub mod themes;
pub mod utils;

pub use db::Database;
pub use error::FeedbackError;
pub use llm::{ClusteringService, LlmClient, LlmClientBuilder, LlmError};
pub use models::{AnalysisRun, Level, RunId, Theme};
pub use service::{AnalysisService, CsvSelection};
pub use themes::{ThemeExtractor, ThemeExtractorBuilder};
