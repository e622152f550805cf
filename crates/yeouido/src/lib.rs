#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/yeouido/yeouido/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use yeouido_data as data;
pub use yeouido_metrics as metrics;
pub use yeouido_output as output;

pub use config::{PipelineConfig, SourceConfig};
pub use error::{ConfigError, PipelineError, Result};
pub use pipeline::IngestPipeline;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
