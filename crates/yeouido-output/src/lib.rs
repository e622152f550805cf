#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/yeouido/yeouido/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod message;
pub mod notify;
pub mod summary;

pub use message::{filing_message, format_amount, format_percent};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use summary::{FilingOutcome, RunSummary};
