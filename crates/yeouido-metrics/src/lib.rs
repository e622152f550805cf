#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/yeouido/yeouido/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod accounts;
pub mod growth;
pub mod normalize;
pub mod reconcile;

pub use accounts::{AccountMap, AccountTable, CanonicalField};
pub use growth::{GrowthCalculator, growth_rate, operating_margin};
pub use normalize::{
    Coerced, Normalization, NormalizedRecord, PeriodBasis, RecordNormalizer, UNIT_DIVISOR,
    coerce_amount,
};
pub use reconcile::{PeriodReconciler, ReconcileGap, ReconciledRecord, Reconciliation};
