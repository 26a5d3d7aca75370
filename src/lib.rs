//! Longitudinal risk feature and domain-scoring engine.
//!
//! A pure batch transform from a per-patient dataset snapshot to banded
//! clinical risk results:
//!
//! 1. [`normalize`] converts raw vital and lab rows into canonical,
//!    unit-consistent [`metrics::MetricSample`]s, dropping physiologically
//!    impossible values.
//! 2. [`features`] builds rolling statistics over trailing 7/30/90/365-day
//!    windows, plus medication, encounter, and note-tag aggregates.
//! 3. [`domains`] maps the feature set into one [`domains::DomainResult`]
//!    per clinical domain, with an explicit Unknown band for stale or
//!    missing critical inputs.
//!
//! The only asynchronous boundary is the dataset fetch
//! ([`dataset::fetch_patient_dataset`]); everything downstream is
//! synchronous, stateless, and safe to run concurrently per patient.
//! The crate never installs a tracing subscriber; embedding applications
//! own that.

pub mod config;
pub mod dataset;
pub mod domains;
pub mod engine;
pub mod features;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod summary;

pub use config::{ScorerConfig, MODEL_VERSION};
pub use dataset::{fetch_patient_dataset, DatasetError, PatientDataSource, PatientDataset};
pub use domains::{compute_domain_results, DomainResult, RiskComputation, RiskFactor, RiskLabel};
pub use engine::{RiskAssessment, RiskEngine};
pub use features::{build_longitudinal_features, LongitudinalFeatures, WindowStats};
pub use metrics::{MetricKey, MetricSample, SampleSource};
pub use summary::{SummaryError, SummaryGenerator, SummaryRequest};
