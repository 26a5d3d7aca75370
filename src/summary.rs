//! Outbound interface to the external text-summary collaborator.
//!
//! The collaborator receives the domain results verbatim plus patient age
//! and sex, and nothing else. Prose generation itself lives outside this
//! crate.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domains::DomainResult;
use crate::models::{Patient, Sex};

/// Exactly the payload the summary collaborator may see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub age_years: Option<i32>,
    pub sex: Option<Sex>,
    pub domains: Vec<DomainResult>,
}

impl SummaryRequest {
    pub fn new(patient: &Patient, domains: &[DomainResult], now: NaiveDateTime) -> Self {
        Self {
            age_years: patient.age_at(now),
            sex: patient.sex,
            domains: domains.to_vec(),
        }
    }
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Summary service failed: {0}")]
    Service(String),
}

/// External language-model collaborator that turns risk results into prose.
#[allow(async_fn_in_trait)]
pub trait SummaryGenerator {
    async fn summarize(&self, request: &SummaryRequest) -> Result<String, SummaryError>;
}
