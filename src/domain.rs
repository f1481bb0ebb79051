use std::fmt;
use std::str::FromStr;

use crate::error::KiraError;

pub const SAMPLE_PREFIX: &str = "BB_";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(String);

impl SampleId {
    pub fn from_external(name: &str) -> Self {
        let trimmed = name.trim();
        let id = trimmed.strip_prefix(SAMPLE_PREFIX).unwrap_or(trimmed);
        Self(id.to_string())
    }

    pub fn from_internal(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn external_name(&self) -> String {
        format!("{SAMPLE_PREFIX}{}", self.0)
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_external(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMetadata {
    pub sample_id: i64,
    pub age: Option<i64>,
    pub bb_type: Option<String>,
    pub ethnicity: Option<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
}

/// Index-aligned projection of the abundance matrix for one sample:
/// `otu_ids[i]` and `sample_values[i]` come from the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtuAbundance {
    pub otu_ids: Vec<i64>,
    pub sample_values: Vec<i64>,
}

impl OtuAbundance {
    pub fn from_rows(rows: Vec<(i64, i64)>) -> Self {
        let (otu_ids, sample_values) = rows.into_iter().unzip();
        Self {
            otu_ids,
            sample_values,
        }
    }

    pub fn len(&self) -> usize {
        self.otu_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.otu_ids.is_empty()
    }
}
