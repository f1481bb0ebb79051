use std::io::{self, Write};

use serde::Serialize;

use crate::domain::{OtuAbundance, SampleMetadata};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataBody {
    #[serde(rename = "AGE")]
    pub age: Option<i64>,
    #[serde(rename = "BBTYPE")]
    pub bb_type: Option<String>,
    #[serde(rename = "ETHNICITY")]
    pub ethnicity: Option<String>,
    #[serde(rename = "GENDER")]
    pub gender: Option<String>,
    #[serde(rename = "LOCATION")]
    pub location: Option<String>,
    #[serde(rename = "SAMPLEID")]
    pub sample_id: i64,
}

impl From<SampleMetadata> for MetadataBody {
    fn from(metadata: SampleMetadata) -> Self {
        Self {
            age: metadata.age,
            bb_type: metadata.bb_type,
            ethnicity: metadata.ethnicity,
            gender: metadata.gender,
            location: metadata.location,
            sample_id: metadata.sample_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbundanceBody {
    pub otu_ids: Vec<i64>,
    pub sample_values: Vec<i64>,
}

pub fn abundance_body(abundance: OtuAbundance) -> Vec<AbundanceBody> {
    vec![AbundanceBody {
        otu_ids: abundance.otu_ids,
        sample_values: abundance.sample_values,
    }]
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: ErrorPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorPayload {
                code,
                message: message.into(),
            },
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_key_order() {
        let body = MetadataBody::from(SampleMetadata {
            sample_id: 940,
            age: Some(24),
            bb_type: Some("I".to_string()),
            ethnicity: Some("Caucasian".to_string()),
            gender: Some("F".to_string()),
            location: Some("Beaufort/NC".to_string()),
        });
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"AGE":24,"BBTYPE":"I","ETHNICITY":"Caucasian","GENDER":"F","LOCATION":"Beaufort/NC","SAMPLEID":940}"#
        );
    }

    #[test]
    fn abundance_wrapped_in_array() {
        let body = abundance_body(OtuAbundance::from_rows(vec![(2, 10), (1, 5)]));
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"[{"otu_ids":[2,1],"sample_values":[10,5]}]"#);
    }
}
