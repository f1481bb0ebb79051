use kira_biodiversity::domain::{OtuAbundance, SAMPLE_PREFIX, SampleId};

#[test]
fn parse_external_name() {
    let id: SampleId = "BB_940".parse().unwrap();
    assert_eq!(id.as_str(), "940");
    assert_eq!(id.to_string(), "940");
}

#[test]
fn malformed_names_pass_through() {
    assert_eq!(SampleId::from_external("sample-7").as_str(), "sample-7");
    assert_eq!(SampleId::from_external("bb_940").as_str(), "bb_940");
    assert_eq!(SampleId::from_external("").as_str(), "");
}

#[test]
fn external_names_round_trip() {
    for raw in ["940", "1601", "1_2", "B"] {
        let id = SampleId::from_internal(raw);
        let external = id.external_name();
        assert!(external.starts_with(SAMPLE_PREFIX));
        assert_eq!(SampleId::from_external(&external), id);
    }
}

#[test]
fn empty_rows_give_empty_abundance() {
    let abundance = OtuAbundance::from_rows(Vec::new());
    assert!(abundance.is_empty());
    assert_eq!(abundance.sample_values.len(), 0);
}
