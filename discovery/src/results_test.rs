use crate::results::{
    BuildResult, FilenameError, PayloadError, ResultFile, ResultPayload, ResultSet,
    KNOWN_FILENAMES,
};
use indexmap::IndexMap;

const PAYLOAD: &str = r#"{
    "configuration": {"host": "127.0.0.1", "port": 8080},
    "data": {
        "writes": {"requests": 120, "updates": 20, "writes": 10, "duration": 10.0, "retries": 5},
        "crawl": {"requests": 300, "updates": 0, "writes": 0, "duration": 2.5, "retries": 0}
    }
}"#;

#[test]
pub fn parse_known_filenames() {
    let files = ResultFile::known();

    assert_eq!(files.len(), KNOWN_FILENAMES.len());
    for (file, name) in files.iter().zip(KNOWN_FILENAMES) {
        assert_eq!(file.name(), name);
    }
}

#[test]
pub fn parse_dimensions() {
    let file = ResultFile::parse("postgresql-resolve-nocache.json").unwrap();

    assert_eq!(file.database(), "postgresql");
    assert_eq!(file.strategy(), "resolve");
    assert_eq!(file.cache_mode(), "nocache");
    assert_eq!(file.to_string(), "postgresql-resolve-nocache.json");
    assert_eq!(file.path_for(12), "results/12/postgresql-resolve-nocache.json");
}

#[test]
pub fn reject_malformed_filenames() {
    assert_eq!(
        ResultFile::parse("cockroach-lock-cache.yaml"),
        Err(FilenameError::MissingExtension(
            "cockroach-lock-cache.yaml".to_string()
        ))
    );

    for name in ["cockroach-lock.json", "a-b-c-d.json", "-lock-cache.json", ".json"] {
        assert_eq!(
            ResultFile::parse(name),
            Err(FilenameError::MalformedDimensions(name.to_string())),
            "{name}"
        );
    }
}

#[test]
pub fn decode_payload_in_file_order() {
    let payload = ResultPayload::from_slice(PAYLOAD.as_bytes()).unwrap();

    assert!(payload.configuration.is_some());
    assert_eq!(
        payload.data.keys().collect::<Vec<_>>(),
        vec!["writes", "crawl"]
    );
    assert_eq!(payload.data["writes"].requests, 120.0);
    assert_eq!(payload.data["crawl"].duration, 2.5);
}

#[test]
pub fn decode_payload_without_configuration() {
    let payload = ResultPayload::from_slice(
        br#"{"data": {"read": {"requests": 1, "updates": 0, "writes": 0, "duration": 1, "retries": 0}}}"#,
    )
    .unwrap();

    assert!(payload.configuration.is_none());
    assert_eq!(payload.data.len(), 1);
}

#[test]
pub fn reject_payload_missing_fields() {
    let result = ResultPayload::from_slice(
        br#"{"data": {"read": {"requests": 1, "updates": 0, "writes": 0, "duration": 1}}}"#,
    );

    assert!(matches!(result, Err(PayloadError::Decode(_))));
    assert!(matches!(
        ResultPayload::from_slice(b"<html>not found</html>"),
        Err(PayloadError::Decode(_))
    ));
    assert!(matches!(
        ResultPayload::from_slice(br#"{"configuration": {}}"#),
        Err(PayloadError::Decode(_))
    ));
}

#[test]
pub fn reject_payload_with_invalid_metrics() {
    let zero_duration = ResultPayload::from_slice(
        br#"{"data": {"read": {"requests": 1, "updates": 0, "writes": 0, "duration": 0, "retries": 0}}}"#,
    );
    let negative_count = ResultPayload::from_slice(
        br#"{"data": {"read": {"requests": 1, "updates": -2, "writes": 0, "duration": 1, "retries": 0}}}"#,
    );

    match zero_duration {
        Err(PayloadError::InvalidMetric {
            test_type, field, ..
        }) => {
            assert_eq!(test_type, "read");
            assert_eq!(field, "duration");
        }
        other => panic!("expected invalid duration, got {other:?}"),
    }
    assert!(matches!(
        negative_count,
        Err(PayloadError::InvalidMetric {
            field: "updates",
            ..
        })
    ));
}

#[test]
pub fn empty_build_is_not_a_result() {
    assert_eq!(BuildResult::new(3, IndexMap::new()), None);
}

#[test]
pub fn result_set_is_most_recent_first() {
    let payload = ResultPayload::from_slice(PAYLOAD.as_bytes()).unwrap();
    let builds = [0, 2, 5]
        .into_iter()
        .map(|number| {
            let mut results = IndexMap::new();
            results.insert(
                ResultFile::parse("cockroach-lock-cache.json").unwrap(),
                payload.clone(),
            );
            BuildResult::new(number, results).unwrap()
        })
        .collect();

    let set = ResultSet::from_ascending(builds);

    assert_eq!(set.build_numbers(), vec![5, 2, 0]);
    assert_eq!(set.latest().map(BuildResult::build_number), Some(5));
    assert!(set.get(2).is_some());
    assert!(set.get(1).is_none());
    assert!(set.get(0).unwrap().get("cockroach-lock-cache.json").is_some());
    assert_eq!((&set).into_iter().count(), 3);
    assert_eq!(set.nth(0).map(BuildResult::build_number), Some(5));
    assert_eq!(set.nth(2).map(BuildResult::build_number), Some(0));
    assert!(set.nth(3).is_none());
}

#[test]
pub fn result_set_serializes_file_names_as_keys() {
    let payload = ResultPayload::from_slice(PAYLOAD.as_bytes()).unwrap();
    let mut results = IndexMap::new();
    results.insert(
        ResultFile::parse("postgresql-lock-cache.json").unwrap(),
        payload,
    );
    let set = ResultSet::from_ascending(vec![BuildResult::new(4, results).unwrap()]);

    let value = serde_json::to_value(&set).unwrap();

    assert_eq!(value[0]["build_number"], 4);
    assert_eq!(
        value[0]["results"]["postgresql-lock-cache.json"]["data"]["writes"]["retries"],
        5.0
    );
    assert_eq!(value.as_array().map(Vec::len), Some(1));
}
