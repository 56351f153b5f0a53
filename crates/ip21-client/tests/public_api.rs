//! Public API surface tests: re-exports, conversions, and serde shapes.

#![allow(clippy::unwrap_used)]

use ip21_client::{
    Config, Credentials, ErrorResult, HistoryFormat, HistoryOptions, ResponseResult,
    RetrievalType, TagSelection, TransportMode,
};

#[test]
fn tag_selection_accepts_common_shapes() {
    let single: TagSelection = "FC101.PV".into();
    assert_eq!(single.tags(), ["FC101.PV"]);

    let owned: TagSelection = String::from("TC102.PV").into();
    assert_eq!(owned.len(), 1);

    let batch: TagSelection = ["A", "B", "C"].into();
    assert_eq!(batch.len(), 3);

    let vec_batch: TagSelection = vec!["A".to_string(), "B".to_string()].into();
    assert_eq!(vec_batch.tags(), ["A", "B"]);
}

#[test]
fn history_options_builder_defaults() {
    let options = HistoryOptions::new();
    assert_eq!(options.limit, 100_000);
    assert_eq!(options.retrieval_type, RetrievalType::Actual);
    assert_eq!(options.history_format, HistoryFormat::Raw);

    let custom = HistoryOptions::new()
        .limit(10)
        .retrieval_type(RetrievalType::Last);
    assert_eq!(custom.retrieval_type.code(), 22);
}

#[test]
fn response_result_serde_shapes() {
    let payload: ResponseResult =
        serde_json::from_str(r#"{"rows":[{"Name":"FC101.PV"}]}"#).map(ResponseResult::Payload)
            .unwrap();
    assert!(payload.is_payload());

    let error = ResponseResult::Error(ErrorResult {
        status: 503,
        message: "Error on IP21: Service Unavailable".into(),
    });
    let json = serde_json::to_string(&error).unwrap();
    let back: ErrorResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.status, 503);
}

#[test]
fn config_is_cloneable_and_debuggable_without_secrets() {
    let config = Config::new()
        .credentials(Credentials::new("john.doe", "CONTOSO", "hunter2"))
        .transport(TransportMode::Soap);
    let cloned = config.clone();
    let rendered = format!("{cloned:?}");
    assert!(rendered.contains("john.doe"));
    assert!(!rendered.contains("hunter2"));
}
