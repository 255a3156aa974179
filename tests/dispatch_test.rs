//! Integration tests for name-based request dispatch

use tracegraph::{
    ContactTracer, Dataset, ErrorKind, InMemoryBackend, Params, RequestHandler, Response,
    TraceConfig,
};

const DATASET: &str = r#"{
    "people": [
        {"name": "Alice", "healthstatus": "Sick", "confirmedtime": "2020-03-02T08:00:00Z"},
        {"name": "Bob", "healthstatus": "Healthy"},
        {"name": "Carol", "healthstatus": "Healthy"}
    ],
    "places": [{"name": "Le Zinc", "type": "Bar"}],
    "visits": [
        {"person": "Alice", "place": "Le Zinc", "starttime": "2020-03-02T09:00:00Z", "endtime": "2020-03-02T12:00:00Z"},
        {"person": "Bob", "place": "Le Zinc", "starttime": "2020-03-02T09:00:00Z", "endtime": "2020-03-02T12:00:00Z"},
        {"person": "Carol", "place": "Le Zinc", "starttime": "2020-03-02T11:30:00Z", "endtime": "2020-03-02T13:00:00Z"}
    ]
}"#;

fn handler_with(config: TraceConfig) -> RequestHandler<InMemoryBackend> {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let backend = InMemoryBackend::from_dataset(&dataset).unwrap();
    RequestHandler::new(ContactTracer::with_config(backend, config))
}

fn handler() -> RequestHandler<InMemoryBackend> {
    handler_with(TraceConfig::default())
}

#[tokio::test]
async fn test_result_field_names() {
    let handler = handler();
    let cases = [
        ("listLabels", Params::new(), vec!["label"]),
        ("possibleSpreaders", Params::new(), vec!["sickName"]),
        ("possibleSpreadCounts", Params::new(), vec!["sickName", "nbHealthy"]),
        ("carelessPeople", Params::new(), vec!["sickName", "nbPlaces"]),
        ("sociallyCareful", Params::new(), vec!["sickName"]),
        ("peopleToInform", Params::new(), vec!["sickName", "peopleToInform"]),
        ("healthyCompanionsOf", Params::new().with_name("Bob"), vec!["healthyName"]),
        ("topSickSite", Params::new(), vec!["placeType", "nbOfSickVisits"]),
        ("sickFrom", Params::new().with_names(["Alice"]), vec!["sickName"]),
        ("setHighRisk", Params::new(), vec!["highRiskName"]),
    ];

    for (name, params, fields) in cases {
        let response = handler.handle(name, &params).await.unwrap();
        assert_eq!(response.columns(), fields, "columns of {}", name);
    }
}

#[tokio::test]
async fn test_records_are_keyed_by_field_name() {
    let handler = handler();

    let response = handler
        .handle("possibleSpreadCounts", &Params::new())
        .await
        .unwrap();
    let batch = response.as_rows().unwrap();
    assert_eq!(batch.len(), 1);
    let row = batch.get(0).unwrap();
    assert_eq!(row.get_str("sickName"), Some("Alice"));
    assert_eq!(row.get_int("nbHealthy"), Some(2));

    let response = handler
        .handle("peopleToInform", &Params::new().with_threshold_minutes(120))
        .await
        .unwrap();
    assert_eq!(
        response.to_json(),
        serde_json::json!([{"sickName": "Alice", "peopleToInform": ["Bob"]}])
    );

    let response = handler.handle("topSickSite", &Params::new()).await.unwrap();
    let Response::Single(record) = &response else {
        panic!("topSickSite returns a single record");
    };
    assert_eq!(record.get_str("placeType"), Some("Bar"));
    assert_eq!(record.get_int("nbOfSickVisits"), Some(1));
}

#[tokio::test]
async fn test_sick_from_names_are_bound() {
    let handler = handler();
    let params = Params::new().with_names(["Bob", "Alice' OR 1=1", "Alice", "Alice"]);

    let response = handler.handle("sickFrom", &params).await.unwrap();
    assert_eq!(response.as_rows().unwrap().column_strs("sickName"), vec!["Alice"]);
}

#[tokio::test]
async fn test_unknown_operation_is_unimplemented() {
    let handler = handler();
    for name in ["exportReport", "", "possiblespreaders"] {
        let err = handler.handle(name, &Params::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented, "request {:?}", name);
    }
}

#[tokio::test]
async fn test_disabled_operation_is_unimplemented() {
    let config = TraceConfig::from_yaml_str("disabled_operations: [setHighRisk, sickFrom]\n").unwrap();
    let handler = handler_with(config);

    let err = handler.handle("setHighRisk", &Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unimplemented);
    // disabled wins over a missing parameter
    let err = handler.handle("sickFrom", &Params::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unimplemented);

    assert!(handler.handle("listLabels", &Params::new()).await.is_ok());
}

#[tokio::test]
async fn test_invalid_arguments() {
    let handler = handler();
    let cases = [
        ("healthyCompanionsOf", Params::new()),
        ("healthyCompanionsOf", Params::new().with_name("")),
        ("healthyCompanionsOf", Params::new().with_name("Bob").with_hops(0)),
        ("peopleToInform", Params::new().with_threshold_minutes(-1)),
        ("setHighRisk", Params::new().with_threshold_minutes(-1)),
        ("sickFrom", Params::new().with_names(["Alice", ""])),
    ];

    for (name, params) in cases {
        let err = handler.handle(name, &params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{} {:?}", name, params);
    }
}

#[tokio::test]
async fn test_config_defaults_apply() {
    let config = TraceConfig::from_yaml_str("exposure_threshold_minutes: 30\ncompanion_hops: 1\n").unwrap();
    let handler = handler_with(config);

    // Carol overlaps Alice for 30 minutes
    let response = handler.handle("peopleToInform", &Params::new()).await.unwrap();
    let record = response.as_rows().unwrap().get(0).unwrap();
    assert_eq!(record.get_str_list("peopleToInform"), Some(vec!["Bob", "Carol"]));

    let response = handler
        .handle("healthyCompanionsOf", &Params::new().with_name("Bob"))
        .await
        .unwrap();
    assert_eq!(response.as_rows().unwrap().column_strs("healthyName"), vec!["Carol"]);
}
