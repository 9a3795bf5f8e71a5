use std::path::Path;

use govscore::reporter::json::JsonReporter;
use govscore::reporter::Reporter;
use govscore::RatingLabel;

const SAMPLE: &str = "tests/fixtures/sample_dataset";

#[test]
fn test_e2e_sample_dataset() {
    let result = govscore::engine::run(Path::new(SAMPLE), None).unwrap();

    // drafts/ is ignored by the dataset config
    assert_eq!(result.files_scanned, 3);
    assert_eq!(result.dataset_name, "sample_dataset");

    let ids: Vec<&str> = result
        .evaluations
        .iter()
        .map(|e| e.identifier.as_str())
        .collect();
    assert_eq!(ids, vec!["ACME", "BOLT"]);

    let acme = &result.evaluations[0];
    assert!((acme.score - 92.0).abs() < 1e-9);
    assert_eq!(acme.label, RatingLabel::Exemplary);

    // 0.25*0.4 + 0.15*0.2 + 0.20*0.2 + 0.15*0.6 + 0.15*0.6 + 0.10*0.4 = 0.39
    let bolt = &result.evaluations[1];
    assert!((bolt.score - 39.0).abs() < 1e-9);
    assert_eq!(bolt.label, RatingLabel::SignificantConcerns);
    assert_eq!(bolt.concentration.unwrap().index, 10_000.0);

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].identifier, "CRUX");
    assert!(result.failures[0].error.contains("disclosure_rating"));
}

#[test]
fn test_e2e_json_output() {
    let result = govscore::engine::run(Path::new(SAMPLE), None).unwrap();
    let json_str = JsonReporter.format(&result, false);
    let json: serde_json::Value = serde_json::from_str(&json_str).unwrap();

    assert_eq!(json["summary"]["evaluated"].as_u64().unwrap(), 2);
    assert_eq!(json["summary"]["failed"].as_u64().unwrap(), 1);
    assert_eq!(json["evaluations"][0]["label"], "exemplary");
    assert_eq!(json["rubric"]["version"], "1.0.0");
}
