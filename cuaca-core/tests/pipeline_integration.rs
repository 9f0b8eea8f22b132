//! End-to-end tests: config → session start → predict → upload.

use cuaca_core::config::LabelEntry;
use cuaca_core::{CuacaConfig, CuacaError, Session, ValueSource};
use std::path::Path;

const DATASET: &str = "\
Suhu (°C),Kelembapan (%),Tekanan (hPa),Kondisi
29,70,1010,Cerah
31,85,1012,Hujan
27,90,1014,Hujan
33,60,1008,Cerah
";

// Humidity above 75 leans towards rain (class 0).
const FOREST: &str = r#"{
    "kind": "random_forest",
    "feature_names": ["Suhu (°C)", "Kelembapan (%)", "Tekanan (hPa)"],
    "classes": [0, 1],
    "trees": [
        { "nodes": [
            { "type": "split", "feature": 1, "threshold": 75.0, "left": 1, "right": 2 },
            { "type": "leaf", "value": [2.0, 18.0] },
            { "type": "leaf", "value": [15.0, 5.0] }
        ]},
        { "nodes": [
            { "type": "split", "feature": 2, "threshold": 1011.0, "left": 1, "right": 2 },
            { "type": "leaf", "value": [4.0, 16.0] },
            { "type": "leaf", "value": [12.0, 8.0] }
        ]}
    ]
}"#;

const SVC: &str = r#"{
    "kind": "linear_svc",
    "feature_names": ["Suhu (°C)", "Kelembapan (%)"],
    "classes": ["Hujan", "Cerah"],
    "coef": [[0.5, -0.2]],
    "intercept": [0.0]
}"#;

fn workspace(model: &str) -> (tempfile::TempDir, CuacaConfig) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dpc.csv"), DATASET).unwrap();
    std::fs::write(dir.path().join("model.json"), model).unwrap();
    let mut config = CuacaConfig::default();
    config.resolve_paths(dir.path());
    (dir, config)
}

#[tokio::test]
async fn test_forest_prediction_with_median_pressure() {
    let (_dir, config) = workspace(FOREST);
    let session = Session::start(&config).await.unwrap();

    let defaults = session.input_defaults();
    assert_eq!(defaults.temperature, 30.0);
    assert_eq!(defaults.humidity, 77.5);

    // Humid (rain leaf) and median pressure 1011 (clear leaf).
    let result = session.predict(30.0, 80.0).unwrap();
    assert!(result.probabilities_available);
    assert_eq!(result.class_labels, vec!["Rain", "Clear"]);
    let p = &result.class_probabilities;
    assert!((p[0] - 0.475).abs() < 1e-9);
    assert!((p[1] - 0.525).abs() < 1e-9);
    assert_eq!(result.display_label, "Clear");

    assert_eq!(result.imputed.len(), 1);
    assert_eq!(result.imputed[0].name, "Tekanan (hPa)");
    assert_eq!(result.imputed[0].value, 1011.0);
    assert_eq!(result.imputed[0].source, ValueSource::Median);
    session.close();
}

#[tokio::test]
async fn test_configured_labels_are_used() {
    let (_dir, mut config) = workspace(FOREST);
    config.labels = vec![
        LabelEntry {
            code: 0,
            label: "Hujan".into(),
        },
        LabelEntry {
            code: 1,
            label: "Cerah".into(),
        },
    ];
    let session = Session::start(&config).await.unwrap();
    let result = session.predict(30.0, 95.0).unwrap();
    assert_eq!(result.class_labels, vec!["Hujan", "Cerah"]);
}

#[tokio::test]
async fn test_svc_prediction_has_no_probabilities() {
    let (_dir, config) = workspace(SVC);
    let session = Session::start(&config).await.unwrap();
    let result = session.predict(32.0, 50.0).unwrap();
    assert_eq!(result.display_label, "Cerah");
    assert!(!result.probabilities_available);
    assert!(result.class_probabilities.is_empty());
    assert!(result.imputed.is_empty());
}

#[tokio::test]
async fn test_missing_dataset_is_fatal() {
    let (dir, config) = workspace(FOREST);
    std::fs::remove_file(dir.path().join("dpc.csv")).unwrap();
    let err = Session::start(&config).await.err().unwrap();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("dpc.csv"));
}

#[tokio::test]
async fn test_missing_model_is_fatal() {
    let (dir, config) = workspace(FOREST);
    std::fs::remove_file(dir.path().join("model.json")).unwrap();
    let err = Session::start(&config).await.err().unwrap();
    assert!(matches!(err, CuacaError::ResourceUnavailable { .. }));
}

#[tokio::test]
async fn test_upload_swaps_dataset_used_for_imputation() {
    let (dir, config) = workspace(FOREST);
    let mut session = Session::start(&config).await.unwrap();

    let upload = dir.path().join("bulan_ini.csv");
    std::fs::write(
        &upload,
        "Suhu (°C),Kelembapan (%),Tekanan (hPa)\n24,92,1016\n26,88,1018\n",
    )
    .unwrap();
    let dataset = session.upload(&upload).await.unwrap();
    assert_eq!(dataset.row_count(), 2);

    let result = session.predict(25.0, 90.0).unwrap();
    assert_eq!(result.imputed[0].value, 1017.0);
    // Both trees now vote for rain.
    assert_eq!(result.display_label, "Rain");
}

#[tokio::test]
async fn test_failed_upload_keeps_previous_dataset() {
    let (dir, config) = workspace(FOREST);
    let mut session = Session::start(&config).await.unwrap();

    let bad = dir.path().join("kosong.csv");
    std::fs::write(&bad, "").unwrap();
    let err = session.upload(&bad).await.unwrap_err();
    assert!(matches!(err, CuacaError::UploadParseFailure(_)));

    let err = session.upload(Path::new("cuaca.parquet")).await.unwrap_err();
    assert!(matches!(err, CuacaError::UploadParseFailure(_)));

    assert_eq!(session.dataset().row_count(), 4);
    assert_eq!(session.input_defaults().temperature, 30.0);
}

#[tokio::test]
async fn test_demo_workspace() {
    let ws = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos");
    let mut config = cuaca_core::load_config(Some(&ws), None).unwrap();
    config.resolve_paths(&ws);

    let session = Session::start(&config).await.unwrap();
    assert_eq!(session.dataset().row_count(), 12);

    let result = session.predict(33.0, 55.0).unwrap();
    assert_eq!(result.display_label, "Cerah");
    let names: Vec<&str> = result.imputed.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Tekanan (hPa)", "Kecepatan Angin (km/h)"]);
    assert_eq!(result.imputed[0].value, 1010.1);
    assert_eq!(result.imputed[1].value, 8.0);
}
