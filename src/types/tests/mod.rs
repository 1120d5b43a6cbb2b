use super::*;
use crate::error::SyncError;
use std::path::PathBuf;
use std::time::Duration;

// --- EstimatorConfig ---

#[test]
fn test_estimator_config_defaults() {
    let config = EstimatorConfig::default();
    assert_eq!(config.candidates_per_round, 8);
    assert_eq!(config.target_survivors, 3);
    assert_eq!(config.round_interval, Duration::from_secs(5));
    assert_eq!(config.probe_timeout, Duration::from_secs(1));
    assert_eq!(config.estimate_path, PathBuf::from("offset_estimate.bin"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_estimator_config_builder() {
    let config = EstimatorConfig::builder()
        .candidates_per_round(5)
        .target_survivors(2)
        .round_interval(Duration::from_millis(250))
        .probe_timeout(Duration::from_millis(50))
        .estimate_path("/tmp/estimate.bin")
        .build()
        .unwrap();

    assert_eq!(config.candidates_per_round, 5);
    assert_eq!(config.target_survivors, 2);
    assert_eq!(config.round_interval, Duration::from_millis(250));
    assert_eq!(config.probe_timeout, Duration::from_millis(50));
    assert_eq!(config.estimate_path, PathBuf::from("/tmp/estimate.bin"));
}

#[test]
fn test_estimator_config_rejects_target_below_two() {
    let err = EstimatorConfig::builder()
        .target_survivors(1)
        .build()
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidInput { ref name, .. } if name == "target_survivors"));
}

#[test]
fn test_estimator_config_rejects_target_not_below_m() {
    let err = EstimatorConfig::builder()
        .candidates_per_round(4)
        .target_survivors(4)
        .build()
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidInput { .. }));
}

#[test]
fn test_estimator_config_rejects_tiny_buffer() {
    let config = EstimatorConfig {
        recv_buf_size: 16,
        ..EstimatorConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_estimator_config_rejects_zero_periods() {
    let err = EstimatorConfig::builder()
        .round_interval(Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidInput { ref name, .. } if name == "round_interval"));

    let err = EstimatorConfig::builder()
        .probe_timeout(Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(matches!(err, SyncError::InvalidInput { ref name, .. } if name == "probe_timeout"));
}

#[test]
fn test_estimator_config_from_json_partial() {
    let config =
        EstimatorConfig::from_json(r#"{"candidates_per_round": 6, "target_survivors": 2}"#)
            .unwrap();
    assert_eq!(config.candidates_per_round, 6);
    assert_eq!(config.target_survivors, 2);
    assert_eq!(config.round_interval, Duration::from_secs(5));
}

#[test]
fn test_estimator_config_from_json_invalid() {
    assert!(EstimatorConfig::from_json("not json").is_err());
    assert!(EstimatorConfig::from_json(r#"{"target_survivors": 0}"#).is_err());
}

#[test]
fn test_estimator_config_json_roundtrip() {
    let config = EstimatorConfig::builder()
        .candidates_per_round(7)
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(EstimatorConfig::from_json(&json).unwrap(), config);
}

// --- LatencyConfig ---

#[test]
fn test_latency_config_defaults() {
    let config = LatencyConfig::default();
    assert_eq!(config.alpha, 0.1);
    assert_eq!(config.beta, 0.2);
    assert_eq!(config.kappa, 0.5);
    assert!(config.log_path.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_latency_config_rejects_bad_gains() {
    for (alpha, beta, kappa) in [
        (0.0, 0.2, 0.5),
        (1.5, 0.2, 0.5),
        (0.1, -0.1, 0.5),
        (0.1, f64::NAN, 0.5),
        (0.1, 0.2, -1.0),
        (0.1, 0.2, f64::INFINITY),
    ] {
        let config = LatencyConfig {
            alpha,
            beta,
            kappa,
            log_path: None,
        };
        assert!(
            config.validate().is_err(),
            "accepted alpha={alpha} beta={beta} kappa={kappa}"
        );
    }
}

#[test]
fn test_latency_config_from_json() {
    let config = LatencyConfig::from_json(r#"{"kappa": 4.0, "log_path": "latency.txt"}"#).unwrap();
    assert_eq!(config.kappa, 4.0);
    assert_eq!(config.alpha, 0.1);
    assert_eq!(config.log_path, Some(PathBuf::from("latency.txt")));
}

#[test]
fn test_latency_config_with_log_path() {
    let config = LatencyConfig::default().with_log_path("out.txt");
    assert_eq!(config.log_path, Some(PathBuf::from("out.txt")));
}
