use std::sync::Arc;

use tasa::{Catalog, SourceKind, Tasa, TasaError};
use tasa_mock::MockConnector;

use crate::helpers::{ScriptedConnector, stat};

#[test]
fn build_requires_a_connector() {
    let err = Tasa::builder().build().err().unwrap();
    assert!(matches!(err, TasaError::InvalidArg(_)));
}

#[test]
fn duplicate_connector_names_are_rejected() {
    let err = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, TasaError::InvalidArg(msg) if msg.contains("tasa-mock")));
}

#[test]
fn upload_kind_connector_is_rejected() {
    let err = Tasa::builder()
        .with_connector(Arc::new(ScriptedConnector::new("files", SourceKind::UserUpload)))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, TasaError::InvalidArg(msg) if msg.contains("files")));
}

#[test]
fn missing_kind_only_warns() {
    let catalog = Catalog::builder()
        .register(stat("A"))
        .register(tasa::SeriesMeta::central_bank("Dólar", "F073.TCO.PRE.Z.D"))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .catalog(catalog)
        .build()
        .unwrap();
    assert_eq!(tasa.catalog().len(), 2);
}

#[test]
fn modifiers_land_in_config() {
    use std::time::Duration;
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .start_date(crate::helpers::d(2000, 1, 1))
        .provider_timeout(Duration::from_secs(3))
        .request_timeout(Duration::from_secs(5))
        .forward_fill(true)
        .release_since(crate::helpers::d(2022, 1, 1))
        .backoff(tasa::BackoffConfig::none())
        .build()
        .unwrap();
    let cfg = tasa.config();
    assert_eq!(cfg.start_date, crate::helpers::d(2000, 1, 1));
    assert_eq!(cfg.provider_timeout, Duration::from_secs(3));
    assert_eq!(cfg.request_timeout, Some(Duration::from_secs(5)));
    assert!(cfg.forward_fill);
    assert_eq!(cfg.release_since, crate::helpers::d(2022, 1, 1));
    assert_eq!(cfg.backoff.max_retries, 0);
}
