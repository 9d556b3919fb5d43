use std::sync::Arc;
use std::time::Duration;

use tasa::{Catalog, SeriesMeta, Tasa, TasaError};
use tasa_mock::MockConnector;

use crate::helpers::{ScriptedConnector, d, monthly, stat};

fn catalog() -> Catalog {
    Catalog::builder()
        .register(SeriesMeta::statistics("Desempleo", "UNRATE"))
        .register(stat("TIMEOUT"))
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out_alone() {
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .catalog(catalog())
        .provider_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let report = tasa
        .fetch(&["Desempleo", "TIMEOUT"], Some(d(2024, 1, 1)))
        .await;
    assert_eq!(report.series.len(), 1);
    assert_eq!(report.series[0].series.name(), "Desempleo");
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        report.warnings[0].cause,
        TasaError::ProviderTimeout {
            connector: "tasa-mock".into(),
            code: "TIMEOUT".into(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn request_deadline_reports_pending_series() {
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .catalog(catalog())
        .provider_timeout(Duration::from_secs(10))
        .request_timeout(Duration::from_millis(500))
        .build()
        .unwrap();

    let report = tasa
        .fetch(&["Desempleo", "TIMEOUT"], Some(d(2024, 1, 1)))
        .await;
    assert_eq!(report.series.len(), 1);
    let w = &report.warnings[0];
    assert_eq!(w.code, "TIMEOUT");
    assert!(matches!(w.cause, TasaError::RequestTimeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn fetches_run_concurrently() {
    let conn = ScriptedConnector::statistics("slow")
        .with_series("A", monthly("A", 2020, 1, &[1.0]))
        .with_series("B", monthly("B", 2020, 1, &[2.0]))
        .with_series("C", monthly("C", 2020, 1, &[3.0]))
        .with_delay(300);
    let catalog = Catalog::builder()
        .register(stat("A"))
        .register(stat("B"))
        .register(stat("C"))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .request_timeout(Duration::from_millis(500))
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let report = tasa.fetch(&["A", "B", "C"], Some(d(2020, 1, 1))).await;
    assert_eq!(report.series.len(), 3, "{:?}", report.warnings);
    assert!(started.elapsed() < Duration::from_millis(500));
}
