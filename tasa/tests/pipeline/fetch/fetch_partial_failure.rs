use std::sync::Arc;

use tasa::{Catalog, SeriesMeta, Tasa, TasaError};

use crate::helpers::{ScriptedConnector, d, monthly, stat};

fn tasa_with(conn: ScriptedConnector, catalog: Catalog) -> Tasa {
    Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .build()
        .unwrap()
}

#[tokio::test]
async fn failures_become_warnings_and_the_rest_survives() {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("A", monthly("A", 2020, 1, &[1.0, 2.0, 3.0]))
        .with_error("BROKEN", TasaError::connector("scripted", "boom"))
        .with_series("HOLLOW", tasa::Series::empty("HOLLOW"));
    let catalog = Catalog::builder()
        .register(stat("A"))
        .register(stat("BROKEN"))
        .register(stat("HOLLOW"))
        .build()
        .unwrap();
    let tasa = tasa_with(conn, catalog);

    let report = tasa
        .fetch(&["A", "BROKEN", "HOLLOW", "Nope"], Some(d(2020, 1, 1)))
        .await;

    assert_eq!(report.series.len(), 1);
    assert_eq!(report.series[0].series.name(), "A");
    assert_eq!(report.series[0].source_label, "FRED A");
    assert_eq!(report.series[0].series.len(), 3);

    assert_eq!(report.warnings.len(), 3);
    let unknown = &report.warnings[0];
    assert_eq!(unknown.origin, "catalog");
    assert_eq!(unknown.code, "Nope");
    assert!(matches!(unknown.cause, TasaError::NotFound { .. }));

    let broken = report.warnings.iter().find(|w| w.code == "BROKEN").unwrap();
    assert_eq!(broken.origin, "scripted");
    assert!(matches!(broken.cause, TasaError::Connector { .. }));

    let hollow = report.warnings.iter().find(|w| w.code == "HOLLOW").unwrap();
    assert!(matches!(hollow.cause, TasaError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_names_fetch_once() {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("A", monthly("A", 2020, 1, &[1.0, 2.0]));
    let calls = conn.calls();
    let catalog = Catalog::builder().register(stat("A")).build().unwrap();
    let tasa = tasa_with(conn, catalog);

    let report = tasa.fetch(&["A", "A"], None).await;
    assert_eq!(report.series.len(), 1);
    assert!(report.warnings.is_empty());
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn fallback_code_answers_and_labels_the_series() {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("NEW", monthly("NEW", 2021, 1, &[4.0, 5.0]));
    let catalog = Catalog::builder()
        .register(SeriesMeta::statistics("Series", "OLD").fallback_code("NEW"))
        .build()
        .unwrap();
    let tasa = tasa_with(conn, catalog);

    let report = tasa.fetch(&["Series"], Some(d(2000, 1, 1))).await;
    assert!(report.warnings.is_empty());
    let s = &report.series[0];
    assert_eq!(s.series.name(), "Series");
    assert_eq!(s.source_label, "FRED NEW");
}

#[tokio::test]
async fn every_code_failing_is_aggregated() {
    let conn = ScriptedConnector::statistics("scripted");
    let catalog = Catalog::builder()
        .register(SeriesMeta::statistics("Series", "X1").fallback_code("X2"))
        .build()
        .unwrap();
    let tasa = tasa_with(conn, catalog);

    let report = tasa.fetch(&["Series"], None).await;
    assert!(report.series.is_empty());
    let w = &report.warnings[0];
    assert_eq!(w.code, "X1,X2");
    match &w.cause {
        TasaError::AllCodesFailed(errs) => assert_eq!(errs.len(), 2),
        other => panic!("unexpected cause: {other:?}"),
    }
}

#[tokio::test]
async fn recommended_start_narrows_history() {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("A", monthly("A", 2020, 1, &[1.0, 2.0, 3.0, 4.0]));
    let calls = conn.calls();
    let catalog = Catalog::builder()
        .register(stat("A").start(d(2020, 3, 1)))
        .build()
        .unwrap();
    let tasa = tasa_with(conn, catalog);

    let report = tasa.fetch(&["A"], Some(d(2019, 1, 1))).await;
    assert_eq!(report.series[0].series.len(), 2);
    assert_eq!(calls.lock().unwrap()[0].1.start, d(2020, 3, 1));
}

#[tokio::test]
async fn series_without_connector_is_a_warning() {
    let conn = ScriptedConnector::statistics("scripted");
    let catalog = Catalog::builder()
        .register(SeriesMeta::central_bank("Dólar", "F073.TCO.PRE.Z.D"))
        .build()
        .unwrap();
    let tasa = tasa_with(conn, catalog);

    let report = tasa.fetch(&["Dólar"], None).await;
    assert!(report.series.is_empty());
    assert_eq!(report.warnings[0].origin, "BCCh");
    assert!(matches!(report.warnings[0].cause, TasaError::Unsupported { .. }));
}
