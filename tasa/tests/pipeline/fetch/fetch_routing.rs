use std::sync::Arc;

use tasa::{Catalog, SeriesMeta, Tasa, TableRequest, TransformSpec, UnitTransform};
use tasa_mock::MockConnector;

use crate::helpers::{ScriptedConnector, d, monthly};

fn levels() -> tasa::Series {
    monthly("L", 2019, 1, &(1..=24).map(f64::from).collect::<Vec<_>>())
}

#[tokio::test]
async fn routes_by_source_kind() {
    let fred = ScriptedConnector::statistics("stat").with_series("S", levels());
    let bcch = ScriptedConnector::central_bank("bank").with_series("B", levels());
    let (fred_calls, bcch_calls) = (fred.calls(), bcch.calls());
    let catalog = Catalog::builder()
        .register(SeriesMeta::statistics("Stat", "S"))
        .register(SeriesMeta::central_bank("Bank", "B"))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(fred))
        .with_connector(Arc::new(bcch))
        .catalog(catalog)
        .build()
        .unwrap();

    let report = tasa.fetch(&["Stat", "Bank"], Some(d(2019, 1, 1))).await;
    assert!(report.warnings.is_empty());
    assert_eq!(report.series[0].source_label, "FRED S");
    assert_eq!(report.series[1].source_label, "BCCh B");
    assert_eq!(fred_calls.lock().unwrap().len(), 1);
    assert_eq!(bcch_calls.lock().unwrap()[0].0, "B");
}

#[tokio::test]
async fn supported_native_units_are_computed_upstream() {
    let conn = ScriptedConnector::statistics("stat")
        .with_series("S", levels())
        .with_server_units(&[UnitTransform::Level, UnitTransform::PctChangeYoy]);
    let calls = conn.calls();
    let catalog = Catalog::builder()
        .register(SeriesMeta::statistics("Stat", "S").units(UnitTransform::PctChangeYoy))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .build()
        .unwrap();

    let report = tasa.fetch(&["Stat"], Some(d(2019, 1, 1))).await;
    assert_eq!(calls.lock().unwrap()[0].1.unit, UnitTransform::PctChangeYoy);
    let values: Vec<_> = report.series[0].series.values().collect();
    assert!(values[..12].iter().all(Option::is_none));
    // 13 over 1
    assert!((values[12].unwrap() - 1200.0).abs() < 1e-9);
}

#[tokio::test]
async fn unsupported_units_run_locally_with_the_same_result() {
    let local = ScriptedConnector::central_bank("bank").with_series("S", levels());
    let calls = local.calls();
    let catalog = Catalog::builder()
        .register(SeriesMeta::central_bank("Bank", "S").units(UnitTransform::PctChangeYoy))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(local))
        .catalog(catalog)
        .build()
        .unwrap();
    let report = tasa.fetch(&["Bank"], Some(d(2019, 1, 1))).await;
    assert_eq!(calls.lock().unwrap()[0].1.unit, UnitTransform::Level);

    let expected = tasa_core::apply(&levels(), UnitTransform::PctChangeYoy);
    let got: Vec<_> = report.series[0].series.values().collect();
    let want: Vec<_> = expected.values().collect();
    assert_eq!(got, want);
}

#[tokio::test]
async fn resample_forces_level_fetch_even_when_units_are_supported() {
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();
    let spec = TransformSpec::units(UnitTransform::Diff)
        .resampled(tasa::Frequency::Annual, tasa::Aggregation::Last);
    let report = tasa
        .build_table(
            &TableRequest::new(["Tasa Desempleo"])
                .start(d(2018, 1, 1))
                .transform("Tasa Desempleo", spec)
                .at(d(2024, 12, 31)),
        )
        .await;
    assert!(report.warnings.is_empty());
    // 2018..=2024 annual rows; the first diff is undefined
    assert_eq!(report.table.len(), 7);
    let col = report.table.column("Tasa Desempleo").unwrap();
    assert_eq!(col.values[0], None);
    assert!(col.values[1..].iter().all(Option::is_some));
}

#[tokio::test]
async fn central_bank_mock_gets_client_side_units() {
    let catalog = Catalog::builder()
        .register(
            SeriesMeta::central_bank("IMACEC (a/a)", "F032.IMC.IND.Z.Z.EP18.Z.Z.0.M")
                .units(UnitTransform::PctChangeYoy),
        )
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::central_bank()))
        .catalog(catalog)
        .build()
        .unwrap();

    let report = tasa.fetch(&["IMACEC (a/a)"], Some(d(2020, 1, 1))).await;
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let s = &report.series[0].series;
    assert_eq!(s.values().take_while(Option::is_none).count(), 12);
    assert!(s.has_values());
}
