use std::sync::{Arc, Mutex};

use tasa::{
    Catalog, Observation, SeriesMeta, Tasa, TableRequest, TransformSpec, UnitTransform,
};
use tasa_fred::{FredConnector, adapter::FredObservations};

use crate::helpers::d;

type Calls = Arc<Mutex<Vec<(String, UnitTransform)>>>;

/// Weekly levels 1..=20 from 2024-01-01; records every `units` request.
fn recording_fred() -> (Arc<FredConnector>, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let obs = <dyn FredObservations>::from_fn(move |series_id, start, units| {
        seen.lock().unwrap().push((series_id, units));
        Ok((0..20u32)
            .map(|i| Observation::new(start + chrono::Days::new(u64::from(i) * 7), f64::from(i + 1)))
            .collect())
    });
    (Arc::new(FredConnector::from_adapter(obs)), calls)
}

fn claims(units: UnitTransform) -> Catalog {
    Catalog::builder()
        .register(SeriesMeta::statistics("Claims", "ICSA").units(units))
        .build()
        .unwrap()
}

#[tokio::test]
async fn explicit_yoy_on_weekly_series_is_positional_and_computed_locally() {
    let (fred, calls) = recording_fred();
    let tasa = Tasa::builder()
        .with_connector(fred)
        .catalog(claims(UnitTransform::Level))
        .build()
        .unwrap();

    let req = TableRequest::new(["Claims"])
        .start(d(2024, 1, 1))
        .transform("Claims", TransformSpec::units(UnitTransform::PctChangeYoy))
        .at(d(2025, 1, 1));
    let report = tasa.build_table(&req).await;
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    assert_eq!(
        *calls.lock().unwrap(),
        vec![("ICSA".to_string(), UnitTransform::Level)]
    );
    let col = report.table.column("Claims").unwrap();
    assert!(col.values[..12].iter().all(Option::is_none));
    // twelve rows back, not one calendar year back
    assert!((col.values[12].unwrap() - 1200.0).abs() < 1e-9);
}

#[tokio::test]
async fn native_units_are_still_requested_upstream() {
    let (fred, calls) = recording_fred();
    let tasa = Tasa::builder()
        .with_connector(fred)
        .catalog(claims(UnitTransform::PctChangeYoy))
        .build()
        .unwrap();

    let report = tasa.fetch(&["Claims"], Some(d(2024, 1, 1))).await;
    assert!(report.warnings.is_empty());
    assert_eq!(calls.lock().unwrap()[0].1, UnitTransform::PctChangeYoy);
}
