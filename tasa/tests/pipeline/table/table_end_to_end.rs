use std::sync::Arc;

use chrono::NaiveDate;
use tasa::{Catalog, Series, Tasa, TableRequest, TransformSpec, UnitTransform};

use crate::helpers::{ScriptedConnector, d, stat};

fn ab_tasa() -> Tasa {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("A", Series::from_pairs("A", [(d(2020, 1, 1), 1.0), (d(2021, 1, 1), 2.0)]))
        .with_series("B", Series::from_pairs("B", [(d(2020, 6, 1), 5.0)]));
    let catalog = Catalog::builder()
        .register(stat("A"))
        .register(stat("B"))
        .build()
        .unwrap();
    Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .start_date(d(2019, 1, 1))
        .build()
        .unwrap()
}

#[tokio::test]
async fn outer_join_of_two_series() {
    let tasa = ab_tasa();
    let report = tasa
        .build_table(&TableRequest::new(["A", "B"]).at(d(2024, 1, 1)))
        .await;

    assert!(report.warnings.is_empty());
    assert!(report.collisions.is_empty());
    assert_eq!(report.dropped_future, 0);
    let t = &report.table;
    assert_eq!(t.index(), &[d(2020, 1, 1), d(2020, 6, 1), d(2021, 1, 1)]);
    assert_eq!(t.column("A").unwrap().values, vec![Some(1.0), None, Some(2.0)]);
    assert_eq!(t.column("B").unwrap().values, vec![None, Some(5.0), None]);
}

#[tokio::test]
async fn forward_fill_never_runs_backwards() {
    let tasa = ab_tasa();
    let report = tasa
        .build_table(&TableRequest::new(["A", "B"]).forward_fill(true).at(d(2024, 1, 1)))
        .await;
    let t = &report.table;
    assert_eq!(t.column("A").unwrap().values, vec![Some(1.0), Some(1.0), Some(2.0)]);
    assert_eq!(t.column("B").unwrap().values, vec![None, Some(5.0), Some(5.0)]);
}

#[tokio::test]
async fn configured_forward_fill_is_the_default() {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("A", Series::from_pairs("A", [(d(2020, 1, 1), 1.0)]))
        .with_series("B", Series::from_pairs("B", [(d(2020, 6, 1), 5.0)]));
    let catalog = Catalog::builder()
        .register(stat("A"))
        .register(stat("B"))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .start_date(d(2019, 1, 1))
        .forward_fill(true)
        .build()
        .unwrap();

    let filled = tasa.build_table(&TableRequest::new(["A", "B"]).at(d(2024, 1, 1))).await;
    assert_eq!(filled.table.column("A").unwrap().values, vec![Some(1.0), Some(1.0)]);

    let raw = tasa
        .build_table(&TableRequest::new(["A", "B"]).forward_fill(false).at(d(2024, 1, 1)))
        .await;
    assert_eq!(raw.table.column("A").unwrap().values, vec![Some(1.0), None]);
}

#[tokio::test]
async fn dates_after_now_are_cut() {
    let tasa = ab_tasa();
    let report = tasa
        .build_table(&TableRequest::new(["A", "B"]).at(d(2020, 12, 31)))
        .await;
    assert_eq!(report.table.index(), &[d(2020, 1, 1), d(2020, 6, 1)]);
    assert_eq!(report.dropped_future, 1);
}

#[tokio::test]
async fn failed_series_are_left_out_of_the_table() {
    let tasa = ab_tasa();
    let report = tasa
        .build_table(&TableRequest::new(["A", "Missing"]).at(d(2024, 1, 1)))
        .await;
    assert_eq!(report.table.width(), 1);
    assert!(report.table.contains("A"));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, "Missing");
}

#[tokio::test]
async fn formula_runs_after_units() {
    let conn = ScriptedConnector::statistics("scripted").with_series(
        "A",
        Series::from_pairs(
            "A",
            (0..3u32).map(|i| (d(2020, 1 + i, 1), f64::from(10 * (i + 1)))),
        ),
    );
    let catalog = Catalog::builder().register(stat("A")).build().unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .start_date(d(2019, 1, 1))
        .build()
        .unwrap();

    let spec = TransformSpec::units(UnitTransform::Diff).with_formula("x * 2");
    let report = tasa
        .build_table(&TableRequest::new(["A"]).transform("A", spec).at(d(2024, 1, 1)))
        .await;
    assert_eq!(
        report.table.column("A").unwrap().values,
        vec![None, Some(20.0), Some(20.0)]
    );
}

#[tokio::test]
async fn bad_formula_keeps_the_transformed_series() {
    let tasa = ab_tasa();
    let spec = TransformSpec::default().with_formula("import os");
    let report = tasa
        .build_table(&TableRequest::new(["A"]).transform("A", spec).at(d(2024, 1, 1)))
        .await;
    assert_eq!(report.table.column("A").unwrap().values, vec![Some(1.0), Some(2.0)]);
}

#[tokio::test]
async fn default_table_from_mock_has_every_catalog_column() {
    let tasa = Tasa::builder()
        .with_connector(Arc::new(tasa_mock::MockConnector::new()))
        .build()
        .unwrap();
    let names: Vec<String> = tasa.catalog().names().map(str::to_string).collect();
    let report = tasa
        .build_table(
            &TableRequest::new(names.clone())
                .start(d(2023, 1, 1))
                .at(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
        )
        .await;
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let cols: Vec<&str> = report.table.column_names().collect();
    assert_eq!(cols, names.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(report.dropped_future > 0);
    assert!(report.table.index().windows(2).all(|w| w[0] < w[1]));
}
