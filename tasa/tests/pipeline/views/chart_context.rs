use std::sync::Arc;

use tasa::{Catalog, Cell, SeriesMeta, Tasa, TableRequest, TasaError, UploadTable};
use tasa_mock::MockConnector;

use crate::helpers::{ScriptedConnector, d, monthly};

#[tokio::test]
async fn catalog_column_context() {
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();
    let report = tasa
        .build_table(
            &TableRequest::new(["Tasa Desempleo", "Volatilidad VIX"])
                .start(d(2019, 1, 1))
                .at(d(2021, 1, 1)),
        )
        .await;

    let ctx = tasa
        .chart_context(&report.table, "Tasa Desempleo", None, d(2021, 1, 1))
        .unwrap();
    assert_eq!(ctx.window, (d(2019, 1, 1), d(2021, 1, 1)));
    assert_eq!(ctx.bands, vec![(d(2020, 2, 1), d(2020, 4, 1))]);
    assert!(ctx.format.is_percent());
    assert_eq!(ctx.source_label, "FRED UNRATE");

    let vix = tasa
        .chart_context(&report.table, "Volatilidad VIX", None, d(2021, 1, 1))
        .unwrap();
    assert!(!vix.format.is_percent());
}

#[tokio::test]
async fn upload_column_uses_its_file_label() {
    let tasa = Tasa::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();
    let headers = vec!["Fecha".to_string(), "Ventas %".to_string()];
    let rows = vec![vec![Cell::from("2022-03-01"), Cell::from(1.5)]];
    let up = UploadTable::from_cells("ventas.xlsx", &headers, &rows).unwrap();
    let report = tasa
        .build_table(
            &TableRequest::new(Vec::<String>::new())
                .upload(up)
                .at(d(2024, 1, 1)),
        )
        .await;

    let ctx = tasa
        .chart_context(&report.table, "Ventas %", None, d(2024, 1, 1))
        .unwrap();
    assert_eq!(ctx.source_label, "ventas.xlsx");
    assert!(ctx.format.is_percent());
    assert_eq!(ctx.window.0, d(2022, 3, 1));
    assert!(ctx.bands.is_empty());

    let err = tasa
        .chart_context(&report.table, "Nope", None, d(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(err, TasaError::MissingColumn { .. }));
}

#[tokio::test]
async fn secondary_axis_that_starts_earlier_widens_the_window() {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("LATE", monthly("LATE", 2010, 1, &[1.0, 2.0, 3.0]))
        .with_series("EARLY", monthly("EARLY", 2007, 1, &[5.0; 48]));
    let catalog = Catalog::builder()
        .register(SeriesMeta::statistics("Late", "LATE"))
        .register(SeriesMeta::statistics("Early %", "EARLY").percent(true))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .start_date(d(2000, 1, 1))
        .build()
        .unwrap();
    let now = d(2012, 1, 1);
    let report = tasa
        .build_table(&TableRequest::new(["Late", "Early %"]).at(now))
        .await;

    let alone = tasa.chart_context(&report.table, "Late", None, now).unwrap();
    assert_eq!(alone.window.0, d(2010, 1, 1));
    assert!(alone.bands.is_empty());
    assert!(alone.secondary.is_none());

    let ctx = tasa
        .chart_context(&report.table, "Late", Some("Early %"), now)
        .unwrap();
    assert_eq!(ctx.window, (d(2007, 1, 1), now));
    assert_eq!(ctx.bands, vec![(d(2007, 12, 1), d(2009, 6, 1))]);
    let second = ctx.secondary.unwrap();
    assert_eq!(second.column, "Early %");
    assert_eq!(second.source_label, "FRED EARLY");
    assert!(second.format.is_percent());
    assert!(!ctx.format.is_percent());

    let err = tasa
        .chart_context(&report.table, "Late", Some("Nope"), now)
        .unwrap_err();
    assert!(matches!(err, TasaError::MissingColumn { .. }));
}
