use std::sync::Arc;

use tasa::{
    Catalog, MergedTable, MonthLocale, SeriesCategory, SeriesMeta, Tasa, TableRequest, TasaError,
};

use crate::helpers::{ScriptedConnector, d, monthly};

async fn table() -> (Tasa, MergedTable) {
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("M", monthly("M", 2023, 10, &[10.0, 20.0, 30.0]))
        .with_series("K", monthly("K", 2023, 10, &[1.0, 2.0, 3.0]));
    let catalog = Catalog::builder()
        .register(SeriesMeta::statistics("Macro %", "M").percent(true))
        .register(SeriesMeta::statistics("Market", "K").category(SeriesCategory::Market))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .start_date(d(2020, 1, 1))
        .release_since(d(2020, 1, 1))
        .build()
        .unwrap();
    let report = tasa
        .build_table(&TableRequest::new(["Macro %", "Market"]).at(d(2024, 6, 1)))
        .await;
    (tasa, report.table)
}

#[tokio::test]
async fn newest_first_with_prior_values() {
    let (tasa, table) = table().await;
    let rt = tasa
        .release_table(&table, "Macro %", None, MonthLocale::Spanish)
        .unwrap();

    assert_eq!(rt.column, "Macro %");
    assert_eq!(rt.rows.len(), 2);
    assert_eq!(rt.rows[0].date, d(2023, 12, 1));
    assert_eq!(rt.rows[0].current_value, 30.0);
    assert_eq!(rt.rows[0].prior_value, 20.0);
    assert_eq!(rt.rows[0].reference_period_label, "Dic 2023");
    assert_eq!(rt.rows[0].estimated_publication_label, "Ene 2024");
    assert_eq!(rt.rows[1].current_value, 20.0);
    assert_eq!(rt.rows[1].prior_value, 10.0);

    assert_eq!(rt.formatted[0].current, "30%");
    assert_eq!(rt.formatted[0].prior, "20%");
}

#[tokio::test]
async fn since_date_filters_rows() {
    let (tasa, table) = table().await;
    let rt = tasa
        .release_table(&table, "Macro %", Some(d(2023, 11, 1)), MonthLocale::English)
        .unwrap();
    assert_eq!(rt.rows.len(), 1);
    assert_eq!(rt.rows[0].reference_period_label, "Dec 2023");
    assert_eq!(rt.formatted[0].publication, "Jan 2024");
}

#[tokio::test]
async fn market_series_have_no_release_table() {
    let (tasa, table) = table().await;
    let err = tasa
        .release_table(&table, "Market", None, MonthLocale::default())
        .unwrap_err();
    assert!(matches!(err, TasaError::Unsupported { capability } if capability.contains("high-frequency")));
}

#[tokio::test]
async fn missing_column_is_the_only_propagated_failure() {
    let (tasa, table) = table().await;
    let err = tasa
        .release_table(&table, "Nope", None, MonthLocale::default())
        .unwrap_err();
    assert_eq!(err, TasaError::missing_column("Nope"));
}

#[tokio::test]
async fn forward_filled_daily_rows_are_not_releases() {
    let daily = tasa::Series::from_pairs(
        "DGS10",
        d(2024, 1, 1)
            .iter_days()
            .take_while(|day| *day <= d(2024, 3, 31))
            .map(|day| (day, 4.0)),
    );
    let conn = ScriptedConnector::statistics("scripted")
        .with_series("CPI", monthly("CPI", 2024, 1, &[1.0, 2.0, 3.0]))
        .with_series("DGS10", daily);
    let catalog = Catalog::builder()
        .register(SeriesMeta::statistics("CPI", "CPI"))
        .register(SeriesMeta::statistics("Bono 10Y", "DGS10").category(SeriesCategory::Market))
        .build()
        .unwrap();
    let tasa = Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .start_date(d(2024, 1, 1))
        .release_since(d(2024, 1, 1))
        .build()
        .unwrap();
    let report = tasa
        .build_table(
            &TableRequest::new(["CPI", "Bono 10Y"])
                .forward_fill(true)
                .at(d(2024, 6, 1)),
        )
        .await;
    assert_eq!(report.table.value_at("CPI", d(2024, 3, 31)).unwrap(), Some(3.0));

    let rt = tasa
        .release_table(&report.table, "CPI", None, MonthLocale::English)
        .unwrap();
    let got: Vec<_> = rt
        .rows
        .iter()
        .map(|r| (r.date, r.current_value, r.prior_value))
        .collect();
    assert_eq!(got, vec![(d(2024, 3, 1), 3.0, 2.0), (d(2024, 2, 1), 2.0, 1.0)]);
}
