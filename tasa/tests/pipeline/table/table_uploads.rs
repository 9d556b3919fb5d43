use std::sync::Arc;

use tasa::{Catalog, Cell, Series, Tasa, TableRequest, TransformSpec, UnitTransform, UploadTable};

use crate::helpers::{ScriptedConnector, d, stat};

fn tasa() -> Tasa {
    let conn = ScriptedConnector::statistics("scripted").with_series(
        "X",
        Series::from_pairs("X", [(d(2020, 1, 1), 1.0), (d(2020, 2, 1), 2.0)]),
    );
    let catalog = Catalog::builder().register(stat("X")).build().unwrap();
    Tasa::builder()
        .with_connector(Arc::new(conn))
        .catalog(catalog)
        .start_date(d(2019, 1, 1))
        .build()
        .unwrap()
}

fn upload(label: &str, header: &str, rows: &[(&str, &str)]) -> UploadTable {
    let headers = vec!["Fecha".to_string(), header.to_string()];
    let rows: Vec<Vec<Cell>> = rows
        .iter()
        .map(|(date, v)| vec![Cell::from(*date), Cell::from(*v)])
        .collect();
    UploadTable::from_cells(label, &headers, &rows).unwrap()
}

#[tokio::test]
async fn upload_with_catalog_name_is_renamed() {
    let up = upload("datos.xlsx", "X", &[("2020-02-01", "7"), ("2020-03-01", "8")]);
    let report = tasa()
        .build_table(&TableRequest::new(["X"]).upload(up).at(d(2024, 1, 1)))
        .await;

    assert_eq!(report.collisions.len(), 1);
    let c = &report.collisions[0];
    assert_eq!(c.original, "X");
    assert_eq!(c.renamed, "X (datos.xlsx)");
    assert_eq!(c.source_label, "datos.xlsx");

    let t = &report.table;
    assert_eq!(t.index(), &[d(2020, 1, 1), d(2020, 2, 1), d(2020, 3, 1)]);
    assert_eq!(t.column("X").unwrap().values, vec![Some(1.0), Some(2.0), None]);
    let up = t.column("X (datos.xlsx)").unwrap();
    assert_eq!(up.values, vec![None, Some(7.0), Some(8.0)]);
    assert_eq!(up.source_label, "datos.xlsx");
}

#[tokio::test]
async fn uploads_register_in_order_after_catalog_series() {
    let first = upload("a.csv", "Y", &[("2020-01-01", "1")]);
    let second = upload("b.csv", "Y", &[("2020-01-01", "2")]);
    let report = tasa()
        .build_table(
            &TableRequest::new(["X"])
                .upload(first)
                .upload(second)
                .at(d(2024, 1, 1)),
        )
        .await;
    let cols: Vec<&str> = report.table.column_names().collect();
    assert_eq!(cols, vec!["X", "Y", "Y (b.csv)"]);
}

#[tokio::test]
async fn upload_transform_and_future_cut() {
    let up = upload(
        "ventas.xlsx",
        "Ventas",
        &[
            ("2020-01-01", "100"),
            ("2020-02-01", "1.000,5"),
            ("2099-01-01", "5"),
        ],
    );
    let report = tasa()
        .build_table(
            &TableRequest::new(Vec::<String>::new())
                .upload(up)
                .transform("Ventas", TransformSpec::units(UnitTransform::Diff))
                .at(d(2024, 1, 1)),
        )
        .await;
    assert_eq!(report.dropped_future, 1);
    assert_eq!(report.table.index(), &[d(2020, 1, 1), d(2020, 2, 1)]);
    let values = &report.table.column("Ventas").unwrap().values;
    assert_eq!(values[0], None);
    assert!((values[1].unwrap() - 900.5).abs() < 1e-9);
}
