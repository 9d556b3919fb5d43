use tasa::{Cell, Tasa, TableRequest, UploadTable};
use tasa_demos::common::{init_tracing, statistics_connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let tasa = Tasa::builder().with_connector(statistics_connector()?).build()?;

    // Cells as a spreadsheet reader would hand them over.
    let headers = vec!["Fecha".to_string(), "Tasa Desempleo".to_string(), String::new()];
    let rows = vec![
        vec![Cell::from("2024-01-01"), Cell::from("3,7"), Cell::from(12.0)],
        vec![Cell::from("2024-02-01"), Cell::from("3,9"), Cell::from(12.5)],
        vec![Cell::from("total"), Cell::Empty, Cell::Empty],
    ];
    let upload = UploadTable::from_cells("propio.xlsx", &headers, &rows)?;
    println!(
        "upload columns: {:?} (skipped {} rows)",
        upload.column_names().collect::<Vec<_>>(),
        upload.skipped_rows()
    );

    let start = chrono::NaiveDate::from_ymd_opt(2023, 6, 1).ok_or("bad date")?;
    let report = tasa
        .build_table(&TableRequest::new(["Tasa Desempleo"]).start(start).upload(upload))
        .await;

    for c in &report.collisions {
        println!("renamed '{}' -> '{}' ({})", c.original, c.renamed, c.source_label);
    }
    for name in report.table.column_names() {
        let ctx = tasa.chart_context(&report.table, name, None, chrono::Utc::now().date_naive())?;
        println!("{name:<28} window={:?} source={}", ctx.window, ctx.source_label);
    }
    Ok(())
}
