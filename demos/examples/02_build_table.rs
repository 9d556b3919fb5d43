use tasa::{Aggregation, Frequency, Tasa, TableRequest, TransformSpec, UnitTransform};
use tasa_demos::common::{init_tracing, statistics_connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let tasa = Tasa::builder().with_connector(statistics_connector()?).build()?;

    let start = chrono::NaiveDate::from_ymd_opt(2019, 1, 1).ok_or("bad date")?;
    let req = TableRequest::new(["Tasa Desempleo", "CPI Core", "Bono US 10Y", "Bono US 2Y"])
        .start(start)
        // Monthly averages of the daily yields.
        .transform(
            "Bono US 10Y",
            TransformSpec::default().resampled(Frequency::Monthly, Aggregation::Mean),
        )
        .transform(
            "Bono US 2Y",
            TransformSpec::default().resampled(Frequency::Monthly, Aggregation::Mean),
        )
        // Month-over-month change in percentage points.
        .transform("Tasa Desempleo", TransformSpec::units(UnitTransform::Diff))
        .forward_fill(true);

    let report = tasa.build_table(&req).await;
    let table = &report.table;
    println!(
        "{} rows x {} columns, {} warnings",
        table.len(),
        table.width(),
        report.warnings.len()
    );
    for name in table.column_names() {
        if let Ok(recent) = table.recent(name, 3) {
            println!("{name:<16} {recent:?}");
        }
    }
    Ok(())
}
