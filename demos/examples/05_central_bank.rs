use tasa::{Tasa, TableRequest};
use tasa_demos::common::{
    central_bank_connector, chile_catalog, init_tracing, statistics_connector,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let tasa = Tasa::builder()
        .with_connector(statistics_connector()?)
        .with_connector(central_bank_connector()?)
        .catalog(chile_catalog()?)
        .build()?;

    let start = chrono::NaiveDate::from_ymd_opt(2022, 1, 1).ok_or("bad date")?;
    let req = TableRequest::new(["Dólar Observado", "TPM", "IMACEC (a/a)", "Tasa FED"])
        .start(start)
        .forward_fill(true);
    let report = tasa.build_table(&req).await;

    for w in &report.warnings {
        println!("missing {} ({}): {}", w.code, w.origin, w.cause);
    }
    for name in report.table.column_names() {
        let last = report.table.recent(name, 1)?;
        println!("{name:<18} {last:?}");
    }
    Ok(())
}
