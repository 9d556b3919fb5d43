use tasa::Tasa;
use tasa_demos::common::{init_tracing, statistics_connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let tasa = Tasa::builder().with_connector(statistics_connector()?).build()?;

    let names = ["Tasa Desempleo", "Nóminas NFP (YoY%)", "Bono US 10Y"];
    let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1);
    let report = tasa.fetch(&names, start).await;

    for s in &report.series {
        let last = s.series.present().last();
        println!(
            "{:<22} {:>5} obs  last={:?}  [{}]",
            s.series.name(),
            s.series.len(),
            last,
            s.source_label
        );
    }
    for w in &report.warnings {
        println!("missing {} ({}): {}", w.code, w.origin, w.cause);
    }
    Ok(())
}
