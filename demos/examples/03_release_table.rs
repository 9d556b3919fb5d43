use tasa::{MonthLocale, Tasa, TableRequest};
use tasa_demos::common::{init_tracing, statistics_connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let tasa = Tasa::builder().with_connector(statistics_connector()?).build()?;

    let report = tasa
        .build_table(&TableRequest::new(["CPI Core", "Volatilidad VIX"]))
        .await;

    let releases = tasa.release_table(&report.table, "CPI Core", None, MonthLocale::Spanish)?;
    println!("{:<10} {:<12} {:>8} {:>8}", "Periodo", "Publicación", "Actual", "Previo");
    for row in releases.formatted.iter().take(6) {
        println!(
            "{:<10} {:<12} {:>8} {:>8}",
            row.reference, row.publication, row.current, row.prior
        );
    }

    // Daily market series have no release history.
    if let Err(e) = tasa.release_table(&report.table, "Volatilidad VIX", None, MonthLocale::Spanish) {
        println!("VIX: {e}");
    }
    Ok(())
}
