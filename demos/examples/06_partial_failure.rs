use std::time::Duration;

use tasa::{Catalog, SeriesMeta, Tasa, TableRequest};
use tasa_demos::common::{init_tracing, statistics_connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // The mock treats FAIL, AUTH and TIMEOUT as canned failures; against the
    // live API they are simply unknown series.
    let catalog = Catalog::builder()
        .extend(&Catalog::us_macro())
        .register(SeriesMeta::statistics("Roto", "FAIL"))
        .register(SeriesMeta::statistics("Sin Clave", "AUTH"))
        .register(SeriesMeta::statistics("Lento", "TIMEOUT"))
        .register(SeriesMeta::statistics("Con Respaldo", "FAIL").fallback_code("UNRATE"))
        .build()?;
    let tasa = Tasa::builder()
        .with_connector(statistics_connector()?)
        .catalog(catalog)
        .provider_timeout(Duration::from_millis(500))
        .build()?;

    let req = TableRequest::new(["Tasa Desempleo", "Roto", "Sin Clave", "Lento", "Con Respaldo"]);
    let report = tasa.build_table(&req).await;

    println!("columns: {:?}", report.table.column_names().collect::<Vec<_>>());
    for w in &report.warnings {
        let hint = if w.cause.is_actionable() { " (check configuration)" } else { "" };
        println!("{} {}: {}{hint}", w.origin, w.code, w.cause);
    }
    Ok(())
}
