use tasa::{Tasa, TableRequest};
use tasa_demos::common::statistics_connector;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,tasa=trace,tasa_fred=trace,tasa_middleware=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let tasa = Tasa::builder().with_connector(statistics_connector()?).build()?;

    let _ = tasa.fetch(&["Tasa Desempleo"], None).await;
    let _ = tasa
        .build_table(&TableRequest::new(["Tasa Desempleo", "CPI Core"]))
        .await;

    Ok(())
}
