use std::sync::Arc;

use tasa::{Catalog, SeriesMeta, TasaConnector, TasaError, UnitTransform};

const USE_MOCK: &str = "TASA_DEMOS_USE_MOCK";

fn use_mock() -> bool {
    std::env::var(USE_MOCK).is_ok()
}

/// Install a fmt subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}

/// Statistics-API connector for demos: the mock when `TASA_DEMOS_USE_MOCK`
/// is set, otherwise FRED keyed from `FRED_API_KEY`.
///
/// # Errors
/// Returns `Auth` when the key is missing.
pub fn statistics_connector() -> Result<Arc<dyn TasaConnector>, TasaError> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        return Ok(Arc::new(tasa_mock::MockConnector::new()));
    }
    tasa_fred::FredConnector::from_env()?.build()
}

/// Central-bank connector for demos: the mock when `TASA_DEMOS_USE_MOCK` is
/// set, otherwise BCCh with `BCCH_USER` / `BCCH_PASS`.
///
/// # Errors
/// Returns `Auth` when the credentials are missing.
pub fn central_bank_connector() -> Result<Arc<dyn TasaConnector>, TasaError> {
    if use_mock() {
        return Ok(Arc::new(tasa_mock::MockConnector::central_bank()));
    }
    tasa_bcch::BcchConnector::from_env()?.build()
}

/// The default US catalog plus a few Chilean central-bank series.
///
/// # Errors
/// Never in practice; names are unique.
pub fn chile_catalog() -> Result<Catalog, TasaError> {
    Catalog::builder()
        .extend(&Catalog::us_macro())
        .register(SeriesMeta::central_bank("Dólar Observado", "F073.TCO.PRE.Z.D"))
        .register(SeriesMeta::central_bank("TPM", "F022.TPM.TIN.D001.NO.Z.D").percent(true))
        .register(
            SeriesMeta::central_bank("IMACEC (a/a)", "F032.IMC.IND.Z.Z.EP18.Z.Z.0.M")
                .units(UnitTransform::PctChangeYoy)
                .percent(true),
        )
        .build()
}
