//! Static registry of named indicator series.
//!
//! A [`Catalog`] is assembled once at start-up through [`CatalogBuilder`] and
//! is immutable afterwards. Registration order is significant: it decides
//! which series keeps the bare display name on a merge collision.

use std::collections::HashSet;

use crate::format::FormatSettings;
use crate::{SeriesCategory, SeriesMeta, SourceKind, TasaError, UnitTransform};

/// Immutable, ordered set of series metadata keyed by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<SeriesMeta>,
}

impl Catalog {
    /// Start an append-only builder.
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Look up a series by display name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SeriesMeta> {
        self.entries.iter().find(|m| m.display_name == name)
    }

    /// True if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SeriesMeta> {
        self.entries.iter()
    }

    /// Display names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|m| m.display_name.as_str())
    }

    /// Display names of one category, in registration order.
    pub fn names_in(&self, category: SeriesCategory) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |m| m.category == category)
            .map(|m| m.display_name.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value formatting for a display name.
    ///
    /// Catalog entries use their percent flag; unknown names (uploads) are
    /// percent when the name contains `%`.
    #[must_use]
    pub fn format_settings(&self, name: &str) -> FormatSettings {
        let percent = self
            .get(name)
            .map_or_else(|| name.contains('%'), |m| m.is_percent);
        FormatSettings::for_percent(percent)
    }

    /// Whether a release table is meaningful for `name`.
    ///
    /// Macro entries and anything not in the catalog (uploads) qualify;
    /// high-frequency market series do not.
    #[must_use]
    pub fn has_release_table(&self, name: &str) -> bool {
        self.get(name)
            .is_none_or(|m| m.category == SeriesCategory::Macro)
    }

    /// Attribution label for a display name, falling back to `custom` for
    /// names outside the catalog.
    #[must_use]
    pub fn source_label_or(&self, name: &str, custom: &str) -> String {
        self.get(name)
            .map_or_else(|| custom.to_string(), SeriesMeta::source_label)
    }

    /// The default US macro dashboard catalog backed by FRED.
    #[must_use]
    pub fn us_macro() -> Self {
        use SeriesCategory::Market;
        use UnitTransform::{Level, PctChangeYoy};

        let fred = |name: &str, code: &str, units: UnitTransform| {
            SeriesMeta::statistics(name, code).percent(true).units(units)
        };
        let entries = vec![
            fred("Tasa Desempleo", "UNRATE", Level),
            fred("Tasa Participación", "CIVPART", Level),
            fred("Nóminas NFP (YoY%)", "PAYEMS", PctChangeYoy),
            fred("Initial Claims", "ICSA", PctChangeYoy),
            fred("PCE Price Index", "PCEPI", PctChangeYoy),
            fred("CPI Core", "CPIAUCSL", PctChangeYoy),
            fred("Liquidez FED", "WALCL", PctChangeYoy),
            fred("M2 Money Supply", "M2SL", PctChangeYoy),
            fred("Producción Ind.", "INDPRO", PctChangeYoy),
            fred("Bono US 10Y", "DGS10", Level).category(Market),
            fred("Bono US 2Y", "DGS2", Level).category(Market),
            fred("Tasa FED", "FEDFUNDS", Level).category(Market),
            fred("Volatilidad VIX", "VIXCLS", Level)
                .percent(false)
                .category(Market),
        ];
        Self { entries }
    }
}

/// Append-only catalog builder. Validation happens in [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    entries: Vec<SeriesMeta>,
}

impl CatalogBuilder {
    /// Append one entry.
    #[must_use]
    pub fn register(mut self, meta: SeriesMeta) -> Self {
        self.entries.push(meta);
        self
    }

    /// Append every entry of an existing catalog, in its order.
    #[must_use]
    pub fn extend(mut self, catalog: &Catalog) -> Self {
        self.entries.extend(catalog.entries.iter().cloned());
        self
    }

    /// Freeze the catalog.
    ///
    /// # Errors
    /// Returns `InvalidArg` on a duplicate or empty display name, an entry
    /// without source codes, or an upload entry (uploads are never catalogued).
    pub fn build(self) -> Result<Catalog, TasaError> {
        let mut seen = HashSet::new();
        for m in &self.entries {
            if m.display_name.trim().is_empty() {
                return Err(TasaError::InvalidArg("empty display name".into()));
            }
            if !seen.insert(m.display_name.as_str()) {
                return Err(TasaError::InvalidArg(format!(
                    "duplicate catalog entry '{}'",
                    m.display_name
                )));
            }
            if m.source_codes.iter().all(|c| c.trim().is_empty()) {
                return Err(TasaError::InvalidArg(format!(
                    "catalog entry '{}' has no source code",
                    m.display_name
                )));
            }
            if m.source_kind == SourceKind::UserUpload {
                return Err(TasaError::InvalidArg(format!(
                    "catalog entry '{}' cannot be an upload",
                    m.display_name
                )));
            }
        }
        Ok(Catalog {
            entries: self.entries,
        })
    }
}
