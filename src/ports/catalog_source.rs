//! Catalog construction boundary.

use crate::domain::triage::{CatalogError, ConditionCatalog};

/// Produces the condition catalog the engine is built from.
///
/// Implementations must preserve source ordering. Malformed source data is
/// this boundary's failure domain; construction fails before the engine is
/// usable, never per turn.
pub trait CatalogSource {
    /// Loads the full catalog.
    fn load(&self) -> Result<ConditionCatalog, CatalogError>;
}
