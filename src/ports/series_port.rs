//! Series resolution port trait.

use crate::domain::error::EconcalcError;
use crate::domain::series::Series;

/// Turns a series name into canonical series data.
///
/// `Ok(None)` means the name is unknown; the engine then reports a `ReferenceError`.
pub trait SeriesResolver {
    fn resolve(&self, name: &str) -> Result<Option<Series>, EconcalcError>;

    /// Names this resolver can serve, sorted.
    fn list_series(&self) -> Result<Vec<String>, EconcalcError>;
}
