//! Exchange-rate acquisition
//!
//! This module covers the base-to-local (Bs) conversion rate:
//! - `sources` - HTTP rate sources behind the [`FuenteTasa`] trait
//! - `provider` - the ordered fallback chain plus session manual override

pub mod provider;
pub mod sources;

pub use provider::ProveedorTasa;
pub use sources::{FuenteDolarApi, FuentePyDolarVe, FuenteTasa, URL_PRIMARIA, URL_SECUNDARIA};

use rust_decimal::Decimal;

/// Where a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrigenTasa {
    /// Primary external source answered
    AutomaticaPrimaria,
    /// Primary failed; secondary external source answered
    AutomaticaSecundaria,
    /// Every automatic source failed; session manual override used
    Manual,
}

impl std::fmt::Display for OrigenTasa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrigenTasa::AutomaticaPrimaria => "automática (primaria)",
            OrigenTasa::AutomaticaSecundaria => "automática (secundaria)",
            OrigenTasa::Manual => "manual",
        };
        write!(f, "{}", label)
    }
}

/// A usable exchange-rate quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cotizacion {
    /// Bs per base-currency unit
    pub valor: Decimal,
    /// Which fallback step produced the value
    pub origen: OrigenTasa,
}
