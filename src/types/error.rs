//! Error types for the registration engine
//!
//! Two error enums cover the two failure domains:
//!
//! - [`RegistroError`] - validation, ledger, and store failures. These are
//!   surfaced to the operator and abort only the operation that raised them.
//! - [`RateError`] - exchange-rate source failures. These are recovered
//!   locally by the provider's fallback chain and never block a write.

use rust_decimal::Decimal;
use thiserror::Error;

/// A single violated field, reported together with its siblings
///
/// The validator collects every violation before returning so the operator
/// sees all of them at once instead of fixing fields one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampoInvalido {
    /// Schema name of the offending field (`nombre`, `cedula`, ...)
    pub campo: &'static str,
    /// Operator-facing message
    pub mensaje: String,
}

impl std::fmt::Display for CampoInvalido {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.campo, self.mensaje)
    }
}

/// Main error type for registration, edit, and report operations
#[derive(Debug, Error)]
pub enum RegistroError {
    /// One or more fields failed validation; the write was not attempted
    #[error("Datos inválidos: {}", format_campos(errores))]
    Validacion {
        /// Every violated field, in schema order
        errores: Vec<CampoInvalido>,
    },

    /// A negative amount was submitted
    ///
    /// Negative amounts are rejected as input errors, never silently
    /// clamped to zero.
    #[error("Monto inválido: {monto} (debe ser mayor o igual a 0)")]
    MontoInvalido {
        /// The offending amount
        monto: Decimal,
    },

    /// No participant exists under the given id
    #[error("Participante no encontrado: {id}")]
    ParticipanteNoEncontrado {
        /// The id that was looked up
        id: String,
    },

    /// The document store could not be read or written
    ///
    /// Not retried; the operation is aborted with no partial state
    /// committed (each write is a single atomic document update).
    #[error("Error de almacenamiento: {message}")]
    Store {
        /// Description of the underlying failure
        message: String,
    },

    /// A manual rate entry was rejected
    #[error("Tasa inválida: {message}")]
    Tasa {
        /// Description of the rejection
        message: String,
    },
}

fn format_campos(errores: &[CampoInvalido]) -> String {
    errores
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl RegistroError {
    /// Create a Validacion error from collected field violations
    pub fn validacion(errores: Vec<CampoInvalido>) -> Self {
        RegistroError::Validacion { errores }
    }

    /// Create a MontoInvalido error
    pub fn monto_invalido(monto: Decimal) -> Self {
        RegistroError::MontoInvalido { monto }
    }

    /// Create a ParticipanteNoEncontrado error
    pub fn no_encontrado(id: &str) -> Self {
        RegistroError::ParticipanteNoEncontrado { id: id.to_string() }
    }

    /// Create a Store error from any displayable cause
    pub fn store<E: std::fmt::Display>(cause: E) -> Self {
        RegistroError::Store {
            message: cause.to_string(),
        }
    }

    /// Create a Tasa error from any displayable cause
    pub fn tasa<E: std::fmt::Display>(cause: E) -> Self {
        RegistroError::Tasa {
            message: cause.to_string(),
        }
    }
}

impl From<std::io::Error> for RegistroError {
    fn from(error: std::io::Error) -> Self {
        RegistroError::store(error)
    }
}

impl From<serde_json::Error> for RegistroError {
    fn from(error: serde_json::Error) -> Self {
        RegistroError::store(error)
    }
}

/// Errors raised by a single exchange-rate source
///
/// The provider treats every variant identically: the source failed, move
/// on to the next fallback step. No retries within a step.
#[derive(Debug, Error)]
pub enum RateError {
    /// Network-level failure (connect error, timeout, non-success status)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not parseable JSON
    #[error("Invalid payload: {message}")]
    PayloadInvalido {
        /// Description of the parse failure
        message: String,
    },

    /// The payload parsed but exposed no positive numeric rate
    #[error("No usable rate in payload")]
    SinValorUsable,

    /// A manual override must be a positive value
    #[error("Tasa manual inválida: {valor}")]
    ManualInvalida {
        /// The rejected value
        valor: Decimal,
    },
}

impl RateError {
    /// Create a PayloadInvalido error from any displayable cause
    pub fn payload<E: std::fmt::Display>(cause: E) -> Self {
        RateError::PayloadInvalido {
            message: cause.to_string(),
        }
    }
}
