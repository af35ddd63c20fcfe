//! Participant document types
//!
//! This module defines the `Participante` document stored in the
//! "participantes" collection, the enumerated payment methods, and the
//! immutable payment-history entries.
//!
//! Field names serialize in the camelCase form used by the document store
//! (`montoPagado`, `historialPagos`, `tasaBCV`, ...), so documents written
//! by earlier revisions of the system load unchanged.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment methods accepted at registration
///
/// `Exento` is never selected directly; the ledger assigns it when a
/// participant is flagged as exempt from the fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum FormaPago {
    /// Mobile transfer, identified by a reference number
    #[serde(rename = "Pago movil")]
    PagoMovil,

    /// Cash, no reference data
    Efectivo,

    /// Zelle transfer, identified by confirmation number or account holder
    Zelle,

    /// Assigned by the ledger to fee-exempt participants
    #[value(skip)]
    Exento,
}

impl std::fmt::Display for FormaPago {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FormaPago::PagoMovil => "Pago móvil",
            FormaPago::Efectivo => "Efectivo",
            FormaPago::Zelle => "Zelle",
            FormaPago::Exento => "Exento",
        };
        write!(f, "{}", label)
    }
}

/// One immutable payment-history entry
///
/// Appended by the ledger whenever a write changes the cumulative amount
/// paid. Entries record the exchange rate as of the moment of payment;
/// `tasa_bcv` is zero when no rate source was reachable at write time.
/// Entries are never mutated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagoRegistrado {
    /// Moment the payment was recorded
    pub fecha: DateTime<Utc>,

    /// Cumulative amount paid as of this entry, in base currency
    pub monto: Decimal,

    /// BCV exchange rate at the moment of payment (0 if unavailable)
    #[serde(rename = "tasaBCV")]
    pub tasa_bcv: Decimal,
}

/// A registered participant
///
/// One document per person. Identity fields are set at registration;
/// payment fields are recomputed by the ledger on every write. The
/// `historial_pagos` sequence is append-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Participante {
    /// Opaque id assigned by the store (empty until created)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    pub nombre: String,
    pub apellido: String,

    /// National id, digits only, unique across all participants
    pub cedula: String,

    pub telefono: String,

    /// Birth date; `edad` is derived from it at write time, not live
    pub fecha_nacimiento: Option<NaiveDate>,

    /// Age in whole years as of the last write
    pub edad: Option<u32>,

    pub miembro: bool,
    pub bautizado: bool,

    /// Exempt from the registration fee
    pub exento: bool,

    /// Legacy/derived flag: the fee is fully satisfied
    ///
    /// Records created before per-amount tracking existed carry this flag
    /// with no recorded amount; the classifier treats that as a distinct
    /// satisfied case.
    pub pago: bool,

    /// Cumulative amount paid, base currency; forced to 0 while `exento`
    pub monto_pagado: Decimal,

    /// Second simultaneous abono captured at registration
    pub monto_pagado2: Decimal,

    /// Amount paid beyond the fee: `max(0, monto_pagado - cuota)`
    pub excedente: Decimal,

    pub forma_pago: Option<FormaPago>,

    /// Reference number, present only while `forma_pago` is `PagoMovil`
    pub referencia: String,

    /// Confirmation/holder info, present only while `forma_pago` is `Zelle`
    pub zelle_info: String,

    pub segunda_forma_pago: Option<FormaPago>,
    pub referencia2: String,
    pub zelle_info2: String,

    /// Email of the staff member who created the record; immutable
    pub registrado_por: String,

    /// Timestamp of the most recent history entry
    pub fecha_pago: Option<DateTime<Utc>>,

    /// Rate recorded by the most recent history entry
    #[serde(rename = "tasaBCVPago")]
    pub tasa_bcv_pago: Decimal,

    /// Append-only payment history, oldest first
    pub historial_pagos: Vec<PagoRegistrado>,
}

impl Participante {
    /// Create a participant with identity fields only
    ///
    /// Payment fields start at their zero values; the ledger fills them in
    /// before the record is persisted.
    pub fn nuevo(
        nombre: &str,
        apellido: &str,
        cedula: &str,
        telefono: &str,
        fecha_nacimiento: Option<NaiveDate>,
        registrado_por: &str,
    ) -> Self {
        Participante {
            nombre: nombre.to_string(),
            apellido: apellido.to_string(),
            cedula: cedula.to_string(),
            telefono: telefono.to_string(),
            fecha_nacimiento,
            registrado_por: registrado_por.to_string(),
            ..Participante::default()
        }
    }

    /// Substring match over nombre, apellido and cedula, case-insensitive
    ///
    /// Mirrors the dashboard search box.
    pub fn coincide_filtro(&self, filtro: &str) -> bool {
        let haystack = format!("{} {} {}", self.nombre, self.apellido, self.cedula).to_lowercase();
        haystack.contains(&filtro.to_lowercase())
    }
}

/// Compute age in whole years at a given date
///
/// The year difference is decremented when the birthday has not yet
/// occurred in `hoy`'s year. Never negative.
pub fn calcular_edad(nacimiento: NaiveDate, hoy: NaiveDate) -> u32 {
    let mut edad = hoy.year() - nacimiento.year();
    if (hoy.month(), hoy.day()) < (nacimiento.month(), nacimiento.day()) {
        edad -= 1;
    }
    edad.max(0) as u32
}
