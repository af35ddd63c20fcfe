//! Aggregate financial report
//!
//! Derives fleet-wide statistics from the full participant collection:
//! counts per payment status and monetary totals in base currency, with a
//! parallel set in Bs when an exchange rate is available.
//!
//! The report is recomputed in full on every call - there is no
//! incremental accumulation across calls, so the figures can never drift
//! from the underlying documents.

use crate::types::{Participante, RegistroError};
use rust_decimal::Decimal;

use super::classifier::{clasificar_participante, excedente, EstadoPago};

/// Monetary totals of one report, in a single currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MontosFinancieros {
    /// Collected toward fees: `Σ min(montoPagado, cuota)` over non-exempt
    /// participants, counting legacy paid-without-amount records at the
    /// full fee. Surplus is excluded from this figure.
    pub recaudado: Decimal,

    /// Still owed: `Σ (cuota - montoPagado)` over pending participants
    pub pendiente: Decimal,

    /// Potential revenue: non-exempt participants x cuota
    pub potencial: Decimal,

    /// Paid beyond the fee: `Σ max(0, montoPagado - cuota)`
    pub excedente: Decimal,

    /// Revenue forgone through exemptions: exempt participants x cuota
    pub deficit_exentos: Decimal,
}

impl MontosFinancieros {
    /// The same figures converted at an exchange rate
    pub fn a_tasa(&self, tasa: Decimal) -> MontosFinancieros {
        MontosFinancieros {
            recaudado: self.recaudado * tasa,
            pendiente: self.pendiente * tasa,
            potencial: self.potencial * tasa,
            excedente: self.excedente * tasa,
            deficit_exentos: self.deficit_exentos * tasa,
        }
    }
}

/// Participant counts per payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConteoEstados {
    pub exentos: usize,
    pub pendientes_totales: usize,
    pub abonos_parciales: usize,
    pub pagados_exactos: usize,
    pub pagados_con_excedente: usize,
}

impl ConteoEstados {
    /// Participants whose fee is fully satisfied
    pub fn pagados(&self) -> usize {
        self.pagados_exactos + self.pagados_con_excedente
    }

    /// Participants still owing (full or partial)
    ///
    /// Partial payers count as pending; only the amount-based rule is
    /// applied, everywhere.
    pub fn pendientes(&self) -> usize {
        self.pendientes_totales + self.abonos_parciales
    }
}

/// One full financial report
#[derive(Debug, Clone, PartialEq)]
pub struct ResumenFinanciero {
    pub total_participantes: usize,
    pub conteo: ConteoEstados,

    /// Totals in base currency
    pub usd: MontosFinancieros,

    /// Rate used for the Bs figures, if one was available
    pub tasa: Option<Decimal>,

    /// Totals in Bs; `None` when no rate was available, so callers show
    /// an "unavailable" indicator instead of meaningless zeros
    pub bs: Option<MontosFinancieros>,
}

/// Derive the financial report over the full participant collection
///
/// Pure and read-only; classifies every participant with the same rules
/// the registration and edit screens use.
///
/// # Errors
///
/// Propagates [`RegistroError::MontoInvalido`] if a stored document
/// carries a negative amount.
pub fn resumir(
    participantes: &[Participante],
    cuota: Decimal,
    tasa: Option<Decimal>,
) -> Result<ResumenFinanciero, RegistroError> {
    let mut conteo = ConteoEstados::default();
    let mut usd = MontosFinancieros::default();

    for p in participantes {
        match clasificar_participante(p, cuota)? {
            EstadoPago::Exento => {
                conteo.exentos += 1;
                usd.deficit_exentos += cuota;
                continue;
            }
            EstadoPago::PendienteTotal { deuda } => {
                conteo.pendientes_totales += 1;
                usd.pendiente += deuda;
            }
            EstadoPago::PendienteParcial { deuda } => {
                conteo.abonos_parciales += 1;
                usd.pendiente += deuda;
            }
            EstadoPago::PagadoExacto => conteo.pagados_exactos += 1,
            EstadoPago::PagadoConExcedente { .. } => conteo.pagados_con_excedente += 1,
        }

        usd.potencial += cuota;
        usd.excedente += excedente(p.monto_pagado, cuota);
        usd.recaudado += if p.pago && p.monto_pagado.is_zero() {
            // Legacy paid-without-amount record counts at the full fee
            cuota
        } else {
            p.monto_pagado.min(cuota)
        };
    }

    let bs = tasa.map(|t| usd.a_tasa(t));

    Ok(ResumenFinanciero {
        total_participantes: participantes.len(),
        conteo,
        usd,
        tasa,
        bs,
    })
}
