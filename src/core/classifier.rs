//! Payment-status classification
//!
//! Pure rules mapping a participant's monetary fields to a payment status.
//! The same classification backs the registration screen, the edit screen,
//! and the aggregate report, so it lives here once instead of being
//! re-derived per caller.
//!
//! # Legacy records
//!
//! Records created before per-amount tracking existed carry only the `pago`
//! boolean. The classifier consumes that flag exclusively when no amount is
//! recorded; a record with an amount is always classified by the amount.

use crate::types::{Participante, RegistroError};
use rust_decimal::Decimal;

/// Payment status of a single participant
///
/// Exactly one status applies to every valid input tuple. Pending variants
/// carry the amount still owed; the surplus variant carries the amount paid
/// beyond the fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoPago {
    /// Exempt from the fee; monetary fields are forced to zero
    Exento,

    /// Nothing paid yet; owes the full fee
    PendienteTotal {
        /// Amount still owed (the full fee)
        deuda: Decimal,
    },

    /// Partial abono recorded; owes the remainder
    PendienteParcial {
        /// Amount still owed
        deuda: Decimal,
    },

    /// Fee satisfied exactly (includes legacy paid-without-amount records)
    PagadoExacto,

    /// Paid beyond the fee
    PagadoConExcedente {
        /// Amount paid beyond the fee
        excedente: Decimal,
    },
}

impl EstadoPago {
    /// Whether the fee is fully satisfied
    pub fn es_pagado(&self) -> bool {
        matches!(
            self,
            EstadoPago::PagadoExacto | EstadoPago::PagadoConExcedente { .. }
        )
    }

    /// Whether any amount is still owed
    pub fn es_pendiente(&self) -> bool {
        matches!(
            self,
            EstadoPago::PendienteTotal { .. } | EstadoPago::PendienteParcial { .. }
        )
    }

    /// Dashboard chip label for this status
    pub fn etiqueta(&self) -> &'static str {
        match self {
            EstadoPago::Exento => "Exento",
            EstadoPago::PendienteTotal { .. } | EstadoPago::PendienteParcial { .. } => "Pendiente",
            EstadoPago::PagadoExacto | EstadoPago::PagadoConExcedente { .. } => "Pagado",
        }
    }
}

/// Surplus paid beyond the fee: `max(0, monto_pagado - cuota)`
pub fn excedente(monto_pagado: Decimal, cuota: Decimal) -> Decimal {
    (monto_pagado - cuota).max(Decimal::ZERO)
}

/// Classify a participant's payment state from its raw ledger fields
///
/// Rules, in order of precedence:
///
/// 1. `exento` wins regardless of any monetary field.
/// 2. `pago_legado` with no recorded amount is a satisfied legacy record.
/// 3. Zero paid owes the full fee.
/// 4. Less than the fee is a partial abono.
/// 5. Exactly the fee is paid.
/// 6. More than the fee is paid with surplus.
///
/// # Errors
///
/// Returns [`RegistroError::MontoInvalido`] for a negative `monto_pagado`;
/// negative amounts are an input-validation failure, never clamped.
pub fn clasificar(
    monto_pagado: Decimal,
    exento: bool,
    pago_legado: bool,
    cuota: Decimal,
) -> Result<EstadoPago, RegistroError> {
    if monto_pagado < Decimal::ZERO {
        return Err(RegistroError::monto_invalido(monto_pagado));
    }

    if exento {
        return Ok(EstadoPago::Exento);
    }

    // Legacy paid-without-amount records are satisfied, not pending
    if pago_legado && monto_pagado.is_zero() {
        return Ok(EstadoPago::PagadoExacto);
    }

    if monto_pagado.is_zero() {
        Ok(EstadoPago::PendienteTotal { deuda: cuota })
    } else if monto_pagado < cuota {
        Ok(EstadoPago::PendienteParcial {
            deuda: cuota - monto_pagado,
        })
    } else if monto_pagado == cuota {
        Ok(EstadoPago::PagadoExacto)
    } else {
        Ok(EstadoPago::PagadoConExcedente {
            excedente: monto_pagado - cuota,
        })
    }
}

/// Classify a stored participant document
pub fn clasificar_participante(
    participante: &Participante,
    cuota: Decimal,
) -> Result<EstadoPago, RegistroError> {
    clasificar(
        participante.monto_pagado,
        participante.exento,
        participante.pago,
        cuota,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cuota() -> Decimal {
        Decimal::new(8, 0)
    }

    fn d(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[rstest]
    #[case::pagado_exacto(d(8), false, EstadoPago::PagadoExacto)]
    #[case::abono_parcial(d(5), false, EstadoPago::PendienteParcial { deuda: d(3) })]
    #[case::excedente(d(10), false, EstadoPago::PagadoConExcedente { excedente: d(2) })]
    #[case::sin_pago(d(0), false, EstadoPago::PendienteTotal { deuda: d(8) })]
    #[case::exento_ignora_monto(d(10), true, EstadoPago::Exento)]
    #[case::exento_sin_monto(d(0), true, EstadoPago::Exento)]
    fn test_clasificar(
        #[case] monto: Decimal,
        #[case] exento: bool,
        #[case] esperado: EstadoPago,
    ) {
        let estado = clasificar(monto, exento, false, cuota()).unwrap();
        assert_eq!(estado, esperado);
    }

    #[rstest]
    #[case::legado_sin_monto(d(0), EstadoPago::PagadoExacto)]
    #[case::legado_con_abono(d(5), EstadoPago::PendienteParcial { deuda: d(3) })]
    #[case::legado_con_monto_completo(d(8), EstadoPago::PagadoExacto)]
    fn test_pago_legado_solo_sin_monto(#[case] monto: Decimal, #[case] esperado: EstadoPago) {
        // The legacy flag is consumed only when no amount is recorded
        let estado = clasificar(monto, false, true, cuota()).unwrap();
        assert_eq!(estado, esperado);
    }

    #[test]
    fn test_monto_negativo_es_error() {
        let resultado = clasificar(d(-1), false, false, cuota());
        assert!(matches!(
            resultado,
            Err(RegistroError::MontoInvalido { .. })
        ));

        // Even for exempt participants the input is rejected
        let resultado = clasificar(d(-1), true, false, cuota());
        assert!(matches!(
            resultado,
            Err(RegistroError::MontoInvalido { .. })
        ));
    }

    #[rstest]
    #[case(d(0), d(0))]
    #[case(d(5), d(0))]
    #[case(d(8), d(0))]
    #[case(d(10), d(2))]
    #[case(Decimal::new(85, 1), Decimal::new(5, 1))]
    fn test_excedente(#[case] monto: Decimal, #[case] esperado: Decimal) {
        assert_eq!(excedente(monto, cuota()), esperado);
    }

    #[test]
    fn test_etiquetas() {
        assert_eq!(EstadoPago::Exento.etiqueta(), "Exento");
        assert_eq!(
            EstadoPago::PendienteParcial { deuda: d(3) }.etiqueta(),
            "Pendiente"
        );
        assert_eq!(EstadoPago::PagadoExacto.etiqueta(), "Pagado");
        assert!(EstadoPago::PagadoConExcedente { excedente: d(2) }.es_pagado());
        assert!(EstadoPago::PendienteTotal { deuda: d(8) }.es_pendiente());
        assert!(!EstadoPago::Exento.es_pagado());
        assert!(!EstadoPago::Exento.es_pendiente());
    }
}
