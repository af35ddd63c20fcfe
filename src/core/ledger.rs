//! Payment ledger write path
//!
//! [`aplicar_pago`] computes the full set of payment fields to persist for
//! a registration or edit. It enforces the write invariants:
//!
//! - The submitted amount is the absolute cumulative total, not a delta
//!   (registration submits first + optional second simultaneous abono).
//! - Exención zeroes every monetary field and clears method data,
//!   regardless of what the form submitted.
//! - Reference fields survive only while their method is the active
//!   selection.
//! - A history entry is appended if and only if the cumulative amount
//!   changed to a positive value; the entry captures the exchange rate as
//!   of the moment of payment, recorded as 0 when no source was reachable.
//!   A failed rate fetch never blocks the write.
//!
//! The function returns the updated document; performing the store write
//! is the caller's job.

use crate::rate::ProveedorTasa;
use crate::types::{calcular_edad, FormaPago, PagoRegistrado, Participante, RegistroError};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::classifier::excedente;

/// Payment data submitted by a registration or edit form
///
/// `monto` is the cumulative total (edit) or the first abono
/// (registration); `monto2` is only present for a second simultaneous
/// abono at registration.
#[derive(Debug, Clone, Default)]
pub struct SolicitudPago {
    pub monto: Decimal,
    pub monto2: Option<Decimal>,
    pub forma_pago: Option<FormaPago>,
    pub referencia: String,
    pub zelle_info: String,
    pub segunda_forma_pago: Option<FormaPago>,
    pub referencia2: String,
    pub zelle_info2: String,
    /// Exempt from the fee; overrides every other payment field
    pub exento: bool,
}

impl SolicitudPago {
    /// Submission for a fee-exempt participant
    pub fn exenta() -> Self {
        SolicitudPago {
            exento: true,
            ..SolicitudPago::default()
        }
    }

    /// The absolute cumulative amount this submission represents
    pub fn monto_total(&self) -> Decimal {
        self.monto + self.monto2.unwrap_or(Decimal::ZERO)
    }
}

/// Apply a payment submission to a participant document
///
/// Recomputes every payment-derived field (`montoPagado`, `excedente`,
/// `pago`, method/reference fields, `edad`) and appends a history entry
/// when the cumulative amount changed. See the module docs for the exact
/// invariants.
///
/// # Arguments
///
/// * `existente` - the stored document (or a fresh one on registration),
///   with any identity edits already applied
/// * `solicitud` - the submitted payment data
/// * `cuota` - the fixed per-participant fee
/// * `tasas` - rate provider consulted once if a history entry is due
///
/// # Errors
///
/// Returns [`RegistroError::MontoInvalido`] when a submitted amount is
/// negative. Rate-fetch failures are not errors: the write proceeds with
/// the rate recorded as 0.
pub async fn aplicar_pago(
    existente: &Participante,
    solicitud: &SolicitudPago,
    cuota: Decimal,
    tasas: &ProveedorTasa,
) -> Result<Participante, RegistroError> {
    if solicitud.monto < Decimal::ZERO {
        return Err(RegistroError::monto_invalido(solicitud.monto));
    }
    if let Some(monto2) = solicitud.monto2 {
        if monto2 < Decimal::ZERO {
            return Err(RegistroError::monto_invalido(monto2));
        }
    }

    let mut actualizado = existente.clone();

    // Age is derived at write time, never live
    if let Some(nacimiento) = actualizado.fecha_nacimiento {
        actualizado.edad = Some(calcular_edad(nacimiento, Utc::now().date_naive()));
    }

    let monto_total = if solicitud.exento {
        Decimal::ZERO
    } else {
        solicitud.monto_total()
    };

    if solicitud.exento {
        actualizado.exento = true;
        actualizado.pago = false;
        actualizado.monto_pagado = Decimal::ZERO;
        actualizado.monto_pagado2 = Decimal::ZERO;
        actualizado.excedente = Decimal::ZERO;
        actualizado.forma_pago = Some(FormaPago::Exento);
        actualizado.referencia = String::new();
        actualizado.zelle_info = String::new();
        actualizado.segunda_forma_pago = None;
        actualizado.referencia2 = String::new();
        actualizado.zelle_info2 = String::new();
    } else {
        actualizado.exento = false;
        actualizado.monto_pagado = monto_total;
        if let Some(monto2) = solicitud.monto2 {
            actualizado.monto_pagado2 = monto2;
        }
        actualizado.excedente = excedente(monto_total, cuota);
        actualizado.pago = monto_total >= cuota;

        // Method data survives only while its method is selected and the
        // matching amount is nonzero
        let con_monto = solicitud.monto > Decimal::ZERO;
        actualizado.forma_pago = solicitud.forma_pago.filter(|_| con_monto);
        actualizado.referencia = match actualizado.forma_pago {
            Some(FormaPago::PagoMovil) => solicitud.referencia.clone(),
            _ => String::new(),
        };
        actualizado.zelle_info = match actualizado.forma_pago {
            Some(FormaPago::Zelle) => solicitud.zelle_info.clone(),
            _ => String::new(),
        };

        let con_monto2 = solicitud.monto2.map_or(true, |m| m > Decimal::ZERO);
        actualizado.segunda_forma_pago = solicitud.segunda_forma_pago;
        actualizado.referencia2 = match actualizado.segunda_forma_pago {
            Some(FormaPago::PagoMovil) if con_monto2 => solicitud.referencia2.clone(),
            _ => String::new(),
        };
        actualizado.zelle_info2 = match actualizado.segunda_forma_pago {
            Some(FormaPago::Zelle) if con_monto2 => solicitud.zelle_info2.clone(),
            _ => String::new(),
        };
    }

    // History append: only when the cumulative amount changed to a
    // positive value. The rate is fetched through the full chain; an
    // unavailable rate is recorded as 0 and never blocks the write.
    let monto_anterior = existente.monto_pagado;
    if monto_total != monto_anterior && monto_total > Decimal::ZERO {
        let tasa = match tasas.obtener_tasa().await {
            Some(cotizacion) => cotizacion.valor,
            None => Decimal::ZERO,
        };

        let entrada = PagoRegistrado {
            fecha: Utc::now(),
            monto: monto_total,
            tasa_bcv: tasa,
        };
        actualizado.fecha_pago = Some(entrada.fecha);
        actualizado.tasa_bcv_pago = tasa;
        actualizado.historial_pagos.push(entrada);

        info!(
            cedula = %actualizado.cedula,
            monto = %monto_total,
            tasa = %tasa,
            "pago registrado en historial"
        );
    } else {
        debug!(
            cedula = %actualizado.cedula,
            monto = %monto_total,
            "monto sin cambios, historial intacto"
        );
    }

    Ok(actualizado)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::sources::FuenteTasa;
    use crate::rate::OrigenTasa;
    use crate::types::RateError;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct TasaFija(Decimal);

    #[async_trait]
    impl FuenteTasa for TasaFija {
        fn origen(&self) -> OrigenTasa {
            OrigenTasa::AutomaticaPrimaria
        }

        fn nombre(&self) -> &str {
            "fija"
        }

        async fn obtener(&self) -> Result<Decimal, RateError> {
            Ok(self.0)
        }
    }

    fn proveedor_con_tasa(valor: Decimal) -> ProveedorTasa {
        ProveedorTasa::new(vec![Box::new(TasaFija(valor))])
    }

    /// Provider with no sources and no override: always unavailable
    fn proveedor_caido() -> ProveedorTasa {
        ProveedorTasa::new(vec![])
    }

    fn cuota() -> Decimal {
        Decimal::new(8, 0)
    }

    fn d(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn participante_base() -> Participante {
        Participante::nuevo(
            "Ana",
            "Mora",
            "11222333",
            "0414-5550000",
            NaiveDate::from_ymd_opt(1990, 5, 1),
            "staff@test.com",
        )
    }

    #[tokio::test]
    async fn test_registro_inicial_con_dos_abonos() {
        let solicitud = SolicitudPago {
            monto: d(5),
            monto2: Some(d(3)),
            forma_pago: Some(FormaPago::PagoMovil),
            referencia: "000123".to_string(),
            segunda_forma_pago: Some(FormaPago::Efectivo),
            ..SolicitudPago::default()
        };
        let tasas = proveedor_con_tasa(Decimal::new(365, 1));

        let p = aplicar_pago(&participante_base(), &solicitud, cuota(), &tasas)
            .await
            .unwrap();

        assert_eq!(p.monto_pagado, d(8));
        assert_eq!(p.monto_pagado2, d(3));
        assert!(p.pago);
        assert_eq!(p.excedente, Decimal::ZERO);
        assert_eq!(p.forma_pago, Some(FormaPago::PagoMovil));
        assert_eq!(p.referencia, "000123");
        assert_eq!(p.historial_pagos.len(), 1);
        assert_eq!(p.historial_pagos[0].monto, d(8));
        assert_eq!(p.historial_pagos[0].tasa_bcv, Decimal::new(365, 1));
        assert_eq!(p.tasa_bcv_pago, Decimal::new(365, 1));
        assert!(p.fecha_pago.is_some());
        assert_eq!(p.edad, Some(calcular_edad(
            NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            Utc::now().date_naive(),
        )));
    }

    #[tokio::test]
    async fn test_mismo_monto_no_agrega_historial() {
        let tasas = proveedor_con_tasa(d(36));
        let solicitud = SolicitudPago {
            monto: d(5),
            forma_pago: Some(FormaPago::Efectivo),
            ..SolicitudPago::default()
        };

        let primera = aplicar_pago(&participante_base(), &solicitud, cuota(), &tasas)
            .await
            .unwrap();
        assert_eq!(primera.historial_pagos.len(), 1);

        // Re-submitting the identical cumulative amount is a no-op for
        // the history
        let segunda = aplicar_pago(&primera, &solicitud, cuota(), &tasas)
            .await
            .unwrap();
        assert_eq!(segunda.historial_pagos.len(), 1);
    }

    #[tokio::test]
    async fn test_historial_crece_con_cada_cambio() {
        let tasas = proveedor_con_tasa(d(36));
        let mut p = participante_base();

        for (i, monto) in [d(3), d(5), d(8)].into_iter().enumerate() {
            let solicitud = SolicitudPago {
                monto,
                forma_pago: Some(FormaPago::Efectivo),
                ..SolicitudPago::default()
            };
            p = aplicar_pago(&p, &solicitud, cuota(), &tasas).await.unwrap();
            assert_eq!(p.historial_pagos.len(), i + 1);
            assert_eq!(p.historial_pagos[i].monto, monto);
        }

        assert!(p.pago);
        assert_eq!(p.monto_pagado, d(8));
    }

    #[tokio::test]
    async fn test_exencion_fuerza_campos_a_cero() {
        let tasas = proveedor_con_tasa(d(36));

        // Build up a paid participant first
        let pagado = aplicar_pago(
            &participante_base(),
            &SolicitudPago {
                monto: d(10),
                forma_pago: Some(FormaPago::Zelle),
                zelle_info: "titular".to_string(),
                ..SolicitudPago::default()
            },
            cuota(),
            &tasas,
        )
        .await
        .unwrap();
        assert_eq!(pagado.excedente, d(2));

        // Exención ignores whatever amounts the form carries
        let solicitud = SolicitudPago {
            monto: d(10),
            ..SolicitudPago::exenta()
        };
        let exento = aplicar_pago(&pagado, &solicitud, cuota(), &tasas)
            .await
            .unwrap();

        assert!(exento.exento);
        assert!(!exento.pago);
        assert_eq!(exento.monto_pagado, Decimal::ZERO);
        assert_eq!(exento.excedente, Decimal::ZERO);
        assert_eq!(exento.forma_pago, Some(FormaPago::Exento));
        assert_eq!(exento.zelle_info, "");
        assert_eq!(exento.segunda_forma_pago, None);
        // The cumulative amount went to 0: no new entry, old ones intact
        assert_eq!(exento.historial_pagos.len(), pagado.historial_pagos.len());
    }

    #[tokio::test]
    async fn test_tasa_caida_no_bloquea_el_pago() {
        let tasas = proveedor_caido();
        let solicitud = SolicitudPago {
            monto: d(8),
            forma_pago: Some(FormaPago::Efectivo),
            ..SolicitudPago::default()
        };

        let p = aplicar_pago(&participante_base(), &solicitud, cuota(), &tasas)
            .await
            .unwrap();

        assert!(p.pago);
        assert_eq!(p.historial_pagos.len(), 1);
        assert_eq!(p.historial_pagos[0].tasa_bcv, Decimal::ZERO);
        assert_eq!(p.tasa_bcv_pago, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_referencias_filtradas_por_metodo() {
        let tasas = proveedor_con_tasa(d(36));
        let solicitud = SolicitudPago {
            monto: d(4),
            forma_pago: Some(FormaPago::Zelle),
            // Stale data from a previous method selection
            referencia: "000123".to_string(),
            zelle_info: "titular".to_string(),
            ..SolicitudPago::default()
        };

        let p = aplicar_pago(&participante_base(), &solicitud, cuota(), &tasas)
            .await
            .unwrap();

        assert_eq!(p.forma_pago, Some(FormaPago::Zelle));
        assert_eq!(p.referencia, "");
        assert_eq!(p.zelle_info, "titular");
    }

    #[tokio::test]
    async fn test_monto_cero_limpia_forma_de_pago() {
        let tasas = proveedor_con_tasa(d(36));
        let solicitud = SolicitudPago {
            monto: Decimal::ZERO,
            forma_pago: Some(FormaPago::Efectivo),
            ..SolicitudPago::default()
        };

        let p = aplicar_pago(&participante_base(), &solicitud, cuota(), &tasas)
            .await
            .unwrap();

        assert_eq!(p.forma_pago, None);
        assert!(!p.pago);
        assert!(p.historial_pagos.is_empty());
    }

    #[tokio::test]
    async fn test_monto_negativo_rechazado() {
        let tasas = proveedor_caido();
        let solicitud = SolicitudPago {
            monto: d(-1),
            ..SolicitudPago::default()
        };

        let resultado = aplicar_pago(&participante_base(), &solicitud, cuota(), &tasas).await;
        assert!(matches!(
            resultado,
            Err(RegistroError::MontoInvalido { .. })
        ));

        let solicitud = SolicitudPago {
            monto: d(5),
            monto2: Some(d(-2)),
            ..SolicitudPago::default()
        };
        let resultado = aplicar_pago(&participante_base(), &solicitud, cuota(), &tasas).await;
        assert!(matches!(
            resultado,
            Err(RegistroError::MontoInvalido { .. })
        ));
    }

    #[tokio::test]
    async fn test_edicion_reduce_monto_tambien_registra() {
        let tasas = proveedor_con_tasa(d(36));
        let pagado = aplicar_pago(
            &participante_base(),
            &SolicitudPago {
                monto: d(8),
                forma_pago: Some(FormaPago::Efectivo),
                ..SolicitudPago::default()
            },
            cuota(),
            &tasas,
        )
        .await
        .unwrap();

        // A correction down to 5 still changed the cumulative amount
        let corregido = aplicar_pago(
            &pagado,
            &SolicitudPago {
                monto: d(5),
                forma_pago: Some(FormaPago::Efectivo),
                ..SolicitudPago::default()
            },
            cuota(),
            &tasas,
        )
        .await
        .unwrap();

        assert_eq!(corregido.historial_pagos.len(), 2);
        assert!(!corregido.pago);
        assert_eq!(corregido.monto_pagado, d(5));
    }
}
