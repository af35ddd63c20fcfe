//! Exchange-rate provider with ordered fallback
//!
//! The provider owns an ordered list of automatic sources and the
//! session-scoped manual override. Each `obtener_tasa` call walks the full
//! chain exactly once:
//!
//! 1. Each automatic source, in order, until one yields a usable value.
//! 2. The manual override stored earlier in this session, if any.
//! 3. `None` - unavailable; the caller should prompt for a manual rate.
//!
//! Automatic success clears a stale must-prompt flag but never erases a
//! stored manual override: the override keeps serving as the fallback for
//! later automatic failures within the same session.

use crate::types::RateError;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::sources::FuenteTasa;
use super::{Cotizacion, OrigenTasa};

/// Session-scoped rate state
///
/// Created at session start, cleared at session end, mutated only by the
/// explicit manual-entry action and the must-prompt bookkeeping.
#[derive(Debug, Default)]
struct SesionTasa {
    manual: Option<Decimal>,
    requiere_manual: bool,
}

/// Multi-source exchange-rate provider
pub struct ProveedorTasa {
    fuentes: Vec<Box<dyn FuenteTasa>>,
    sesion: Mutex<SesionTasa>,
}

impl ProveedorTasa {
    /// Create a provider over an ordered list of automatic sources
    ///
    /// The first source is the primary; each subsequent source is tried
    /// only after the prior one failed.
    pub fn new(fuentes: Vec<Box<dyn FuenteTasa>>) -> Self {
        ProveedorTasa {
            fuentes,
            sesion: Mutex::new(SesionTasa::default()),
        }
    }

    /// Fetch the current rate through the fallback chain
    ///
    /// Walks every automatic source once, then the session manual
    /// override. Returns `None` when everything failed and no override is
    /// stored; in that case the must-prompt flag is raised so the UI asks
    /// the operator for a manual value.
    pub async fn obtener_tasa(&self) -> Option<Cotizacion> {
        for fuente in &self.fuentes {
            match fuente.obtener().await {
                Ok(valor) => {
                    debug!(fuente = fuente.nombre(), %valor, "tasa obtenida");
                    let mut sesion = self.sesion.lock().await;
                    // A fresh automatic rate makes a prompt unnecessary,
                    // but the stored override stays for later failures.
                    sesion.requiere_manual = false;
                    return Some(Cotizacion {
                        valor,
                        origen: fuente.origen(),
                    });
                }
                Err(error) => {
                    warn!(fuente = fuente.nombre(), %error, "fuente de tasa falló");
                }
            }
        }

        let mut sesion = self.sesion.lock().await;
        if let Some(valor) = sesion.manual {
            debug!(%valor, "usando tasa manual de la sesión");
            return Some(Cotizacion {
                valor,
                origen: OrigenTasa::Manual,
            });
        }

        sesion.requiere_manual = true;
        None
    }

    /// Store a manual override for the remainder of the session
    ///
    /// # Errors
    ///
    /// Returns [`RateError::ManualInvalida`] for a non-positive value.
    pub async fn fijar_manual(&self, valor: Decimal) -> Result<(), RateError> {
        if valor <= Decimal::ZERO {
            return Err(RateError::ManualInvalida { valor });
        }

        let mut sesion = self.sesion.lock().await;
        sesion.manual = Some(valor);
        sesion.requiere_manual = false;
        Ok(())
    }

    /// The manual override stored this session, if any
    pub async fn tasa_manual(&self) -> Option<Decimal> {
        self.sesion.lock().await.manual
    }

    /// Whether the last chain walk exhausted every step
    ///
    /// True after `obtener_tasa` returned `None`; cleared by an automatic
    /// success or a manual entry.
    pub async fn requiere_entrada_manual(&self) -> bool {
        self.sesion.lock().await.requiere_manual
    }

    /// Drop all session state (manual override included)
    ///
    /// The override is bounded to the session; call this on session end.
    pub async fn limpiar_sesion(&self) {
        *self.sesion.lock().await = SesionTasa::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Source that always answers with a fixed value, counting calls
    struct FuenteFija {
        valor: Decimal,
        origen: OrigenTasa,
        llamadas: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FuenteTasa for FuenteFija {
        fn origen(&self) -> OrigenTasa {
            self.origen
        }

        fn nombre(&self) -> &str {
            "fija"
        }

        async fn obtener(&self) -> Result<Decimal, RateError> {
            self.llamadas.fetch_add(1, Ordering::SeqCst);
            Ok(self.valor)
        }
    }

    /// Source that always fails, counting calls
    struct FuenteCaida {
        llamadas: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FuenteTasa for FuenteCaida {
        fn origen(&self) -> OrigenTasa {
            OrigenTasa::AutomaticaPrimaria
        }

        fn nombre(&self) -> &str {
            "caida"
        }

        async fn obtener(&self) -> Result<Decimal, RateError> {
            self.llamadas.fetch_add(1, Ordering::SeqCst);
            Err(RateError::SinValorUsable)
        }
    }

    fn contador() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn fija(valor: Decimal, origen: OrigenTasa, llamadas: &Arc<AtomicUsize>) -> Box<dyn FuenteTasa> {
        Box::new(FuenteFija {
            valor,
            origen,
            llamadas: Arc::clone(llamadas),
        })
    }

    fn caida(llamadas: &Arc<AtomicUsize>) -> Box<dyn FuenteTasa> {
        Box::new(FuenteCaida {
            llamadas: Arc::clone(llamadas),
        })
    }

    #[tokio::test]
    async fn test_primaria_exitosa_no_consulta_secundaria() {
        let llamadas_1 = contador();
        let llamadas_2 = contador();
        let proveedor = ProveedorTasa::new(vec![
            fija(Decimal::new(365, 1), OrigenTasa::AutomaticaPrimaria, &llamadas_1),
            fija(Decimal::new(999, 1), OrigenTasa::AutomaticaSecundaria, &llamadas_2),
        ]);

        let cotizacion = proveedor.obtener_tasa().await.unwrap();
        assert_eq!(cotizacion.valor, Decimal::new(365, 1));
        assert_eq!(cotizacion.origen, OrigenTasa::AutomaticaPrimaria);
        assert_eq!(llamadas_1.load(Ordering::SeqCst), 1);
        assert_eq!(llamadas_2.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cae_a_secundaria_cuando_primaria_falla() {
        let llamadas_1 = contador();
        let llamadas_2 = contador();
        let proveedor = ProveedorTasa::new(vec![
            caida(&llamadas_1),
            fija(Decimal::new(365, 1), OrigenTasa::AutomaticaSecundaria, &llamadas_2),
        ]);

        let cotizacion = proveedor.obtener_tasa().await.unwrap();
        assert_eq!(cotizacion.valor, Decimal::new(365, 1));
        assert_eq!(cotizacion.origen, OrigenTasa::AutomaticaSecundaria);
        assert_eq!(llamadas_1.load(Ordering::SeqCst), 1);
        assert_eq!(llamadas_2.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_todo_falla_sin_manual_queda_no_disponible() {
        let proveedor = ProveedorTasa::new(vec![caida(&contador()), caida(&contador())]);

        assert!(proveedor.obtener_tasa().await.is_none());
        assert!(proveedor.requiere_entrada_manual().await);

        // Staff enters a manual rate; subsequent calls use it
        proveedor.fijar_manual(Decimal::new(40, 0)).await.unwrap();
        assert!(!proveedor.requiere_entrada_manual().await);

        let cotizacion = proveedor.obtener_tasa().await.unwrap();
        assert_eq!(cotizacion.valor, Decimal::new(40, 0));
        assert_eq!(cotizacion.origen, OrigenTasa::Manual);
    }

    #[tokio::test]
    async fn test_exito_automatico_conserva_manual() {
        let llamadas = contador();
        let proveedor = ProveedorTasa::new(vec![fija(
            Decimal::new(37, 0),
            OrigenTasa::AutomaticaPrimaria,
            &llamadas,
        )]);

        proveedor.fijar_manual(Decimal::new(40, 0)).await.unwrap();

        // Automatic source wins while it works...
        let cotizacion = proveedor.obtener_tasa().await.unwrap();
        assert_eq!(cotizacion.origen, OrigenTasa::AutomaticaPrimaria);

        // ...but the override survives for later failures
        assert_eq!(proveedor.tasa_manual().await, Some(Decimal::new(40, 0)));
    }

    #[tokio::test]
    async fn test_manual_no_positiva_rechazada() {
        let proveedor = ProveedorTasa::new(vec![]);

        let resultado = proveedor.fijar_manual(Decimal::ZERO).await;
        assert!(matches!(resultado, Err(RateError::ManualInvalida { .. })));

        let resultado = proveedor.fijar_manual(Decimal::new(-5, 0)).await;
        assert!(matches!(resultado, Err(RateError::ManualInvalida { .. })));
    }

    #[tokio::test]
    async fn test_limpiar_sesion_descarta_manual() {
        let proveedor = ProveedorTasa::new(vec![]);
        proveedor.fijar_manual(Decimal::new(40, 0)).await.unwrap();

        proveedor.limpiar_sesion().await;
        assert_eq!(proveedor.tasa_manual().await, None);
        assert!(proveedor.obtener_tasa().await.is_none());
    }
}
