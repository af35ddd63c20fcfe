//! External exchange-rate sources
//!
//! Each source wraps one HTTP endpoint behind the [`FuenteTasa`] trait so
//! the provider can walk an ordered list of them. Payload extraction is
//! split into pure functions over `serde_json::Value` so both accepted
//! shapes are testable without a network.
//!
//! Every failure mode - network error, non-JSON body, missing or
//! non-positive value - means the same thing to the caller: this source
//! failed, try the next one.

use crate::types::RateError;
use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::OrigenTasa;

/// Default primary endpoint (pydolarve BCV monitor)
pub const URL_PRIMARIA: &str = "https://pydolarve.org/api/v1/dollar?page=bcv&monitor=usd";

/// Default secondary endpoint (dolarapi monitor list)
pub const URL_SECUNDARIA: &str = "https://ve.dolarapi.com/v1/dolares";

/// One external rate source
#[async_trait]
pub trait FuenteTasa: Send + Sync {
    /// Origin tag recorded on quotes produced by this source
    fn origen(&self) -> OrigenTasa;

    /// Short name used in fallback logs
    fn nombre(&self) -> &str;

    /// Fetch the current rate
    ///
    /// # Errors
    ///
    /// Any [`RateError`] means the source failed and the next fallback
    /// step should run. No retries happen within a single call.
    async fn obtener(&self) -> Result<Decimal, RateError>;
}

/// Extract a positive price from a primary-source payload
///
/// Accepts the direct shape `{"price": n}` and the compatibility shape
/// `{"data": {"bcv": {"price": n}}}`. Anything else, including a
/// non-positive or non-numeric price, yields `None`.
pub fn extraer_precio_primaria(payload: &Value) -> Option<Decimal> {
    let precio = payload
        .get("price")
        .and_then(Value::as_f64)
        .or_else(|| payload.pointer("/data/bcv/price").and_then(Value::as_f64))?;

    Decimal::from_f64(precio).filter(|p| *p > Decimal::ZERO)
}

#[derive(Debug, Deserialize)]
struct Monitor {
    fuente: String,
    promedio: f64,
}

/// Extract the official averaged rate from a secondary-source payload
///
/// The secondary endpoint answers an array of monitor objects; only the
/// entry tagged `oficial` is usable, through its `promedio` field.
pub fn extraer_promedio_oficial(payload: &Value) -> Option<Decimal> {
    let monitores: Vec<Monitor> = serde_json::from_value(payload.clone()).ok()?;

    monitores
        .iter()
        .find(|m| m.fuente == "oficial")
        .and_then(|m| Decimal::from_f64(m.promedio))
        .filter(|p| *p > Decimal::ZERO)
}

async fn obtener_payload(client: &reqwest::Client, url: &str) -> Result<Value, RateError> {
    let cuerpo = client.get(url).send().await?.text().await?;
    serde_json::from_str(&cuerpo).map_err(RateError::payload)
}

/// Primary source: pydolarve BCV monitor
pub struct FuentePyDolarVe {
    client: reqwest::Client,
    url: String,
}

impl FuentePyDolarVe {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

impl Default for FuentePyDolarVe {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), URL_PRIMARIA)
    }
}

#[async_trait]
impl FuenteTasa for FuentePyDolarVe {
    fn origen(&self) -> OrigenTasa {
        OrigenTasa::AutomaticaPrimaria
    }

    fn nombre(&self) -> &str {
        "pydolarve"
    }

    async fn obtener(&self) -> Result<Decimal, RateError> {
        let payload = obtener_payload(&self.client, &self.url).await?;
        extraer_precio_primaria(&payload).ok_or(RateError::SinValorUsable)
    }
}

/// Secondary source: dolarapi monitor list
pub struct FuenteDolarApi {
    client: reqwest::Client,
    url: String,
}

impl FuenteDolarApi {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

impl Default for FuenteDolarApi {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), URL_SECUNDARIA)
    }
}

#[async_trait]
impl FuenteTasa for FuenteDolarApi {
    fn origen(&self) -> OrigenTasa {
        OrigenTasa::AutomaticaSecundaria
    }

    fn nombre(&self) -> &str {
        "dolarapi"
    }

    async fn obtener(&self) -> Result<Decimal, RateError> {
        let payload = obtener_payload(&self.client, &self.url).await?;
        extraer_promedio_oficial(&payload).ok_or(RateError::SinValorUsable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::forma_directa(json!({"price": 36.58}), Some(Decimal::new(3658, 2)))]
    #[case::forma_anidada(json!({"data": {"bcv": {"price": 40.25}}}), Some(Decimal::new(4025, 2)))]
    #[case::precio_cero(json!({"price": 0.0}), None)]
    #[case::precio_negativo(json!({"price": -1.5}), None)]
    #[case::precio_texto(json!({"price": "36.58"}), None)]
    #[case::sin_precio(json!({"monitor": "usd"}), None)]
    #[case::anidada_incompleta(json!({"data": {"bcv": {}}}), None)]
    fn test_extraer_precio_primaria(#[case] payload: Value, #[case] esperado: Option<Decimal>) {
        assert_eq!(extraer_precio_primaria(&payload), esperado);
    }

    #[rstest]
    #[case::solo_oficial(
        json!([{"fuente": "oficial", "promedio": 36.5}]),
        Some(Decimal::new(365, 1))
    )]
    #[case::entre_varios(
        json!([
            {"fuente": "paralelo", "promedio": 52.1},
            {"fuente": "oficial", "promedio": 36.5},
        ]),
        Some(Decimal::new(365, 1))
    )]
    #[case::sin_oficial(json!([{"fuente": "paralelo", "promedio": 52.1}]), None)]
    #[case::lista_vacia(json!([]), None)]
    #[case::no_es_lista(json!({"fuente": "oficial", "promedio": 36.5}), None)]
    #[case::promedio_cero(json!([{"fuente": "oficial", "promedio": 0.0}]), None)]
    fn test_extraer_promedio_oficial(#[case] payload: Value, #[case] esperado: Option<Decimal>) {
        assert_eq!(extraer_promedio_oficial(&payload), esperado);
    }
}
