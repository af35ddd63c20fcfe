//! Local BCV rate proxy
//!
//! Forwards the primary rate source, normalizing both of its possible
//! payload shapes into `{"price": <number>}` so browser clients can fetch
//! the rate without CORS trouble and without knowing the upstream format.
//!
//! # Responses
//!
//! - 200 `{"price": n}` - upstream answered with a usable price
//! - 502 `{"error": ..., "details": ...}` - upstream body was not JSON
//! - 500 `{"error": ..., "response": ...}` - JSON but no usable price
//!
//! # Configuration
//!
//! - `TASA_PROXY_BIND` - bind address (default `0.0.0.0:4000`)
//! - `TASA_PRIMARIA_URL` - upstream endpoint (default pydolarve BCV)

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use congreso_registro::rate::sources::{extraer_precio_primaria, URL_PRIMARIA};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Value};
use std::process;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

#[derive(Clone)]
struct Estado {
    client: reqwest::Client,
    upstream: String,
}

async fn tasa_bcv(State(estado): State<Estado>) -> (StatusCode, Json<Value>) {
    let respuesta = match estado.client.get(&estado.upstream).send().await {
        Ok(respuesta) => respuesta,
        Err(causa) => {
            error!(%causa, "error en el proxy BCV");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Error al obtener la tasa BCV",
                    "details": causa.to_string(),
                })),
            );
        }
    };

    let cuerpo = match respuesta.text().await {
        Ok(cuerpo) => cuerpo,
        Err(causa) => {
            error!(%causa, "error leyendo la respuesta externa");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Error al obtener la tasa BCV",
                    "details": causa.to_string(),
                })),
            );
        }
    };

    let payload: Value = match serde_json::from_str(&cuerpo) {
        Ok(payload) => payload,
        Err(_) => {
            error!(%cuerpo, "respuesta no JSON de la API externa");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "La API externa no responde en formato JSON",
                    "details": cuerpo,
                })),
            );
        }
    };

    match extraer_precio_primaria(&payload) {
        Some(precio) => (
            StatusCode::OK,
            Json(json!({ "price": precio.to_f64().unwrap_or(0.0) })),
        ),
        None => {
            error!(%payload, "no se pudo obtener la tasa");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "No se pudo obtener la tasa",
                    "response": payload,
                })),
            )
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let bind = std::env::var("TASA_PROXY_BIND").unwrap_or_else(|_| "0.0.0.0:4000".to_string());
    let upstream =
        std::env::var("TASA_PRIMARIA_URL").unwrap_or_else(|_| URL_PRIMARIA.to_string());

    let estado = Estado {
        client: reqwest::Client::new(),
        upstream,
    };

    let app = Router::new()
        .route("/api/tasa-bcv", get(tasa_bcv))
        .layer(CorsLayer::permissive())
        .with_state(estado);

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(causa) => {
            eprintln!("Error: no se pudo escuchar en {}: {}", bind, causa);
            process::exit(1);
        }
    };

    info!("Proxy BCV escuchando en http://{}/api/tasa-bcv", bind);

    if let Err(causa) = axum::serve(listener, app).await {
        eprintln!("Error: {}", causa);
        process::exit(1);
    }
}
