//! Registration CLI
//!
//! Command-line interface for managing event registrations and payments.
//!
//! # Usage
//!
//! ```bash
//! congreso registrar --nombre Ana --apellido Mora --cedula 12345678 \
//!     --telefono 0414-5550000 --fecha-nacimiento 1990-05-01 \
//!     --monto 5 --forma-pago efectivo --registrado-por staff@example.com
//! congreso editar <id> --monto 8
//! congreso listar --filtro mora
//! congreso reporte
//! congreso tasa
//! ```
//!
//! Participants live in a JSON data file (`--data`, default
//! `participantes.json`). The financial report converts amounts to Bs at
//! the BCV rate, fetched with automatic fallback across two sources plus
//! a session manual override.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (validation failure, unknown participant, store failure)

use congreso_registro::cli;
use std::process;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(error) = cli::ejecutar(args).await {
        eprintln!("Error: {}", error);
        process::exit(1);
    }
}
