//! Event-Registration Payment Engine
//! # Overview
//!
//! This library manages registrations for a paid event: participants pay a
//! fixed fee (optionally in partial abonos), staff track payment status,
//! and administrators view aggregate financial reports converted between
//! the base currency and the fluctuating BCV exchange rate.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Participante, FormaPago, errors)
//! - [`core`] - Business logic components:
//!   - [`core::classifier`] - pure payment-status rules
//!   - [`core::ledger`] - the registration/edit write path
//!   - [`core::report`] - fleet-wide financial aggregation
//!   - [`core::validator`] - required-field and uniqueness checks
//! - [`rate`] - exchange-rate acquisition with ordered fallback and a
//!   session-scoped manual override
//! - [`store`] - document-store trait with memory and JSON-file backends
//! - [`io`] - CSV export of the participant table
//! - [`cli`] - CLI argument parsing and command dispatch
//!
//! # Payment States
//!
//! Every participant is in exactly one state, derived from the ledger
//! fields by [`core::clasificar`]:
//!
//! - **Exento**: exempt from the fee; monetary fields forced to zero
//! - **PendienteTotal**: nothing paid, owes the full fee
//! - **PendienteParcial**: partial abono recorded, owes the remainder
//! - **PagadoExacto**: fee satisfied exactly (includes legacy records
//!   that predate per-amount tracking)
//! - **PagadoConExcedente**: paid beyond the fee; the surplus is tracked
//!   separately and excluded from collected totals
//!
//! # Exchange Rate
//!
//! [`rate::ProveedorTasa`] walks a strict fallback chain on every call:
//! primary source, secondary source, session manual override, then
//! unavailable. Payment writes record the rate as of the moment of
//! payment and are never blocked by a rate failure.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod rate;
pub mod store;
pub mod types;

pub use core::{aplicar_pago, clasificar, resumir, validar, EstadoPago, SolicitudPago};
pub use io::escribir_participantes_csv;
pub use rate::{Cotizacion, OrigenTasa, ProveedorTasa};
pub use store::{AlmacenArchivoJson, AlmacenMemoria, AlmacenParticipantes};
pub use types::{FormaPago, PagoRegistrado, Participante, RateError, RegistroError};
