//! Core business logic module
//!
//! This module contains the payment-state computation engine:
//! - `classifier` - pure payment-status rules
//! - `ledger` - the registration/edit write path
//! - `report` - fleet-wide financial aggregation
//! - `validator` - required-field and uniqueness checks

pub mod classifier;
pub mod ledger;
pub mod report;
pub mod validator;

pub use classifier::{clasificar, clasificar_participante, excedente, EstadoPago};
pub use ledger::{aplicar_pago, SolicitudPago};
pub use report::{resumir, ConteoEstados, MontosFinancieros, ResumenFinanciero};
pub use validator::{capitalizar_palabras, validar, validar_campos, ResultadoValidacion};
