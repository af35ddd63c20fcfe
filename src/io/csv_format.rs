//! CSV export of the participant table
//!
//! Serializes the dashboard's participant listing to CSV for offline use.
//! Pure over its inputs (no file I/O) for easy testing.

use crate::core::classifier::clasificar_participante;
use crate::types::{Participante, RegistroError};
use rust_decimal::Decimal;
use std::io::Write;

/// Write the participant table as CSV
///
/// Columns: nombre, apellido, cedula, telefono, edad, estado, formaPago,
/// montoPagado, excedente, registradoPor. Rows are sorted by apellido then
/// nombre for deterministic output.
///
/// # Errors
///
/// Returns [`RegistroError`] on a write failure or when a stored document
/// carries a negative amount.
pub fn escribir_participantes_csv(
    participantes: &[Participante],
    cuota: Decimal,
    output: &mut dyn Write,
) -> Result<(), RegistroError> {
    let mut ordenados: Vec<&Participante> = participantes.iter().collect();
    ordenados.sort_by(|a, b| (&a.apellido, &a.nombre).cmp(&(&b.apellido, &b.nombre)));

    let mut writer = csv::Writer::from_writer(output);
    writer
        .write_record([
            "nombre",
            "apellido",
            "cedula",
            "telefono",
            "edad",
            "estado",
            "formaPago",
            "montoPagado",
            "excedente",
            "registradoPor",
        ])
        .map_err(RegistroError::store)?;

    for p in ordenados {
        let estado = clasificar_participante(p, cuota)?;
        let forma = match (p.forma_pago, p.segunda_forma_pago) {
            (Some(primera), Some(segunda)) => format!("{} / {}", primera, segunda),
            (Some(primera), None) => primera.to_string(),
            _ => "-".to_string(),
        };
        let edad = p.edad.map(|e| e.to_string()).unwrap_or_else(|| "-".to_string());

        writer
            .write_record([
                p.nombre.clone(),
                p.apellido.clone(),
                p.cedula.clone(),
                p.telefono.clone(),
                edad,
                estado.etiqueta().to_string(),
                forma,
                p.monto_pagado.to_string(),
                p.excedente.to_string(),
                p.registrado_por.clone(),
            ])
            .map_err(RegistroError::store)?;
    }

    writer.flush()?;
    Ok(())
}
