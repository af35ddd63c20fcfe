//! Participant record validation
//!
//! Enforces required-field and uniqueness constraints before any write.
//! Every violation is collected and returned together - never fail-fast -
//! so the operator sees the complete list at once. Messages are the
//! operator-facing Spanish strings shown by the registration screens.

use crate::store::AlmacenParticipantes;
use crate::types::{CampoInvalido, Participante, RegistroError};

/// Outcome of validating one record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultadoValidacion {
    /// Every violated field, in schema order; empty when the record is valid
    pub errores: Vec<CampoInvalido>,
}

impl ResultadoValidacion {
    /// Whether the record passed every check
    pub fn es_valido(&self) -> bool {
        self.errores.is_empty()
    }

    /// Convert into a `Result`, turning violations into a single
    /// [`RegistroError::Validacion`]
    pub fn en_resultado(self) -> Result<(), RegistroError> {
        if self.es_valido() {
            Ok(())
        } else {
            Err(RegistroError::validacion(self.errores))
        }
    }
}

fn campo(nombre: &'static str, mensaje: &str) -> CampoInvalido {
    CampoInvalido {
        campo: nombre,
        mensaje: mensaje.to_string(),
    }
}

/// Whether a cedula is digits-only
///
/// The UI strips non-digits as they are typed; this re-checks defensively
/// so no non-numeric value reaches the store by another path.
pub fn cedula_es_numerica(cedula: &str) -> bool {
    !cedula.is_empty() && cedula.chars().all(|c| c.is_ascii_digit())
}

/// Capitalize each word of a name, lowercasing the rest
///
/// `"maría del carmen"` becomes `"María Del Carmen"`, mirroring the
/// normalization the registration form applies as the operator types.
pub fn capitalizar_palabras(texto: &str) -> String {
    texto
        .split_whitespace()
        .map(|palabra| {
            let mut letras = palabra.chars();
            match letras.next() {
                Some(primera) => {
                    primera.to_uppercase().collect::<String>() + &letras.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Field-level checks, no store access
///
/// `requiere_fecha_nacimiento` is true on registration; edits of old
/// records without a birth date remain saveable.
pub fn validar_campos(
    participante: &Participante,
    requiere_fecha_nacimiento: bool,
) -> Vec<CampoInvalido> {
    let mut errores = Vec::new();

    if participante.nombre.trim().is_empty() {
        errores.push(campo("nombre", "El nombre es obligatorio"));
    }
    if participante.apellido.trim().is_empty() {
        errores.push(campo("apellido", "El apellido es obligatorio"));
    }
    if participante.cedula.trim().is_empty() {
        errores.push(campo("cedula", "La cédula es obligatoria"));
    } else if !cedula_es_numerica(&participante.cedula) {
        errores.push(campo("cedula", "Solo números permitidos"));
    }
    if participante.telefono.trim().is_empty() {
        errores.push(campo("telefono", "El teléfono es obligatorio"));
    }
    if requiere_fecha_nacimiento && participante.fecha_nacimiento.is_none() {
        errores.push(campo(
            "fechaNacimiento",
            "La fecha de nacimiento es obligatoria",
        ));
    }

    errores
}

/// Validate a record against field rules and cedula uniqueness
///
/// `id_existente` carries the record's own id on edits so it may keep its
/// cedula (self-match allowed); registrations pass `None`. The uniqueness
/// query only runs for a cedula that passed the field checks.
///
/// # Errors
///
/// Returns [`RegistroError::Store`] if the uniqueness query itself fails;
/// validation violations are reported inside the `Ok` result.
pub async fn validar(
    almacen: &dyn AlmacenParticipantes,
    participante: &Participante,
    id_existente: Option<&str>,
    requiere_fecha_nacimiento: bool,
) -> Result<ResultadoValidacion, RegistroError> {
    let mut errores = validar_campos(participante, requiere_fecha_nacimiento);

    if cedula_es_numerica(&participante.cedula) {
        if let Some(existente) = almacen.por_cedula(&participante.cedula).await? {
            if id_existente != Some(existente.id.as_str()) {
                errores.push(campo("cedula", "Ya existe un participante con esa cédula"));
            }
        }
    }

    Ok(ResultadoValidacion { errores })
}
