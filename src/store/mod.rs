//! Participant document store
//!
//! The engine treats persistent storage as an external collaborator with
//! plain document-store operations, abstracted behind the
//! [`AlmacenParticipantes`] trait:
//!
//! - `memory` - DashMap-backed store for tests and ephemeral runs
//! - `json` - single-JSON-file store used by the CLI
//!
//! Deletes are immediate and irreversible; there is no soft-delete or
//! tombstone. Each write replaces one whole document, so a failed write
//! leaves no partial state behind.

pub mod json;
pub mod memory;

pub use json::AlmacenArchivoJson;
pub use memory::AlmacenMemoria;

use crate::types::{Participante, RegistroError};
use async_trait::async_trait;

/// Document-store operations over the "participantes" collection
#[async_trait]
pub trait AlmacenParticipantes: Send + Sync {
    /// All documents, in unspecified order
    async fn todos(&self) -> Result<Vec<Participante>, RegistroError>;

    /// Lookup by opaque id
    async fn por_id(&self, id: &str) -> Result<Option<Participante>, RegistroError>;

    /// Field-equality query by cedula (used for uniqueness checks)
    async fn por_cedula(&self, cedula: &str) -> Result<Option<Participante>, RegistroError>;

    /// Persist a new document, assigning its id
    ///
    /// Returns the stored document with the assigned id filled in.
    async fn crear(&self, participante: Participante) -> Result<Participante, RegistroError>;

    /// Replace the document whose id matches `participante.id`
    ///
    /// # Errors
    ///
    /// [`RegistroError::ParticipanteNoEncontrado`] when no document holds
    /// that id.
    async fn actualizar(&self, participante: &Participante) -> Result<(), RegistroError>;

    /// Remove a document immediately and irreversibly
    ///
    /// # Errors
    ///
    /// [`RegistroError::ParticipanteNoEncontrado`] when no document holds
    /// that id.
    async fn eliminar(&self, id: &str) -> Result<(), RegistroError>;
}
