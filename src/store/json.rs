//! JSON-file participant store
//!
//! Implements [`AlmacenParticipantes`] over a single JSON file holding the
//! whole "participantes" collection as an id-to-document map. Every write
//! rewrites the file in full, which keeps each operation a single atomic
//! document update with no partial state to roll back.
//!
//! This is the CLI's default backend; it stands in for the external
//! document store the original system delegated to.

use crate::types::{Participante, RegistroError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::AlmacenParticipantes;

/// File-backed document store
pub struct AlmacenArchivoJson {
    ruta: PathBuf,
    documentos: Mutex<HashMap<String, Participante>>,
}

impl AlmacenArchivoJson {
    /// Open a store at the given path, creating an empty one if the file
    /// does not exist yet
    ///
    /// # Errors
    ///
    /// Returns [`RegistroError::Store`] when the file exists but cannot
    /// be read or parsed.
    pub async fn abrir(ruta: &Path) -> Result<Self, RegistroError> {
        let documentos = match tokio::fs::read_to_string(ruta).await {
            Ok(contenido) => {
                let mut docs: HashMap<String, Participante> = serde_json::from_str(&contenido)?;
                // The map key is authoritative for the document id
                for (id, doc) in docs.iter_mut() {
                    doc.id = id.clone();
                }
                docs
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(error) => return Err(error.into()),
        };

        Ok(AlmacenArchivoJson {
            ruta: ruta.to_path_buf(),
            documentos: Mutex::new(documentos),
        })
    }

    async fn persistir(
        &self,
        documentos: &HashMap<String, Participante>,
    ) -> Result<(), RegistroError> {
        let contenido = serde_json::to_string_pretty(documentos)?;
        tokio::fs::write(&self.ruta, contenido).await?;
        Ok(())
    }
}

#[async_trait]
impl AlmacenParticipantes for AlmacenArchivoJson {
    async fn todos(&self) -> Result<Vec<Participante>, RegistroError> {
        let documentos = self.documentos.lock().await;
        Ok(documentos.values().cloned().collect())
    }

    async fn por_id(&self, id: &str) -> Result<Option<Participante>, RegistroError> {
        let documentos = self.documentos.lock().await;
        Ok(documentos.get(id).cloned())
    }

    async fn por_cedula(&self, cedula: &str) -> Result<Option<Participante>, RegistroError> {
        let documentos = self.documentos.lock().await;
        Ok(documentos.values().find(|p| p.cedula == cedula).cloned())
    }

    async fn crear(&self, mut participante: Participante) -> Result<Participante, RegistroError> {
        let mut documentos = self.documentos.lock().await;
        participante.id = Uuid::new_v4().to_string();
        documentos.insert(participante.id.clone(), participante.clone());
        self.persistir(&documentos).await?;
        Ok(participante)
    }

    async fn actualizar(&self, participante: &Participante) -> Result<(), RegistroError> {
        let mut documentos = self.documentos.lock().await;
        if !documentos.contains_key(&participante.id) {
            return Err(RegistroError::no_encontrado(&participante.id));
        }
        documentos.insert(participante.id.clone(), participante.clone());
        self.persistir(&documentos).await
    }

    async fn eliminar(&self, id: &str) -> Result<(), RegistroError> {
        let mut documentos = self.documentos.lock().await;
        if documentos.remove(id).is_none() {
            return Err(RegistroError::no_encontrado(id));
        }
        self.persistir(&documentos).await
    }
}
