//! In-memory participant store
//!
//! DashMap-backed implementation of [`AlmacenParticipantes`]. Used by the
//! test suite and by ephemeral runs that don't need a data file; documents
//! die with the process.

use crate::types::{Participante, RegistroError};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::AlmacenParticipantes;

/// Concurrent in-memory document store
#[derive(Debug, Default)]
pub struct AlmacenMemoria {
    documentos: DashMap<String, Participante>,
}

impl AlmacenMemoria {
    /// Create an empty store
    pub fn new() -> Self {
        AlmacenMemoria {
            documentos: DashMap::new(),
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documentos.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.documentos.is_empty()
    }
}

#[async_trait]
impl AlmacenParticipantes for AlmacenMemoria {
    async fn todos(&self) -> Result<Vec<Participante>, RegistroError> {
        Ok(self
            .documentos
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn por_id(&self, id: &str) -> Result<Option<Participante>, RegistroError> {
        Ok(self.documentos.get(id).map(|entry| entry.value().clone()))
    }

    async fn por_cedula(&self, cedula: &str) -> Result<Option<Participante>, RegistroError> {
        Ok(self
            .documentos
            .iter()
            .find(|entry| entry.value().cedula == cedula)
            .map(|entry| entry.value().clone()))
    }

    async fn crear(&self, mut participante: Participante) -> Result<Participante, RegistroError> {
        participante.id = Uuid::new_v4().to_string();
        self.documentos
            .insert(participante.id.clone(), participante.clone());
        Ok(participante)
    }

    async fn actualizar(&self, participante: &Participante) -> Result<(), RegistroError> {
        if !self.documentos.contains_key(&participante.id) {
            return Err(RegistroError::no_encontrado(&participante.id));
        }
        self.documentos
            .insert(participante.id.clone(), participante.clone());
        Ok(())
    }

    async fn eliminar(&self, id: &str) -> Result<(), RegistroError> {
        self.documentos
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RegistroError::no_encontrado(id))
    }
}
