//! # Módulo Inference — Interface das Regras de Inferência
//!
//! O kernel não fixa uma estratégia de inferência: a cada ciclo a
//! [`Memory`](crate::memory::Memory) sorteia um Concept e uma de suas tasks e
//! entrega o par a um [`InferenceRules`]. As tasks devolvidas entram no
//! buffer de novas tasks como qualquer entrada.
//!
//! ## Implementações
//!
//! | Tipo | Comportamento |
//! |------|---------------|
//! | [`NoRules`] | Não deriva nada, só exercita seleção e esquecimento |
//! | [`StructuralChaining`] | Dedução e indução sobre statements de mesma cópula |
//!
//! A aritmética de verdade não é modelada: as regras só decidem a **forma**
//! da conclusão e o seu orçamento.

pub mod rules;

pub use rules::StructuralChaining;

use crate::core::{Concept, Task};
use crate::error::KernelResult;
use crate::memory::Memory;

/// Estratégia de inferência plugada no ciclo de raciocínio.
pub trait InferenceRules: Send + Sync {
    /// Aplica as regras ao par Concept/task sorteado.
    ///
    /// `concept` está fora da bag durante a chamada; os demais Concepts
    /// continuam acessíveis via `memory`.
    fn fire(&self, memory: &Memory, concept: &Concept, task: &Task) -> KernelResult<Vec<Task>>;
}

/// Nenhuma regra.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRules;

impl InferenceRules for NoRules {
    fn fire(&self, _memory: &Memory, _concept: &Concept, _task: &Task) -> KernelResult<Vec<Task>> {
        Ok(Vec::new())
    }
}
