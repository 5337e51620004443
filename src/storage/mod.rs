//! # Módulo Storage — Memória de Trabalho
//!
//! | Tipo | Papel |
//! |------|-------|
//! | [`TermRegistry`] | Nome canônico → termo vivo |
//! | [`Bag`] | Contêiner limitado com seleção por prioridade e esquecimento |
//! | [`TaskBag`] | Bag de tasks (buffer de entrada e bag local de cada Concept) |
//! | [`ConceptBag`] | Bag de Concepts da memória |

pub mod bag;
pub mod concept_bag;
pub mod registry;
pub mod task_bag;

pub use bag::{Bag, BagConfig};
pub use concept_bag::ConceptBag;
pub use registry::TermRegistry;
pub use task_bag::TaskBag;
