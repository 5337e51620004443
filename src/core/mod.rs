//! # Módulo Core — Entidades da Memória
//!
//! Os tipos que circulam pelas bags do kernel:
//!
//! - [`Budget`] — Orçamento de atenção (prioridade, durabilidade, qualidade)
//! - [`Item`] — Contrato de tudo que vive numa [`Bag`](crate::storage::Bag)
//! - [`Stamp`] — Registro evidencial de uma sentença
//! - [`Sentence`] — Statement + pontuação + stamp
//! - [`Task`] — Unidade pendente de trabalho (sentença com orçamento)
//! - [`Concept`] — Unidade de memória de longo prazo de um termo
//! - [`ConceptObserver`] — Colaborador externo de exibição
//!
//! ## Analogia com o Mundo Real
//!
//! Pense na memória como um **jardim**:
//! - Cada [`Concept`] é uma **planta** — nasce, cresce com atenção e pode murchar
//! - Cada [`Task`] é a **água** que chega a uma planta
//! - O [`Budget`] é a **energia** que decide quem é cuidado primeiro

pub mod budget;
pub mod concept;
pub mod item;
pub mod observer;
pub mod sentence;
pub mod stamp;
pub mod task;

pub use budget::Budget;
pub use concept::{BeliefTable, Concept, ConceptState};
pub use item::{Item, MergePolicy};
pub use observer::{ConceptObserver, Recording, RecordingObserver, TracingObserver};
pub use sentence::{Punctuation, Sentence};
pub use stamp::Stamp;
pub use task::{Origin, Task};
