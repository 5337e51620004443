//! # NARS Kernel
//!
//! Núcleo de raciocínio simbólico no estilo NARS: termos canônicos
//! compartilhados, memória de trabalho limitada com seleção por prioridade e
//! esquecimento, e um ciclo de raciocínio com regras de inferência plugáveis.
//!
//! | Módulo | Conteúdo |
//! |--------|----------|
//! | [`language`] | Termos, cópulas, construção canônica |
//! | [`storage`] | Registro de termos e bags de prioridade |
//! | [`core`] | Budget, Stamp, Sentence, Task, Concept, observador |
//! | [`memory`] | Contexto central com o ciclo de raciocínio |
//! | [`inference`] | Interface das regras e um conjunto estrutural mínimo |
//! | [`reasoner`] | Laço de ciclos com contadores |
//! | [`config`] | Parâmetros carregados de JSON |

pub mod config;
pub mod core;
pub mod error;
pub mod inference;
pub mod language;
pub mod memory;
pub mod reasoner;
pub mod storage;

pub use error::{KernelError, KernelResult};
pub use memory::Memory;
pub use reasoner::Reasoner;
