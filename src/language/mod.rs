//! # Módulo Language — Termos e Canonicalização
//!
//! - [`Term`] — expressão lógica imutável, compartilhada via [`TermRef`]
//! - [`Symbols`] — tabela de cópulas e conectivos
//! - [`TermBuilder`] — único caminho de construção: deduplica e reduz

pub mod builder;
pub mod symbols;
pub mod term;

pub use builder::{TermBuilder, MAX_REDUCTION_DEPTH};
pub use symbols::{Copula, Symbols, TemporalOrder};
pub use term::{Term, TermKind, TermRef, VariableKind};
