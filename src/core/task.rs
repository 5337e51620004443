//! # Task — Unidade Pendente de Trabalho
//!
//! Uma [`Task`] embrulha uma [`Sentence`] com um [`Budget`]. É criada na
//! entrada (via [`Memory::input_task`](crate::memory::Memory::input_task)) ou
//! como saída de um passo de inferência, e é consumida quando retirada da bag
//! e processada, a menos que seja devolvida com prioridade decaída.
//!
//! ## Política de Fusão
//!
//! | Origem | Política | Motivo |
//! |--------|----------|--------|
//! | `Input` | `Replace` | Uma nova entrada traz evidência nova, não é o mesmo item |
//! | `Derived` | `Max` | Rederivar a mesma conclusão só reforça o residente |

use std::fmt;

use super::budget::Budget;
use super::item::{Item, MergePolicy};
use super::sentence::Sentence;
use crate::language::TermRef;

/// De onde a task veio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Input,
    Derived,
}

#[derive(Clone, Debug)]
pub struct Task {
    key: String,
    sentence: Sentence,
    budget: Budget,
    origin: Origin,
}

impl Task {
    /// Task de entrada.
    pub fn input(sentence: Sentence, budget: Budget) -> Self {
        Self::new(sentence, budget, Origin::Input)
    }

    /// Task produzida por inferência.
    pub fn derived(sentence: Sentence, budget: Budget) -> Self {
        Self::new(sentence, budget, Origin::Derived)
    }

    fn new(sentence: Sentence, budget: Budget, origin: Origin) -> Self {
        Self {
            key: sentence.key(),
            sentence,
            budget,
            origin,
        }
    }

    pub fn sentence(&self) -> &Sentence {
        &self.sentence
    }

    /// Termo do conteúdo: referência não-proprietária ao objeto canônico.
    pub fn content(&self) -> &TermRef {
        self.sentence.content()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

impl Item for Task {
    fn key(&self) -> &str {
        &self.key
    }

    fn budget(&self) -> &Budget {
        &self.budget
    }

    fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }

    fn merge_policy(&self) -> MergePolicy {
        match self.origin {
            Origin::Input => MergePolicy::Replace,
            Origin::Derived => MergePolicy::Max,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}$ {}", self.budget.priority(), self.sentence)
    }
}
