//! # StructuralChaining — Encadeamento por Termo Intermediário
//!
//! Regras de forma sobre statements **de mesma cópula**, aplicadas entre a
//! task sorteada e as crenças do Concept disparado. Como cada task também é
//! entregue aos Concepts do seu sujeito e do seu predicado, o Concept do
//! termo intermediário `M` enxerga as duas premissas.
//!
//! ### Dedução: S→M + M→P ⊢ S→P
//!
//! ```text
//! Task:    <robin --> bird>       (S→M)
//! Crença:  <bird --> animal>      (M→P)
//! ─────────────────────────────────────
//! Dedução: <robin --> animal>     (S→P)
//! ```
//!
//! ### Indução: M→P + M→S ⊢ S ↔ P
//!
//! Dois statements com o mesmo sujeito sugerem que os predicados são
//! similares. Herança induz Similaridade; implicação induz Equivalência.
//!
//! ```text
//! Task:    <robin --> bird>
//! Crença:  <robin --> flyer>
//! ─────────────────────────────────────
//! Indução: <bird <-> flyer>
//! ```
//!
//! ## Filtros
//!
//! - Só afirmações (`.`) disparam regras
//! - Premissas com bases evidenciais sobrepostas não se combinam
//! - Conclusões inválidas (o builder devolve `None`) são ignoradas

use crate::core::{Budget, Concept, Item, Punctuation, Sentence, Stamp, Task};
use crate::error::KernelResult;
use crate::inference::InferenceRules;
use crate::language::{Copula, TermRef};
use crate::memory::Memory;

/// Fator aplicado à prioridade e à durabilidade da premissa.
pub const DEFAULT_DECAY: f32 = 0.8;

/// Dedução e indução estruturais, sem aritmética de verdade.
#[derive(Clone, Copy, Debug)]
pub struct StructuralChaining {
    decay: f32,
}

impl Default for StructuralChaining {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
        }
    }
}

impl StructuralChaining {
    pub fn new(decay: f32) -> Self {
        Self {
            decay: decay.clamp(0.0, 1.0),
        }
    }

    fn budget(&self, premise: &Budget) -> Budget {
        Budget::new(
            premise.priority() * self.decay,
            premise.durability() * self.decay,
            premise.quality(),
        )
    }
}

/// Cópula simétrica correspondente, destino da indução.
fn symmetric_of(copula: Copula) -> Option<Copula> {
    match copula {
        Copula::Inheritance => Some(Copula::Similarity),
        Copula::Implication(_) => Some(Copula::Equivalence),
        Copula::Similarity | Copula::Equivalence => None,
    }
}

fn sides(term: &TermRef) -> Option<(&TermRef, &TermRef)> {
    Some((term.subject()?, term.predicate()?))
}

impl InferenceRules for StructuralChaining {
    fn fire(&self, memory: &Memory, concept: &Concept, task: &Task) -> KernelResult<Vec<Task>> {
        let sentence = task.sentence();
        let content = sentence.content();
        let Some(copula) = content.copula() else {
            return Ok(Vec::new());
        };
        if !sentence.is_judgment() || copula.is_symmetric() {
            return Ok(Vec::new());
        }
        let Some((s1, p1)) = sides(content) else {
            return Ok(Vec::new());
        };

        let terms = memory.terms();
        let mut derived = Vec::new();
        for belief in concept.beliefs().iter() {
            if belief.stamp().overlaps(sentence.stamp()) {
                continue;
            }
            let other = belief.content();
            if other.copula() != Some(copula) {
                continue;
            }
            let Some((s2, p2)) = sides(other) else {
                continue;
            };

            let (rule, conclusion) = if p1 == s2 {
                ("Dedução", terms.statement(copula, Some(s1), Some(p2))?)
            } else if p2 == s1 {
                ("Dedução", terms.statement(copula, Some(s2), Some(p1))?)
            } else if s1 == s2 && p1 != p2 {
                match symmetric_of(copula) {
                    Some(symmetric) => ("Indução", terms.statement(symmetric, Some(p2), Some(p1))?),
                    None => continue,
                }
            } else {
                continue;
            };
            let Some(conclusion) = conclusion else {
                continue;
            };

            tracing::debug!(
                rule,
                task = %content,
                belief = %other,
                conclusion = %conclusion,
                "Inferência: conclusão derivada"
            );
            let stamp = Stamp::derived(sentence.stamp(), belief.stamp(), memory.current_cycle());
            derived.push(Task::derived(
                Sentence::new(conclusion, Punctuation::Judgment, stamp),
                self.budget(task.budget()),
            ));
        }
        Ok(derived)
    }
}
