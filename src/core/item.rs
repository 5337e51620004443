//! # Item — Contrato de Quem Vive em uma Bag
//!
//! Uma [`Bag`](crate::storage::Bag) não sabe nada sobre Tasks ou Concepts:
//! ela só exige uma **chave única** e um [`Budget`]. Este trait é a fronteira.
//!
//! ## Fusão por Chave
//!
//! Quando um `put` encontra um residente com a mesma chave, a bag consulta a
//! [`MergePolicy`] do item **que chega**:
//!
//! | Política | Efeito |
//! |----------|--------|
//! | `Max` (padrão) | Residente fica; orçamento = máximo campo a campo; conteúdo do recém-chegado é absorvido via [`Item::absorb`] |
//! | `Replace` | O recém-chegado é uma instância nova e sem relação; substitui o residente |

use super::budget::Budget;

/// Como fundir um item com um residente de mesma chave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Mantém o residente com o maior orçamento.
    #[default]
    Max,
    /// Descarta o residente.
    Replace,
}

/// Entidade gerenciada por uma bag de prioridade.
pub trait Item: Send {
    /// Chave única dentro de uma bag.
    fn key(&self) -> &str;

    fn budget(&self) -> &Budget;

    fn budget_mut(&mut self) -> &mut Budget;

    /// Política aplicada quando este item chega e a chave já existe.
    fn merge_policy(&self) -> MergePolicy {
        MergePolicy::Max
    }

    /// Absorve o conteúdo de outra instância de mesma chave (política `Max`).
    /// O orçamento já foi fundido pela bag.
    fn absorb(&mut self, _other: Self)
    where
        Self: Sized,
    {
    }

    fn priority(&self) -> f32 {
        self.budget().priority()
    }
}
