//! # Budget — Orçamento de Atenção de um Item
//!
//! Todo item gerenciado por uma [`Bag`](crate::storage::Bag) carrega um
//! [`Budget`] com três grandezas em `[0, 1]`:
//!
//! | Campo | Papel |
//! |-------|-------|
//! | `priority` | Chance de ser escolhido agora; decai com o esquecimento |
//! | `durability` | Quão devagar a prioridade decai (perto de 1 = memória longa) |
//! | `quality` | Valor de longo prazo; estende o horizonte de esquecimento |
//!
//! Além disso guarda o instante lógico da última inserção na bag, usado para
//! calcular quantos ciclos se passaram até o próximo `put_back`.
//!
//! ## Analogia
//!
//! A prioridade é a **energia** de uma planta do jardim: regar (reforçar)
//! aumenta, o tempo diminui. A durabilidade é a **espessura da folha**:
//! plantas resistentes perdem água mais devagar.

use serde::{Deserialize, Serialize};

/// Durabilidade máxima: com 1.0 um item nunca seria esquecido.
pub const MAX_DURABILITY: f32 = 0.99;

/// Orçamento de atenção (prioridade, durabilidade, qualidade).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    priority: f32,
    durability: f32,
    quality: f32,
    /// Relógio lógico da bag na última inserção.
    #[serde(default)]
    last_update: u64,
}

impl Budget {
    /// Cria um orçamento; valores fora de `[0, 1]` (ou NaN) são corrigidos.
    pub fn new(priority: f32, durability: f32, quality: f32) -> Self {
        Self {
            priority: unit(priority),
            durability: unit(durability).min(MAX_DURABILITY),
            quality: unit(quality),
            last_update: 0,
        }
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn durability(&self) -> f32 {
        self.durability
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    pub fn set_priority(&mut self, priority: f32) {
        self.priority = unit(priority);
    }

    /// Multiplica a prioridade por `factor`.
    pub fn decay(&mut self, factor: f32) {
        self.priority = unit(self.priority * factor);
    }

    /// Fusão de duas instâncias de mesma chave: cada campo fica com o máximo.
    pub fn merge_max(&mut self, other: &Budget) {
        self.priority = self.priority.max(other.priority);
        self.durability = self.durability.max(other.durability);
        self.quality = self.quality.max(other.quality);
    }

    pub(crate) fn touch(&mut self, clock: u64) {
        self.last_update = clock;
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5)
    }
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        let b = Budget::new(1.5, 1.0, f32::NAN);
        assert_eq!(b.priority(), 1.0);
        assert_eq!(b.durability(), MAX_DURABILITY);
        assert_eq!(b.quality(), 0.0);
    }

    #[test]
    fn test_merge_max() {
        let mut a = Budget::new(0.3, 0.9, 0.1);
        a.merge_max(&Budget::new(0.7, 0.2, 0.5));
        assert_eq!(a.priority(), 0.7);
        assert_eq!(a.durability(), 0.9);
        assert_eq!(a.quality(), 0.5);
    }
}
