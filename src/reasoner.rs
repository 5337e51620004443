//! # Reasoner — O Jardineiro
//!
//! O [`Reasoner`] roda o ciclo de raciocínio sobre uma [`Memory`]
//! compartilhada, acumulando contadores e registrando um resumo.
//!
//! ## O Ciclo
//!
//! ```text
//! step()
//!   ├── 1. 🌱 ENTRADA   — uma nova task é entregue ao seu Concept
//!   ├── 2. ☀️ DISPARO   — um Concept e uma task são sorteados; regras aplicadas
//!   └── 3. 🍂 PODA      — task e Concept voltam às bags com esquecimento
//! ```
//!
//! A memória é `Arc` para que a entrada de tasks continue em outra thread
//! enquanto o raciocinador roda.

use std::sync::Arc;

use crate::error::KernelResult;
use crate::inference::InferenceRules;
use crate::memory::{CycleReport, Memory};

/// Contadores acumulados desde a criação do raciocinador.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReasonerStats {
    pub cycles: u64,
    pub processed: u64,
    pub fired: u64,
    pub derived: u64,
    pub forgotten: u64,
}

impl ReasonerStats {
    fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        self.processed += u64::from(report.processed);
        self.fired += u64::from(report.fired);
        self.derived += report.derived as u64;
        self.forgotten += report.forgotten as u64;
    }
}

pub struct Reasoner {
    memory: Arc<Memory>,
    rules: Box<dyn InferenceRules>,
    stats: ReasonerStats,
}

impl Reasoner {
    pub fn new(memory: Arc<Memory>, rules: Box<dyn InferenceRules>) -> Self {
        Self {
            memory,
            rules,
            stats: ReasonerStats::default(),
        }
    }

    pub fn memory(&self) -> &Arc<Memory> {
        &self.memory
    }

    pub fn stats(&self) -> ReasonerStats {
        self.stats
    }

    /// Um ciclo.
    pub fn step(&mut self) -> KernelResult<CycleReport> {
        let report = self.memory.cycle(self.rules.as_ref())?;
        self.stats.record(&report);
        Ok(report)
    }

    /// Roda `steps` ciclos e registra o resumo.
    ///
    /// # Erros
    ///
    /// Interrompe no primeiro [`KernelError`](crate::error::KernelError);
    /// os contadores refletem os ciclos concluídos até ali.
    pub fn run(&mut self, steps: u64) -> KernelResult<ReasonerStats> {
        let before = self.stats;
        for _ in 0..steps {
            self.step()?;
        }
        tracing::info!(
            cycles = self.stats.cycles - before.cycles,
            derived = self.stats.derived - before.derived,
            forgotten = self.stats.forgotten - before.forgotten,
            concepts = self.memory.concept_count(),
            pending = self.memory.pending_tasks(),
            "Raciocinador: rodada concluída"
        );
        Ok(self.stats)
    }
}
