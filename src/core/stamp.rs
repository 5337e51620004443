//! # Stamp — Registro Evidencial
//!
//! O [`Stamp`] diz **de onde veio** uma sentença: o número serial de cada
//! entrada que contribuiu para ela (a *base evidencial*), o ciclo lógico em
//! que foi criada e o instante de relógio real.
//!
//! Duas sentenças cujas bases se sobrepõem compartilham evidência: derivar
//! algo novo a partir delas contaria a mesma observação duas vezes. Por isso a
//! inferência consulta [`Stamp::overlaps`] antes de combinar premissas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tamanho máximo da base evidencial; seriais mais antigos são descartados.
pub const MAX_EVIDENTIAL_BASE_LENGTH: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    evidential_base: Vec<u64>,
    creation_cycle: u64,
    created_at: DateTime<Utc>,
}

impl Stamp {
    /// Stamp de uma entrada nova: base = `[serial]`.
    pub fn input(serial: u64, cycle: u64) -> Self {
        Self {
            evidential_base: vec![serial],
            creation_cycle: cycle,
            created_at: Utc::now(),
        }
    }

    /// Stamp de uma derivação: intercala as duas bases (mais recentes primeiro)
    /// e trunca em [`MAX_EVIDENTIAL_BASE_LENGTH`].
    pub fn derived(first: &Stamp, second: &Stamp, cycle: u64) -> Self {
        let mut base = Vec::with_capacity(MAX_EVIDENTIAL_BASE_LENGTH);
        let (a, b) = (&first.evidential_base, &second.evidential_base);
        for i in 0..a.len().max(b.len()) {
            for serial in [a.get(i), b.get(i)].into_iter().flatten() {
                if base.len() < MAX_EVIDENTIAL_BASE_LENGTH && !base.contains(serial) {
                    base.push(*serial);
                }
            }
        }
        Self {
            evidential_base: base,
            creation_cycle: cycle,
            created_at: Utc::now(),
        }
    }

    /// `true` se as duas bases compartilham algum serial.
    pub fn overlaps(&self, other: &Stamp) -> bool {
        self.evidential_base
            .iter()
            .any(|s| other.evidential_base.contains(s))
    }

    pub fn evidential_base(&self) -> &[u64] {
        &self.evidential_base
    }

    pub fn creation_cycle(&self) -> u64 {
        self.creation_cycle
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
