//! # TermRegistry — Registro Canônico de Termos
//!
//! O [`TermRegistry`] é a **fonte única de verdade** que mapeia nome canônico
//! → objeto [`Term`] vivo. É ele que garante que `<robin --> bird>` construído
//! duas vezes devolva o **mesmo** `Arc`.
//!
//! ## Invariante
//!
//! Em qualquer instante existe **no máximo um** objeto `Term` vivo por nome.
//! Para isso:
//!
//! - Registro só acontece dentro dos construtores (via [`intern`](TermRegistry::intern),
//!   visível apenas no crate); não há inserção pública.
//! - `intern` é um *insert-or-get* atômico sob o mutex: se outra thread
//!   registrou o nome entre a consulta e a inserção, o objeto dela vence.
//!
//! ## Entradas Não-Proprietárias
//!
//! O registro guarda `Weak<Term>`. Quem mantém o termo vivo são os Concepts e
//! Tasks que o citam. Quando o último detentor solta o termo, a entrada vira
//! uma "entrada morta" e é removida na próxima consulta, em
//! [`release`](TermRegistry::release) ou em [`purge`](TermRegistry::purge).
//!
//! ```text
//! Concept("robin") ──Arc──▶ Term("robin") ◀──Weak── registry["robin"]
//! Task(<robin-->bird>) ──Arc──┘
//! ```
//!
//! Assim um termo pode sobreviver à evicção do seu Concept (as Tasks ainda o
//! citam) sem que um segundo objeto com o mesmo nome seja criado.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::{KernelError, KernelResult};
use crate::language::term::{Term, TermKind, TermRef};

/// Tabela nome canônico → termo vivo. Um mutex por instância.
#[derive(Default)]
pub struct TermRegistry {
    terms: Mutex<HashMap<String, Weak<Term>>>,
}

impl TermRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Busca O(1) esperado pelo nome canônico.
    ///
    /// Retorna `None` se o nome nunca foi registrado ou se o termo já foi
    /// liberado por todos os seus detentores (a entrada morta é removida).
    pub fn name_to_listed_term(&self, name: &str) -> Option<TermRef> {
        let mut terms = self.terms.lock();
        Self::live_entry(&mut terms, name)
    }

    /// Busca com verificação de formato, usada pelos construtores.
    ///
    /// Encontrar um formato diferente sob o nome esperado é uma violação de
    /// consistência, não um resultado normal.
    pub(crate) fn lookup(&self, name: &str, expected: TermKind) -> KernelResult<Option<TermRef>> {
        match self.name_to_listed_term(name) {
            Some(term) => check_kind(&term, expected).map(Some),
            None => Ok(None),
        }
    }

    /// Registra um termo recém-construído, ou devolve o objeto já registrado.
    pub(crate) fn intern(&self, term: Term) -> KernelResult<TermRef> {
        let mut terms = self.terms.lock();
        if let Some(existing) = Self::live_entry(&mut terms, term.name()) {
            return check_kind(&existing, term.kind());
        }
        let term = Arc::new(term);
        tracing::trace!(name = %term.name(), "Registry: termo registrado");
        terms.insert(term.name().to_string(), Arc::downgrade(&term));
        Ok(term)
    }

    /// Chamado quando o Concept de `name` é removido da memória.
    ///
    /// A entrada só sai do registro se nenhum detentor mantiver o termo vivo;
    /// caso contrário o termo continua canônico. Retorna `true` se removeu.
    pub fn release(&self, name: &str) -> bool {
        let mut terms = self.terms.lock();
        let dead = terms
            .get(name)
            .map(|weak| weak.strong_count() == 0)
            .unwrap_or(false);
        if dead {
            terms.remove(name);
            tracing::debug!(name = %name, "Registry: entrada liberada");
        }
        dead
    }

    /// Remove todas as entradas mortas. Retorna quantas foram removidas.
    pub fn purge(&self) -> usize {
        let mut terms = self.terms.lock();
        let before = terms.len();
        terms.retain(|_, weak| weak.strong_count() > 0);
        before - terms.len()
    }

    /// Número de entradas (vivas ou mortas ainda não removidas).
    pub fn len(&self) -> usize {
        self.terms.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Número de termos efetivamente vivos.
    pub fn live_len(&self) -> usize {
        self.terms
            .lock()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    fn live_entry(terms: &mut HashMap<String, Weak<Term>>, name: &str) -> Option<TermRef> {
        let found = terms.get(name)?.upgrade();
        if found.is_none() {
            terms.remove(name);
        }
        found
    }
}

fn check_kind(term: &TermRef, expected: TermKind) -> KernelResult<TermRef> {
    if term.kind() == expected {
        Ok(term.clone())
    } else {
        tracing::error!(
            name = %term.name(),
            expected = expected.label(),
            found = term.kind().label(),
            "Registry: formato inconsistente"
        );
        Err(KernelError::TermTypeMismatch {
            name: term.name().to_string(),
            expected: expected.label(),
            found: term.kind().label(),
        })
    }
}
