//! # TermBuilder — Construção Canônica de Termos
//!
//! Toda criação de termo passa por aqui. O [`TermBuilder`] garante três coisas:
//!
//! 1. **Unicidade**: termos estruturalmente iguais são o mesmo objeto
//!    (consulta ao [`TermRegistry`] pelo nome canônico antes de alocar).
//! 2. **Redução**: um conjunto fixo de reduções algébricas é aplicado antes de
//!    criar um objeto novo (conjunções achatadas e ordenadas, implicações
//!    encadeadas absorvidas em um antecedente conjuntivo, cópulas simétricas
//!    com lados ordenados).
//! 3. **Falha silenciosa**: construções inválidas devolvem `Ok(None)`; o
//!    chamador trata a ausência como resultado normal.
//!
//! Somente violações de consistência do registro viram `Err` (ver
//! [`KernelError`]).
//!
//! ## Absorção de Implicações
//!
//! ```text
//! <a ==> <b ==> c>>   ⟶   <(&&,a,b) ==> c>
//! <a ==> <(&&,a,b) ==> c>>   ⟶   nenhum termo (redundante)
//! ```
//!
//! Cada passo remove um nível de aninhamento do predicado, então a recursão
//! termina; ainda assim ela é limitada por [`MAX_REDUCTION_DEPTH`].
//!
//! ## Exemplo
//!
//! ```rust
//! use nars_kernel::language::{Symbols, TemporalOrder, TermBuilder};
//! use nars_kernel::storage::TermRegistry;
//!
//! let registry = TermRegistry::new();
//! let symbols = Symbols::default();
//! let terms = TermBuilder::new(&registry, &symbols);
//!
//! let robin = terms.word("robin").unwrap().unwrap();
//! let bird = terms.word("bird").unwrap().unwrap();
//! let a = terms.implication(Some(&robin), Some(&bird), TemporalOrder::None).unwrap().unwrap();
//! let b = terms.implication(Some(&robin), Some(&bird), TemporalOrder::None).unwrap().unwrap();
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//! ```

use unicode_normalization::UnicodeNormalization;

use super::symbols::{Copula, Symbols, TemporalOrder};
use super::term::{Term, TermKind, TermRef};
use crate::error::{KernelError, KernelResult};
use crate::storage::registry::TermRegistry;

/// Limite de passos de absorção em uma única construção de implicação.
pub const MAX_REDUCTION_DEPTH: usize = 64;

/// Caracteres reservados pela notação; não podem aparecer em nomes atômicos.
const RESERVED: &[char] = &['<', '>', '(', ')', ',', ' ', '\t', '\n', '&', '|', '='];

/// Construtor de termos ligado a um registro e a uma tabela de símbolos.
///
/// É barato: só guarda duas referências. Crie um sempre que precisar, ou use
/// [`Memory::terms`](crate::memory::Memory::terms).
#[derive(Clone, Copy)]
pub struct TermBuilder<'a> {
    registry: &'a TermRegistry,
    symbols: &'a Symbols,
}

impl<'a> TermBuilder<'a> {
    pub fn new(registry: &'a TermRegistry, symbols: &'a Symbols) -> Self {
        Self { registry, symbols }
    }

    /// Termo atômico: palavra ou variável (`$x`, `#x`, `?x`).
    ///
    /// O nome é normalizado em NFC, então "é" composto e decomposto geram o
    /// mesmo termo. Nomes vazios ou com caracteres reservados não geram termo.
    pub fn word(&self, name: &str) -> KernelResult<Option<TermRef>> {
        let name: String = name.trim().nfc().collect();
        let body = if super::term::VariableKind::from_prefix(&name).is_some() {
            &name[1..]
        } else {
            name.as_str()
        };
        if body.is_empty() || body.contains(RESERVED) {
            tracing::trace!(name = %name, "Builder: nome atômico inválido");
            return Ok(None);
        }
        self.registry.intern(Term::atom(name)).map(Some)
    }

    /// `<S --> P>`
    pub fn inheritance(
        &self,
        subject: Option<&TermRef>,
        predicate: Option<&TermRef>,
    ) -> KernelResult<Option<TermRef>> {
        self.statement(Copula::Inheritance, subject, predicate)
    }

    /// `<S <-> P>`, lados em ordem de nome.
    pub fn similarity(
        &self,
        subject: Option<&TermRef>,
        predicate: Option<&TermRef>,
    ) -> KernelResult<Option<TermRef>> {
        self.statement(Copula::Similarity, subject, predicate)
    }

    /// `<S ==> P>` e variantes temporais.
    pub fn implication(
        &self,
        subject: Option<&TermRef>,
        predicate: Option<&TermRef>,
        order: TemporalOrder,
    ) -> KernelResult<Option<TermRef>> {
        self.statement(Copula::Implication(order), subject, predicate)
    }

    /// `<S <=> P>`, lados em ordem de nome.
    pub fn equivalence(
        &self,
        subject: Option<&TermRef>,
        predicate: Option<&TermRef>,
    ) -> KernelResult<Option<TermRef>> {
        self.statement(Copula::Equivalence, subject, predicate)
    }

    /// Constrói um statement com qualquer cópula.
    ///
    /// Retorna `Ok(None)` quando um componente falta ou o par
    /// sujeito/predicado é inválido para a cópula.
    pub fn statement(
        &self,
        copula: Copula,
        subject: Option<&TermRef>,
        predicate: Option<&TermRef>,
    ) -> KernelResult<Option<TermRef>> {
        self.statement_at(copula, subject, predicate, 0)
    }

    /// Conjunção de dois termos; conjunções são achatadas.
    pub fn conjunction(&self, a: Option<&TermRef>, b: Option<&TermRef>) -> KernelResult<Option<TermRef>> {
        let (Some(a), Some(b)) = (a, b) else {
            return Ok(None);
        };
        let mut components = Vec::new();
        for term in [a, b] {
            if term.is_conjunction() {
                components.extend(term.components().iter().cloned());
            } else {
                components.push(term.clone());
            }
        }
        self.conjunction_from(components)
    }

    /// Conjunção a partir de uma lista: ordena por nome e remove repetições.
    ///
    /// Lista vazia não gera termo; um único componente distinto reduz ao
    /// próprio componente.
    pub fn conjunction_from(&self, mut components: Vec<TermRef>) -> KernelResult<Option<TermRef>> {
        components.sort_by(|a, b| a.name().cmp(b.name()));
        components.dedup_by(|a, b| a.name() == b.name());
        match components.len() {
            0 => return Ok(None),
            1 => return Ok(components.pop()),
            _ => {}
        }
        let name = self
            .symbols
            .conjunction_name(components.iter().map(|c| c.name()));
        if let Some(existing) = self.registry.lookup(&name, TermKind::Conjunction)? {
            return Ok(Some(existing));
        }
        self.registry
            .intern(Term::compound(name, TermKind::Conjunction, components))
            .map(Some)
    }

    fn statement_at(
        &self,
        copula: Copula,
        subject: Option<&TermRef>,
        predicate: Option<&TermRef>,
        depth: usize,
    ) -> KernelResult<Option<TermRef>> {
        let (Some(mut subject), Some(mut predicate)) = (subject, predicate) else {
            return Ok(None);
        };
        if !compatible_with_copula(copula, subject, predicate) || invalid_statement(subject, predicate) {
            tracing::trace!(
                copula = copula.label(),
                subject = %subject,
                predicate = %predicate,
                "Builder: par sujeito/predicado inválido"
            );
            return Ok(None);
        }
        if copula.is_symmetric() && subject.name() > predicate.name() {
            std::mem::swap(&mut subject, &mut predicate);
        }

        let name = self
            .symbols
            .statement_name(subject.name(), copula, predicate.name());
        let kind = TermKind::Statement(copula);
        if let Some(existing) = self.registry.lookup(&name, kind)? {
            return Ok(Some(existing));
        }

        if matches!(copula, Copula::Implication(_)) && predicate.is_implication() {
            return self.absorb_implication(subject, predicate, depth);
        }

        self.registry
            .intern(Term::compound(name, kind, vec![subject.clone(), predicate.clone()]))
            .map(Some)
    }

    /// `<S ==> <C ==> P>>` ⟶ `<(&&,S,C) ==> P>`.
    ///
    /// O resultado não herda a ordem temporal externa: a implicação absorvida
    /// é construída sem ordem.
    fn absorb_implication(
        &self,
        subject: &TermRef,
        predicate: &TermRef,
        depth: usize,
    ) -> KernelResult<Option<TermRef>> {
        if depth >= MAX_REDUCTION_DEPTH {
            return Err(KernelError::ReductionDepthExceeded {
                name: predicate.name().to_string(),
                depth,
            });
        }
        let (Some(old_condition), Some(consequent)) = (predicate.subject(), predicate.predicate()) else {
            return Ok(None);
        };
        if old_condition.is_conjunction() && old_condition.contains_component(subject) {
            tracing::trace!(subject = %subject, predicate = %predicate, "Builder: implicação redundante");
            return Ok(None);
        }
        let new_condition = self.conjunction(Some(subject), Some(old_condition))?;
        self.statement_at(
            Copula::Implication(TemporalOrder::None),
            new_condition.as_ref(),
            Some(consequent),
            depth + 1,
        )
    }
}

/// Restrições de ordem superior por cópula.
///
/// - Implicação: sujeito não pode ser implicação/equivalência; predicado não
///   pode ser equivalência.
/// - Equivalência: nenhum dos lados pode ser implicação/equivalência.
fn compatible_with_copula(copula: Copula, subject: &TermRef, predicate: &TermRef) -> bool {
    let higher = |t: &TermRef| t.copula().is_some_and(|c| c.is_higher_order());
    match copula {
        Copula::Implication(_) => !higher(subject) && !predicate.is_equivalence(),
        Copula::Equivalence => !higher(subject) && !higher(predicate),
        Copula::Inheritance | Copula::Similarity => true,
    }
}

/// Verificação estrutural de compatibilidade sujeito/predicado.
fn invalid_statement(subject: &TermRef, predicate: &TermRef) -> bool {
    if subject.name() == predicate.name() {
        return true;
    }
    if subject.is_variable() && predicate.is_variable() {
        return true;
    }
    if invalid_reflexive(subject, predicate) || invalid_reflexive(predicate, subject) {
        return true;
    }
    if let (Some(s1), Some(p1), Some(s2), Some(p2)) = (
        subject.subject(),
        subject.predicate(),
        predicate.subject(),
        predicate.predicate(),
    ) {
        if s1 == p2 && p1 == s2 {
            return true;
        }
    }
    false
}

/// Um lado composto não pode conter o outro como componente direto.
fn invalid_reflexive(container: &TermRef, component: &TermRef) -> bool {
    !container.is_atomic() && container.contains_component(component)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct Fixture {
        registry: TermRegistry,
        symbols: Symbols,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: TermRegistry::new(),
                symbols: Symbols::default(),
            }
        }

        fn terms(&self) -> TermBuilder<'_> {
            TermBuilder::new(&self.registry, &self.symbols)
        }

        fn word(&self, name: &str) -> TermRef {
            self.terms().word(name).unwrap().unwrap()
        }
    }

    /// Construir a mesma implicação duas vezes devolve o mesmo objeto
    #[test]
    fn test_implication_idempotent() {
        let fx = Fixture::new();
        let (robin, bird) = (fx.word("robin"), fx.word("bird"));
        let first = fx
            .terms()
            .implication(Some(&robin), Some(&bird), TemporalOrder::None)
            .unwrap()
            .unwrap();
        let second = fx
            .terms()
            .implication(Some(&robin), Some(&bird), TemporalOrder::None)
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "<robin ==> bird>");
    }

    /// A ordem temporal separa identidades
    #[test]
    fn test_temporal_orders_are_distinct_terms() {
        let fx = Fixture::new();
        let (a, b) = (fx.word("a"), fx.word("b"));
        let make = |order| {
            fx.terms()
                .implication(Some(&a), Some(&b), order)
                .unwrap()
                .unwrap()
        };
        let none = make(TemporalOrder::None);
        let forward = make(TemporalOrder::Forward);
        let backward = make(TemporalOrder::Backward);
        let concurrent = make(TemporalOrder::Concurrent);
        assert_ne!(none, forward);
        assert_ne!(forward, backward);
        assert_ne!(none, backward);
        assert_ne!(concurrent, none);
        assert_eq!(forward.copula(), Some(Copula::Implication(TemporalOrder::Forward)));
        assert_eq!(backward.name(), "<a =\\> b>");
    }

    /// <a ==> <b ==> c>> reduz a <(&&,a,b) ==> c>
    #[test]
    fn test_chained_implication_is_absorbed() {
        let fx = Fixture::new();
        let (a, b, c) = (fx.word("a"), fx.word("b"), fx.word("c"));
        let inner = fx
            .terms()
            .implication(Some(&b), Some(&c), TemporalOrder::None)
            .unwrap()
            .unwrap();
        let reduced = fx
            .terms()
            .implication(Some(&a), Some(&inner), TemporalOrder::None)
            .unwrap()
            .unwrap();
        assert_eq!(reduced.name(), "<(&&,a,b) ==> c>");
        let condition = reduced.subject().unwrap();
        assert!(condition.is_conjunction());

        let direct = fx
            .terms()
            .implication(Some(condition), Some(&c), TemporalOrder::None)
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&reduced, &direct));
    }

    /// Se o antecedente já contém o sujeito, não há termo
    #[test]
    fn test_redundant_absorption_yields_no_term() {
        let fx = Fixture::new();
        let (a, b, c) = (fx.word("a"), fx.word("b"), fx.word("c"));
        let ab = fx.terms().conjunction(Some(&a), Some(&b)).unwrap().unwrap();
        let inner = fx
            .terms()
            .implication(Some(&ab), Some(&c), TemporalOrder::None)
            .unwrap()
            .unwrap();
        let result = fx
            .terms()
            .implication(Some(&a), Some(&inner), TemporalOrder::None)
            .unwrap();
        assert!(result.is_none());
    }

    /// Absorção em cadeia profunda: <a ==> <b ==> <c ==> d>>>
    #[test]
    fn test_nested_absorption() {
        let fx = Fixture::new();
        let (a, b, c, d) = (fx.word("a"), fx.word("b"), fx.word("c"), fx.word("d"));
        let t = fx.terms();
        let cd = t.implication(Some(&c), Some(&d), TemporalOrder::None).unwrap().unwrap();
        let bcd = t.implication(Some(&b), Some(&cd), TemporalOrder::None).unwrap().unwrap();
        assert_eq!(bcd.name(), "<(&&,b,c) ==> d>");
        let abcd = t.implication(Some(&a), Some(&bcd), TemporalOrder::None).unwrap().unwrap();
        assert_eq!(abcd.name(), "<(&&,a,b,c) ==> d>");
    }

    /// Componente ausente nunca gera termo
    #[test]
    fn test_missing_component_yields_no_term() {
        let fx = Fixture::new();
        let x = fx.word("x");
        let t = fx.terms();
        assert!(t.implication(None, Some(&x), TemporalOrder::None).unwrap().is_none());
        assert!(t.implication(Some(&x), None, TemporalOrder::Forward).unwrap().is_none());
        assert!(t.inheritance(None, None).unwrap().is_none());
    }

    #[test]
    fn test_invalid_pairs() {
        let fx = Fixture::new();
        let (a, b, x, y) = (fx.word("a"), fx.word("b"), fx.word("$x"), fx.word("$y"));
        let t = fx.terms();
        // reflexivo
        assert!(t.inheritance(Some(&a), Some(&a)).unwrap().is_none());
        // duas variáveis soltas
        assert!(t.inheritance(Some(&x), Some(&y)).unwrap().is_none());
        // um lado contém o outro
        let ab = t.conjunction(Some(&a), Some(&b)).unwrap().unwrap();
        assert!(t.inheritance(Some(&ab), Some(&a)).unwrap().is_none());
        // statements espelhados
        let a_b = t.inheritance(Some(&a), Some(&b)).unwrap().unwrap();
        let b_a = t.inheritance(Some(&b), Some(&a)).unwrap().unwrap();
        assert!(t.implication(Some(&a_b), Some(&b_a), TemporalOrder::None).unwrap().is_none());
        // uma variável só é aceita
        assert!(t.inheritance(Some(&x), Some(&b)).unwrap().is_some());
    }

    /// Implicação não aceita implicação no sujeito nem equivalência no predicado
    #[test]
    fn test_higher_order_restrictions() {
        let fx = Fixture::new();
        let (a, b, c) = (fx.word("a"), fx.word("b"), fx.word("c"));
        let t = fx.terms();
        let ab = t.implication(Some(&a), Some(&b), TemporalOrder::None).unwrap().unwrap();
        let eq = t.equivalence(Some(&b), Some(&c)).unwrap().unwrap();
        assert!(t.implication(Some(&ab), Some(&c), TemporalOrder::None).unwrap().is_none());
        assert!(t.implication(Some(&eq), Some(&a), TemporalOrder::None).unwrap().is_none());
        assert!(t.implication(Some(&a), Some(&eq), TemporalOrder::None).unwrap().is_none());
        assert!(t.equivalence(Some(&ab), Some(&c)).unwrap().is_none());
    }

    /// Cópulas simétricas ignoram a ordem dos lados
    #[test]
    fn test_symmetric_copulas_are_ordered() {
        let fx = Fixture::new();
        let (cat, tiger) = (fx.word("cat"), fx.word("tiger"));
        let t = fx.terms();
        let one = t.similarity(Some(&tiger), Some(&cat)).unwrap().unwrap();
        let two = t.similarity(Some(&cat), Some(&tiger)).unwrap().unwrap();
        assert!(Arc::ptr_eq(&one, &two));
        assert_eq!(one.name(), "<cat <-> tiger>");
    }

    #[test]
    fn test_conjunction_canonical_form() {
        let fx = Fixture::new();
        let (a, b, c) = (fx.word("a"), fx.word("b"), fx.word("c"));
        let t = fx.terms();
        let ba = t.conjunction(Some(&b), Some(&a)).unwrap().unwrap();
        assert_eq!(ba.name(), "(&&,a,b)");
        let abc = t.conjunction(Some(&c), Some(&ba)).unwrap().unwrap();
        assert_eq!(abc.name(), "(&&,a,b,c)");
        assert!(abc.contains_component(&c));
        // a && a reduz ao próprio termo
        let aa = t.conjunction(Some(&a), Some(&a)).unwrap().unwrap();
        assert!(Arc::ptr_eq(&aa, &a));
        assert!(t.conjunction_from(Vec::new()).unwrap().is_none());
    }

    /// Nomes são normalizados em NFC
    #[test]
    fn test_word_normalization() {
        let fx = Fixture::new();
        let composed = fx.word("caf\u{e9}");
        let decomposed = fx.word("cafe\u{301}");
        assert!(Arc::ptr_eq(&composed, &decomposed));
        assert!(fx.terms().word("").unwrap().is_none());
        assert!(fx.terms().word("a b").unwrap().is_none());
        assert!(fx.terms().word("$").unwrap().is_none());
    }

    /// Formato conflitante no registro aborta a construção
    #[test]
    fn test_registry_corruption_is_fatal() {
        let fx = Fixture::new();
        let (a, b) = (fx.word("a"), fx.word("b"));
        let _squatter = fx
            .registry
            .intern(Term::compound(
                "<a ==> b>".into(),
                TermKind::Conjunction,
                vec![a.clone(), b.clone()],
            ))
            .unwrap();
        let result = fx.terms().implication(Some(&a), Some(&b), TemporalOrder::None);
        assert!(matches!(result, Err(KernelError::TermTypeMismatch { .. })));
    }
}
