//! # Term — Expressão Lógica Imutável
//!
//! Um [`Term`] é a unidade de linguagem do kernel: uma palavra (`robin`),
//! uma variável (`$x`) ou um termo composto (`<robin --> bird>`,
//! `(&&,a,b)`). Todo termo é identificado por um **nome canônico** derivado
//! deterministicamente da sua estrutura.
//!
//! ## Identidade vs Igualdade
//!
//! - **Igualdade** (`==`) compara nomes canônicos: dois termos com o mesmo
//!   nome significam a mesma coisa.
//! - **Identidade** (`Arc::ptr_eq`) compara objetos. Depois de registrado,
//!   um nome tem **um único** objeto vivo; os construtores em
//!   [`builder`](super::builder) garantem isso.
//!
//! ## Representação
//!
//! Em vez de uma hierarquia de classes, o termo é uma struct com um
//! discriminante ([`TermKind`]) e a lista ordenada de componentes:
//!
//! ```text
//! Term { kind: Statement(Implication(Forward)), components: [robin, bird] }
//!   └── name = "<robin =/> bird>", complexity = 3, constant = true
//! ```
//!
//! Complexidade e constância são calculadas uma vez, na construção, e nunca
//! mudam; termos são imutáveis.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::symbols::Copula;

/// Referência compartilhada a um termo. Concepts e Tasks guardam `TermRef`s,
/// nunca cópias.
pub type TermRef = Arc<Term>;

/// Tipo de variável, determinado pelo prefixo do nome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// `$x` — variável independente.
    Independent,
    /// `#x` — variável dependente.
    Dependent,
    /// `?x` — variável de consulta.
    Query,
}

impl VariableKind {
    /// Detecta o tipo de variável pelo primeiro caractere do nome.
    pub fn from_prefix(name: &str) -> Option<Self> {
        match name.chars().next()? {
            '$' => Some(VariableKind::Independent),
            '#' => Some(VariableKind::Dependent),
            '?' => Some(VariableKind::Query),
            _ => None,
        }
    }
}

/// Discriminante estrutural de um termo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Termo atômico constante.
    Word,
    /// Termo atômico não-ligado.
    Variable(VariableKind),
    /// Sujeito e predicado unidos por uma cópula.
    Statement(Copula),
    /// Conjunto ordenado por nome, sem repetições.
    Conjunction,
}

impl TermKind {
    /// Label do formato, usado em mensagens de consistência.
    pub fn label(&self) -> &'static str {
        match self {
            TermKind::Word => "Word",
            TermKind::Variable(_) => "Variable",
            TermKind::Statement(copula) => copula.label(),
            TermKind::Conjunction => "Conjunction",
        }
    }
}

/// Expressão lógica imutável com nome canônico.
#[derive(Debug)]
pub struct Term {
    name: String,
    kind: TermKind,
    components: Vec<TermRef>,
    complexity: u16,
    constant: bool,
}

impl Term {
    /// Átomo (palavra ou variável). O nome já deve estar normalizado.
    pub(crate) fn atom(name: String) -> Self {
        let kind = match VariableKind::from_prefix(&name) {
            Some(var) => TermKind::Variable(var),
            None => TermKind::Word,
        };
        let constant = kind == TermKind::Word;
        Self {
            name,
            kind,
            components: Vec::new(),
            complexity: 1,
            constant,
        }
    }

    /// Termo composto. Complexidade = 1 + soma das complexidades dos componentes;
    /// constante se todos os componentes forem constantes.
    pub(crate) fn compound(name: String, kind: TermKind, components: Vec<TermRef>) -> Self {
        let complexity = components
            .iter()
            .fold(1u16, |acc, c| acc.saturating_add(c.complexity));
        let constant = components.iter().all(|c| c.constant);
        Self {
            name,
            kind,
            components,
            complexity,
            constant,
        }
    }

    /// Nome canônico.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TermKind {
        self.kind
    }

    /// Complexidade sintática; cresce monotonicamente com o aninhamento.
    pub fn complexity(&self) -> u16 {
        self.complexity
    }

    /// `false` se o termo contém alguma variável.
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    /// Componentes na ordem canônica (vazio para átomos).
    pub fn components(&self) -> &[TermRef] {
        &self.components
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self.kind, TermKind::Word | TermKind::Variable(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, TermKind::Variable(_))
    }

    /// Cópula, se o termo for um statement.
    pub fn copula(&self) -> Option<Copula> {
        match self.kind {
            TermKind::Statement(copula) => Some(copula),
            _ => None,
        }
    }

    pub fn is_statement(&self) -> bool {
        self.copula().is_some()
    }

    pub fn is_implication(&self) -> bool {
        matches!(self.copula(), Some(Copula::Implication(_)))
    }

    pub fn is_equivalence(&self) -> bool {
        matches!(self.copula(), Some(Copula::Equivalence))
    }

    pub fn is_conjunction(&self) -> bool {
        self.kind == TermKind::Conjunction
    }

    /// Sujeito de um statement.
    pub fn subject(&self) -> Option<&TermRef> {
        self.copula().and(self.components.first())
    }

    /// Predicado de um statement.
    pub fn predicate(&self) -> Option<&TermRef> {
        self.copula().and(self.components.get(1))
    }

    /// Teste de pertinência direta (um nível, por nome canônico).
    pub fn contains_component(&self, term: &Term) -> bool {
        self.components.iter().any(|c| c.name == term.name)
    }

    /// Cópia profunda e independente: mesmo nome, componentes copiados,
    /// mesma constância, complexidade e ordem temporal.
    ///
    /// **Não** passa pelo registro: a cópia não é o objeto canônico. Usada
    /// para bifurcar estado em variantes especulativas.
    pub fn deep_clone(&self) -> Term {
        Term {
            name: self.name.clone(),
            kind: self.kind,
            components: self
                .components
                .iter()
                .map(|c| Arc::new(c.deep_clone()))
                .collect(),
            complexity: self.complexity,
            constant: self.constant,
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
