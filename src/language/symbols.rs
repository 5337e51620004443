//! # Símbolos — Tabela de Cópulas e Conectores
//!
//! Os nomes canônicos dos termos são montados a partir de **símbolos**:
//! a cópula que liga sujeito e predicado (`-->`, `==>`, ...) e o conector
//! das conjunções (`&&`). O kernel trata esta tabela como **opaca**: ela é
//! fornecida pela camada de entrada/saída e só é consultada por chave.
//!
//! ## Cópulas e Ordem Temporal
//!
//! | Cópula | Símbolo padrão | Significado |
//! |--------|----------------|-------------|
//! | `Inheritance` | `-->` | "é um" |
//! | `Similarity` | `<->` | "semelhante a" (simétrica) |
//! | `Implication(None)` | `==>` | "implica" |
//! | `Implication(Forward)` | `=/>` | "implica, depois" |
//! | `Implication(Concurrent)` | `=\|>` | "implica, ao mesmo tempo" |
//! | `Implication(Backward)` | `=\>` | "implica, antes" |
//! | `Equivalence` | `<=>` | "equivale" (simétrica) |
//!
//! A ordem temporal faz parte da **identidade** da implicação:
//! `<a ==> b>` e `<a =/> b>` são termos distintos no registro.

use serde::{Deserialize, Serialize};

/// Ordem temporal de uma Implicação.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalOrder {
    /// Sem relação temporal: implicação "eterna".
    #[default]
    None,
    /// O predicado acontece depois do sujeito.
    Forward,
    /// Sujeito e predicado acontecem juntos.
    Concurrent,
    /// O predicado acontece antes do sujeito.
    Backward,
}

/// Cópula: o símbolo de relação que une sujeito e predicado em um Statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Copula {
    /// Herança: "S é um P".
    Inheritance,
    /// Similaridade: "S ≈ P" (simétrica).
    Similarity,
    /// Implicação, com ordem temporal.
    Implication(TemporalOrder),
    /// Equivalência: "S ⇔ P" (simétrica).
    Equivalence,
}

impl Copula {
    /// Cópulas simétricas têm sujeito e predicado ordenados por nome.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Copula::Similarity | Copula::Equivalence)
    }

    /// Cópulas de ordem superior relacionam statements (implicação, equivalência).
    pub fn is_higher_order(&self) -> bool {
        matches!(self, Copula::Implication(_) | Copula::Equivalence)
    }

    /// Label curto usado nas mensagens de erro e de log.
    pub fn label(&self) -> &'static str {
        match self {
            Copula::Inheritance => "Inheritance",
            Copula::Similarity => "Similarity",
            Copula::Implication(_) => "Implication",
            Copula::Equivalence => "Equivalence",
        }
    }
}

/// Tabela de símbolos usada para derivar nomes canônicos.
///
/// O padrão reproduz a notação Narsese. Trocar a tabela muda todos os nomes
/// canônicos, então um mesmo [`Memory`](crate::memory::Memory) deve usar
/// uma única tabela durante toda a sua vida.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Symbols {
    pub inheritance: String,
    pub similarity: String,
    pub implication: String,
    pub implication_after: String,
    pub implication_when: String,
    pub implication_before: String,
    pub equivalence: String,
    pub conjunction: String,
    pub statement_opener: String,
    pub statement_closer: String,
    pub compound_opener: String,
    pub compound_closer: String,
    pub separator: String,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            inheritance: "-->".into(),
            similarity: "<->".into(),
            implication: "==>".into(),
            implication_after: "=/>".into(),
            implication_when: "=|>".into(),
            implication_before: "=\\>".into(),
            equivalence: "<=>".into(),
            conjunction: "&&".into(),
            statement_opener: "<".into(),
            statement_closer: ">".into(),
            compound_opener: "(".into(),
            compound_closer: ")".into(),
            separator: ",".into(),
        }
    }
}

impl Symbols {
    /// Símbolo da cópula; para implicações, escolhido pela ordem temporal.
    pub fn copula(&self, copula: Copula) -> &str {
        match copula {
            Copula::Inheritance => &self.inheritance,
            Copula::Similarity => &self.similarity,
            Copula::Implication(TemporalOrder::None) => &self.implication,
            Copula::Implication(TemporalOrder::Forward) => &self.implication_after,
            Copula::Implication(TemporalOrder::Concurrent) => &self.implication_when,
            Copula::Implication(TemporalOrder::Backward) => &self.implication_before,
            Copula::Equivalence => &self.equivalence,
        }
    }

    /// Nome canônico de um statement: `<sujeito cópula predicado>`.
    pub fn statement_name(&self, subject: &str, copula: Copula, predicate: &str) -> String {
        format!(
            "{}{} {} {}{}",
            self.statement_opener,
            subject,
            self.copula(copula),
            predicate,
            self.statement_closer
        )
    }

    /// Nome canônico de uma conjunção: `(&&,a,b,...)`.
    pub fn conjunction_name<'a>(&self, components: impl IntoIterator<Item = &'a str>) -> String {
        let mut name = format!("{}{}", self.compound_opener, self.conjunction);
        for component in components {
            name.push_str(&self.separator);
            name.push_str(component);
        }
        name.push_str(&self.compound_closer);
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cada ordem temporal seleciona uma cópula diferente
    #[test]
    fn test_temporal_orders_have_distinct_symbols() {
        let symbols = Symbols::default();
        let names: Vec<&str> = [
            TemporalOrder::None,
            TemporalOrder::Forward,
            TemporalOrder::Concurrent,
            TemporalOrder::Backward,
        ]
        .into_iter()
        .map(|order| symbols.copula(Copula::Implication(order)))
        .collect();
        assert_eq!(names, vec!["==>", "=/>", "=|>", "=\\>"]);
    }

    #[test]
    fn test_higher_order_copulas() {
        assert!(Copula::Implication(TemporalOrder::Forward).is_higher_order());
        assert!(Copula::Equivalence.is_higher_order());
        assert!(!Copula::Inheritance.is_higher_order());
        assert!(!Copula::Similarity.is_higher_order());
    }

    #[test]
    fn test_names() {
        let symbols = Symbols::default();
        assert_eq!(
            symbols.statement_name("robin", Copula::Inheritance, "bird"),
            "<robin --> bird>"
        );
        assert_eq!(symbols.conjunction_name(["a", "b"]), "(&&,a,b)");
    }
}
