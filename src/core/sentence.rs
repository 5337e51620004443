//! # Sentence — Statement + Pontuação + Stamp
//!
//! Uma [`Sentence`] é o conteúdo de uma [`Task`](super::Task): um termo
//! canônico, o tipo de sentença ([`Punctuation`]) e o [`Stamp`] com a sua
//! origem evidencial. A sentença pertence exclusivamente à Task; o termo é
//! compartilhado (`TermRef`).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stamp::Stamp;
use crate::language::TermRef;

/// Tipo da sentença.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    /// `.` — afirmação.
    Judgment,
    /// `?` — pergunta.
    Question,
    /// `!` — objetivo.
    Goal,
}

impl Punctuation {
    pub fn symbol(&self) -> char {
        match self {
            Punctuation::Judgment => '.',
            Punctuation::Question => '?',
            Punctuation::Goal => '!',
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sentence {
    content: TermRef,
    punctuation: Punctuation,
    stamp: Stamp,
}

impl Sentence {
    pub fn new(content: TermRef, punctuation: Punctuation, stamp: Stamp) -> Self {
        Self {
            content,
            punctuation,
            stamp,
        }
    }

    pub fn content(&self) -> &TermRef {
        &self.content
    }

    pub fn punctuation(&self) -> Punctuation {
        self.punctuation
    }

    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    pub fn is_judgment(&self) -> bool {
        self.punctuation == Punctuation::Judgment
    }

    /// Chave: conteúdo + pontuação (ex: `<robin --> bird>.`).
    ///
    /// A base evidencial não entra na chave: duas entradas da mesma sentença
    /// disputam o mesmo lugar na bag.
    pub fn key(&self) -> String {
        format!("{}{}", self.content.name(), self.punctuation.symbol())
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {:?}",
            self.content.name(),
            self.punctuation.symbol(),
            self.stamp.evidential_base()
        )
    }
}
