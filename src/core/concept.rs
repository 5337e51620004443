//! # Concept — Unidade de Memória de um Termo
//!
//! Um [`Concept`] é tudo o que o sistema sabe sobre **um** termo canônico.
//! Ele é criado preguiçosamente na primeira vez que o termo aparece no
//! raciocínio e vive numa [`ConceptBag`](crate::storage::ConceptBag) até que
//! a falta de uso o faça ser esquecido.
//!
//! ## Analogia: A Planta no Jardim
//!
//! - Nasce quando o termo é mencionado pela primeira vez ("semeadura")
//! - Recebe **prioridade** a cada task que chega ("rega")
//! - Perde prioridade a cada devolução à bag ("poda natural")
//! - Passa por estados: **Ativo → Dormente → Esmaecendo**, e então some
//!
//! ## Conteúdo
//!
//! | Campo | Descrição |
//! |-------|-----------|
//! | `term` | O termo canônico (`Arc` compartilhado com as Tasks) |
//! | `budget` | Orçamento de atenção do Concept na bag de Concepts |
//! | `tasks` | Bag local com as Tasks relacionadas ao termo |
//! | `beliefs` | Tabela de crenças (carga opaca, gerenciada externamente) |
//! | `observer` | Colaborador de exibição anexado, se houver |

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::budget::Budget;
use super::item::Item;
use super::observer::ConceptObserver;
use super::sentence::Sentence;
use super::task::Task;
use crate::config::Parameters;
use crate::language::TermRef;
use crate::storage::TaskBag;

/// Ciclo de vida de um Concept, derivado da prioridade.
///
/// ```text
/// 🌿 Active (p > 0.5)  →  💤 Dormant (0.2 < p ≤ 0.5)  →  🍂 Fading (p ≤ 0.2)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConceptState {
    Active,
    Dormant,
    Fading,
}

impl ConceptState {
    fn from_priority(priority: f32) -> Self {
        if priority > 0.5 {
            ConceptState::Active
        } else if priority > 0.2 {
            ConceptState::Dormant
        } else {
            ConceptState::Fading
        }
    }

    /// Label legível em PT-BR.
    pub fn label(&self) -> &'static str {
        match self {
            ConceptState::Active => "Ativo",
            ConceptState::Dormant => "Dormente",
            ConceptState::Fading => "Esmaecendo",
        }
    }
}

/// Tabela de crenças de um Concept.
///
/// O kernel não interpreta as crenças: só as guarda, mais recentes primeiro,
/// até `capacity`. Uma crença com a mesma chave substitui a anterior.
#[derive(Clone, Debug, Default)]
pub struct BeliefTable {
    sentences: Vec<Sentence>,
    capacity: usize,
}

impl BeliefTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            sentences: Vec::new(),
            capacity,
        }
    }

    pub fn add(&mut self, sentence: Sentence) {
        let key = sentence.key();
        self.sentences.retain(|s| s.key() != key);
        self.sentences.insert(0, sentence);
        self.sentences.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Unidade de memória de longo prazo para um termo canônico.
pub struct Concept {
    key: String,
    term: TermRef,
    budget: Budget,
    state: ConceptState,
    tasks: TaskBag,
    beliefs: BeliefTable,
    created_at: DateTime<Utc>,
    observer: Option<Box<dyn ConceptObserver>>,
}

impl Concept {
    /// Cria um Concept vazio para `term`.
    pub fn new(term: TermRef, budget: Budget, params: &Parameters) -> Self {
        Self {
            key: term.name().to_string(),
            state: ConceptState::from_priority(budget.priority()),
            term,
            budget,
            tasks: TaskBag::task_links(params),
            beliefs: BeliefTable::new(params.belief_table_size),
            created_at: Utc::now(),
            observer: None,
        }
    }

    pub fn term(&self) -> &TermRef {
        &self.term
    }

    pub fn state(&self) -> ConceptState {
        self.state
    }

    pub fn beliefs(&self) -> &BeliefTable {
        &self.beliefs
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Número de tasks pendentes neste Concept.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Recebe uma task sobre este termo.
    ///
    /// Afirmações entram na tabela de crenças; toda task entra na bag local;
    /// a prioridade do Concept sobe até a prioridade da task. Retorna a task
    /// removida da bag local por capacidade, se houver.
    pub fn accept(&mut self, task: Task) -> Option<Task> {
        if task.sentence().is_judgment() {
            self.beliefs.add(task.sentence().clone());
        }
        if task.priority() > self.budget.priority() {
            self.budget.set_priority(task.priority());
        }
        let evicted = self.tasks.put(task);
        self.update_state();
        evicted
    }

    /// Retira uma task da bag local.
    pub fn take_task(&self) -> Option<Task> {
        self.tasks.take_out()
    }

    /// Devolve uma task à bag local, com esquecimento.
    pub fn put_back_task(&self, task: Task) -> Option<Task> {
        self.tasks.put_back(task)
    }

    /// Recalcula o estado e avisa o observador.
    pub fn update_state(&mut self) {
        self.state = ConceptState::from_priority(self.budget.priority());
        if self.observer.is_some() {
            let content = self.display_content();
            if let Some(observer) = self.observer.as_mut() {
                observer.refresh(&content);
            }
        }
    }

    /// Snapshot textual do conteúdo, entregue ao observador.
    pub fn display_content(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} ${:.2};{:.2};{:.2}$ [{}]",
            self.key,
            self.budget.priority(),
            self.budget.durability(),
            self.budget.quality(),
            self.state.label()
        );
        let _ = writeln!(out, "--- Crenças ({}) ---", self.beliefs.len());
        for belief in self.beliefs.iter() {
            let _ = writeln!(out, "{}", belief);
        }
        let _ = writeln!(out, "--- Tasks ({}) ---", self.tasks.len());
        for key in self.tasks.keys() {
            let _ = writeln!(out, "{}", key);
        }
        out
    }

    /// Anexa um observador e inicia a transmissão ao vivo.
    ///
    /// Um observador anterior é desanexado.
    pub fn start_play(&mut self, mut observer: Box<dyn ConceptObserver>) {
        self.detach_observer();
        observer.start_play(&self.key, &self.display_content());
        self.observer = Some(observer);
    }

    /// Exibe o conteúdo atual no observador anexado.
    pub fn play(&mut self) {
        let content = self.display_content();
        if let Some(observer) = self.observer.as_mut() {
            observer.post(&content);
        }
    }

    /// Encerra a transmissão ao vivo (o observador continua anexado).
    pub fn stop(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.stop();
        }
    }

    /// Descarta o observador, avisando-o.
    pub fn detach_observer(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.detach_from_concept();
        }
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }
}

impl Item for Concept {
    fn key(&self) -> &str {
        &self.key
    }

    fn budget(&self) -> &Budget {
        &self.budget
    }

    fn budget_mut(&mut self) -> &mut Budget {
        &mut self.budget
    }

    /// Duas instâncias do mesmo Concept (ex: uma recriada enquanto a outra
    /// estava fora da bag) são unidas: crenças e tasks vão para o residente.
    fn absorb(&mut self, mut other: Self) {
        let mut incoming: Vec<Sentence> = other.beliefs.iter().cloned().collect();
        incoming.reverse();
        for belief in incoming {
            self.beliefs.add(belief);
        }
        for task in other.tasks.drain() {
            self.tasks.put(task);
        }
        if self.observer.is_none() {
            self.observer = other.observer.take();
        } else {
            other.detach_observer();
        }
        self.update_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::observer::RecordingObserver;
    use crate::core::{Punctuation, Stamp};
    use crate::language::{Symbols, TermBuilder};
    use crate::storage::TermRegistry;

    fn fixture() -> (TermRegistry, Symbols) {
        (TermRegistry::new(), Symbols::default())
    }

    fn task(term: &TermRef, punctuation: Punctuation, serial: u64, priority: f32) -> Task {
        Task::input(
            Sentence::new(term.clone(), punctuation, Stamp::input(serial, 0)),
            Budget::new(priority, 0.8, 0.5),
        )
    }

    #[test]
    fn test_accept_records_beliefs_and_tasks() {
        let (registry, symbols) = fixture();
        let terms = TermBuilder::new(&registry, &symbols);
        let robin = terms.word("robin").unwrap().unwrap();
        let params = Parameters::default();
        let mut concept = Concept::new(robin.clone(), Budget::new(0.1, 0.5, 0.5), &params);
        assert_eq!(concept.state(), ConceptState::Fading);

        concept.accept(task(&robin, Punctuation::Judgment, 1, 0.9));
        concept.accept(task(&robin, Punctuation::Question, 2, 0.4));
        assert_eq!(concept.beliefs().len(), 1);
        assert_eq!(concept.task_count(), 2);
        assert_eq!(concept.state(), ConceptState::Active);
        assert!((concept.priority() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_belief_table_bounded_and_replacing() {
        let (registry, symbols) = fixture();
        let terms = TermBuilder::new(&registry, &symbols);
        let mut table = BeliefTable::new(2);
        let words: Vec<TermRef> = ["a", "b", "c"]
            .iter()
            .map(|w| terms.word(w).unwrap().unwrap())
            .collect();
        for (i, w) in words.iter().enumerate() {
            table.add(Sentence::new(w.clone(), Punctuation::Judgment, Stamp::input(i as u64, 0)));
        }
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next().unwrap().content().name(), "c");
        table.add(Sentence::new(words[1].clone(), Punctuation::Judgment, Stamp::input(9, 0)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next().unwrap().stamp().evidential_base(), &[9]);
    }

    /// Protocolo de exibição: start_play, refresh só quando "showing", stop, detach
    #[test]
    fn test_observer_protocol() {
        let (registry, symbols) = fixture();
        let terms = TermBuilder::new(&registry, &symbols);
        let bird = terms.word("bird").unwrap().unwrap();
        let params = Parameters::default();
        let mut concept = Concept::new(bird.clone(), Budget::default(), &params);

        let first = RecordingObserver::new();
        concept.start_play(Box::new(first.clone()));
        assert_eq!(first.snapshot().started, 1);
        assert!(first.snapshot().showing);

        concept.accept(task(&bird, Punctuation::Judgment, 1, 0.7));
        assert_eq!(first.snapshot().shown.len(), 2);

        concept.stop();
        concept.accept(task(&bird, Punctuation::Question, 2, 0.7));
        assert_eq!(first.snapshot().shown.len(), 2);

        concept.play();
        assert_eq!(first.snapshot().shown.len(), 3);
        assert!(first.snapshot().shown[2].contains("bird?"));

        let second = RecordingObserver::new();
        concept.start_play(Box::new(second.clone()));
        assert!(first.snapshot().detached);
        assert!(!second.snapshot().detached);

        concept.detach_observer();
        assert!(second.snapshot().detached);
        assert!(!concept.has_observer());
    }

    #[test]
    fn test_absorb_moves_content() {
        let (registry, symbols) = fixture();
        let terms = TermBuilder::new(&registry, &symbols);
        let cat = terms.word("cat").unwrap().unwrap();
        let params = Parameters::default();
        let mut resident = Concept::new(cat.clone(), Budget::default(), &params);
        let mut fresh = Concept::new(cat.clone(), Budget::default(), &params);
        fresh.accept(task(&cat, Punctuation::Judgment, 4, 0.6));
        resident.absorb(fresh);
        assert_eq!(resident.beliefs().len(), 1);
        assert_eq!(resident.task_count(), 1);
    }
}
