//! # Memory — Contexto Central do Kernel
//!
//! A [`Memory`] é o **solo** do jardim: possui o registro de termos, a bag de
//! Concepts, o buffer de novas tasks, o relógio de ciclos e os parâmetros.
//! Não há instância global: quem precisa da memória recebe uma referência
//! (ou um `Arc<Memory>`, já que ela é `Send + Sync`).
//!
//! ## Fluxo de uma Task
//!
//! ```text
//! input_task(task)
//!   └── buffer de novas tasks (Bag<Task>)
//!         │ process_new_task()
//!         ▼
//!   Concept do conteúdo (criado sob demanda)   ← também os Concepts do
//!         │ fire_concept(rules)                  sujeito e do predicado
//!         ▼
//!   InferenceRules::fire ⇒ tasks derivadas ⇒ input_task(...)
//! ```
//!
//! ## Evicção
//!
//! Um Concept que sai da bag (capacidade ou esquecimento) tem o observador
//! desanexado e a entrada do seu termo liberada no registro, se nenhum
//! outro detentor mantiver o termo vivo. Referências futuras ao mesmo nome
//! recriam o Concept do zero.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Parameters;
use crate::core::{Budget, Concept, Item, Punctuation, Sentence, Stamp, Task};
use crate::error::KernelResult;
use crate::inference::InferenceRules;
use crate::language::{Symbols, TermBuilder, TermRef};
use crate::storage::{ConceptBag, TaskBag, TermRegistry};

/// Resumo de um ciclo de raciocínio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Número do ciclo (começa em 1).
    pub cycle: u64,
    /// Uma nova task foi entregue a um Concept.
    pub processed: bool,
    /// Um Concept foi sorteado e disparado.
    pub fired: bool,
    /// Tasks derivadas pela inferência neste ciclo.
    pub derived: usize,
    /// Concepts removidos da memória neste ciclo.
    pub forgotten: usize,
}

/// Contexto de raciocínio: todo o estado mutável do kernel.
pub struct Memory {
    params: Parameters,
    symbols: Symbols,
    registry: TermRegistry,
    concepts: ConceptBag,
    new_tasks: TaskBag,
    serial: AtomicU64,
    cycles: AtomicU64,
}

impl Memory {
    /// Memória vazia com a tabela de símbolos padrão.
    pub fn new(params: Parameters) -> Self {
        Self::with_symbols(params, Symbols::default())
    }

    pub fn with_symbols(params: Parameters, symbols: Symbols) -> Self {
        tracing::info!(
            concepts = params.concept_bag_size,
            tasks = params.task_buffer_size,
            "Memória criada"
        );
        Self {
            concepts: ConceptBag::concepts(&params),
            new_tasks: TaskBag::task_buffer(&params),
            registry: TermRegistry::new(),
            serial: AtomicU64::new(0),
            cycles: AtomicU64::new(0),
            params,
            symbols,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn registry(&self) -> &TermRegistry {
        &self.registry
    }

    /// Construtor de termos ligado ao registro desta memória.
    pub fn terms(&self) -> TermBuilder<'_> {
        TermBuilder::new(&self.registry, &self.symbols)
    }

    /// Número de ciclos já iniciados.
    pub fn current_cycle(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Stamp de entrada com um serial novo.
    pub fn new_stamp(&self) -> Stamp {
        let serial = self.serial.fetch_add(1, Ordering::Relaxed) + 1;
        Stamp::input(serial, self.current_cycle())
    }

    /// Task de entrada com stamp novo e o orçamento padrão da pontuação.
    pub fn new_task(&self, content: TermRef, punctuation: Punctuation) -> Task {
        let budget = match punctuation {
            Punctuation::Judgment => self.params.judgment_budget(),
            Punctuation::Question | Punctuation::Goal => self.params.question_budget(),
        };
        Task::input(Sentence::new(content, punctuation, self.new_stamp()), budget)
    }

    /// Coloca uma task no buffer de novas tasks.
    ///
    /// Retorna a task que saiu do buffer por capacidade, se houver.
    pub fn input_task(&self, task: Task) -> Option<Task> {
        tracing::debug!(task = %task, "Memória: nova task");
        self.new_tasks.put(task)
    }

    /// Tasks aguardando processamento.
    pub fn pending_tasks(&self) -> usize {
        self.new_tasks.len()
    }

    /// Busca um termo vivo pelo nome canônico.
    pub fn name_to_listed_term(&self, name: &str) -> Option<TermRef> {
        self.registry.name_to_listed_term(name)
    }

    /// Acesso de leitura ao Concept de `name`, se residente.
    ///
    /// `f` roda com a bag de Concepts travada; não chame a memória de dentro
    /// dela.
    pub fn name_to_concept<R>(&self, name: &str, f: impl FnOnce(&Concept) -> R) -> Option<R> {
        self.concepts.with_item(name, f)
    }

    /// Acesso de escrita ao Concept de `name` (ex: anexar um observador).
    ///
    /// Mesma trava de [`Memory::name_to_concept`]; os ganchos de observador
    /// disparados aqui também rodam sob ela.
    pub fn with_concept_mut<R>(&self, name: &str, f: impl FnOnce(&mut Concept) -> R) -> Option<R> {
        self.concepts.with_item_mut(name, f)
    }

    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Chaves dos Concepts residentes, da maior para a menor prioridade.
    pub fn concept_keys(&self) -> Vec<String> {
        self.concepts.keys()
    }

    /// Garante um Concept para `term`, ativando-o com `budget`.
    ///
    /// Retorna `true` se o Concept está residente ao final; um Concept novo
    /// mais fraco que todos os residentes de uma bag cheia é descartado na
    /// própria inserção.
    pub fn get_or_create_concept(&self, term: &TermRef, budget: Budget) -> bool {
        let activated = self.concepts.with_item_mut(term.name(), |concept| {
            concept.budget_mut().merge_max(&budget);
            concept.update_state();
        });
        if activated.is_some() {
            return true;
        }
        let concept = Concept::new(term.clone(), budget, &self.params);
        tracing::debug!(concept = %term, "Memória: Concept criado");
        if let Some(evicted) = self.concepts.put(concept) {
            let rejected = evicted.key() == term.name();
            self.forget_concept(evicted);
            return !rejected;
        }
        true
    }

    /// Retira uma task do buffer e a entrega ao Concept do seu conteúdo e
    /// aos Concepts dos componentes do statement.
    ///
    /// Retorna `false` se o buffer estava vazio.
    pub fn process_new_task(&self) -> bool {
        let Some(task) = self.new_tasks.take_out() else {
            return false;
        };
        let content = task.content().clone();
        if content.is_statement() {
            for component in content.components() {
                self.deliver(component, task.clone());
            }
        }
        self.deliver(&content, task);
        true
    }

    fn deliver(&self, term: &TermRef, task: Task) {
        if !self.get_or_create_concept(term, *task.budget()) {
            tracing::debug!(concept = %term, task = %task, "Memória: Concept rejeitado, task descartada");
            return;
        }
        let outcome = self.concepts.with_item_mut(term.name(), |concept| concept.accept(task));
        if let Some(Some(dropped)) = outcome {
            tracing::debug!(concept = %term, task = %dropped, "Memória: task local removida");
        }
    }

    /// Sorteia um Concept, sorteia uma de suas tasks e aplica `rules`.
    ///
    /// As tasks derivadas vão para o buffer; task e Concept voltam às suas
    /// bags com esquecimento. Retorna `(disparou, derivadas, esquecidos)`.
    pub fn fire_concept(&self, rules: &dyn InferenceRules) -> KernelResult<(bool, usize, usize)> {
        let Some(mut concept) = self.concepts.take_out() else {
            return Ok((false, 0, 0));
        };
        let outcome = match concept.take_task() {
            Some(task) => {
                let derived = rules.fire(self, &concept, &task);
                if let Some(dropped) = concept.put_back_task(task) {
                    tracing::debug!(concept = %concept.key(), task = %dropped, "Memória: task esquecida");
                }
                concept.update_state();
                derived
            }
            None => Ok(Vec::new()),
        };

        let mut forgotten = 0;
        if let Some(evicted) = self.concepts.put_back(concept) {
            self.forget_concept(evicted);
            forgotten += 1;
        }

        let derived = outcome?;
        let count = derived.len();
        for task in derived {
            if let Some(dropped) = self.input_task(task) {
                tracing::debug!(task = %dropped, "Memória: task removida do buffer");
            }
        }
        Ok((true, count, forgotten))
    }

    /// Um passo completo de raciocínio.
    ///
    /// # Erros
    ///
    /// Propaga [`KernelError`](crate::error::KernelError) das regras de
    /// inferência (violação de consistência do registro).
    pub fn cycle(&self, rules: &dyn InferenceRules) -> KernelResult<CycleReport> {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let processed = self.process_new_task();
        let (fired, derived, forgotten) = self.fire_concept(rules)?;
        let report = CycleReport {
            cycle,
            processed,
            fired,
            derived,
            forgotten,
        };
        tracing::trace!(?report, "Memória: ciclo concluído");
        Ok(report)
    }

    fn forget_concept(&self, mut concept: Concept) {
        concept.detach_observer();
        let name = concept.key().to_string();
        tracing::debug!(
            concept = %name,
            priority = %format!("{:.3}", concept.priority()),
            "Memória: Concept esquecido"
        );
        drop(concept);
        self.registry.release(&name);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::RecordingObserver;
    use crate::inference::NoRules;
    use crate::language::TemporalOrder;

    fn seeded(params: Parameters) -> Memory {
        Memory::new(Parameters {
            seed: Some(11),
            ..params
        })
    }

    fn task_with_priority(memory: &Memory, content: &TermRef, priority: f32) -> Task {
        Task::input(
            Sentence::new(content.clone(), Punctuation::Judgment, memory.new_stamp()),
            Budget::new(priority, 0.9, 0.5),
        )
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_memory_is_shareable() {
        assert_send_sync::<Memory>();
    }

    /// robin/bird: "==>" e "=/>" são termos distintos; a busca pelo nome
    /// devolve o mesmo objeto da construção
    #[test]
    fn test_registry_scenario() {
        let memory = Memory::new(Parameters::default());
        let terms = memory.terms();
        let robin = terms.word("robin").unwrap().unwrap();
        let bird = terms.word("bird").unwrap().unwrap();
        let plain = terms
            .implication(Some(&robin), Some(&bird), TemporalOrder::None)
            .unwrap()
            .unwrap();
        let forward = terms
            .implication(Some(&robin), Some(&bird), TemporalOrder::Forward)
            .unwrap()
            .unwrap();
        assert!(!Arc::ptr_eq(&plain, &forward));
        assert_eq!(plain.name(), "<robin ==> bird>");
        assert_eq!(forward.name(), "<robin =/> bird>");

        let listed = memory.name_to_listed_term("<robin ==> bird>").unwrap();
        assert!(Arc::ptr_eq(&listed, &plain));
        let listed = memory.name_to_listed_term("<robin =/> bird>").unwrap();
        assert!(Arc::ptr_eq(&listed, &forward));
    }

    #[test]
    fn test_task_reaches_concepts() {
        let memory = seeded(Parameters::default());
        let terms = memory.terms();
        let robin = terms.word("robin").unwrap().unwrap();
        let bird = terms.word("bird").unwrap().unwrap();
        let statement = terms.inheritance(Some(&robin), Some(&bird)).unwrap().unwrap();

        memory.input_task(memory.new_task(statement.clone(), Punctuation::Judgment));
        assert_eq!(memory.pending_tasks(), 1);
        let report = memory.cycle(&NoRules).unwrap();
        assert_eq!(report.cycle, 1);
        assert!(report.processed);
        assert!(report.fired);
        assert_eq!(memory.pending_tasks(), 0);

        assert_eq!(memory.concept_count(), 3);
        for name in ["<robin --> bird>", "robin", "bird"] {
            let beliefs = memory.name_to_concept(name, |c| c.beliefs().len());
            assert_eq!(beliefs, Some(1), "Concept {}", name);
        }
    }

    /// Concept de baixa prioridade é removido, o registro é liberado quando
    /// ninguém mais segura o termo, e a próxima referência recria o Concept
    #[test]
    fn test_evicted_concept_is_recreated_lazily() {
        let memory = seeded(Parameters {
            concept_bag_size: 1,
            ..Parameters::default()
        });
        let weak = memory.terms().word("weak").unwrap().unwrap();
        let strong = memory.terms().word("strong").unwrap().unwrap();

        memory.input_task(task_with_priority(&memory, &weak, 0.3));
        assert!(memory.process_new_task());
        let observer = RecordingObserver::new();
        memory.with_concept_mut("weak", |c| c.start_play(Box::new(observer.clone())));

        memory.input_task(task_with_priority(&memory, &strong, 0.9));
        assert!(memory.process_new_task());
        assert!(memory.name_to_concept("weak", |_| ()).is_none());
        assert!(memory.name_to_concept("strong", |_| ()).is_some());
        assert!(observer.snapshot().detached);

        assert!(memory.name_to_listed_term("weak").is_some());
        drop(weak);
        assert!(memory.name_to_listed_term("weak").is_none());

        let weak = memory.terms().word("weak").unwrap().unwrap();
        memory.input_task(task_with_priority(&memory, &weak, 1.0));
        assert!(memory.process_new_task());
        assert_eq!(memory.name_to_concept("weak", |c| c.task_count()), Some(1));
        assert!(memory.name_to_concept("strong", |_| ()).is_none());
    }

    /// Um Concept que murcha abaixo do piso ao voltar para a bag sai da
    /// memória: o observador é desligado e o registro libera o termo
    #[test]
    fn test_faded_concept_leaves_memory() {
        let memory = seeded(Parameters {
            concept_forgetting_cycle: 1,
            ..Parameters::default()
        });
        let leaf = memory.terms().word("leaf").unwrap().unwrap();
        assert!(memory.get_or_create_concept(&leaf, Budget::new(0.5, 0.1, 0.0)));
        let observer = RecordingObserver::new();
        memory.with_concept_mut("leaf", |c| c.start_play(Box::new(observer.clone())));
        drop(leaf);
        assert!(memory.name_to_listed_term("leaf").is_some());

        let mut forgotten = 0;
        for _ in 0..10 {
            forgotten += memory.cycle(&NoRules).unwrap().forgotten;
            if memory.concept_count() == 0 {
                break;
            }
        }
        assert_eq!(memory.concept_count(), 0);
        assert_eq!(forgotten, 1);
        assert!(observer.snapshot().detached);
        assert!(memory.name_to_listed_term("leaf").is_none());
    }

    /// O observador recebe os refreshes da entrega de tasks; a memória é
    /// consultada depois, fora dos ganchos
    #[test]
    fn test_observer_reads_memory_after_hooks() {
        let memory = seeded(Parameters::default());
        let terms = memory.terms();
        let robin = terms.word("robin").unwrap().unwrap();
        let bird = terms.word("bird").unwrap().unwrap();
        assert!(memory.get_or_create_concept(&bird, Budget::default()));
        let observer = RecordingObserver::new();
        memory.with_concept_mut("bird", |c| c.start_play(Box::new(observer.clone())));
        assert_eq!(observer.snapshot().shown.len(), 1);

        let statement = terms.inheritance(Some(&robin), Some(&bird)).unwrap().unwrap();
        memory.input_task(memory.new_task(statement, Punctuation::Judgment));
        assert!(memory.process_new_task());

        let recording = observer.snapshot();
        assert!(recording.shown.len() > 1);
        let last = recording.shown.last().unwrap();
        assert!(last.contains("<robin --> bird>."));
        let shown = memory.name_to_concept("bird", |c| c.display_content());
        assert_eq!(shown.as_ref(), Some(last));
    }

    /// Um recém-chegado mais fraco que a bag cheia não chega a residir
    #[test]
    fn test_rejected_concept_drops_task() {
        let memory = seeded(Parameters {
            concept_bag_size: 1,
            ..Parameters::default()
        });
        let strong = memory.terms().word("strong").unwrap().unwrap();
        let faint = memory.terms().word("faint").unwrap().unwrap();
        assert!(memory.get_or_create_concept(&strong, Budget::new(0.9, 0.5, 0.5)));
        assert!(!memory.get_or_create_concept(&faint, Budget::new(0.1, 0.5, 0.5)));
        assert_eq!(memory.concept_keys(), vec!["strong".to_string()]);
    }

    #[test]
    fn test_reference_activates_existing_concept() {
        let memory = seeded(Parameters::default());
        let cat = memory.terms().word("cat").unwrap().unwrap();
        memory.get_or_create_concept(&cat, Budget::new(0.2, 0.5, 0.5));
        memory.get_or_create_concept(&cat, Budget::new(0.7, 0.5, 0.5));
        let priority = memory.name_to_concept("cat", |c| c.priority()).unwrap();
        assert!((priority - 0.7).abs() < 1e-6);
        assert_eq!(memory.concept_count(), 1);
    }

    #[test]
    fn test_empty_memory_cycles_quietly() {
        let memory = seeded(Parameters::default());
        let report = memory.cycle(&NoRules).unwrap();
        assert!(!report.processed);
        assert!(!report.fired);
        assert_eq!(memory.current_cycle(), 1);
    }

    #[test]
    fn test_stamps_get_fresh_serials() {
        let memory = Memory::new(Parameters::default());
        let a = memory.new_stamp();
        let b = memory.new_stamp();
        assert!(!a.overlaps(&b));
    }

    /// Entrada concorrente enquanto ciclos rodam em outra thread
    #[test]
    fn test_concurrent_input_and_cycles() {
        let memory = Arc::new(seeded(Parameters::default()));
        let words: Vec<TermRef> = (0..20)
            .map(|i| memory.terms().word(&format!("w{}", i)).unwrap().unwrap())
            .collect();

        let feeder = {
            let memory = Arc::clone(&memory);
            std::thread::spawn(move || {
                for word in words {
                    memory.input_task(memory.new_task(word, Punctuation::Judgment));
                }
            })
        };
        for _ in 0..50 {
            memory.cycle(&NoRules).unwrap();
        }
        feeder.join().unwrap();
        while memory.process_new_task() {}
        assert!(memory.concept_count() > 0);
        assert!(memory.concept_count() <= memory.params().concept_bag_size);
    }
}
