//! # Bag — Contêiner Limitado com Seleção Probabilística
//!
//! A [`Bag`] é a memória de trabalho do kernel: guarda até `capacity` itens,
//! devolve itens com probabilidade proporcional à prioridade e **esquece**:
//! itens que não são reforçados perdem prioridade a cada devolução até
//! sumirem.
//!
//! ## Analogia: O Canteiro
//!
//! Se os Concepts são plantas, a bag é o **canteiro**: tem espaço limitado.
//! Plantar algo novo num canteiro cheio arranca a planta mais fraca, e plantas
//! que ninguém rega murcham até desaparecer.
//!
//! ## Estrutura Interna
//!
//! ```text
//! slots:  HashMap<chave, (item, nível, seq)>        busca O(1) por chave
//! levels: [VecDeque<chave>; L]                       nível = ⌊p × L⌋
//! mass:   [Σ prioridades do nível; L]                massa por nível
//! order:  BTreeMap<(bits(p), seq), chave>            mínimo em O(log n)
//! ```
//!
//! ## Operações
//!
//! | Operação | Efeito |
//! |----------|--------|
//! | [`put`](Bag::put) | Insere ou funde por chave; acima da capacidade remove o item de menor prioridade |
//! | [`take_out`](Bag::take_out) | Sorteia um nível pela massa, retira o item mais antigo do nível |
//! | [`put_back`](Bag::put_back) | Aplica o esquecimento e reinsere (ou descarta abaixo do piso) |
//!
//! ## Esquecimento
//!
//! ```text
//! fator = durabilidade ^ (ciclos_decorridos / (forget_cycles × (1 + qualidade)))
//! ```
//!
//! Mais ciclos de esquecimento configurados ⇒ decaimento mais lento.
//! `forget_cycles = 0` desliga o esquecimento (fator 1.0).
//!
//! ## Desempate
//!
//! Entre itens com a mesma prioridade, a evicção escolhe o residente mais
//! antigo (menor `seq`), o que torna o comportamento reproduzível em testes.
//!
//! ## Concorrência
//!
//! Todo o estado fica atrás de um único `parking_lot::Mutex`: `put`,
//! `take_out` e `put_back` são atômicos entre si. Nenhuma operação bloqueia
//! esperando itens: bag vazia devolve `None` na hora.

use std::collections::{BTreeMap, HashMap, VecDeque};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::item::{Item, MergePolicy};

/// Parâmetros de uma bag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BagConfig {
    /// Número máximo de itens.
    pub capacity: usize,
    /// Ciclos de esquecimento ativos (0 = sem esquecimento).
    pub forget_cycles: u32,
    /// Valor restaurado por [`Bag::reset_forget_cycles`].
    pub default_forget_cycles: u32,
    /// Quantidade de níveis de prioridade.
    pub levels: usize,
    /// Prioridade mínima para sobreviver a um `put_back`.
    pub priority_floor: f32,
    /// Semente do sorteio; `None` usa entropia do sistema.
    pub seed: Option<u64>,
}

impl BagConfig {
    pub fn new(capacity: usize, forget_cycles: u32) -> Self {
        Self {
            capacity,
            forget_cycles,
            default_forget_cycles: forget_cycles,
            levels: 10,
            priority_floor: 0.01,
            seed: None,
        }
    }

    /// Bag sem esquecimento (fator de decaimento sempre 1.0).
    pub fn without_forgetting(capacity: usize) -> Self {
        Self::new(capacity, 0)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_floor(mut self, floor: f32) -> Self {
        self.priority_floor = floor;
        self
    }

    pub fn with_default_forget_cycles(mut self, cycles: u32) -> Self {
        self.default_forget_cycles = cycles;
        self
    }
}

/// Bag de prioridade genérica, segura para acesso concorrente.
pub struct Bag<T: Item> {
    name: &'static str,
    inner: Mutex<BagInner<T>>,
}

struct Slot<T> {
    item: T,
    level: usize,
    seq: u64,
}

struct BagInner<T> {
    capacity: usize,
    forget_cycles: u32,
    default_forget_cycles: u32,
    priority_floor: f32,
    slots: HashMap<String, Slot<T>>,
    levels: Vec<VecDeque<String>>,
    mass: Vec<f64>,
    order: BTreeMap<(u32, u64), String>,
    clock: u64,
    next_seq: u64,
    rng: StdRng,
}

impl<T: Item> Bag<T> {
    /// Cria uma bag vazia. `name` aparece nos logs.
    pub fn new(name: &'static str, config: BagConfig) -> Self {
        let levels = config.levels.max(1);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            name,
            inner: Mutex::new(BagInner {
                capacity: config.capacity,
                forget_cycles: config.forget_cycles,
                default_forget_cycles: config.default_forget_cycles,
                priority_floor: config.priority_floor,
                slots: HashMap::new(),
                levels: vec![VecDeque::new(); levels],
                mass: vec![0.0; levels],
                order: BTreeMap::new(),
                clock: 0,
                next_seq: 0,
                rng,
            }),
        }
    }

    /// Insere por chave. Retorna o item removido por capacidade, se houve um.
    ///
    /// - Chave existente: funde segundo a [`MergePolicy`] do item que chega.
    /// - Chave nova com a bag cheia: remove exatamente um item, o de menor
    ///   prioridade, podendo ser o próprio recém-chegado.
    pub fn put(&self, item: T) -> Option<T> {
        let evicted = self.inner.lock().put(item);
        if let Some(ref old) = evicted {
            tracing::debug!(
                bag = self.name,
                key = %old.key(),
                priority = %format!("{:.3}", old.priority()),
                "Bag: item removido por capacidade"
            );
        }
        evicted
    }

    /// Retira um item por sorteio ponderado pela prioridade.
    ///
    /// Avança o relógio lógico da bag. Bag vazia ⇒ `None`, sem esperar.
    pub fn take_out(&self) -> Option<T> {
        self.inner.lock().take_out()
    }

    /// Devolve um item retirado, aplicando o esquecimento.
    ///
    /// Retorna o item que saiu da bag nesta operação: o próprio item, se a
    /// prioridade caiu abaixo do piso, ou o item removido por capacidade.
    pub fn put_back(&self, mut item: T) -> Option<T> {
        let mut inner = self.inner.lock();
        inner.forget(&mut item);
        if item.priority() < inner.priority_floor {
            drop(inner);
            tracing::debug!(bag = self.name, key = %item.key(), "Bag: item esquecido");
            return Some(item);
        }
        let evicted = inner.put(item);
        drop(inner);
        if let Some(ref old) = evicted {
            tracing::debug!(bag = self.name, key = %old.key(), "Bag: item removido por capacidade");
        }
        evicted
    }

    /// Remove um item específico pela chave.
    pub fn pick(&self, key: &str) -> Option<T> {
        self.inner.lock().remove(key).map(|(item, _)| item)
    }

    /// Acesso de leitura a um residente.
    pub fn with_item<R>(&self, key: &str, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.inner.lock().slots.get(key).map(|slot| f(&slot.item))
    }

    /// Acesso de escrita a um residente; o nível é recalculado em seguida.
    pub fn with_item_mut<R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut inner = self.inner.lock();
        let (mut item, seq) = inner.remove(key)?;
        let result = f(&mut item);
        inner.insert(key.to_string(), item, seq);
        Some(result)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chaves residentes, da maior para a menor prioridade.
    pub fn keys(&self) -> Vec<String> {
        self.inner.lock().order.values().rev().cloned().collect()
    }

    /// Prioridade média dos residentes (0.0 se vazia).
    pub fn average_priority(&self) -> f32 {
        let inner = self.inner.lock();
        if inner.slots.is_empty() {
            return 0.0;
        }
        let total: f64 = inner.mass.iter().sum();
        (total / inner.slots.len() as f64) as f32
    }

    /// Esvazia a bag, devolvendo todos os itens.
    pub fn drain(&self) -> Vec<T> {
        let mut inner = self.inner.lock();
        let keys: Vec<String> = inner.slots.keys().cloned().collect();
        keys.iter()
            .filter_map(|k| inner.remove(k).map(|(item, _)| item))
            .collect()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    pub fn forget_cycles(&self) -> u32 {
        self.inner.lock().forget_cycles
    }

    /// Ajusta a taxa de esquecimento em tempo de execução.
    pub fn set_forget_cycles(&self, cycles: u32) {
        self.inner.lock().forget_cycles = cycles;
    }

    /// Volta à taxa de esquecimento padrão da bag.
    pub fn reset_forget_cycles(&self) {
        let mut inner = self.inner.lock();
        inner.forget_cycles = inner.default_forget_cycles;
    }

    /// Relógio lógico (número de `take_out`s bem-sucedidos).
    pub fn clock(&self) -> u64 {
        self.inner.lock().clock
    }
}

impl<T: Item> BagInner<T> {
    fn put(&mut self, item: T) -> Option<T> {
        let key = item.key().to_string();
        if let Some((resident, seq)) = self.remove(&key) {
            let merged = match item.merge_policy() {
                MergePolicy::Replace => {
                    let seq = self.bump_seq();
                    self.insert(key, item, seq);
                    return None;
                }
                MergePolicy::Max => {
                    let mut resident = resident;
                    let incoming = *item.budget();
                    resident.budget_mut().merge_max(&incoming);
                    resident.absorb(item);
                    resident
                }
            };
            self.insert(key, merged, seq);
            return None;
        }

        let seq = self.bump_seq();
        self.insert(key, item, seq);
        if self.slots.len() > self.capacity {
            let weakest = self.order.values().next().cloned()?;
            return self.remove(&weakest).map(|(item, _)| item);
        }
        None
    }

    fn take_out(&mut self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }
        let level = self.choose_level()?;
        let key = self.levels[level].front().cloned()?;
        self.clock += 1;
        self.remove(&key).map(|(item, _)| item)
    }

    /// Sorteia um nível não-vazio com probabilidade proporcional à massa.
    fn choose_level(&mut self) -> Option<usize> {
        let occupied: Vec<usize> = (0..self.levels.len())
            .filter(|&i| !self.levels[i].is_empty())
            .collect();
        let highest = *occupied.last()?;
        let total: f64 = occupied.iter().map(|&i| self.mass[i].max(0.0)).sum();
        if total <= f64::EPSILON {
            return Some(highest);
        }
        let mut draw = self.rng.random_range(0.0..total);
        for &i in &occupied {
            let mass = self.mass[i].max(0.0);
            if draw < mass {
                return Some(i);
            }
            draw -= mass;
        }
        Some(highest)
    }

    fn forget(&self, item: &mut T) {
        if self.forget_cycles == 0 {
            return;
        }
        let budget = item.budget();
        let elapsed = self.clock.saturating_sub(budget.last_update()).max(1) as f32;
        let horizon = self.forget_cycles as f32 * (1.0 + budget.quality());
        let factor = budget.durability().powf(elapsed / horizon);
        item.budget_mut().decay(factor);
    }

    fn insert(&mut self, key: String, mut item: T, seq: u64) {
        item.budget_mut().touch(self.clock);
        let priority = item.priority();
        let level = self.level_of(priority);
        self.levels[level].push_back(key.clone());
        self.mass[level] += priority as f64;
        self.order.insert((order_bits(priority), seq), key.clone());
        self.slots.insert(key, Slot { item, level, seq });
    }

    fn remove(&mut self, key: &str) -> Option<(T, u64)> {
        let slot = self.slots.remove(key)?;
        let priority = slot.item.priority();
        let bucket = &mut self.levels[slot.level];
        if let Some(pos) = bucket.iter().position(|k| k == key) {
            bucket.remove(pos);
        }
        self.mass[slot.level] = if bucket.is_empty() {
            0.0
        } else {
            (self.mass[slot.level] - priority as f64).max(0.0)
        };
        self.order.remove(&(order_bits(priority), slot.seq));
        Some((slot.item, slot.seq))
    }

    fn level_of(&self, priority: f32) -> usize {
        let levels = self.levels.len();
        ((priority * levels as f32) as usize).min(levels - 1)
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Bits de um `f32` não-negativo preservam a ordem numérica.
fn order_bits(priority: f32) -> u32 {
    if priority <= 0.0 {
        0
    } else {
        priority.to_bits()
    }
}
