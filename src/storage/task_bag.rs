//! Bags de [`Task`]: o buffer de novas tasks da memória e a bag local de
//! cada Concept.

use super::bag::{Bag, BagConfig};
use crate::config::Parameters;
use crate::core::Task;

pub type TaskBag = Bag<Task>;

impl Bag<Task> {
    /// Buffer de novas tasks.
    ///
    /// Esquece com `task_forgetting_cycle`; `reset_forget_cycles` volta a
    /// `new_task_forgetting_cycle`.
    pub fn task_buffer(params: &Parameters) -> Self {
        Bag::new("tasks", config(params, params.task_buffer_size, params.task_forgetting_cycle)
            .with_default_forget_cycles(params.new_task_forgetting_cycle))
    }

    /// Bag local de tasks de um Concept.
    pub fn task_links(params: &Parameters) -> Self {
        Bag::new(
            "task_links",
            config(params, params.task_link_bag_size, params.task_link_forgetting_cycle),
        )
    }
}

/// Configuração comum derivada dos parâmetros globais.
pub(crate) fn config(params: &Parameters, capacity: usize, forget_cycles: u32) -> BagConfig {
    let config = BagConfig::new(capacity, forget_cycles)
        .with_levels(params.bag_levels)
        .with_floor(params.priority_floor);
    match params.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    }
}
