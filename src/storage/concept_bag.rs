//! Bag de [`Concept`]s da memória.

use super::bag::Bag;
use super::task_bag::config;
use crate::config::Parameters;
use crate::core::Concept;

pub type ConceptBag = Bag<Concept>;

impl Bag<Concept> {
    /// Bag de Concepts com capacidade `concept_bag_size`.
    pub fn concepts(params: &Parameters) -> Self {
        Bag::new(
            "concepts",
            config(params, params.concept_bag_size, params.concept_forgetting_cycle),
        )
    }
}
