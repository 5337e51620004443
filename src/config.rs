//! # Configuração — Parâmetros do Kernel
//!
//! Constantes numéricas consumidas pelas bags e pela memória. São entradas
//! somente-leitura: depois que a [`Memory`](crate::memory::Memory) é criada,
//! mudar os parâmetros não afeta as bags existentes (exceto a taxa de
//! esquecimento, que pode ser ajustada na própria bag).
//!
//! ## Arquivo
//!
//! Lidos de `data/parameters.json`. Campos ausentes usam o padrão; arquivo
//! ausente ⇒ todos os padrões.
//!
//! ```json
//! { "task_buffer_size": 10, "concept_bag_size": 1000, "seed": 42 }
//! ```
//!
//! | Parâmetro | Padrão | Uso |
//! |-----------|--------|-----|
//! | `task_buffer_size` | 10 | Capacidade da bag de novas tasks |
//! | `task_forgetting_cycle` | 10 | Esquecimento ativo da bag de novas tasks |
//! | `new_task_forgetting_cycle` | 10 | Valor padrão restaurado por `reset_forget_cycles` |
//! | `concept_bag_size` | 1000 | Capacidade da bag de Concepts |
//! | `concept_forgetting_cycle` | 10 | Esquecimento da bag de Concepts |
//! | `task_link_bag_size` | 20 | Capacidade da bag de tasks de cada Concept |
//! | `task_link_forgetting_cycle` | 20 | Esquecimento da bag de tasks de cada Concept |
//! | `bag_levels` | 10 | Níveis de prioridade de toda bag |
//! | `priority_floor` | 0.01 | Prioridade mínima para sobreviver a um `put_back` |
//! | `belief_table_size` | 7 | Crenças guardadas por Concept |

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Budget;

/// Caminho padrão do arquivo de parâmetros (relativo à raiz do projeto).
pub const PARAMETERS_PATH: &str = "data/parameters.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub task_buffer_size: usize,
    pub task_forgetting_cycle: u32,
    pub new_task_forgetting_cycle: u32,
    pub concept_bag_size: usize,
    pub concept_forgetting_cycle: u32,
    pub task_link_bag_size: usize,
    pub task_link_forgetting_cycle: u32,
    pub bag_levels: usize,
    pub priority_floor: f32,
    pub belief_table_size: usize,
    pub default_judgment_priority: f32,
    pub default_judgment_durability: f32,
    pub default_question_priority: f32,
    pub default_question_durability: f32,
    /// Semente dos sorteios; fixe para execuções reproduzíveis.
    pub seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            task_buffer_size: 10,
            task_forgetting_cycle: 10,
            new_task_forgetting_cycle: 10,
            concept_bag_size: 1000,
            concept_forgetting_cycle: 10,
            task_link_bag_size: 20,
            task_link_forgetting_cycle: 20,
            bag_levels: 10,
            priority_floor: 0.01,
            belief_table_size: 7,
            default_judgment_priority: 0.8,
            default_judgment_durability: 0.8,
            default_question_priority: 0.9,
            default_question_durability: 0.9,
            seed: None,
        }
    }
}

impl Parameters {
    /// Carrega os parâmetros de `path`, ou os padrões se o arquivo não existir.
    ///
    /// # Erros
    ///
    /// Retorna erro se o arquivo existir mas não puder ser lido ou não for
    /// um JSON compatível.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Nenhum {} encontrado, usando parâmetros padrão", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Falha ao ler {}", path.display()))?;
        let params: Parameters = serde_json::from_str(&json)
            .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
        Ok(params)
    }

    /// Orçamento inicial de uma afirmação de entrada.
    pub fn judgment_budget(&self) -> Budget {
        Budget::new(
            self.default_judgment_priority,
            self.default_judgment_durability,
            0.5,
        )
    }

    /// Orçamento inicial de uma pergunta (ou objetivo) de entrada.
    pub fn question_budget(&self) -> Budget {
        Budget::new(
            self.default_question_priority,
            self.default_question_durability,
            0.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let params = Parameters::load("data/definitely-not-here.json").unwrap();
        assert_eq!(params, Parameters::default());
    }

    /// Campos ausentes no JSON ficam com o padrão
    #[test]
    fn test_partial_json() {
        let params: Parameters =
            serde_json::from_str(r#"{ "task_buffer_size": 2, "seed": 9 }"#).unwrap();
        assert_eq!(params.task_buffer_size, 2);
        assert_eq!(params.seed, Some(9));
        assert_eq!(params.concept_bag_size, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("nars-params-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "concept_bag_size": 3 }"#).unwrap();
        let params = Parameters::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(params.concept_bag_size, 3);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = std::env::temp_dir().join(format!("nars-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let result = Parameters::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
