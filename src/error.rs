//! # Erros do Kernel — Violações de Consistência
//!
//! O kernel distingue dois tipos de "falha" muito diferentes:
//!
//! | Situação | Representação | Tratamento |
//! |----------|---------------|------------|
//! | Construção inválida (ex: `<a ==> a>`) | `Ok(None)` | Resultado normal, absorvido na construção |
//! | Bag vazia | `None` | Resultado normal, o ciclo pula a etapa |
//! | Evicção por capacidade | `Some(item)` devolvido por `put` | Efeito colateral observável |
//! | Registro corrompido | `Err(KernelError)` | **Fatal**, aborta a operação |
//!
//! Apenas o último caso é um erro de verdade. Um [`KernelError`] indica que o
//! estado canônico compartilhado (o registro de termos) não é mais confiável;
//! por isso ele é propagado com `?` até o topo do ciclo de raciocínio, e o
//! binário encerra o processo ao recebê-lo.

use thiserror::Error;

/// Violação de consistência interna do kernel.
///
/// Nunca é causada por entrada malformada: entradas inválidas produzem
/// `Ok(None)` nos construtores de termos.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// O registro devolveu, sob o nome canônico esperado, um termo de outro formato.
    ///
    /// Exemplo: procurando a Implicação `<a ==> b>` e encontrando uma Conjunção
    /// registrada sob o mesmo nome. Isso só acontece se o registro estiver corrompido.
    #[error("termo '{name}' deveria ser {expected}, mas o registro contém {found}")]
    TermTypeMismatch {
        /// Nome canônico consultado.
        name: String,
        /// Formato esperado pelo construtor.
        expected: &'static str,
        /// Formato encontrado no registro.
        found: &'static str,
    },

    /// A redução de implicações encadeadas excedeu a profundidade máxima.
    ///
    /// Cada passo de absorção remove um nível de aninhamento do predicado,
    /// então uma recursão sem fim indica um grafo de termos inconsistente.
    #[error("redução de '{name}' excedeu a profundidade máxima ({depth})")]
    ReductionDepthExceeded {
        /// Nome do predicado sendo reduzido quando o limite foi atingido.
        name: String,
        /// Profundidade atingida.
        depth: usize,
    },
}

/// Alias de `Result` para operações do kernel.
pub type KernelResult<T> = Result<T, KernelError>;
