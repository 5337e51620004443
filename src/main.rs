//! # NARS Kernel — Demonstração
//!
//! Sobe uma [`Memory`], alimenta algumas afirmações e roda o raciocinador.
//!
//! ## Fluxo
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging
//!   ├── Carrega parâmetros (data/parameters.json ou padrões)
//!   ├── Cria Memory compartilhada (Arc)
//!   ├── Anexa um TracingObserver ao Concept "bird"
//!   ├── Spawn blocking: Reasoner::run em rodadas
//!   └── Em paralelo: entrada das afirmações de demonstração
//! ```
//!
//! ## Uso
//!
//! ```bash
//! # 500 ciclos, logs padrão (info)
//! cargo run -- 500
//!
//! # Logs detalhados das bags e da inferência
//! RUST_LOG=nars_kernel=debug cargo run
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use nars_kernel::config::{Parameters, PARAMETERS_PATH};
use nars_kernel::core::{Punctuation, TracingObserver};
use nars_kernel::inference::StructuralChaining;
use nars_kernel::language::{TemporalOrder, TermRef};
use nars_kernel::{KernelResult, Memory, Reasoner};

const DEFAULT_STEPS: u64 = 1000;
const STEPS_PER_ROUND: u64 = 100;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG configura o nível; padrão "info".
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🌱 NARS Kernel — Starting...");

    let steps = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("Número de ciclos inválido: {}", arg))?,
        None => DEFAULT_STEPS,
    };

    let params = Parameters::load(PARAMETERS_PATH)?;
    let memory = Arc::new(Memory::new(params));

    let bird = memory
        .terms()
        .word("bird")?
        .context("Termo de demonstração inválido")?;
    memory.get_or_create_concept(&bird, memory.params().judgment_budget());
    memory.with_concept_mut(bird.name(), |concept| {
        concept.start_play(Box::new(TracingObserver::default()))
    });

    let statements = demo_statements(&memory)?;
    let question = demo_question(&memory)?;

    // O raciocinador roda fora do runtime async; a entrada continua aqui.
    let reasoning = {
        let memory = Arc::clone(&memory);
        tokio::task::spawn_blocking(move || -> KernelResult<()> {
            let mut reasoner = Reasoner::new(memory, Box::new(StructuralChaining::default()));
            let mut remaining = steps;
            while remaining > 0 {
                let round = remaining.min(STEPS_PER_ROUND);
                reasoner.run(round)?;
                remaining -= round;
            }
            let stats = reasoner.stats();
            tracing::info!(
                cycles = stats.cycles,
                processed = stats.processed,
                derived = stats.derived,
                forgotten = stats.forgotten,
                "✅ Raciocínio concluído"
            );
            Ok(())
        })
    };

    for statement in statements {
        memory.input_task(memory.new_task(statement, Punctuation::Judgment));
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    if let Some(question) = question {
        memory.input_task(memory.new_task(question, Punctuation::Question));
    }

    let outcome = reasoning.await.context("Thread do raciocinador falhou")?;
    if let Err(e) = outcome {
        tracing::error!(error = %e, "Violação de consistência na memória");
        return Err(e.into());
    }

    memory.with_concept_mut(bird.name(), |concept| {
        concept.play();
        concept.detach_observer();
    });
    tracing::info!(
        concepts = memory.concept_count(),
        terms = memory.registry().live_len(),
        "Memória final"
    );
    for key in memory.concept_keys().iter().take(10) {
        tracing::info!(concept = %key, "Concept residente");
    }
    Ok(())
}

/// Afirmações de demonstração: uma cadeia de herança e implicações
/// encadeadas (a última é absorvida em `<(&&,cloud,rain) ==> wet>`).
fn demo_statements(memory: &Memory) -> Result<Vec<TermRef>> {
    let terms = memory.terms();
    let word = |name: &str| -> Result<TermRef> {
        terms
            .word(name)?
            .with_context(|| format!("Termo de demonstração inválido: {}", name))
    };

    let mut statements = Vec::new();
    for (s, p) in [
        ("robin", "bird"),
        ("bird", "animal"),
        ("animal", "organism"),
        ("robin", "flyer"),
    ] {
        statements.push(terms.inheritance(Some(&word(s)?), Some(&word(p)?))?);
    }

    let (cloud, rain, wet) = (word("cloud")?, word("rain")?, word("wet")?);
    let rain_wet = terms.implication(Some(&rain), Some(&wet), TemporalOrder::None)?;
    statements.push(rain_wet.clone());
    statements.push(terms.implication(Some(&cloud), rain_wet.as_ref(), TemporalOrder::None)?);
    statements.push(terms.implication(Some(&rain), Some(&wet), TemporalOrder::Forward)?);

    Ok(statements.into_iter().flatten().collect())
}

fn demo_question(memory: &Memory) -> Result<Option<TermRef>> {
    let terms = memory.terms();
    let robin = terms.word("robin")?;
    let organism = terms.word("organism")?;
    Ok(terms.inheritance(robin.as_ref(), organism.as_ref())?)
}
