//! # ConceptObserver — Colaborador de Exibição
//!
//! O kernel não renderiza nada. Quem quiser acompanhar um Concept (uma janela
//! de inspeção, um log, um teste) implementa [`ConceptObserver`] e se anexa
//! via [`Concept::start_play`](super::Concept::start_play).
//!
//! ## Protocolo
//!
//! ```text
//! start_play(obs)  → obs.start_play(key, snapshot)   (observador anterior: detach_from_concept)
//! play()           → obs.post(snapshot)
//! mudança de estado→ obs.refresh(snapshot)            (só exibe se estiver "showing")
//! stop()           → obs.stop()
//! remoção/evicção  → obs.detach_from_concept()
//! ```
//!
//! A única obrigação do kernel é chamar estes ganchos nas mudanças de estado.
//!
//! ## Restrição de Reentrada
//!
//! Os ganchos rodam de forma síncrona, muitas vezes com o mutex da bag de
//! Concepts travado (ativação, entrega de tasks, `with_concept_mut`). Um
//! observador **não** pode chamar a [`Memory`](crate::memory::Memory) de
//! dentro de um gancho: o `parking_lot::Mutex` não é reentrante e a chamada
//! trava. Guarde o texto recebido e consulte a memória depois.

use std::sync::Arc;

use parking_lot::Mutex;

/// Ganchos chamados por um Concept enquanto está sendo observado.
///
/// Implementações não podem acessar a `Memory` dona do Concept; veja a
/// restrição de reentrada no topo do módulo.
pub trait ConceptObserver: Send {
    /// Exibe um snapshot e entra no estado "showing".
    fn post(&mut self, text: &str);

    /// Atualiza a exibição; ignorado fora do estado "showing".
    fn refresh(&mut self, text: &str);

    /// Início de uma transmissão ao vivo do Concept `key`.
    fn start_play(&mut self, key: &str, text: &str);

    /// Fim da transmissão ao vivo.
    fn stop(&mut self);

    /// O Concept descartou este observador.
    fn detach_from_concept(&mut self);
}

/// Observador que escreve os snapshots no log (`tracing`, nível `info`).
#[derive(Default)]
pub struct TracingObserver {
    key: String,
    showing: bool,
}

impl ConceptObserver for TracingObserver {
    fn post(&mut self, text: &str) {
        self.showing = true;
        tracing::info!(concept = %self.key, "\n{}", text);
    }

    fn refresh(&mut self, text: &str) {
        if self.showing {
            self.post(text);
        }
    }

    fn start_play(&mut self, key: &str, text: &str) {
        self.key = key.to_string();
        self.post(text);
    }

    fn stop(&mut self) {
        self.showing = false;
    }

    fn detach_from_concept(&mut self) {
        self.showing = false;
        tracing::info!(concept = %self.key, "Observador desanexado");
    }
}

/// Estado acumulado por um [`RecordingObserver`].
#[derive(Debug, Default, Clone)]
pub struct Recording {
    /// Textos efetivamente exibidos, em ordem.
    pub shown: Vec<String>,
    pub showing: bool,
    pub detached: bool,
    pub started: u32,
}

/// Observador que grava tudo em memória compartilhada, útil em testes e
/// para quem precisa inspecionar a exibição depois de entregar o observador.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    state: Arc<Mutex<Recording>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cópia do estado atual.
    pub fn snapshot(&self) -> Recording {
        self.state.lock().clone()
    }
}

impl ConceptObserver for RecordingObserver {
    fn post(&mut self, text: &str) {
        let mut state = self.state.lock();
        state.showing = true;
        state.shown.push(text.to_string());
    }

    fn refresh(&mut self, text: &str) {
        let showing = self.state.lock().showing;
        if showing {
            self.post(text);
        }
    }

    fn start_play(&mut self, _key: &str, text: &str) {
        self.state.lock().started += 1;
        self.post(text);
    }

    fn stop(&mut self) {
        self.state.lock().showing = false;
    }

    fn detach_from_concept(&mut self) {
        let mut state = self.state.lock();
        state.detached = true;
        state.showing = false;
    }
}
