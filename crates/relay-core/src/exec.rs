//! Facility de ejecución de trabajo: dónde corre cada tick.
//!
//! El invoker despacha unidades de trabajo de cero argumentos; el executor
//! decide thread. Tres implementaciones: tokio (producción), inline
//! (thread llamador) y cola manual (tests y embebedores que bombean a mano).

use std::collections::VecDeque;
use std::sync::Mutex;

/// Unidad de trabajo de cero argumentos.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Ejecuta una unidad de trabajo, eventualmente, en algún thread.
pub trait Executor: Send + Sync {
    fn execute(&self, job: Job);
}

/// Corre el trabajo inline, en el thread que lo despachó.
#[derive(Debug, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}

/// Despacha al pool bloqueante de un runtime tokio.
pub struct TokioExecutor {
    handle: tokio::runtime::Handle,
}

impl TokioExecutor {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Usa el runtime actual (panics fuera de un contexto tokio, igual que
    /// `Handle::current`).
    pub fn current() -> Self {
        Self { handle: tokio::runtime::Handle::current() }
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, job: Job) {
        // Los ticks son síncronos y cortos pero pueden tomar locks del run;
        // van al pool bloqueante, no al scheduler cooperativo.
        self.handle.spawn_blocking(job);
    }
}

/// Cola manual: acumula trabajo hasta que alguien lo bombea.
///
/// Determinista por construcción; es la palanca de los tests para observar
/// un run tick a tick (p. ej. cancelar antes del primer tick).
#[derive(Default)]
pub struct QueueExecutor {
    queue: Mutex<VecDeque<Job>>,
}

impl QueueExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trabajo encolado sin correr.
    pub fn pending(&self) -> usize {
        match self.queue.lock() {
            Ok(q) => q.len(),
            Err(p) => p.into_inner().len(),
        }
    }

    /// Corre una unidad si la hay. El lock se suelta antes de ejecutar: el
    /// trabajo puede encolar más trabajo.
    pub fn run_one(&self) -> bool {
        let job = {
            let mut q = match self.queue.lock() {
                Ok(q) => q,
                Err(p) => p.into_inner(),
            };
            q.pop_front()
        };
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Bombea hasta vaciar la cola (incluyendo trabajo encolado durante el
    /// bombeo). Devuelve cuántas unidades corrieron.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_one() {
            ran += 1;
        }
        ran
    }
}

impl Executor for QueueExecutor {
    fn execute(&self, job: Job) {
        match self.queue.lock() {
            Ok(mut q) => q.push_back(job),
            Err(p) => p.into_inner().push_back(job),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn queue_ejecuta_en_orden_fifo_incluyendo_reencolados() {
        let exec = Arc::new(QueueExecutor::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let h1 = Arc::clone(&hits);
        let re = Arc::clone(&exec);
        exec.execute(Box::new(move || {
            assert_eq!(h1.fetch_add(1, Ordering::SeqCst), 0);
            let h2 = Arc::clone(&h1);
            re.execute(Box::new(move || {
                assert_eq!(h2.fetch_add(1, Ordering::SeqCst), 2);
            }));
        }));
        let h3 = Arc::clone(&hits);
        exec.execute(Box::new(move || {
            assert_eq!(h3.fetch_add(1, Ordering::SeqCst), 1);
        }));

        assert_eq!(exec.run_all(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(exec.pending(), 0);
    }

    #[test]
    fn inline_corre_en_el_acto() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        InlineExecutor.execute(Box::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
