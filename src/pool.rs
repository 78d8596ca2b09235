//! Fixed-size worker pool executing queued closures, returning a future-like
//! handle for each submission.
//!
//! A FIFO queue guarded by a channel stands in for the usual mutex/condvar
//! plumbing (the channel itself is the wait queue); workers block on an
//! empty queue and the pool shuts down its threads on drop.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::debug;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A handle to a value a worker is computing. Blocks on `.get()` until the
/// task completes; a panic inside the task is caught and re-raised here
/// rather than silently dropping the result.
pub struct JobHandle<T> {
    rx: crossbeam_channel::Receiver<std::thread::Result<T>>,
}

impl<T> JobHandle<T> {
    /// Blocks until the submitted task has finished, returning its result.
    ///
    /// Panics if the task itself panicked.
    pub fn get(self) -> T {
        match self.rx.recv() {
            Ok(Ok(v)) => v,
            Ok(Err(panic)) => std::panic::resume_unwind(panic),
            Err(_) => panic!("TaskPool worker dropped without producing a result"),
        }
    }
}

/// A fixed-size pool of worker threads pulling closures off a FIFO queue.
///
/// Submitting a task from *inside* a worker of the same pool, while that
/// worker then blocks on the submitted task's `.get()`, can deadlock if the
/// pool has no spare capacity. Callers that need this pattern (BM/RSA
/// public-witness generation) must use a distinct secondary pool for the
/// inner work, not the one they were called from.
pub struct TaskPool {
    sender: Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl TaskPool {
    /// Builds a pool with `num_cpus::get()` workers.
    pub fn new_default() -> Self {
        Self::new(num_cpus::get().max(1))
    }

    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (sender, receiver): (Sender<Job>, Receiver<Job>) = unbounded();
        let mut workers = Vec::with_capacity(threads);
        for id in 0..threads {
            let receiver = receiver.clone();
            workers.push(
                std::thread::Builder::new()
                    .name(format!("accumulator-pool-{}", id))
                    .spawn(move || {
                        // `recv()` blocks (the condvar-wait analogue) until a job
                        // arrives or every sender (including the pool's own,
                        // dropped last) has gone away, at which point it returns
                        // `Err` and the worker exits.
                        while let Ok(job) = receiver.recv() {
                            job();
                        }
                    })
                    .expect("failed to spawn accumulator pool worker"),
            );
        }
        TaskPool { sender, workers }
    }

    /// Enqueues `f`, returning a handle that resolves to its result.
    pub fn submit<F, T>(&self, f: F) -> JobHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let job: Job = Box::new(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
            let _ = result_tx.send(result);
        });
        self.sender
            .send(job)
            .expect("TaskPool workers should outlive all submitters");
        JobHandle { rx: result_rx }
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        // Dropping `sender` closes the channel once every clone (one per
        // worker) is also dropped; workers' `recv()` loops then see `Err`
        // and exit.
        debug!("shutting down accumulator task pool ({} workers)", self.workers.len());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

/// A pool shared by value across accumulate/witness call sites that don't
/// want to own a `TaskPool` themselves.
pub type SharedTaskPool = Arc<TaskPool>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submits_and_joins() {
        let pool = TaskPool::new(4);
        let handles: Vec<_> = (0..16).map(|i| pool.submit(move || i * i)).collect();
        let results: Vec<i32> = handles.into_iter().map(|h| h.get()).collect();
        assert_eq!(results, (0..16).map(|i| i * i).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic]
    fn panics_propagate_through_get() {
        let pool = TaskPool::new(2);
        let handle = pool.submit(|| -> i32 { panic!("boom") });
        handle.get();
    }

    #[test]
    fn nested_submission_on_a_secondary_pool_does_not_deadlock() {
        let outer = TaskPool::new(2);
        let handle = outer.submit(|| {
            let inner = TaskPool::new(2);
            let h = inner.submit(|| 7);
            h.get()
        });
        assert_eq!(handle.get(), 7);
    }
}
