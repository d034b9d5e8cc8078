//! Fixed-size worker pool, grounded in the original engine's
//! `ThreadPool`/`IThreadPool` (itself built on `std::jthread` and a
//! stop_token). Rust has no `jthread`; a shared `AtomicBool` flag plus a
//! timed queue recv stands in for it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

type Task = Box<dyn FnOnce() + Send + 'static>;

const WORKER_POLL_TIMEOUT: Duration = Duration::from_millis(200);

pub struct ThreadPool {
    sender: mpsc::Sender<Task>,
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    pub fn new(thread_count: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Task>();
        let receiver = Arc::new(std::sync::Mutex::new(receiver));
        let stop = Arc::new(AtomicBool::new(false));

        let workers = (0..thread_count.max(1))
            .map(|index| {
                let receiver = Arc::clone(&receiver);
                let stop = Arc::clone(&stop);
                thread::Builder::new()
                    .name(format!("room-worker-{index}"))
                    .spawn(move || Self::worker_loop(receiver, stop))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self { sender, stop, workers }
    }

    fn worker_loop(receiver: Arc<std::sync::Mutex<mpsc::Receiver<Task>>>, stop: Arc<AtomicBool>) {
        while !stop.load(Ordering::Relaxed) {
            let task = {
                let guard = receiver.lock().expect("worker queue lock poisoned");
                guard.recv_timeout(WORKER_POLL_TIMEOUT)
            };
            if let Ok(task) = task {
                task();
            }
        }
    }

    pub fn enqueue(&self, task: Task) {
        let _ = self.sender.send(task);
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn enqueued_tasks_all_run() {
        let pool = ThreadPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            pool.enqueue(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }
}
