//! Worker pool for CPU bound, blocking work (password hashing).
//!
//! Interactive jobs are served by every worker; background jobs only by the
//! shared workers, so a burst of background work never starves request handling.

use flume::{Receiver, Sender};
use futures::channel::oneshot;
use std::{sync::Arc, thread};

use crate::prelude::*;

type Job = Box<dyn FnOnce() + Send>;
type JobQueue = Arc<Receiver<Job>>;

#[derive(Clone, Copy, Debug)]
pub enum Priority {
	Interactive,
	Background,
}

#[derive(Debug)]
pub struct WorkerPool {
	interactive: Sender<Job>,
	background: Sender<Job>,
}

impl WorkerPool {
	/// `n_interactive` workers serve interactive jobs only, `n_shared` serve both
	pub fn new(n_interactive: usize, n_shared: usize) -> Self {
		let (interactive, rx_interactive) = flume::unbounded();
		let (background, rx_background) = flume::unbounded();

		let rx_interactive = Arc::new(rx_interactive);
		let rx_background = Arc::new(rx_background);

		for _ in 0..n_interactive {
			let rx_interactive = Arc::clone(&rx_interactive);
			thread::spawn(move || worker_loop(&[rx_interactive]));
		}

		for _ in 0..n_shared {
			let rx_interactive = Arc::clone(&rx_interactive);
			let rx_background = Arc::clone(&rx_background);
			thread::spawn(move || worker_loop(&[rx_interactive, rx_background]));
		}

		Self { interactive, background }
	}

	/// Submit a closure, returns a future resolving to its result
	pub fn spawn<F, T>(
		&self,
		priority: Priority,
		f: F,
	) -> impl std::future::Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (res_tx, res_rx) = oneshot::channel();

		let job: Job = Box::new(move || {
			let result = f();
			let _ignore = res_tx.send(result);
		});

		let queue = match priority {
			Priority::Interactive => &self.interactive,
			Priority::Background => &self.background,
		};
		if queue.send(job).is_err() {
			error!("Failed to send job to {:?} worker queue", priority);
		}

		async move {
			res_rx.await.map_err(|_| {
				error!("Worker dropped result channel (task may have panicked)");
				Error::Internal("worker task failed".into())
			})
		}
	}

	pub fn run_immed<F, T>(&self, f: F) -> impl std::future::Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		self.spawn(Priority::Interactive, f)
	}

	/// Like `run_immed`, but flattens `ClResult<ClResult<T>>` into `ClResult<T>`.
	pub fn try_run_immed<F, T>(
		&self,
		f: F,
	) -> impl std::future::Future<Output = ClResult<T>> + use<F, T>
	where
		F: FnOnce() -> ClResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let fut = self.run_immed(f);
		async move { fut.await? }
	}
}

fn worker_loop(queues: &[JobQueue]) {
	loop {
		// Earlier queues win when several jobs are ready
		let mut job = None;
		for rx in queues {
			if let Ok(j) = rx.try_recv() {
				job = Some(j);
				break;
			}
		}

		let job = match job {
			Some(job) => job,
			None => {
				let mut selector = flume::Selector::new();
				for rx in queues {
					selector = selector.recv(rx, |res| res);
				}
				match selector.wait() {
					Ok(job) => job,
					// All senders gone: the pool was dropped
					Err(flume::RecvError::Disconnected) => return,
				}
			}
		};

		if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
			error!("Worker thread caught panic: {:?}", e);
		}
	}
}


// vim: ts=4
