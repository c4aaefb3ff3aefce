//! Asynchronous job layer. Scripts are queued to a pool of worker threads;
//! workers report back through an event channel, and registered listeners
//! are called on whichever thread drives the dispatch methods.
//!
//! Lifecycle:
//!   1. `Interpreter::new(config)` starts the workers.
//!   2. `submit(script)` queues a job and returns its id right away.
//!   3. `dispatch_pending` / `dispatch_blocking` / `wait_idle` deliver the
//!      workers' events to listeners and update job status.
//!   4. `shutdown` (or drop) closes the queue and joins the workers.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::error::JobFailure;
use crate::script::Script;
use super::event::{Event, JobId, JobStatus, ListenerId};
use super::{DEFAULT_PROGRESS_INTERVAL, RunOptions, Runner};

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpreterConfig {
    /// Worker threads; `0` is treated as `1`.
    pub workers: usize,
    pub progress_interval: f64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { workers: 1, progress_interval: DEFAULT_PROGRESS_INTERVAL }
    }
}

impl InterpreterConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress_interval(mut self, interval: f64) -> Self {
        self.progress_interval = interval;
        self
    }
}

// ─── Interpreter ──────────────────────────────────────────────────────────────

type Listener = Box<dyn FnMut(&Event) + Send>;

struct Task {
    job: JobId,
    script: Script,
}

pub struct Interpreter {
    config: InterpreterConfig,
    task_tx: Option<Sender<Task>>,
    event_tx: Sender<Event>,
    event_rx: Receiver<Event>,
    workers: Vec<JoinHandle<()>>,
    listeners: Vec<(ListenerId, Listener)>,
    /// Jobs whose terminal event has not been dispatched yet.
    jobs: BTreeMap<JobId, JobStatus>,
    next_job: u64,
    next_listener: u64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        let count = config.workers.max(1);
        let options = RunOptions { progress_interval: config.progress_interval };

        // Task channel: caller → workers (shared via Arc<Mutex>)
        let (task_tx, task_rx) = mpsc::channel::<Task>();
        let task_rx = Arc::new(Mutex::new(task_rx));

        // Event channel: workers → dispatch point
        let (event_tx, event_rx) = mpsc::channel();

        let workers = (0..count)
            .map(|_| {
                let rx = task_rx.clone();
                let tx = event_tx.clone();
                std::thread::spawn(move || worker_loop(&rx, &tx, options))
            })
            .collect();

        tracing::debug!(workers = count, "interpreter started");

        Self {
            config,
            task_tx: Some(task_tx),
            event_tx,
            event_rx,
            workers,
            listeners: Vec::new(),
            jobs: BTreeMap::new(),
            next_job: 0,
            next_listener: 0,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Queue `script` for execution. Never blocks. A script that is not
    /// compiled yet is compiled on the worker.
    pub fn submit(&mut self, script: Script) -> JobId {
        self.next_job += 1;
        let job = JobId(self.next_job);
        self.jobs.insert(job, JobStatus::submitted());

        let sent = self.task_tx.as_ref()
            .is_some_and(|tx| tx.send(Task { job, script }).is_ok());
        if !sent {
            let _ = self.event_tx.send(Event::Failed { job, cause: JobFailure::Unavailable });
        }

        tracing::debug!(%job, "job submitted");
        job
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&Event) + Send + 'static) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Status as of the last dispatch; `None` once the terminal event has
    /// been delivered (or for an id this interpreter never issued).
    pub fn status(&self, job: JobId) -> Option<JobStatus> {
        self.jobs.get(&job).copied()
    }

    /// Jobs whose terminal event has not been dispatched yet.
    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    // ─── Dispatch ─────────────────────────────────────────────────────────────

    /// Deliver every event already received. Returns how many were delivered.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.deliver(event);
            n += 1;
        }
        n
    }

    /// Wait for at least one event, then deliver everything received. Returns
    /// immediately with `0` when no job is outstanding.
    pub fn dispatch_blocking(&mut self) -> usize {
        let n = self.dispatch_pending();
        if n > 0 || self.jobs.is_empty() {
            return n;
        }
        match self.event_rx.recv() {
            Ok(event) => {
                self.deliver(event);
                1 + self.dispatch_pending()
            }
            Err(_) => 0,
        }
    }

    /// Dispatch until every submitted job has delivered its terminal event.
    pub fn wait_idle(&mut self) {
        while !self.jobs.is_empty() {
            match self.event_rx.recv() {
                Ok(event) => self.deliver(event),
                Err(_) => break,
            }
        }
        self.dispatch_pending();
    }

    /// Close the queue, let workers finish queued jobs, and deliver what they sent.
    pub fn shutdown(mut self) {
        self.stop();
        self.dispatch_pending();
    }

    fn deliver(&mut self, event: Event) {
        let job = event.job();
        if let Some(status) = self.jobs.get_mut(&job) {
            status.apply(&event);
        }
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
        if event.is_terminal() {
            self.jobs.remove(&job);
        }
    }

    fn stop(&mut self) {
        drop(self.task_tx.take());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Workers ──────────────────────────────────────────────────────────────────

fn worker_loop(tasks: &Mutex<Receiver<Task>>, events: &Sender<Event>, options: RunOptions) {
    loop {
        let task = match tasks.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };
        match task {
            Ok(task) => execute(task, events, options),
            Err(_) => break,
        }
    }
}

#[tracing::instrument(name = "job", skip_all, fields(job = task.job.0))]
fn execute(task: Task, events: &Sender<Event>, options: RunOptions) {
    let Task { job, mut script } = task;
    let _ = events.send(Event::Progress { job, fraction: 0.0 });

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<(), JobFailure> {
        script.compile()?;
        Runner::new(options).run_with_progress(&script, &mut |fraction| {
            let _ = events.send(Event::Progress { job, fraction });
        })?;
        Ok(())
    }));

    let event = match outcome {
        Ok(Ok(())) => Event::Completed { job, script: Arc::new(script) },
        Ok(Err(cause)) => {
            tracing::warn!(%job, error = %cause, "job failed");
            Event::Failed { job, cause }
        }
        Err(payload) => {
            let cause = JobFailure::Panicked(panic_message(payload.as_ref()));
            tracing::warn!(%job, error = %cause, "job panicked");
            Event::Failed { job, cause }
        }
    };
    let _ = events.send(event);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
