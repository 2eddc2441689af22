use super::{
    error::TaskFailure,
    process::{Pid, Priority, ProcessState, SimTime},
};

/// Snapshot of the process handed to its task on every launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskContext {
    pub pid: Pid,
    pub priority: Priority,
    pub start_time: SimTime,
    pub end_time: Option<SimTime>,
    pub state: ProcessState,
}

pub trait Task {
    fn run(&mut self, context: TaskContext) -> Result<String, TaskFailure>;
}

impl<F> Task for F
where
    F: FnMut(TaskContext) -> Result<String, TaskFailure>,
{
    fn run(&mut self, context: TaskContext) -> Result<String, TaskFailure> {
        self(context)
    }
}

/// Boxes a closure as a task. The bound lets the closure's argument and
/// error types be inferred at the call site.
pub fn from_fn<F>(f: F) -> Box<dyn Task>
where
    F: FnMut(TaskContext) -> Result<String, TaskFailure> + 'static,
{
    Box::new(f)
}

/// Counts its own launches and reports the count.
#[derive(Default)]
pub struct CounterTask {
    counter: u32,
}

impl CounterTask {
    pub fn new() -> Self {
        Self { counter: 0 }
    }
}

impl Task for CounterTask {
    fn run(&mut self, _context: TaskContext) -> Result<String, TaskFailure> {
        self.counter += 1;
        Ok(self.counter.to_string())
    }
}
