mod display;
mod error;
mod fair;
mod fifo;
mod process;
mod queue;
mod runner;
mod stats;
mod tasks;
mod timer;

pub use error::{ConfigurationError, SchedError, TaskFailure, TransitionError};
pub use fair::FairScheduler;
pub use fifo::{proc_sort, FifoScheduler};
pub use process::{Pid, Priority, Process, ProcessBuilder, ProcessState, SimTime, StateEvent};
pub use queue::{FairReadyList, FifoQueue, ReadyQueue};
pub use runner::ProcessRunner;
pub use stats::{ProcessStats, RunSummary};
pub use tasks::{from_fn, CounterTask, Task, TaskContext};
pub use timer::{TimeSliceConfig, TIME_MINIMUM};

/// What happened during one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub pid: Pid,
    pub started_at: SimTime,
    /// Time units the process actually ran.
    pub ran: u64,
    /// Time units it was allowed to run.
    pub slice: u64,
    pub completed: bool,
    /// Output of the last task launch in this dispatch.
    pub output: String,
}

pub trait Scheduler {
    const NAME: &'static str;

    fn add_process(&mut self, process: Process);

    /// Dispatches the next process. `Ok(None)` means there is nothing left to run.
    fn step(&mut self) -> Result<Option<Dispatch>, SchedError>;

    fn run(&mut self) -> Result<(), SchedError> {
        while self.step()?.is_some() {}
        Ok(())
    }

    fn clock(&self) -> SimTime;
    fn ready(&self) -> Vec<&Process>;
    fn current_process(&self) -> Option<&Process>;
    fn completed(&self) -> &[Process];

    /// Hands back the process whose task failed during the last step, if any.
    fn take_faulted(&mut self) -> Option<Process>;
}

/// Runs `process` for at most `slice` time units starting at `clock`, one task
/// launch per unit. Shared by both policies; only the slice differs.
fn run_slice(
    process: &mut Process,
    clock: &mut SimTime,
    slice: u64,
) -> Result<Dispatch, SchedError> {
    *clock = (*clock).max(process.start_time());
    let started_at = *clock;
    process.dispatch()?;

    let mut ran = 0;
    let mut output = String::new();
    while ran < slice && process.has_work() {
        output = process.launch_process()?;
        process.account(1);
        ran += 1;
        *clock += 1;
    }

    let completed = !process.has_work();
    if completed {
        process.complete(*clock)?;
    }

    Ok(Dispatch {
        pid: process.pid(),
        started_at,
        ran,
        slice,
        completed,
        output,
    })
}
