use super::{
    queue::{FifoQueue, ReadyQueue},
    run_slice, Dispatch, Process, SchedError, Scheduler, SimTime,
};
use tracing::{debug, info, warn};

/// Sorts an initial batch of processes by arrival time using adjacent swaps.
///
/// Equal start times keep their relative order. Meant for the batch handed to a
/// scheduler before it starts, not for a live queue.
pub fn proc_sort(processes: &mut [Process]) {
    let mut swapped = true;
    while swapped {
        swapped = false;
        for idx in 1..processes.len() {
            if processes[idx - 1].start_time() > processes[idx].start_time() {
                processes.swap(idx - 1, idx);
                swapped = true;
            }
        }
    }
}

/// Runs processes one after another in arrival order, each to completion.
#[derive(Default)]
pub struct FifoScheduler {
    run_queue: FifoQueue,
    completed: Vec<Process>,
    faulted: Option<Process>,
    clock: SimTime,
}

impl FifoScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_processes(mut processes: Vec<Process>) -> Self {
        proc_sort(&mut processes);

        let mut scheduler = Self::new();
        for process in processes {
            scheduler.add_process(process);
        }
        scheduler
    }

    pub fn get_next_process(&mut self) -> Option<Process> {
        self.run_queue.pop()
    }
}

impl Scheduler for FifoScheduler {
    const NAME: &'static str = "FIFO Scheduler";

    fn add_process(&mut self, process: Process) {
        self.run_queue.push(process);
    }

    fn step(&mut self) -> Result<Option<Dispatch>, SchedError> {
        // Queue order among processes that have arrived; idle only when none has.
        let Some(mut process) = self
            .run_queue
            .pop_arrived(self.clock)
            .or_else(|| self.run_queue.pop_earliest_arrival())
        else {
            return Ok(None);
        };

        // Never preempted: the slice is whatever work is left.
        let slice = process.remaining();
        match run_slice(&mut process, &mut self.clock, slice) {
            Ok(dispatch) => {
                debug!(pid = dispatch.pid, at = dispatch.started_at, ran = dispatch.ran, "dispatched");
                info!(pid = process.pid(), end = self.clock, "process complete");
                self.completed.push(process);
                Ok(Some(dispatch))
            }
            Err(err) => {
                warn!(pid = process.pid(), %err, "dispatch failed");
                self.faulted = Some(process);
                Err(err)
            }
        }
    }

    fn clock(&self) -> SimTime {
        self.clock
    }

    fn ready(&self) -> Vec<&Process> {
        self.run_queue.iter().collect()
    }

    /// The last process dispatched. It ran to completion, so it is also retired.
    fn current_process(&self) -> Option<&Process> {
        self.completed.last()
    }

    fn completed(&self) -> &[Process] {
        &self.completed
    }

    fn take_faulted(&mut self) -> Option<Process> {
        self.faulted.take()
    }
}
