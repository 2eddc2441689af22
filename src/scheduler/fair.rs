use super::{
    error::ConfigurationError,
    queue::{FairReadyList, ReadyQueue},
    run_slice,
    timer::TimeSliceConfig,
    Dispatch, Process, ProcessState, SchedError, Scheduler, SimTime,
};
use tracing::{debug, info, warn};

/// Always runs the ready process with the least virtual runtime, for a slice
/// sized by its priority and the number of contenders.
pub struct FairScheduler {
    ready_list: FairReadyList,
    slices: TimeSliceConfig,
    timer_interrupt: u64,
    current: Option<Process>,
    completed: Vec<Process>,
    faulted: Option<Process>,
    clock: SimTime,
}

impl FairScheduler {
    pub fn new(timer_interrupt_period: u64) -> Result<Self, ConfigurationError> {
        FairScheduler::with_processes(Vec::new(), timer_interrupt_period)
    }

    pub fn with_processes(
        processes: Vec<Process>,
        timer_interrupt_period: u64,
    ) -> Result<Self, ConfigurationError> {
        let slices = TimeSliceConfig::from_period(timer_interrupt_period)?;
        let mut scheduler = Self {
            ready_list: FairReadyList::new(),
            slices,
            timer_interrupt: timer_interrupt_period,
            current: None,
            completed: Vec::new(),
            faulted: None,
            clock: 0,
        };
        for process in processes {
            scheduler.add_process(process);
        }
        Ok(scheduler)
    }

    pub fn timer_interrupt(&self) -> u64 {
        self.timer_interrupt
    }

    pub fn time_slices(&self) -> &TimeSliceConfig {
        &self.slices
    }

    pub fn ready_list(&self) -> &FairReadyList {
        &self.ready_list
    }

    /// Takes the ready process with the smallest virtual runtime out of the list.
    ///
    /// Only processes that have arrived by the current clock are considered.
    /// When none has, the one arriving soonest is taken and the CPU idles until then.
    pub fn remove_process(&mut self) -> Option<Process> {
        self.ready_list
            .pop_arrived(self.clock)
            .or_else(|| self.ready_list.pop_earliest_arrival())
    }

    /// The dispatch decision made on every timer interrupt.
    ///
    /// Picks the next process and sets `timer_interrupt` for it, then puts
    /// `current` back on the ready list unless it has completed. With nothing
    /// to pick, `timer_interrupt` is left alone.
    pub fn get_next(&mut self, current: Option<Process>) -> Option<Process> {
        // The current process is not on the ready list yet but still competes.
        let extra = if current.is_some() { 2 } else { 1 };

        // A running process has already arrived, so never idle ahead of it.
        let next = match &current {
            Some(_) => self.ready_list.pop_arrived(self.clock),
            None => self.remove_process(),
        };
        if let Some(next) = &next {
            self.timer_interrupt = self
                .slices
                .slice(next.priority(), self.ready_list.len(), extra);
            debug!(
                pid = next.pid(),
                priority = %next.priority(),
                vruntime = next.virtual_runtime(),
                slice = self.timer_interrupt,
                "selected"
            );
        }

        if let Some(current) = current {
            if current.is_complete() {
                self.retire(current);
            } else {
                self.ready_list.push(current);
            }
        }

        next
    }

    fn retire(&mut self, process: Process) {
        info!(pid = process.pid(), end = ?process.end_time(), "process retired");
        self.completed.push(process);
    }
}

impl Scheduler for FairScheduler {
    const NAME: &'static str = "Fair Scheduler";

    fn add_process(&mut self, process: Process) {
        if process.is_complete() {
            self.retire(process);
        } else {
            self.ready_list.push(process);
        }
    }

    fn step(&mut self) -> Result<Option<Dispatch>, SchedError> {
        let mut current = self.current.take();
        if let Some(process) = current
            .as_mut()
            .filter(|process| process.state() == ProcessState::Running)
        {
            process.preempt()?;
        }

        let mut next = self.get_next(current);
        if next.is_none() && !self.ready_list.is_empty() {
            // Nothing else had arrived: the preempted process gets the CPU
            // back, or the clock moves on to the next arrival.
            next = self.get_next(None);
        }
        let Some(mut process) = next else {
            return Ok(None);
        };

        match run_slice(&mut process, &mut self.clock, self.timer_interrupt) {
            Ok(dispatch) => {
                debug!(pid = dispatch.pid, at = dispatch.started_at, ran = dispatch.ran, "dispatched");
                if dispatch.completed {
                    info!(pid = dispatch.pid, end = self.clock, "process complete");
                }
                self.current = Some(process);
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
        self.ready_list.iter().collect()
    }

    fn current_process(&self) -> Option<&Process> {
        self.current.as_ref()
    }

    fn completed(&self) -> &[Process] {
        &self.completed
    }

    fn take_faulted(&mut self) -> Option<Process> {
        self.faulted.take()
    }
}
