use super::{
    error::{ConfigurationError, TaskFailure, TransitionError},
    tasks::{Task, TaskContext},
};
use std::fmt;

pub type Pid = u32;

/// Simulated time, in abstract time units.
pub type SimTime = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Normal,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Normal => write!(f, "Normal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessState {
    #[default]
    Ready,
    Blocked,
    Running,
    Complete,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Dispatch,
    Preempt,
    Block,
    Unblock,
    Complete,
}

impl ProcessState {
    /// The state reached by applying `event`, or `None` if the transition is not allowed.
    pub fn on(self, event: StateEvent) -> Option<ProcessState> {
        use ProcessState::*;
        match (self, event) {
            (Ready, StateEvent::Dispatch) => Some(Running),
            (Running, StateEvent::Preempt) => Some(Ready),
            (Running, StateEvent::Block) => Some(Blocked),
            (Blocked, StateEvent::Unblock) => Some(Ready),
            (Running, StateEvent::Complete) => Some(Complete),
            (Ready | Blocked | Running | Complete, _) => None,
        }
    }
}

pub struct Process {
    pid: Pid,
    name: String,
    priority: Priority,
    state: ProcessState,
    start_time: SimTime,
    end_time: Option<SimTime>,
    virtual_runtime: u64,
    burst_time: u64,
    remaining: u64,
    dispatches: u32,
    task: Box<dyn Task>,
}

impl Process {
    pub fn new(pid: Pid, priority: Priority, start_time: SimTime, task: Box<dyn Task>) -> Self {
        Self {
            pid,
            name: String::new(),
            priority,
            state: ProcessState::Ready,
            start_time,
            end_time: None,
            virtual_runtime: 0,
            burst_time: 1,
            remaining: 1,
            dispatches: 0,
            task,
        }
    }

    pub fn builder(pid: Pid) -> ProcessBuilder {
        ProcessBuilder::new(pid)
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == ProcessState::Complete
    }

    pub fn start_time(&self) -> SimTime {
        self.start_time
    }

    pub fn set_start_time(&mut self, time: SimTime) {
        self.start_time = time;
    }

    pub fn end_time(&self) -> Option<SimTime> {
        self.end_time
    }

    /// Plain setter. Schedulers record the end time through `complete` instead.
    pub fn set_end_time(&mut self, time: SimTime) {
        self.end_time = Some(time);
    }

    pub fn virtual_runtime(&self) -> u64 {
        self.virtual_runtime
    }

    pub fn burst_time(&self) -> u64 {
        self.burst_time
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn dispatches(&self) -> u32 {
        self.dispatches
    }

    pub fn has_work(&self) -> bool {
        self.remaining > 0
    }

    /// Runs the task once against the current process snapshot.
    pub fn launch_process(&mut self) -> Result<String, TaskFailure> {
        let context = TaskContext {
            pid: self.pid,
            priority: self.priority,
            start_time: self.start_time,
            end_time: self.end_time,
            state: self.state,
        };
        self.task.run(context)
    }

    /// Charges up to `units` of executed work, returning how many were charged.
    pub fn account(&mut self, units: u64) -> u64 {
        let charged = units.min(self.remaining);
        self.remaining -= charged;
        self.virtual_runtime += charged;
        charged
    }

    pub fn dispatch(&mut self) -> Result<(), TransitionError> {
        self.apply(StateEvent::Dispatch)?;
        self.dispatches += 1;
        Ok(())
    }

    pub fn preempt(&mut self) -> Result<(), TransitionError> {
        self.apply(StateEvent::Preempt)
    }

    pub fn block(&mut self) -> Result<(), TransitionError> {
        self.apply(StateEvent::Block)
    }

    pub fn unblock(&mut self) -> Result<(), TransitionError> {
        self.apply(StateEvent::Unblock)
    }

    /// Marks the process complete at `now`. The end time never precedes the start time.
    pub fn complete(&mut self, now: SimTime) -> Result<(), TransitionError> {
        self.apply(StateEvent::Complete)?;
        self.end_time = Some(now.max(self.start_time));
        Ok(())
    }

    fn apply(&mut self, event: StateEvent) -> Result<(), TransitionError> {
        match self.state.on(event) {
            Some(state) => {
                self.state = state;
                Ok(())
            }
            None => Err(TransitionError {
                pid: self.pid,
                from: self.state,
                event,
            }),
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("pid", &self.pid)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("state", &self.state)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("virtual_runtime", &self.virtual_runtime)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

pub struct ProcessBuilder {
    pid: Pid,
    name: String,
    priority: Priority,
    start_time: SimTime,
    burst_time: u64,
    task: Option<Box<dyn Task>>,
}

impl ProcessBuilder {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            name: String::new(),
            priority: Priority::default(),
            start_time: 0,
            burst_time: 1,
            task: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn start_time(mut self, start_time: SimTime) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn burst_time(mut self, burst_time: u64) -> Self {
        self.burst_time = burst_time;
        self
    }

    pub fn task(mut self, task: Box<dyn Task>) -> Self {
        self.task = Some(task);
        self
    }

    pub fn build(self) -> Result<Process, ConfigurationError> {
        let task = self
            .task
            .ok_or(ConfigurationError::MissingTask { pid: self.pid })?;
        if self.burst_time == 0 {
            return Err(ConfigurationError::ZeroBurst { pid: self.pid });
        }

        let mut process = Process::new(self.pid, self.priority, self.start_time, task);
        process.name = self.name;
        process.burst_time = self.burst_time;
        process.remaining = self.burst_time;
        Ok(process)
    }
}
