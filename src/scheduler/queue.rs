use super::{Pid, Process, SimTime};
use std::collections::{BTreeMap, VecDeque};

/// A container of processes waiting to be dispatched.
///
/// Processes are moved in and out by value, so a process can sit in at most one
/// queue at a time.
pub trait ReadyQueue {
    fn push(&mut self, process: Process);
    fn pop(&mut self) -> Option<Process>;
    fn len(&self) -> usize;
    fn iter(&self) -> Box<dyn Iterator<Item = &Process> + '_>;

    /// Removes the first process in queue order that has arrived by `now`.
    fn pop_arrived(&mut self, now: SimTime) -> Option<Process>;

    /// Removes the process that arrives soonest, ties in queue order.
    fn pop_earliest_arrival(&mut self) -> Option<Process>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Strict arrival order.
#[derive(Debug, Default)]
pub struct FifoQueue {
    processes: VecDeque<Process>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadyQueue for FifoQueue {
    fn push(&mut self, process: Process) {
        self.processes.push_back(process);
    }

    fn pop(&mut self) -> Option<Process> {
        self.processes.pop_front()
    }

    fn len(&self) -> usize {
        self.processes.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Process> + '_> {
        Box::new(self.processes.iter())
    }

    fn pop_arrived(&mut self, now: SimTime) -> Option<Process> {
        let index = self
            .processes
            .iter()
            .position(|process| process.start_time() <= now)?;
        self.processes.remove(index)
    }

    fn pop_earliest_arrival(&mut self) -> Option<Process> {
        let index = self
            .processes
            .iter()
            .enumerate()
            .min_by_key(|&(index, process)| (process.start_time(), index))?
            .0;
        self.processes.remove(index)
    }
}

/// Processes ordered by ascending virtual runtime.
///
/// Keys carry an insertion sequence number, so processes with equal runtime
/// come out in the order they went in.
#[derive(Debug, Default)]
pub struct FairReadyList {
    processes: BTreeMap<(u64, u64), Process>,
    next_seq: u64,
}

impl FairReadyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_virtual_runtime(&self) -> Option<u64> {
        self.processes.keys().next().map(|&(vruntime, _)| vruntime)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.values().any(|process| process.pid() == pid)
    }
}

impl ReadyQueue for FairReadyList {
    fn push(&mut self, process: Process) {
        let key = (process.virtual_runtime(), self.next_seq);
        self.next_seq += 1;
        self.processes.insert(key, process);
    }

    fn pop(&mut self) -> Option<Process> {
        self.processes.pop_first().map(|(_, process)| process)
    }

    fn len(&self) -> usize {
        self.processes.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Process> + '_> {
        Box::new(self.processes.values())
    }

    fn pop_arrived(&mut self, now: SimTime) -> Option<Process> {
        let key = *self
            .processes
            .iter()
            .find(|(_, process)| process.start_time() <= now)?
            .0;
        self.processes.remove(&key)
    }

    fn pop_earliest_arrival(&mut self) -> Option<Process> {
        let key = *self
            .processes
            .iter()
            .min_by_key(|&(&key, process)| (process.start_time(), key))?
            .0;
        self.processes.remove(&key)
    }
}
