use super::{Pid, Priority, Process, SimTime};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStats {
    pub pid: Pid,
    pub name: String,
    pub priority: Priority,
    pub start_time: SimTime,
    pub end_time: SimTime,
    pub burst_time: u64,
    pub turnaround: u64,
    pub waiting: u64,
    pub dispatches: u32,
}

impl ProcessStats {
    /// `None` for a process that has no end time yet.
    pub fn of(process: &Process) -> Option<Self> {
        let end_time = process.end_time()?;
        let turnaround = end_time.saturating_sub(process.start_time());

        Some(Self {
            pid: process.pid(),
            name: process.name().to_owned(),
            priority: process.priority(),
            start_time: process.start_time(),
            end_time,
            burst_time: process.burst_time(),
            turnaround,
            waiting: turnaround.saturating_sub(process.burst_time()),
            dispatches: process.dispatches(),
        })
    }
}

/// Turnaround and waiting figures over every retired process of a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub processes: Vec<ProcessStats>,
    pub makespan: SimTime,
    pub mean_turnaround: f64,
    pub mean_waiting: f64,
}

impl RunSummary {
    pub fn from_completed(completed: &[Process]) -> Self {
        let processes: Vec<_> = completed.iter().filter_map(ProcessStats::of).collect();
        if processes.is_empty() {
            return Self::default();
        }

        let count = processes.len() as f64;
        let makespan = processes.iter().map(|stats| stats.end_time).max().unwrap_or(0);
        let mean_turnaround = processes.iter().map(|s| s.turnaround as f64).sum::<f64>() / count;
        let mean_waiting = processes.iter().map(|s| s.waiting as f64).sum::<f64>() / count;

        Self {
            processes,
            makespan,
            mean_turnaround,
            mean_waiting,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>4} | {:<12} | {:<6} | {:>5} | {:>5} | {:>5} | {:>10} | {:>7} | {:>10}",
            "PID", "Name", "Prio", "Start", "End", "Burst", "Turnaround", "Waiting", "Dispatches"
        )?;
        for stats in &self.processes {
            writeln!(
                f,
                "{:>4} | {:<12} | {:<6} | {:>5} | {:>5} | {:>5} | {:>10} | {:>7} | {:>10}",
                stats.pid,
                stats.name,
                stats.priority.to_string(),
                stats.start_time,
                stats.end_time,
                stats.burst_time,
                stats.turnaround,
                stats.waiting,
                stats.dispatches
            )?;
        }
        write!(
            f,
            "makespan {} | mean turnaround {:.2} | mean waiting {:.2}",
            self.makespan, self.mean_turnaround, self.mean_waiting
        )
    }
}
