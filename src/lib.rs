//! Discrete-event simulator of CPU scheduling policies.
//!
//! Processes carry an opaque task and compete for one simulated CPU. Two
//! policies decide who runs next and for how long:
//!
//! - [`FifoScheduler`](scheduler::FifoScheduler) runs processes in arrival
//!   order, each to completion.
//! - [`FairScheduler`](scheduler::FairScheduler) always picks the process with
//!   the least virtual runtime and bounds its slice by priority and contention.
//!
//! ```
//! use fair_scheduler_sim::scheduler::{CounterTask, FairScheduler, Priority, Process, Scheduler};
//!
//! let processes = vec![
//!     Process::new(1, Priority::High, 0, Box::new(CounterTask::new())),
//!     Process::new(2, Priority::Normal, 1, Box::new(CounterTask::new())),
//! ];
//! let mut scheduler = FairScheduler::with_processes(processes, 10)?;
//! scheduler.run()?;
//! assert_eq!(scheduler.completed().len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod scheduler;
