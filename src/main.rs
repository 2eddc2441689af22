use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use fair_scheduler_sim::scheduler::{
    from_fn, ConfigurationError, CounterTask, FairScheduler, FifoScheduler, Priority, Process,
    ProcessRunner, RunSummary, SchedError, Scheduler, TaskContext, TaskFailure,
};
use std::{io, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    Fair,
    Fifo,
}

/// Simulate CPU scheduling policies over a small demo workload
#[derive(Parser)]
#[command(name = "fair-scheduler-sim")]
struct Cli {
    /// Scheduling policy to simulate
    #[arg(long, value_enum, default_value_t = Policy::Fair)]
    policy: Policy,

    /// Timer interrupt period, in simulated time units
    #[arg(long, default_value_t = 10)]
    period: u64,

    /// Step through the run in a terminal UI
    #[arg(long)]
    tui: bool,

    /// Display refresh interval for the terminal UI, in milliseconds
    #[arg(long, default_value_t = 200)]
    tick_ms: u64,
}

fn demo_workload() -> Result<Vec<Process>, ConfigurationError> {
    let echo = |ctx: TaskContext| {
        Ok::<_, TaskFailure>(format!("{} {} since t={}", ctx.pid, ctx.priority, ctx.start_time))
    };

    Ok(vec![
        Process::builder(1)
            .name("editor")
            .priority(Priority::High)
            .start_time(0)
            .burst_time(12)
            .task(Box::new(CounterTask::new()))
            .build()?,
        Process::builder(2)
            .name("backup")
            .priority(Priority::Normal)
            .start_time(1)
            .burst_time(20)
            .task(from_fn(echo))
            .build()?,
        Process::builder(3)
            .name("compiler")
            .priority(Priority::High)
            .start_time(2)
            .burst_time(16)
            .task(Box::new(CounterTask::new()))
            .build()?,
        Process::builder(4)
            .name("indexer")
            .priority(Priority::Normal)
            .start_time(4)
            .burst_time(6)
            .task(from_fn(echo))
            .build()?,
    ])
}

fn run_headless<S: Scheduler>(mut scheduler: S) -> Result<()> {
    info!(scheduler = S::NAME, "starting run");
    loop {
        match scheduler.run() {
            Ok(()) => break,
            Err(SchedError::Task(failure)) => {
                if let Some(process) = scheduler.take_faulted() {
                    warn!(pid = process.pid(), %failure, "dropping process");
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
    info!(clock = scheduler.clock(), "run finished");

    println!("{}", S::NAME);
    println!("{}", RunSummary::from_completed(scheduler.completed()));
    Ok(())
}

fn run_interactive<S: Scheduler>(scheduler: S, tick_rate: Duration) -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut runner = ProcessRunner::new(scheduler, tick_rate)?;
    while runner.run()? {}
    let scheduler = runner.into_scheduler();

    execute!(io::stdout(), Clear(ClearType::All))?;
    println!("{}", RunSummary::from_completed(scheduler.completed()));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log lines would tear up the terminal UI.
    if !cli.tui {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let processes = demo_workload()?;
    let tick_rate = Duration::from_millis(cli.tick_ms);

    match (cli.policy, cli.tui) {
        (Policy::Fair, false) => run_headless(FairScheduler::with_processes(processes, cli.period)?),
        (Policy::Fair, true) => {
            run_interactive(FairScheduler::with_processes(processes, cli.period)?, tick_rate)
        }
        (Policy::Fifo, false) => run_headless(FifoScheduler::with_processes(processes)),
        (Policy::Fifo, true) => run_interactive(FifoScheduler::with_processes(processes), tick_rate),
    }
}
