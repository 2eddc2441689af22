use super::{display::DisplayTerminal, SchedError, Scheduler};
use std::{io, time::Duration};
use tracing::warn;

pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    None,
}

/// Drives a scheduler one dispatch per display tick.
pub struct ProcessRunner<S> {
    terminal: DisplayTerminal,
    scheduler: S,
    paused: bool,
    finished: bool,
    status: String,
}

impl<S: Scheduler> ProcessRunner<S> {
    pub fn new(scheduler: S, tick_rate: Duration) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new(tick_rate)?;

        Ok(Self {
            terminal,
            scheduler,
            paused: false,
            finished: false,
            status: String::from("running"),
        })
    }

    pub fn into_scheduler(self) -> S {
        self.scheduler
    }

    fn step(&mut self) {
        if self.finished {
            return;
        }

        self.status = match self.scheduler.step() {
            Ok(Some(dispatch)) if dispatch.completed => {
                format!("ran {} of {} | done | output \"{}\"", dispatch.ran, dispatch.slice, dispatch.output)
            }
            Ok(Some(dispatch)) => {
                format!("ran {} of {} | output \"{}\"", dispatch.ran, dispatch.slice, dispatch.output)
            }
            Ok(None) => {
                self.finished = true;
                String::from("all processes complete")
            }
            Err(SchedError::Task(failure)) => {
                // A failed task ends its process; the rest keep running.
                if let Some(process) = self.scheduler.take_faulted() {
                    warn!(pid = process.pid(), %failure, "dropping process");
                }
                format!("{failure}")
            }
            Err(err) => {
                self.finished = true;
                format!("halted: {err}")
            }
        };
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        if !self.paused {
            self.step();
        }
        let status = if self.paused {
            format!("paused | {}", self.status)
        } else {
            self.status.clone()
        };
        self.terminal.draw(&self.scheduler, &status)?;

        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            RunnerEvent::Pause if !self.paused => self.paused = true,
            RunnerEvent::Resume if self.paused => self.paused = false,
            RunnerEvent::Step if self.paused => self.step(),
            _ => {}
        }
        Ok(true)
    }
}
