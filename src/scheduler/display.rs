use super::{runner::RunnerEvent, Process, Scheduler};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new(tick_rate: Duration) -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Set up the input handling thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                return;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => return,
                }

                if last_tick.elapsed() >= tick_rate {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        // Set up the terminal-user-interface
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw<S>(&mut self, scheduler: &S, status: &str) -> Result<(), io::Error>
    where
        S: Scheduler,
    {
        let current_process = scheduler.current_process();
        let clock = scheduler.clock();

        // Current process first, then the ready list in dispatch order, then retired ones.
        // A current process that is already retired is listed once.
        let retired = scheduler.completed().iter().filter(|&process| {
            current_process.map_or(true, |current| !std::ptr::eq(current, process))
        });
        let rows: Vec<&Process> = current_process
            .into_iter()
            .chain(scheduler.ready())
            .chain(retired)
            .collect();

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([Constraint::Length(3), Constraint::Min(5)])
                .split(f.size());

            let header = Paragraph::new(match current_process {
                Some(process) => format!(
                    "t={} | {} | {} | {}",
                    clock,
                    process.pid(),
                    process.name(),
                    status
                ),
                None => format!("t={clock} | No process has been dispatched. | {status}"),
            })
            .style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::LightBlue),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Current Process")
                    .border_type(BorderType::Rounded),
            );

            f.render_widget(header, chunks[0]);

            let items = rows.iter().map(|process| {
                Row::new(vec![
                    Cell::from(process.pid().to_string())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from("|"),
                    Cell::from(process.name().to_owned()),
                    Cell::from("|"),
                    Cell::from(process.priority().to_string()),
                    Cell::from("|"),
                    Cell::from(process.state().to_string()),
                    Cell::from("|"),
                    Cell::from(process.virtual_runtime().to_string()),
                    Cell::from("|"),
                    Cell::from(format!("{}/{}", process.burst_time() - process.remaining(), process.burst_time())),
                ])
            });

            let table = Table::new(items)
                .header(
                    Row::new(vec![
                        "PID", "|", "Name", "|", "Priority", "|", "State", "|", "VRuntime", "|",
                        "Work",
                    ])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Length(20),
                    Constraint::Length(1),
                    Constraint::Length(8),
                    Constraint::Length(1),
                    Constraint::Length(8),
                    Constraint::Length(1),
                    Constraint::Length(8),
                    Constraint::Length(1),
                    Constraint::Length(9),
                ])
                .block(Block::default().title(S::NAME).borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);

            f.render_widget(table, chunks[1]);
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // Get the user's input and return a matching event
        match self.input_rx.recv() {
            Ok(DisplayEvent::Input(key)) => {
                if key.modifiers.is_empty() {
                    match key.code {
                        KeyCode::Char('q') => return RunnerEvent::Quit,
                        KeyCode::Char('p') => return RunnerEvent::Pause,
                        KeyCode::Char('r') => return RunnerEvent::Resume,
                        KeyCode::Char('s') => return RunnerEvent::Step,
                        _ => {}
                    };
                }
            }
            Ok(DisplayEvent::Tick) => {}
            // The input thread is gone; nothing more can drive the display.
            Err(_) => return RunnerEvent::Quit,
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}
