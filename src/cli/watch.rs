//! Watch command implementation - Interactive TUI viewer.

use super::output::format_turn_line;
use super::{CliError, SimArgs};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ecosim::render::{row_glyphs, GREETING};
use ecosim::{ControlEvent, Driver, Ecosystem, Kind, StopReason, TurnObserver, TurnReport};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How often the input thread checks whether the run has ended.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the config is invalid, the simulation fails, or the
/// terminal cannot be driven.
pub(crate) fn execute(
    sim: &SimArgs,
    turns: Option<u64>,
    delay_ms: Option<u64>,
) -> Result<(), CliError> {
    let mut config = sim.build_config()?;
    if let Some(delay) = delay_ms {
        config.turn_delay_ms = delay;
    }
    let max_turns = turns.or(config.max_turns);
    let delay = config.turn_delay();

    let mut eco = Ecosystem::new(config)?;
    eco.populate()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;

    let result = run_tui(&mut terminal, &mut eco, delay, max_turns);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Ok(Some(reason)) = &result {
        log::info!("watch ended after turn {} ({reason:?})", eco.turn());
    }
    result.map(|_| ())
}

/// Greeting, then the driven run. Returns `None` if the user left at the
/// greeting.
fn run_tui(
    terminal: &mut Tui,
    eco: &mut Ecosystem,
    delay: Duration,
    max_turns: Option<u64>,
) -> Result<Option<StopReason>, CliError> {
    terminal.draw(render_greeting)?;
    if is_stop_key(wait_for_key()?) {
        return Ok(None);
    }

    let mut app = App {
        terminal,
        paused: false,
        finished: false,
        last: None,
        delay,
        max_turns,
    };
    app.redraw(eco)?;

    let (tx, rx) = mpsc::channel();
    let done = Arc::new(AtomicBool::new(false));
    let input = {
        let done = Arc::clone(&done);
        thread::spawn(move || forward_input(&tx, &done))
    };

    let summary = Driver::new(delay)
        .with_max_turns(max_turns)
        .run(eco, &rx, &mut app);

    done.store(true, Ordering::Relaxed);
    drop(rx);
    join_input(input);
    let summary = summary?;

    if summary.reason == StopReason::TurnLimit {
        app.finished = true;
        app.redraw(eco)?;
        wait_for_key()?;
    }

    Ok(Some(summary.reason))
}

/// Input thread: translate key presses into control events until the run
/// ends or the user stops it.
fn forward_input(tx: &Sender<ControlEvent>, done: &AtomicBool) {
    while !done.load(Ordering::Relaxed) {
        let Ok(ready) = event::poll(INPUT_POLL) else {
            return;
        };
        if !ready {
            continue;
        }
        let Ok(Event::Key(key)) = event::read() else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let control = match key.code {
            KeyCode::Char(' ') => ControlEvent::Pause,
            KeyCode::Enter => ControlEvent::Resume,
            KeyCode::Esc | KeyCode::Char('q') => ControlEvent::Stop,
            _ => continue,
        };
        if tx.send(control).is_err() || control == ControlEvent::Stop {
            return;
        }
    }
}

/// Wait for the input thread. Returns `false` if it panicked.
fn join_input(input: JoinHandle<()>) -> bool {
    if input.join().is_err() {
        log::warn!("input thread panicked; key presses were lost");
        return false;
    }
    true
}

/// Block until a key is pressed.
fn wait_for_key() -> Result<KeyCode, CliError> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(key.code);
        }
    }
}

const fn is_stop_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Esc | KeyCode::Char('q'))
}

/// TUI state, driven as the run's observer.
struct App<'t> {
    terminal: &'t mut Tui,
    paused: bool,
    finished: bool,
    last: Option<TurnReport>,
    delay: Duration,
    max_turns: Option<u64>,
}

impl App<'_> {
    fn redraw(&mut self, eco: &Ecosystem) -> Result<(), CliError> {
        let view = View {
            eco,
            paused: self.paused,
            finished: self.finished,
            last: self.last.as_ref(),
            delay: self.delay,
            max_turns: self.max_turns,
        };
        self.terminal.draw(|f| ui(f, &view))?;
        Ok(())
    }
}

impl TurnObserver for App<'_> {
    type Error = CliError;

    fn on_turn(&mut self, eco: &Ecosystem, report: &TurnReport) -> Result<(), CliError> {
        self.last = Some(*report);
        self.redraw(eco)
    }

    fn on_pause(&mut self, eco: &Ecosystem) -> Result<(), CliError> {
        self.paused = true;
        self.redraw(eco)
    }

    fn on_resume(&mut self, eco: &Ecosystem) -> Result<(), CliError> {
        self.paused = false;
        self.redraw(eco)
    }
}

/// Everything one frame needs.
struct View<'a> {
    eco: &'a Ecosystem,
    paused: bool,
    finished: bool,
    last: Option<&'a TurnReport>,
    delay: Duration,
    max_turns: Option<u64>,
}

fn render_greeting(f: &mut Frame) {
    let banner = Paragraph::new(GREETING)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title(" Ecosim "));
    f.render_widget(banner, f.area());
}

fn ui(f: &mut Frame, view: &View<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], view);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], view);
    render_stats(f, main_chunks[1], view);
    render_footer(f, chunks[2], view);
}

fn render_header(f: &mut Frame, area: Rect, view: &View<'_>) {
    let status = if view.finished {
        "FINISHED"
    } else if view.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let turn = match view.max_turns {
        Some(limit) => format!("{}/{limit}", view.eco.turn()),
        None => view.eco.turn().to_string(),
    };

    let title = format!(
        " Ecosim | Turn {turn} | {status} | Seed: {} | Delay: {}ms ",
        view.eco.seed(),
        view.delay.as_millis()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, view: &View<'_>) {
    let grid = view.eco.grid();
    let lines: Vec<Line> = (0..grid.rows())
        .map(|row| Line::from(row_glyphs(grid, row).join(" ")))
        .collect();

    let title = format!(" Grid {}x{} ", grid.rows(), grid.cols());
    let map_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(map_widget, area);
}

fn render_stats(f: &mut Frame, area: Rect, view: &View<'_>) {
    let census = view.eco.census();
    let mut lines = vec![Line::from("")];

    for kind in Kind::ALL {
        lines.push(Line::from(vec![
            Span::raw(format!(" {} ", kind.glyph())),
            Span::styled(
                format!("{:<10}", kind.label()),
                Style::default().fg(kind_color(kind)).add_modifier(Modifier::BOLD),
            ),
            Span::raw(census.get(kind).to_string()),
        ]));
    }

    if let Some(report) = view.last {
        lines.push(Line::from(""));
        lines.push(Line::from(format_turn_line(report)));
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Census "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

const fn kind_color(kind: Kind) -> Color {
    match kind {
        Kind::Plant => Color::Green,
        Kind::Rock => Color::Gray,
        Kind::Tree => Color::LightGreen,
        Kind::Herbivore => Color::Yellow,
        Kind::Predator => Color::Red,
    }
}

fn render_footer(f: &mut Frame, area: Rect, view: &View<'_>) {
    let controls = if view.finished {
        " Turn limit reached. Press any key to exit "
    } else {
        " [Space] Pause  [Enter] Resume  [Esc/q] Stop "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
