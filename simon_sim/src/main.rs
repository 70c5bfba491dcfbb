use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};
use ratatui::{
    Terminal,
    crossterm::{
        ExecutableCommand as _,
        event::{self, KeyCode, KeyEventKind, KeyModifiers},
        terminal::{disable_raw_mode, enable_raw_mode},
    },
    prelude::CrosstermBackend,
};

use simon_core::{
    ButtonSampler, Clock, Game, Lfsr, SharedState, Timing,
    config::BUTTON_SAMPLE_MS,
    serial::{Command, CommandDecoder},
};

use board::{Board, ButtonLines, SharedKnob};
use logger::LogRing;
use options::SimOptions;

mod board;
mod logger;
mod options;
mod ui;

/// Knob movement for one arrow key press.
const KNOB_STEP: i16 = 16;
/// Time between redraws of the TUI.
const FRAME: Duration = Duration::from_millis(16);
/// Pause between two control loop iterations.
const POLL_INTERVAL: Duration = Duration::from_micros(200);

#[derive(clap::Parser, Debug)]
#[clap(
    name = "simon-sim",
    about = "Play the Simon memory game in the terminal"
)]
struct Cli {
    #[clap(flatten)]
    options: SimOptions,

    /// Lowest level shown in the log pane.
    #[clap(long, env = "SIMON_LOG", default_value = "info")]
    log_level: LevelFilter,
}

fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        hook(info);
    }));
}

fn init() -> Result<impl ratatui::backend::Backend> {
    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(ratatui::crossterm::terminal::EnterAlternateScreen)?;

    Ok(CrosstermBackend::new(std::io::stdout()))
}

fn restore() -> Result<()> {
    let mut stdout = std::io::stdout();
    disable_raw_mode()?;
    stdout.execute(ratatui::crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.options.validate()?;

    let logs = logger::install(cli.log_level)?;

    set_panic_hook();
    let backend = init()?;

    let result = run(backend, &cli.options, logs);

    restore()?;

    result
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Input {
    /// A key that is also a serial command byte.
    Byte(u8),
    Knob(i16),
    Redraw,
    Quit,
}

/// Return Err on a error and Ok(None) when there are no events
fn poll_event() -> Result<Option<Input>> {
    if !event::poll(Duration::default())? {
        return Ok(None);
    }

    let input = match event::read()? {
        event::Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            if key_event.modifiers.contains(KeyModifiers::CONTROL)
                && key_event.code == KeyCode::Char('c')
            {
                return Ok(Some(Input::Quit));
            }

            match key_event.code {
                KeyCode::Esc => Input::Quit,
                KeyCode::Up => Input::Knob(KNOB_STEP),
                KeyCode::Down => Input::Knob(-KNOB_STEP),
                KeyCode::Char(c) if c.is_ascii() => Input::Byte(c as u8),
                _ => return Ok(None),
            }
        }
        event::Event::Resize(_, _) => Input::Redraw,
        _ => {
            return Ok(None);
        }
    };

    Ok(Some(input))
}

/// The 1 ms and 5 ms ticks, paced by the wall clock.
fn spawn_ticks(
    shared: Arc<SharedState>,
    lines: Arc<ButtonLines>,
    knob: SharedKnob,
    tick: Duration,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut clock = Clock::new(&shared, knob);
        let mut sampler = ButtonSampler::new(&shared);
        let mut next = Instant::now();
        let mut ms: u32 = 0;

        while running.load(Ordering::Relaxed) {
            clock.tick();
            let raw = lines.tick();
            if ms % BUTTON_SAMPLE_MS == 0 {
                sampler.tick(raw);
            }
            ms = ms.wrapping_add(1);

            next += tick;
            if let Some(wait) = next.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
    })
}

fn run<B: ratatui::backend::Backend>(
    backend: B,
    options: &SimOptions,
    logs: &LogRing,
) -> Result<()> {
    let shared = Arc::new(SharedState::new());
    let lines = Arc::new(ButtonLines::new());
    let knob = SharedKnob::new(options.knob);
    let running = Arc::new(AtomicBool::new(true));

    let tick = Duration::from_secs_f64(options.tick_scale / 1_000.0);
    let ticks = spawn_ticks(
        shared.clone(),
        lines.clone(),
        knob.clone(),
        tick,
        running.clone(),
    );
    info!("ticking every {:?}", tick);

    let controls = Controls {
        shared: &shared,
        lines: &lines,
        knob: &knob,
        hold_ms: options.hold_ms,
    };
    let lfsr = options.seed.map(Lfsr::new).unwrap_or_default();
    let result = control_loop(Terminal::new(backend)?, &controls, lfsr, logs);

    running.store(false, Ordering::Relaxed);
    if ticks.join().is_err() {
        anyhow::bail!("tick thread panicked");
    }

    result
}

/// Inputs of the game that do not go through the button lines' debouncer.
struct Controls<'a> {
    shared: &'a SharedState,
    lines: &'a ButtonLines,
    knob: &'a SharedKnob,
    hold_ms: u32,
}

impl Controls<'_> {
    fn apply(&self, command: Command, board: &mut Board) {
        match command {
            Command::Press(button) => self.lines.press(button, self.hold_ms),
            Command::IncreaseFrequency => {
                board.tone_mut().raise_octave();
            }
            Command::DecreaseFrequency => {
                board.tone_mut().lower_octave();
            }
            Command::Reset => {
                board.tone_mut().reset_octave();
                self.shared.request_reset();
            }
            Command::Seed(seed) => self.shared.request_seed(seed),
        }
    }
}

fn control_loop<B: ratatui::backend::Backend>(
    mut terminal: Terminal<B>,
    controls: &Controls<'_>,
    lfsr: Lfsr,
    logs: &LogRing,
) -> Result<()> {
    let mut game = Game::with_config(controls.shared, Timing::default(), lfsr);
    let mut board = Board::new();
    let mut decoder = CommandDecoder::new();
    let mut last_draw: Option<Instant> = None;

    loop {
        while let Some(input) = poll_event()? {
            match input {
                Input::Quit => return Ok(()),
                Input::Redraw => last_draw = None,
                Input::Knob(delta) => {
                    let knob = controls.knob.turn(delta);
                    info!("knob at {}", knob);
                }
                Input::Byte(byte) => {
                    // Rejected seeds are logged by the decoder
                    if let Ok(Some(command)) = decoder.push(byte) {
                        controls.apply(command, &mut board);
                    }
                }
            }
        }

        game.poll(&mut board);

        if last_draw.is_none_or(|drawn| drawn.elapsed() >= FRAME) {
            let view = ui::View {
                digits: board.display().digits(),
                tone: board.tone().playing(),
                frequency_hz: board.tone().current_frequency_hz(),
                octave: board.tone().octave(),
                phase: game.phase(),
                length: game.length(),
                rank: game.rank(),
                knob: controls.knob.value(),
                playback_ms: controls.shared.playback_duration(),
                logs,
            };
            terminal.draw(|frame| ui::draw(frame, &view))?;
            last_draw = Some(Instant::now());
        }

        thread::sleep(POLL_INTERVAL);
    }
}
