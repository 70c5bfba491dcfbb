//! Simon on the nRF52840-DK.
//!
//! Buttons 1 to 4 are S1 to S4, LEDs 1 to 4 stand in for the display and the buzzer is reported
//! over defmt. The serial commands are read from the on board USB UART.

#![no_std]
#![no_main]

use core::sync::atomic::{AtomicBool, AtomicI8, Ordering};

use defmt::{Display2Format, info, warn};
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals, uarte,
};
use embassy_time::{Duration, Ticker};
use simon_core::{
    Button, ButtonSampler, ButtonSet, Clock, FixedKnob, Game, Outputs, SharedState,
    buttons::BUTTON_COUNT,
    config::{BUTTON_SAMPLE_MS, ELAPSED_TICK_MS},
    serial::{Command, CommandDecoder},
    tone::ToneGenerator,
};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UARTE0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

/// The DK has no potentiometer, playback runs at a fixed pace.
const KNOB: u8 = 64;

static SHARED: SharedState = SharedState::new();

/// Octave steps requested over serial and not yet applied to the buzzer.
static OCTAVE_STEPS: AtomicI8 = AtomicI8::new(0);
static OCTAVE_RESET: AtomicBool = AtomicBool::new(false);

/// LEDs are active low, like the buttons.
struct LedBoard {
    leds: [Output<'static>; BUTTON_COUNT],
    tone: ToneGenerator,
}

impl LedBoard {
    fn show(&mut self, lit: ButtonSet) {
        for button in Button::ALL {
            let led = &mut self.leds[usize::from(button.index())];
            if lit.contains(button) {
                led.set_low();
            } else {
                led.set_high();
            }
        }
    }

    fn apply_octave_requests(&mut self) {
        if OCTAVE_RESET.swap(false, Ordering::Relaxed) {
            self.tone.reset_octave();
        }

        let steps = OCTAVE_STEPS.swap(0, Ordering::Relaxed);
        for _ in 0..steps.unsigned_abs() {
            if steps > 0 {
                self.tone.raise_octave();
            } else {
                self.tone.lower_octave();
            }
        }
    }
}

impl Outputs for LedBoard {
    fn show_digit(&mut self, digit: u8) {
        let lit = Button::from_index(digit).map_or(ButtonSet::EMPTY, ButtonSet::from);
        self.show(lit);
    }

    fn clear_display(&mut self) {
        self.show(ButtonSet::EMPTY);
    }

    fn show_victory(&mut self) {
        info!("victory");
        self.show(ButtonSet::ALL);
    }

    fn show_defeat(&mut self) {
        warn!("defeat");
        self.show(ButtonSet::EMPTY);
    }

    /// The low four bits of the score in binary, LED 1 is the least significant.
    fn show_score(&mut self, score: u16) {
        info!("score {}", score);
        self.show(ButtonSet::from_bits((score & 0xF) as u8));
    }

    fn tone_on(&mut self, digit: u8) {
        self.apply_octave_requests();
        self.tone.start(digit);
        if let Some(hz) = self.tone.current_frequency_hz() {
            info!("tone {} at {} Hz", digit, hz);
        }
    }

    fn tone_off(&mut self) {
        self.tone.stop();
    }
}

#[embassy_executor::task]
async fn elapsed_tick() -> ! {
    let mut clock = Clock::new(&SHARED, FixedKnob(KNOB));
    let mut ticker = Ticker::every(Duration::from_millis(ELAPSED_TICK_MS.into()));

    loop {
        clock.tick();
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn button_tick(buttons: [Input<'static>; BUTTON_COUNT]) -> ! {
    let mut sampler = ButtonSampler::new(&SHARED);
    let mut ticker = Ticker::every(Duration::from_millis(BUTTON_SAMPLE_MS.into()));

    loop {
        let raw = Button::ALL
            .into_iter()
            .filter(|button| buttons[usize::from(button.index())].is_low())
            .collect();
        sampler.tick(raw);
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn game(mut board: LedBoard) -> ! {
    let mut game = Game::new(&SHARED);

    loop {
        if let Some(transition) = game.poll(&mut board) {
            info!(
                "{} -> {}",
                Display2Format(&transition.from),
                Display2Format(&transition.to)
            );
        }
        yield_now().await;
    }
}

fn apply(command: Command) {
    match command {
        // The physical buttons are the only way to play on the board
        Command::Press(button) => info!("ignoring serial press of {}", Display2Format(&button)),
        Command::IncreaseFrequency => {
            OCTAVE_STEPS.fetch_add(1, Ordering::Relaxed);
        }
        Command::DecreaseFrequency => {
            OCTAVE_STEPS.fetch_sub(1, Ordering::Relaxed);
        }
        Command::Reset => {
            OCTAVE_STEPS.store(0, Ordering::Relaxed);
            OCTAVE_RESET.store(true, Ordering::Relaxed);
            SHARED.request_reset();
        }
        Command::Seed(seed) => {
            info!("seed {=u32:#010x} requested", seed);
            SHARED.request_seed(seed);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());

    let leds = [
        Output::new(p.P0_13, Level::High, OutputDrive::Standard),
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_15, Level::High, OutputDrive::Standard),
        Output::new(p.P0_16, Level::High, OutputDrive::Standard),
    ];
    let buttons = [
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
        Input::new(p.P0_25, Pull::Up),
    ];

    spawner.must_spawn(elapsed_tick());
    spawner.must_spawn(button_tick(buttons));
    spawner.must_spawn(game(LedBoard {
        leds,
        tone: ToneGenerator::new(),
    }));
    info!("All tasks spawned");

    let mut config = uarte::Config::default();
    config.baudrate = uarte::Baudrate::BAUD115200;
    let mut uart = uarte::Uarte::new(p.UARTE0, p.P0_08, p.P0_06, Irqs, config);

    let mut decoder = CommandDecoder::new();
    let mut byte = [0u8; 1];
    loop {
        if let Err(e) = uart.read(&mut byte).await {
            warn!("serial read failed: {}", e);
            continue;
        }

        match decoder.push(byte[0]) {
            Ok(Some(command)) => apply(command),
            Ok(None) => {}
            Err(e) => warn!("{}", Display2Format(&e)),
        }
    }
}
