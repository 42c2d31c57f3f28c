//! sawkey-firmware
//!
//! Single-voice keyboard firmware for the Raspberry Pi Pico 2. Wires the
//! library crates into two execution contexts:
//!
//! 1. **Foreground** (thread-mode executor, every 100 ms): scan the key
//!    matrix through the mux bus, publish the step size of the highest
//!    pressed key, log any oscillator traces, refresh the status display,
//!    toggle the heartbeat LED.
//! 2. **Sample clock** (interrupt executor on `SWI_IRQ_1`, 22 kHz on
//!    average): load the step size, advance the phase accumulator, write
//!    the sawtooth level to the audio PWM compare register.
//!
//! The step size is the only value crossing between the two, through a
//! relaxed atomic. The sample clock never logs; it queues the occasional
//! trace for the foreground instead.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use embassy_time::{Delay, Duration, Instant, Ticker, Timer, TICK_HZ};
use embedded_hal::pwm::SetDutyCycle;
use {defmt_rtt as _, panic_probe as _};

use mux_bus::{KeyScanner, MuxBus};
use sawkey::keyboard::first_descent;
use sawkey::synth::TraceDecimator;
use sawkey::{publish_scan, KeyboardStatus, Oscillator, SharedStep, SynthConfig, TraceRing};
use sawkey_oled_display_rs::{DisplayConfig, StatusFrame, StatusScreen};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Runs the sample clock above the foreground executor.
static SAMPLE_EXECUTOR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    SAMPLE_EXECUTOR.on_interrupt()
}

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Current step size: written by the keyboard task, read by the sample clock.
static STEP: SharedStep = SharedStep::new();

/// Oscillator traces queued by the sample clock, logged by the keyboard task.
static TRACES: TraceRing = TraceRing::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type Scanner = KeyScanner<Output<'static>, Input<'static>, Delay>;

type Screen = StatusScreen<I2c<'static, I2C0, i2c::Async>>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Sample clock: one oscillator step per deadline, nothing that can wait.
///
/// Deadlines come from a [`sawkey::synth::SampleSchedule`] on the embassy-time tick, so the
/// average rate is exactly `sample_rate_hz` even though the tick period is
/// not a whole number of microseconds.
#[embassy_executor::task]
async fn sample_clock_task(mut audio: PwmOutput<'static>, top: u16, config: SynthConfig) {
    let Some(mut schedule) = config.sample_schedule(TICK_HZ) else {
        error!("Sample rate is 0 Hz; audio disabled");
        return;
    };
    let mut oscillator = Oscillator::new(config.output_resolution());
    let mut decimator = TraceDecimator::new(config.trace_interval_ticks);
    let resolution = oscillator.resolution();

    let start = Instant::now().as_ticks();
    loop {
        Timer::at(Instant::from_ticks(start + schedule.next_deadline())).await;

        let tick = oscillator.tick_shared(&STEP);
        // Only the compare register is written; the slice latches it at wrap.
        // The compare never exceeds `top`, so this cannot be rejected.
        let _ = audio.set_duty_cycle(resolution.pwm_compare(tick.level, top));

        if decimator.poll() {
            TRACES.record(tick);
        }
    }
}

/// Foreground loop: scan, publish, log, wait for the refresh deadline,
/// redraw, heartbeat.
#[embassy_executor::task]
async fn keyboard_task(
    mut scanner: Scanner,
    mut screen: Screen,
    mut led: Output<'static>,
    config: SynthConfig,
) {
    info!("Keyboard task started");

    let mut ticker = Ticker::every(Duration::from_millis(config.refresh_interval_ms));
    let mut status = KeyboardStatus::default();

    loop {
        // A failed scan keeps the previous step size for this iteration.
        match scanner.scan() {
            Ok(matrix) => {
                let previous = status.note;
                status = publish_scan(matrix, &STEP);
                if status.note != previous {
                    debug!("Note {} (keys {:03x})", status.note, matrix.bits());
                }
            }
            Err(e) => warn!("Key scan failed: {}", e),
        }

        TRACES.drain(|tick| {
            debug!(
                "Tick: step={} phase={} sample={}",
                tick.step_size, tick.phase, tick.sample
            )
        });
        let dropped = TRACES.take_dropped();
        if dropped > 0 {
            warn!("{} oscillator traces dropped", dropped);
        }

        ticker.next().await;

        if screen.is_initialized() {
            if let Err(e) = screen.refresh(StatusFrame::from(status)).await {
                error!("Display refresh failed: {}", e);
            }
        }

        led.toggle();
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("sawkey starting");

    let config = SynthConfig::default();

    if let Some(note) = first_descent() {
        warn!(
            "Note table: {} step {} is below the previous note",
            note.label(),
            note.step_size()
        );
    }

    // —— Pin assignments ————————————————————————————————————————————————————
    // RA0..RA2 → GP2..GP4   mux address lines
    // REN      → GP5        mux enable
    // OUT      → GP6        mux shared data line
    // C0..C3   → GP7..GP10  matrix columns (active-low, pulled up on the board)
    // AUDIO    → GP16       PWM slice 0 A
    // I2C_SDA  → GP20       (p.PIN_20)
    // I2C_SCL  → GP21       (p.PIN_21)
    // LED      → GP25       heartbeat
    // JOYX/Y   → GP26/GP27  reserved, not read
    // ———————————————————————————————————————————————————————————————————————

    let mut bus = MuxBus::new(
        [
            Output::new(p.PIN_2, Level::Low),
            Output::new(p.PIN_3, Level::Low),
            Output::new(p.PIN_4, Level::Low),
        ],
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Delay,
    );

    let columns = [
        Input::new(p.PIN_7, Pull::None),
        Input::new(p.PIN_8, Pull::None),
        Input::new(p.PIN_9, Pull::None),
        Input::new(p.PIN_10, Pull::None),
    ];

    let led = Output::new(p.PIN_25, Level::Low);

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let mut screen = StatusScreen::new(i2c, DisplayConfig::default());

    // —— Display bring-up over the mux bus ——————————————————————————————————
    // Finished before the sample clock starts; the bus is foreground-only
    // from here on.

    if let Err(e) = bus.reset_display() {
        error!("Display reset failed: {}", e);
    }
    match screen.init().await {
        Ok(()) => info!("Display initialised"),
        // Audio still runs without a display.
        Err(e) => error!("Display init failed: {}", e),
    }
    if let Err(e) = bus.enable_display_power() {
        error!("Display power enable failed: {}", e);
    }

    let scanner = KeyScanner::new(bus, columns);

    // —— Audio output ——————————————————————————————————————————————————————

    let mut pwm_config = pwm::Config::default();
    pwm_config.top = config.pwm_top(clk_sys_freq());
    pwm_config.compare_a = 0;
    let top = pwm_config.top;
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm_config);
    let (audio, _) = pwm.split();
    let audio = unwrap!(audio);
    info!(
        "Audio PWM wraps at {} for {} Hz samples",
        top, config.sample_rate_hz
    );

    // —— Spawn tasks ————————————————————————————————————————————————————————

    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let sample_spawner = SAMPLE_EXECUTOR.start(interrupt::SWI_IRQ_1);
    sample_spawner.spawn(unwrap!(sample_clock_task(audio, top, config)));

    spawner.spawn(unwrap!(keyboard_task(scanner, screen, led, config)));

    info!("All tasks spawned");
}
