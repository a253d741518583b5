use std::fs;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use chip8vm::display::{HEIGHT, WIDTH};
use chip8vm::{Display, Interpreter, Keypad};

const TIMER_HZ: u64 = 60;

#[derive(Parser, Debug)]
#[command(version, about = "A CHIP-8 virtual machine")]
struct Args {
    /// Path to the ROM file to run
    rom: String,

    /// CPU speed in instructions per second
    #[arg(long, default_value_t = 600)]
    ips: u64,

    /// Use the CHIP-48 semantics for the shift, jump-offset and
    /// register store/load instructions
    #[arg(long)]
    chip48: bool,
}

/// QWERTY mapping for the 4x4 hex pad:
///   1 2 3 C        1 2 3 4
///   4 5 6 D   <-   Q W E R
///   7 8 9 E        A S D F
///   A 0 B F        Z X C V
const KEY_MAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

fn hex_key(key: Key) -> Option<u8> {
    KEY_MAP
        .iter()
        .find(|(mapped, _)| *mapped == key)
        .map(|&(_, code)| code)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = fs::read(&args.rom).with_context(|| format!("reading {}", args.rom))?;
    info!("loaded {} ({} bytes)", args.rom, rom.len());

    let mut interp = Interpreter::with_quirks(args.chip48);
    interp.load_program(&rom)?;
    let mut display = Display::new();
    let mut keypad = Keypad::new();

    let mut window = Window::new(
        "chip8vm - ESC to exit",
        WIDTH,
        HEIGHT,
        WindowOptions {
            scale: Scale::X16,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| anyhow!("creating window: {e:?}"))?;
    // Limit to max ~60 fps update rate
    window.limit_update_rate(Some(Duration::from_micros(16600)));

    let cycle_interval = Duration::from_nanos(1_000_000_000 / args.ips.max(1));
    let timer_interval = Duration::from_nanos(1_000_000_000 / TIMER_HZ);
    let mut last_cycle = Instant::now();
    let mut last_timer = Instant::now();
    let mut frame = vec![0u32; WIDTH * HEIGHT];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        keypad.begin_poll();
        for key in window.get_keys_pressed(KeyRepeat::No) {
            if let Some(code) = hex_key(key) {
                keypad.press(code);
            }
        }
        for key in window.get_keys_released() {
            if let Some(code) = hex_key(key) {
                keypad.release(code);
            }
        }

        if interp.is_paused() {
            if let Some(code) = keypad.last_pressed() {
                interp.resume_with_key(code);
            }
            // don't replay the wait as a burst of catch-up cycles
            last_cycle = Instant::now();
        } else {
            let now = Instant::now();
            while now.duration_since(last_cycle) >= cycle_interval {
                interp.cycle(&mut display, &keypad)?;
                last_cycle += cycle_interval;
            }
        }

        if last_timer.elapsed() >= timer_interval {
            interp.tick_timers(); // frozen while paused
            last_timer = Instant::now();
        }

        if display.redraw_pending() {
            for (i, px) in frame.iter_mut().enumerate() {
                *px = if display.pixel(i % WIDTH, i / WIDTH) {
                    0x00FF_FFFF
                } else {
                    0
                };
            }
            window
                .update_with_buffer(&frame, WIDTH, HEIGHT)
                .map_err(|e| anyhow!("presenting frame: {e:?}"))?;
            display.clear_redraw();
        } else {
            window.update();
        }
    }

    Ok(())
}
