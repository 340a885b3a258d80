use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tui::style::Color;

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;
pub const DEFAULT_TIMER_HZ: u32 = 60;
pub const DEFAULT_FRAME_RATE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SoundKind {
    /// ring the terminal bell
    Bell,
    /// console speaker tone
    Beep,
    /// silence
    Mute,
}

#[derive(Parser, Debug)]
#[command(
    name = "chip8vm",
    about = "Run a CHIP-8 program in the terminal",
    long_about = "Runs a CHIP-8 program image in the terminal.\n\
                  Keypad: 1234/qwer/asdf/zxcv. Space pauses, Esc quits.",
    version
)]
pub struct Settings {
    /// Program image to run
    pub rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND, value_parser = clap::value_parser!(u32).range(1..))]
    pub ips: u32,

    /// Delay/sound timer decrements per second
    #[arg(long, default_value_t = DEFAULT_TIMER_HZ, value_parser = clap::value_parser!(u32).range(1..))]
    pub timer_hz: u32,

    /// Screen refreshes per second
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Lit pixel colour: a name (white, green, ...) or #rrggbb
    #[arg(long, default_value = "white", value_parser = parse_color)]
    pub fg: Color,

    /// Background colour: a name or #rrggbb
    #[arg(long, default_value = "black", value_parser = parse_color)]
    pub bg: Color,

    /// How to sound the beep
    #[arg(long, value_enum, default_value_t = SoundKind::Bell)]
    pub sound: SoundKind,

    /// Seed for the random number instruction
    #[arg(long)]
    pub seed: Option<u64>,

    /// How long a key stays down after the terminal last reported it, in ms
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub key_hold_ms: u64,

    /// Decrement timers once per instruction instead of by wall-clock
    #[arg(long)]
    pub timers_per_instruction: bool,
}

impl Settings {
    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}

/// colour names understood by the terminal, or a hex triple
pub fn parse_color(s: &str) -> Result<Color, String> {
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("expected #rrggbb, got {}", s));
        }
        let rgb = u32::from_str_radix(hex, 16).map_err(|e| format!("{}: {}", s, e))?;
        let [_, r, g, b] = rgb.to_be_bytes();
        return Ok(Color::Rgb(r, g, b));
    }
    let c = match s.to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "white" => Color::White,
        _ => return Err(format!("unknown colour {}", s)),
    };
    Ok(c)
}
