use std::error::Error;
use std::fs::File;

use chip8vm::config::{Settings, SoundKind};
use chip8vm::display::MonoTermDisplay;
use chip8vm::environment::{Environment, Pacing};
use chip8vm::input::TermInput;
use chip8vm::sound::{Mute, SimpleBeep, Sound, TerminalBell};
use chip8vm::{Chip8Interpreter, LoadError, MachineConfig, TimerMode};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let settings = Settings::parse();

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = MachineConfig {
        timer_mode: if settings.timers_per_instruction {
            TimerMode::PerTick
        } else {
            TimerMode::External
        },
    };

    // load a program before touching the terminal, so load errors print cleanly
    let mut f = File::open(&settings.rom).map_err(LoadError::ImageUnreadable)?;
    let interpreter = Chip8Interpreter::load_program(&mut f, rng, config)?;

    let mut sound: Box<dyn Sound> = match settings.sound {
        SoundKind::Bell => Box::new(TerminalBell::new()),
        SoundKind::Beep => Box::new(SimpleBeep::new()),
        SoundKind::Mute => Box::new(Mute::new()),
    };
    let pacing = Pacing {
        ips: settings.ips,
        timer_hz: settings.timer_hz,
        fps: settings.fps,
    };

    // the terminal is put back as these drop, before any error is reported
    let mut input = TermInput::new(settings.key_hold())?;
    let mut display = MonoTermDisplay::new(settings.fg, settings.bg)?;
    let mut env = Environment::new(
        interpreter,
        &mut display,
        &mut input,
        sound.as_mut(),
        pacing,
    );
    let result = env.main_loop();
    drop(env);
    drop(display);
    drop(input);
    result
}
