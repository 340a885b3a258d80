//! # environment
//!
//! owns the interpreter and wires it to a display, input and sound device.
//! the interpreter only knows about discrete ticks; everything to do with real
//! time lives here:
//!
//!  * instructions run at a fixed rate, paced by spin_sleep
//!  * the timers count down at their own rate from elapsed time, so a faster
//!    or slower instruction rate doesn't change how long a delay lasts
//!  * the screen is redrawn at most once per frame, and only if something
//!    changed
use crate::display::Display;
use crate::input::{HostEvent, Input};
use crate::interpreter::{Chip8Interpreter, ControlEvent, RunState, TickOutcome, TimerMode};
use crate::sound::Sound;
use log::{debug, info};
use rand::RngCore;
use spin_sleep::LoopHelper;
use std::error::Error;
use std::time::Duration;

/// how long a beep lasts once the sound timer runs out
pub const BEEP_LENGTH: Duration = Duration::from_millis(120);

/// rates for the main loop, all per second
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub ips: u32,
    pub timer_hz: u32,
    pub fps: u32,
}

impl Pacing {
    fn timer_period(&self) -> Duration {
        Duration::from_secs(1) / self.timer_hz.max(1)
    }

    fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

pub struct Environment<'a, R> {
    interpreter: Chip8Interpreter<R>,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    pacing: Pacing,
    timer_elapsed: Duration,
    frame_elapsed: Duration,
    beep_left: Option<Duration>,
    drawn_state: Option<RunState>,
}

impl<'a, R: RngCore> Environment<'a, R> {
    pub fn new(
        interpreter: Chip8Interpreter<R>,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        pacing: Pacing,
    ) -> Self {
        Environment {
            interpreter,
            display,
            input,
            sound,
            pacing,
            timer_elapsed: Duration::ZERO,
            // draw straight away
            frame_elapsed: pacing.frame_period(),
            beep_left: None,
            drawn_state: None,
        }
    }

    pub fn interpreter(&self) -> &Chip8Interpreter<R> {
        &self.interpreter
    }

    /// run until the machine halts. Ok on quit, Err on a fault or a broken
    /// device
    pub fn main_loop(&mut self) -> Result<(), Box<dyn Error>> {
        let mut loop_helper = LoopHelper::builder()
            .report_interval_s(1.0)
            .build_with_target_rate(self.pacing.ips as f64);
        info!("running at {} instructions/s", self.pacing.ips);

        let result = loop {
            let delta = loop_helper.loop_start();
            match self.cycle(delta) {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(e) => break Err(e),
            }
            if let Some(rate) = loop_helper.report_rate() {
                debug!("measured {:.0} instructions/s", rate);
            }
            loop_helper.loop_sleep();
        };
        let stopped = self.sound.stop();
        result?;
        stopped
    }

    /// one pass of the loop: route input, execute an instruction, then catch
    /// the timers, sound and screen up with `elapsed`. returns false once the
    /// machine has halted
    pub fn cycle(&mut self, elapsed: Duration) -> Result<bool, Box<dyn Error>> {
        for event in self.input.poll()? {
            match event {
                HostEvent::Key(key, pressed) => self.interpreter.set_key(key as usize, pressed),
                HostEvent::PauseToggle => self.interpreter.handle(ControlEvent::PauseToggle),
                HostEvent::Quit => self.interpreter.handle(ControlEvent::Quit),
            }
        }

        match self.interpreter.tick() {
            TickOutcome::Executed | TickOutcome::Paused => {}
            TickOutcome::Halted => return Ok(false),
            TickOutcome::Fault(kind) => {
                // leave the last frame up so there's something to look at
                self.redraw(true)?;
                let err: Box<dyn Error> = match self.interpreter.last_fault() {
                    Some(report) => Box::new(report),
                    None => Box::new(kind),
                };
                return Err(err);
            }
        }

        if self.interpreter.config().timer_mode == TimerMode::External {
            self.timer_elapsed += elapsed;
            let period = self.pacing.timer_period();
            while self.timer_elapsed >= period {
                self.timer_elapsed -= period;
                self.interpreter.tick_timers();
            }
        }

        self.update_sound(elapsed)?;

        self.frame_elapsed += elapsed;
        if self.frame_elapsed >= self.pacing.frame_period() {
            self.frame_elapsed = Duration::ZERO;
            self.redraw(false)?;
        }
        Ok(true)
    }

    fn update_sound(&mut self, elapsed: Duration) -> Result<(), Box<dyn Error>> {
        if self.interpreter.beep_pending() {
            self.sound.beep()?;
            self.beep_left = Some(BEEP_LENGTH);
        } else if let Some(left) = self.beep_left {
            match left.checked_sub(elapsed) {
                Some(left) if !left.is_zero() => self.beep_left = Some(left),
                _ => {
                    self.sound.stop()?;
                    self.beep_left = None;
                }
            }
        }
        Ok(())
    }

    fn redraw(&mut self, force: bool) -> Result<(), Box<dyn Error>> {
        let run_state = self.interpreter.run_state();
        let changed = self.interpreter.take_redraw();
        if force || changed || self.drawn_state != Some(run_state) {
            self.display.draw(self.interpreter.framebuffer(), run_state)?;
            self.drawn_state = Some(run_state);
        }
        Ok(())
    }
}
