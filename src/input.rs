use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use log::debug;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

/// the COSMAC keypad on the left-hand side of a qwerty keyboard:
///
/// ```text
///   1 2 3 C        1 2 3 4
///   4 5 6 D   <-   q w e r
///   7 8 9 E        a s d f
///   A 0 B F        z x c v
/// ```
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// things the host can tell the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// keypad key index and whether it's now down
    Key(u8, bool),
    PauseToggle,
    Quit,
}

/// reads keypresses and emulator controls
pub trait Input {
    /// everything that happened since the last poll, oldest first
    fn poll(&mut self) -> Result<Vec<HostEvent>, io::Error>;
}

/// terminals report presses (and autorepeat) but not releases, so a key
/// counts as held until it hasn't been seen for a while
struct KeyHold {
    hold: Duration,
    held: HashMap<u8, Instant>,
}

impl KeyHold {
    fn new(hold: Duration) -> Self {
        KeyHold {
            hold,
            held: HashMap::new(),
        }
    }

    /// note a press; only the first press of a held key is news
    fn press(&mut self, key: u8, now: Instant) -> Option<HostEvent> {
        match self.held.insert(key, now) {
            Some(_) => None,
            None => Some(HostEvent::Key(key, true)),
        }
    }

    /// release anything that's gone quiet
    fn expire(&mut self, now: Instant) -> Vec<HostEvent> {
        let hold = self.hold;
        let mut released: Vec<u8> = self
            .held
            .iter()
            .filter(|(_, seen)| now.duration_since(**seen) >= hold)
            .map(|(k, _)| *k)
            .collect();
        released.sort_unstable();
        for k in &released {
            self.held.remove(k);
        }
        released
            .into_iter()
            .map(|k| HostEvent::Key(k, false))
            .collect()
    }
}

enum Mapped {
    Key(u8),
    Control(HostEvent),
}

fn map_key(keymap: &HashMap<char, u8>, evt: KeyEvent) -> Option<Mapped> {
    match evt.code {
        KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Mapped::Control(HostEvent::Quit))
        }
        KeyCode::Esc => Some(Mapped::Control(HostEvent::Quit)),
        KeyCode::Char(' ') => Some(Mapped::Control(HostEvent::PauseToggle)),
        KeyCode::Char(key) => keymap.get(&key.to_ascii_lowercase()).map(|k| Mapped::Key(*k)),
        _ => None,
    }
}

/// keypad and controls read from the terminal with crossterm
pub struct TermInput {
    keymap: HashMap<char, u8>,
    keys: KeyHold,
}

impl TermInput {
    pub fn new(hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            keys: KeyHold::new(hold),
        })
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<Vec<HostEvent>, io::Error> {
        let mut events = Vec::new();
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match map_key(&self.keymap, evt) {
                    Some(Mapped::Key(k)) => events.extend(self.keys.press(k, Instant::now())),
                    Some(Mapped::Control(c)) => events.push(c),
                    None => debug!("can't map {:?} to a COSMAC key", evt.code),
                },
                // resizes get picked up on the next redraw
                _ => {}
            }
        }
        events.extend(self.keys.expire(Instant::now()));
        Ok(events)
    }
}

/// Input that plays back canned batches of events, one batch per poll
pub struct ScriptedInput {
    batches: VecDeque<Vec<HostEvent>>,
}

impl ScriptedInput {
    pub fn new(batches: Vec<Vec<HostEvent>>) -> Self {
        ScriptedInput {
            batches: batches.into(),
        }
    }
}

impl Input for ScriptedInput {
    fn poll(&mut self) -> Result<Vec<HostEvent>, io::Error> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
