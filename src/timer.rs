/// the delay and sound timers. both count down to zero, one step per timer
/// tick, and stick there
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// decrement both timers once. returns true when the sound timer runs out
    /// on this tick, i.e. it was exactly 1
    pub fn tick(&mut self) -> bool {
        if self.delay > 0 {
            self.delay -= 1;
        }
        match self.sound {
            0 => false,
            s => {
                self.sound = s - 1;
                s == 1
            }
        }
    }
}
