#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-cell color decay state machine.
//!
//! Every cell that appears during a run owns one [`CellDecayState`]. Each
//! rendered frame ticks it once. The three color channels are coupled: red
//! rises first, its peak starts green, green's peak sends both into decline,
//! red reaching zero starts blue, and blue's decline ends in a single white
//! flash followed by a permanent dim blue. The arc is driven by an explicit
//! [`DecayPhase`] so the coupling lives in one place instead of in flags
//! spread across the channels.

use nebula_life_core::CellColor;

/// Intensity limits and step sizes that shape the decay arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecayProfile {
    /// Intensity change applied per tick; green falls at twice this rate.
    pub step: u8,
    /// Red intensity of a freshly created cell.
    pub red_start: u8,
    /// Red intensity at which red holds and green starts rising.
    pub red_peak: u8,
    /// Green intensity at which green and red start falling.
    pub green_peak: u8,
    /// Blue intensity set when red has fully faded.
    pub blue_baseline: u8,
    /// Blue intensity at which blue starts falling.
    pub blue_peak: u8,
    /// Blue intensity of the terminal color.
    pub blue_end: u8,
}

impl DecayProfile {
    /// Profile used by the simulation unless configured otherwise.
    pub const DEFAULT: DecayProfile = DecayProfile {
        step: 2,
        red_start: 70,
        red_peak: 255,
        green_peak: 150,
        blue_baseline: 70,
        blue_peak: 254,
        blue_end: 80,
    };

    /// Color of a cell that has not been ticked yet.
    #[must_use]
    pub const fn initial_color(&self) -> CellColor {
        CellColor::from_rgb(self.red_start, 0, 0)
    }

    /// Color shown for the single flash frame before a cell decays.
    #[must_use]
    pub const fn flash_color(&self) -> CellColor {
        CellColor::from_rgb(u8::MAX, u8::MAX, u8::MAX)
    }

    /// Color a decayed cell keeps for the rest of the run.
    #[must_use]
    pub const fn terminal_color(&self) -> CellColor {
        CellColor::from_rgb(0, 0, self.blue_end)
    }
}

impl Default for DecayProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Stage of a single cell's decay arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecayPhase {
    /// Red is rising towards its peak.
    Forming,
    /// Red holds at its peak while green rises.
    Peaking,
    /// Red and green fall, then blue rises and falls.
    Fading,
    /// The flash color is showing; the next tick decays the cell.
    Flashing,
    /// Terminal. The color is frozen.
    Decayed,
}

/// Activity of one color channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelState {
    /// Intensity increases each tick.
    Rising,
    /// Intensity is held.
    Holding,
    /// Intensity decreases each tick.
    Falling,
    /// Channel is inactive.
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Channel {
    state: ChannelState,
    intensity: u8,
}

impl Channel {
    const fn new(state: ChannelState, intensity: u8) -> Self {
        Self { state, intensity }
    }

    fn raise(&mut self, amount: u8) {
        self.intensity = self.intensity.saturating_add(amount);
    }

    fn lower(&mut self, amount: u8) {
        self.intensity = self.intensity.saturating_sub(amount);
    }

    fn set(&mut self, state: ChannelState, intensity: u8) {
        self.state = state;
        self.intensity = intensity;
    }
}

/// Decay bookkeeping for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellDecayState {
    phase: DecayPhase,
    red: Channel,
    green: Channel,
    blue: Channel,
}

impl Default for CellDecayState {
    fn default() -> Self {
        Self::new(&DecayProfile::DEFAULT)
    }
}

impl CellDecayState {
    /// Creates the state of a cell that has just appeared.
    #[must_use]
    pub const fn new(profile: &DecayProfile) -> Self {
        Self {
            phase: DecayPhase::Forming,
            red: Channel::new(ChannelState::Rising, profile.red_start),
            green: Channel::new(ChannelState::Idle, 0),
            blue: Channel::new(ChannelState::Idle, 0),
        }
    }

    /// Advances the arc by one tick and reports whether the cell is decayed.
    ///
    /// Once decayed, further ticks change nothing and keep returning `true`.
    pub fn tick(&mut self, profile: &DecayProfile) -> bool {
        match self.phase {
            DecayPhase::Decayed => return true,
            DecayPhase::Flashing => {
                self.settle(profile);
                return true;
            }
            DecayPhase::Forming | DecayPhase::Peaking | DecayPhase::Fading => {}
        }

        // Order matters: a channel peaking this tick hands over to the next
        // channel within the same tick.
        self.advance_red(profile);
        self.advance_green(profile);
        self.advance_blue(profile);
        false
    }

    /// Current stage of the arc.
    #[must_use]
    pub const fn phase(&self) -> DecayPhase {
        self.phase
    }

    /// Reports whether the cell reached its terminal state.
    #[must_use]
    pub const fn is_decayed(&self) -> bool {
        matches!(self.phase, DecayPhase::Decayed)
    }

    /// Color to paint for the cell.
    #[must_use]
    pub const fn color(&self) -> CellColor {
        CellColor::from_rgb(self.red.intensity, self.green.intensity, self.blue.intensity)
    }

    /// Activity of the red channel.
    #[must_use]
    pub const fn red_state(&self) -> ChannelState {
        self.red.state
    }

    /// Activity of the green channel.
    #[must_use]
    pub const fn green_state(&self) -> ChannelState {
        self.green.state
    }

    /// Activity of the blue channel.
    #[must_use]
    pub const fn blue_state(&self) -> ChannelState {
        self.blue.state
    }

    fn advance_red(&mut self, profile: &DecayProfile) {
        match self.red.state {
            ChannelState::Rising => {
                self.red.raise(profile.step);
                if self.red.intensity >= profile.red_peak {
                    self.red.state = ChannelState::Holding;
                    self.green.state = ChannelState::Rising;
                    self.phase = DecayPhase::Peaking;
                }
            }
            ChannelState::Falling => {
                self.red.lower(profile.step);
                if self.red.intensity == 0 {
                    self.red.set(ChannelState::Idle, 0);
                    self.green.set(ChannelState::Idle, 0);
                    self.blue.set(ChannelState::Rising, profile.blue_baseline);
                }
            }
            ChannelState::Holding | ChannelState::Idle => {}
        }
    }

    fn advance_green(&mut self, profile: &DecayProfile) {
        match self.green.state {
            ChannelState::Rising => {
                self.green.raise(profile.step);
                if self.green.intensity >= profile.green_peak {
                    self.green.state = ChannelState::Falling;
                    self.red.state = ChannelState::Falling;
                    self.phase = DecayPhase::Fading;
                }
            }
            ChannelState::Falling => {
                self.green.lower(profile.step.saturating_mul(2));
                if self.green.intensity == 0 {
                    self.green.state = ChannelState::Idle;
                }
            }
            ChannelState::Holding | ChannelState::Idle => {}
        }
    }

    fn advance_blue(&mut self, profile: &DecayProfile) {
        match self.blue.state {
            ChannelState::Rising => {
                self.blue.raise(profile.step);
                if self.blue.intensity >= profile.blue_peak {
                    self.blue.state = ChannelState::Falling;
                }
            }
            ChannelState::Falling => {
                self.blue.lower(profile.step);
                if self.blue.intensity <= profile.blue_end.saturating_add(profile.step) {
                    self.flash(profile);
                }
            }
            ChannelState::Holding | ChannelState::Idle => {}
        }
    }

    fn flash(&mut self, profile: &DecayProfile) {
        let flash = profile.flash_color();
        self.red.set(ChannelState::Idle, flash.red());
        self.green.set(ChannelState::Idle, flash.green());
        self.blue.set(ChannelState::Idle, flash.blue());
        self.phase = DecayPhase::Flashing;
    }

    fn settle(&mut self, profile: &DecayProfile) {
        let terminal = profile.terminal_color();
        self.red.set(ChannelState::Idle, terminal.red());
        self.green.set(ChannelState::Idle, terminal.green());
        self.blue.set(ChannelState::Idle, terminal.blue());
        self.phase = DecayPhase::Decayed;
    }
}
