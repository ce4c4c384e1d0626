//! Linear show/hide fades for the land and fog layers.

/// Level at or above which a fader counts as fully on.
pub const FULLY_ON: f32 = 0.999;

/// Level at or below which a fader counts as fully off.
pub const FULLY_OFF: f32 = 0.001;

/// Time-driven linear fade between hidden (0) and shown (1).
///
/// The level moves toward the target at a constant rate of one full swing
/// per `duration` seconds, so reversing mid-fade takes only as long as the
/// distance already covered.
#[derive(Clone, Debug, PartialEq)]
pub struct Fader {
    level: f32,
    shown: bool,
    duration: f32,
}

impl Default for Fader {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Fader {
    /// A hidden fader that takes `duration` seconds for a full swing.
    pub fn new(duration: f32) -> Self {
        Self {
            level: 0.0,
            shown: false,
            duration: duration.max(0.0),
        }
    }

    /// Change the target. The level follows on subsequent [`update`](Self::update)s.
    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    /// Jump straight to the target with no transition.
    pub fn snap(&mut self, shown: bool) {
        self.shown = shown;
        self.level = if shown { 1.0 } else { 0.0 };
    }

    /// Target state.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Current level in `[0, 1]`.
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Set the full-swing duration in seconds. Zero or negative makes
    /// changes instantaneous.
    pub fn set_duration(&mut self, seconds: f32) {
        self.duration = seconds.max(0.0);
    }

    pub fn is_fully_on(&self) -> bool {
        self.level >= FULLY_ON
    }

    pub fn is_fully_off(&self) -> bool {
        self.level <= FULLY_OFF
    }

    /// Advance the fade by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let target = if self.shown { 1.0 } else { 0.0 };
        if self.duration <= 0.0 {
            self.level = target;
            return;
        }
        let step = dt.max(0.0) / self.duration;
        self.level = if self.level < target {
            (self.level + step).min(target)
        } else {
            (self.level - step).max(target)
        };
    }
}
