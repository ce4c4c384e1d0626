//! Landscape brightness and the night-time brightness floor.

use skyline_config::LandscapeDefaults;

/// Brightness a landscape is drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brightness {
    /// Daylight level of the land, `[0, 1]`.
    pub land: f32,
    /// Level of night lights; zero switches them off.
    pub light_pollution: f32,
}

impl Default for Brightness {
    fn default() -> Self {
        Self {
            land: 1.0,
            light_pollution: 0.0,
        }
    }
}

/// Keeps the land from going fully black at night.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimalBrightnessPolicy {
    pub enabled: bool,
    pub global_floor: f32,
    /// Prefer a landscape's own floor over the global one.
    pub landscape_may_override: bool,
}

impl Default for MinimalBrightnessPolicy {
    fn default() -> Self {
        Self::from_config(&LandscapeDefaults::default())
    }
}

impl MinimalBrightnessPolicy {
    pub fn from_config(defaults: &LandscapeDefaults) -> Self {
        Self {
            enabled: defaults.use_minimal_brightness,
            global_floor: defaults.minimal_brightness,
            landscape_may_override: defaults.landscape_sets_minimal_brightness,
        }
    }

    /// Floor in effect for a landscape with the given override, if any.
    pub fn floor(&self, landscape_floor: Option<f32>) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        match landscape_floor {
            Some(floor) if self.landscape_may_override => Some(floor),
            _ => Some(self.global_floor),
        }
    }

    /// Raise the land level to the floor in effect.
    pub fn apply(&self, brightness: Brightness, landscape_floor: Option<f32>) -> Brightness {
        match self.floor(landscape_floor) {
            Some(floor) => Brightness {
                land: brightness.land.max(floor),
                ..brightness
            },
            None => brightness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn night() -> Brightness {
        Brightness {
            land: 0.001,
            light_pollution: 0.4,
        }
    }

    #[test]
    fn test_disabled_policy_passes_through() {
        let policy = MinimalBrightnessPolicy {
            enabled: false,
            global_floor: 0.1,
            landscape_may_override: true,
        };
        assert_eq!(policy.apply(night(), Some(0.2)), night());
    }

    #[test]
    fn test_global_floor() {
        let policy = MinimalBrightnessPolicy {
            enabled: true,
            global_floor: 0.05,
            landscape_may_override: false,
        };
        let lit = policy.apply(night(), Some(0.2));
        assert_eq!(lit.land, 0.05);
        assert_eq!(lit.light_pollution, 0.4);
    }

    #[test]
    fn test_landscape_override() {
        let policy = MinimalBrightnessPolicy {
            enabled: true,
            global_floor: 0.05,
            landscape_may_override: true,
        };
        assert_eq!(policy.apply(night(), Some(0.2)).land, 0.2);
        assert_eq!(policy.apply(night(), None).land, 0.05);
    }

    #[test]
    fn test_daylight_is_not_lowered() {
        let policy = MinimalBrightnessPolicy {
            enabled: true,
            global_floor: 0.05,
            landscape_may_override: true,
        };
        assert_eq!(policy.apply(Brightness::default(), Some(0.2)).land, 1.0);
    }

    #[test]
    fn test_from_config() {
        let mut defaults = LandscapeDefaults::default();
        defaults.use_minimal_brightness = true;
        defaults.minimal_brightness = 0.03;
        let policy = MinimalBrightnessPolicy::from_config(&defaults);
        assert!(policy.enabled);
        assert_eq!(policy.floor(None), Some(0.03));
    }
}
