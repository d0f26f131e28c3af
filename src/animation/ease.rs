//! Easing curves that pace progress through a transition.

use std::{fmt, str::FromStr};

use crate::foundation::error::{KlinterError, KlinterResult};

/// Timing curve mapping linear progress `t` in `[0, 1]` onto eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    /// `(1 - cos(pi t)) / 2`.
    #[default]
    InOutSine,
    InOutQuad,
    InOutCubic,
}

impl Ease {
    pub const ALL: [Ease; 4] = [
        Ease::Linear,
        Ease::InOutSine,
        Ease::InOutQuad,
        Ease::InOutCubic,
    ];

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutSine => (1.0 - (std::f64::consts::PI * t).cos()) / 2.0,
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InOutSine => "in-out-sine",
            Self::InOutQuad => "in-out-quad",
            Self::InOutCubic => "in-out-cubic",
        }
    }
}

impl FromStr for Ease {
    type Err = KlinterError;

    fn from_str(s: &str) -> KlinterResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|e| e.name() == key)
            .ok_or_else(|| KlinterError::invalid_parameter(format!("unknown ease '{s}'")))
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
