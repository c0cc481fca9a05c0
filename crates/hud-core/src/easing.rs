//! Easing curves mapping normalized progress onto eased progress.
//!
//! Every curve clamps its input to `[0, 1]`. All curves except
//! [`Easing::OutBack`] map 0 to exactly 0 and 1 to exactly 1; the back curve
//! overshoots past 1 before settling, so anything blended with it must be
//! clamped by the consumer, not here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Named easing curve selectable from a state table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    OutExpo,
    #[default]
    InOutCubic,
    InOutQuart,
    OutBack,
    OutCirc,
}

impl Easing {
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::OutExpo,
        Easing::InOutCubic,
        Easing::InOutQuart,
        Easing::OutBack,
        Easing::OutCirc,
    ];

    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = clamp_unit(t);
        match self {
            Easing::Linear => t,
            Easing::OutExpo => ease_out_expo(t),
            Easing::InOutCubic => ease_in_out_cubic(t),
            Easing::InOutQuart => ease_in_out_quart(t),
            Easing::OutBack => ease_out_back(t),
            Easing::OutCirc => ease_out_circ(t),
        }
    }

    /// The following curve in [`Easing::ALL`], wrapping around.
    pub fn next(self) -> Easing {
        let i = Easing::ALL.iter().position(|&e| e == self).unwrap_or(0);
        Easing::ALL[(i + 1) % Easing::ALL.len()]
    }

    /// Whether the curve leaves `[0, 1]` on its way to 1.
    pub fn overshoots(self) -> bool {
        matches!(self, Easing::OutBack)
    }

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::OutExpo => "out-expo",
            Easing::InOutCubic => "in-out-cubic",
            Easing::InOutQuart => "in-out-quart",
            Easing::OutBack => "out-back",
            Easing::OutCirc => "out-circ",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = String;

    /// Accepts `out-expo`, `out_expo`, `easeOutExpo` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let key = folded.strip_prefix("ease").unwrap_or(&folded);
        match key {
            "linear" => Ok(Easing::Linear),
            "outexpo" => Ok(Easing::OutExpo),
            "inoutcubic" => Ok(Easing::InOutCubic),
            "inoutquart" => Ok(Easing::InOutQuart),
            "outback" => Ok(Easing::OutBack),
            "outcirc" => Ok(Easing::OutCirc),
            _ => Err(format!("unknown easing `{s}`")),
        }
    }
}

#[inline]
fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[inline]
pub fn ease_out_expo(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[inline]
pub fn ease_in_out_quart(t: f32) -> f32 {
    if t < 0.5 {
        8.0 * t * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
    }
}

#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    let u = t - 1.0;
    1.0 + BACK_C3 * u.powi(3) + BACK_C1 * u.powi(2)
}

#[inline]
pub fn ease_out_circ(t: f32) -> f32 {
    (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_visits_every_curve_then_wraps() {
        let mut e = Easing::Linear;
        let mut seen = Vec::new();
        for _ in 0..Easing::ALL.len() {
            seen.push(e);
            e = e.next();
        }
        assert_eq!(seen, Easing::ALL.to_vec());
        assert_eq!(e, Easing::Linear);
    }

    #[test]
    fn endpoints_are_exact_for_non_overshooting_curves() {
        for e in Easing::ALL.iter().filter(|e| !e.overshoots()) {
            assert_eq!(e.apply(0.0), 0.0, "{e} at 0");
            assert_eq!(e.apply(1.0), 1.0, "{e} at 1");
        }
    }

    #[test]
    fn back_curve_overshoots_then_lands() {
        let peak = (0..=100)
            .map(|i| ease_out_back(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
        assert_eq!(Easing::OutBack.apply(1.0), 1.0);
        assert!(Easing::OutBack.apply(0.0).abs() < 1e-5);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::InOutCubic.apply(-3.0), 0.0);
        assert_eq!(Easing::InOutCubic.apply(7.0), 1.0);
        assert_eq!(Easing::OutExpo.apply(f32::NAN), 0.0);
    }

    #[test]
    fn parses_config_and_script_spellings() {
        assert_eq!("out-expo".parse::<Easing>(), Ok(Easing::OutExpo));
        assert_eq!("easeInOutCubic".parse::<Easing>(), Ok(Easing::InOutCubic));
        assert_eq!("in_out_quart".parse::<Easing>(), Ok(Easing::InOutQuart));
        assert!("bounce".parse::<Easing>().is_err());
        for e in Easing::ALL {
            assert_eq!(e.name().parse::<Easing>(), Ok(e));
        }
    }
}
