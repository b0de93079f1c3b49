#![doc = r#"
Playback configuration

A [`PlayOptions`] value is built once (by the command line in the binary,
by hand in tests) and handed to the [`Scheduler`](crate::player::Scheduler).
Nothing reads process-wide state.
"#]

use crate::dump::DumpFlags;
use crate::error::{Error, Result};
use crate::transform::Transform;
use core::str::FromStr;

/// Everything that changes how a file is analyzed or played.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayOptions {
    /// Tempo scaling in percent; bigger is slower
    pub speed_factor: u32,
    /// Pitch and channel rewrites
    pub transform: Transform,
    /// Restrict to one track, numbered from 1
    pub extract: Option<u16>,
    /// Which events get listed
    pub dump: DumpFlags,
    /// Play only some bars
    pub excerpt: Option<Excerpt>,
    /// Forward `F0` sysex events to the destination
    pub forward_sysex: bool,
    /// Decode and list without timing or output
    pub check: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            speed_factor: 100,
            transform: Transform::default(),
            extract: None,
            dump: DumpFlags::default(),
            excerpt: None,
            forward_sysex: false,
            check: false,
        }
    }
}

impl PlayOptions {
    /// Reject values the scheduler cannot work with.
    pub fn validate(self) -> Result<Self> {
        if self.speed_factor == 0 {
            return Err(Error::InvalidOption("speed factor must be positive".into()));
        }
        if self.transform.drum_channel > 15 {
            return Err(Error::InvalidOption(format!(
                "drum channel {} is not within 0..=15",
                self.transform.drum_channel
            )));
        }
        if self.extract == Some(0) {
            return Err(Error::InvalidOption("tracks are numbered from 1".into()));
        }
        Ok(self)
    }

    /// True when track `number` (1-based) takes part.
    pub fn selects_track(&self, number: u16) -> bool {
        self.extract.is_none_or(|wanted| wanted == number)
    }

    /// Tempo every track starts with: 120 beats per minute at speed 100.
    pub fn initial_tempo(&self) -> u64 {
        5_000 * self.speed_factor as u64
    }

    /// Scale a Set Tempo value by the speed factor.
    pub fn scaled_tempo(&self, raw: u32) -> u64 {
        raw as u64 * self.speed_factor as u64 / 100
    }
}

/// A range of bars, `[FACTORx][[FIRST]-][LAST]` on the command line.
///
/// Bars are stored counted from 0 with `end` excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Excerpt {
    /// Quarter notes per bar, at least 1
    pub beats_per_bar: u32,
    /// First bar played
    pub start: Option<u64>,
    /// First bar no longer played
    pub end: Option<u64>,
}

impl Excerpt {
    /// True when `bar` (counted from 0) is outside the excerpt.
    pub fn mutes(&self, bar: u64) -> bool {
        self.start.is_some_and(|start| bar < start) || self.end.is_some_and(|end| bar >= end)
    }
}

fn bar_number(digits: &str, text: &str) -> Result<u64> {
    let number: u64 = digits
        .parse()
        .map_err(|_| Error::InvalidOption(format!("bad bar number in excerpt {text:?}")))?;
    Ok(number.saturating_sub(1))
}

impl FromStr for Excerpt {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidOption(format!("bad excerpt {text:?}"));
        if text.is_empty() {
            return Err(invalid());
        }

        let (factor, range) = match text.split_once('x') {
            Some((factor, range)) => {
                let factor: u32 = factor.parse().map_err(|_| invalid())?;
                (factor.max(1), range)
            }
            None => (1, text),
        };
        if !range.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return Err(invalid());
        }

        let (start, end) = match range.split_once('-') {
            Some((first, last)) => {
                let start = match first {
                    "" => None,
                    digits => Some(bar_number(digits, text)?),
                };
                let end = match last {
                    "" => None,
                    digits => Some(bar_number(digits, text)? + 1),
                };
                (start, end)
            }
            None if range.is_empty() => (None, None),
            None => {
                let only = bar_number(range, text)?;
                (Some(only), Some(only + 1))
            }
        };

        Ok(Self {
            beats_per_bar: factor,
            start,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn excerpt(text: &str) -> Excerpt {
        text.parse().unwrap()
    }

    #[test]
    fn single_bar() {
        assert_eq!(
            excerpt("3"),
            Excerpt {
                beats_per_bar: 1,
                start: Some(2),
                end: Some(3)
            }
        );
    }

    #[test]
    fn ranges_and_factor() {
        assert_eq!(
            excerpt("4x2-5"),
            Excerpt {
                beats_per_bar: 4,
                start: Some(1),
                end: Some(5)
            }
        );
        assert_eq!(
            excerpt("-8"),
            Excerpt {
                beats_per_bar: 1,
                start: None,
                end: Some(8)
            }
        );
        assert_eq!(
            excerpt("3x7-"),
            Excerpt {
                beats_per_bar: 3,
                start: Some(6),
                end: None
            }
        );
        assert_eq!(excerpt("0x2").beats_per_bar, 1);
    }

    #[test]
    fn mutes_outside_the_range() {
        let range = excerpt("2-3");
        assert!(range.mutes(0));
        assert!(!range.mutes(1));
        assert!(!range.mutes(2));
        assert!(range.mutes(3));
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "x3", "2-3-4", "a", "3y", "1.5"] {
            assert!(text.parse::<Excerpt>().is_err(), "{text}");
        }
    }

    #[test]
    fn validation() {
        assert!(PlayOptions::default().validate().is_ok());

        let slow = PlayOptions {
            speed_factor: 0,
            ..Default::default()
        };
        assert!(matches!(slow.validate(), Err(Error::InvalidOption(_))));

        let mut drums = PlayOptions::default();
        drums.transform.drum_channel = 16;
        assert!(drums.validate().is_err());
    }

    #[test]
    fn tempo_scaling() {
        let options = PlayOptions {
            speed_factor: 200,
            ..Default::default()
        };
        assert_eq!(options.initial_tempo(), 1_000_000);
        assert_eq!(options.scaled_tempo(500_000), 1_000_000);
        assert!(options.selects_track(3));
    }
}
