//! Visual state of the LED ring: color, brightness and blink pattern.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ring colors understood by the nuc_led driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingColor {
    Off,
    White,
    Blue,
    Cyan,
    Green,
    Yellow,
    Pink,
    Red,
}

impl RingColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::White => "white",
            Self::Blue => "blue",
            Self::Cyan => "cyan",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Pink => "pink",
            Self::Red => "red",
        }
    }
}

/// Blink/fade patterns understood by the nuc_led driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkPattern {
    #[default]
    None,
    BlinkFast,
    BlinkMedium,
    BlinkSlow,
    FadeFast,
    FadeMedium,
    FadeSlow,
}

impl BlinkPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BlinkFast => "blink_fast",
            Self::BlinkMedium => "blink_medium",
            Self::BlinkSlow => "blink_slow",
            Self::FadeFast => "fade_fast",
            Self::FadeMedium => "fade_medium",
            Self::FadeSlow => "fade_slow",
        }
    }
}

/// One addressable ring configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualState {
    pub color: RingColor,
    /// Brightness percentage (0-100)
    pub brightness: u8,
    #[serde(default)]
    pub blink: BlinkPattern,
}

impl VisualState {
    /// Ring switched off; written on shutdown.
    pub const OFF: VisualState = VisualState::new(RingColor::Off, 0, BlinkPattern::None);

    pub const fn new(color: RingColor, brightness: u8, blink: BlinkPattern) -> Self {
        Self {
            color,
            brightness,
            blink,
        }
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.color.as_str(),
            self.brightness,
            self.blink.as_str()
        )
    }
}
