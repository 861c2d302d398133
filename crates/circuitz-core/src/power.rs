//! Tri-state power values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The evaluated state of a node.
///
/// `Broken` is not a logical false: it marks a node whose output is
/// ill-defined (missing wiring or an upstream fault) and absorbs every
/// computation it flows into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    #[default]
    Off,
    On,
    Broken,
}

impl PowerState {
    /// Map a logic level to `On`/`Off`.
    pub fn from_bool(level: bool) -> Self {
        if level {
            PowerState::On
        } else {
            PowerState::Off
        }
    }

    /// The logic level, or `None` when broken.
    pub fn level(self) -> Option<bool> {
        match self {
            PowerState::Off => Some(false),
            PowerState::On => Some(true),
            PowerState::Broken => None,
        }
    }

    pub fn is_on(self) -> bool {
        self == PowerState::On
    }

    pub fn is_broken(self) -> bool {
        self == PowerState::Broken
    }

    /// Short symbol for compact displays.
    pub fn symbol(self) -> &'static str {
        match self {
            PowerState::Off => "0",
            PowerState::On => "1",
            PowerState::Broken => "x",
        }
    }
}

impl From<bool> for PowerState {
    fn from(level: bool) -> Self {
        Self::from_bool(level)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::Off => write!(f, "off"),
            PowerState::On => write!(f, "on"),
            PowerState::Broken => write!(f, "broken"),
        }
    }
}
