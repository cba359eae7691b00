//! Command parsing for camera mode requests.

use serde::{Deserialize, Serialize};

/// Display sentinel for commands that parse to nothing.
const INVALID: &str = "INVALID";

/// Requested or current operating mode of a camera channel.
///
/// `Invalid` only ever results from parsing an unrecognized command;
/// it is never stored as channel state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No process running for this channel.
    #[default]
    Off,
    /// Remote viewing via the streaming daemon.
    Viewing,
    /// Computer vision pipeline active.
    VisionActive,
    /// Unrecognized command.
    Invalid,
}

impl Mode {
    /// Parse a command payload into a mode.
    ///
    /// Recognizes exactly `"off"`, `"view"`, and `"vision"` - case-sensitive,
    /// no trimming. Anything else is `Invalid`.
    #[must_use]
    pub fn parse(command: &str) -> Self {
        match command {
            "off" => Self::Off,
            "view" => Self::Viewing,
            "vision" => Self::VisionActive,
            _ => Self::Invalid,
        }
    }

    /// Whether this mode has a running process associated with it.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Viewing | Self::VisionActive)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Viewing => "view",
            Self::VisionActive => "vision",
            Self::Invalid => INVALID,
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_commands() {
        assert_eq!(Mode::parse("off"), Mode::Off);
        assert_eq!(Mode::parse("view"), Mode::Viewing);
        assert_eq!(Mode::parse("vision"), Mode::VisionActive);
    }

    #[test]
    fn test_parse_is_exact_match() {
        assert_eq!(Mode::parse("OFF"), Mode::Invalid);
        assert_eq!(Mode::parse(" view"), Mode::Invalid);
        assert_eq!(Mode::parse("vision\n"), Mode::Invalid);
        assert_eq!(Mode::parse("visionary"), Mode::Invalid);
        assert_eq!(Mode::parse(""), Mode::Invalid);
    }

    #[test]
    fn test_display_round_trips_real_modes() {
        for mode in [Mode::Off, Mode::Viewing, Mode::VisionActive] {
            assert_eq!(Mode::parse(&mode.to_string()), mode);
        }
    }

    #[test]
    fn test_invalid_displays_as_sentinel() {
        assert_eq!(Mode::Invalid.to_string(), "INVALID");
        assert_eq!(Mode::parse("INVALID"), Mode::Invalid);
    }

    #[test]
    fn test_is_active() {
        assert!(!Mode::Off.is_active());
        assert!(Mode::Viewing.is_active());
        assert!(Mode::VisionActive.is_active());
        assert!(!Mode::Invalid.is_active());
    }
}
