use std::{fmt, str::FromStr};

use crate::models::task::ParseEnumError;

/// Highlight colour preference, stored independently of tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    #[default]
    Indigo,
    Violet,
    Pink,
    Rose,
    Amber,
    Emerald,
    Sky,
    Teal,
}

impl Accent {
    pub const ALL: [Accent; 8] = [
        Accent::Indigo,
        Accent::Violet,
        Accent::Pink,
        Accent::Rose,
        Accent::Amber,
        Accent::Emerald,
        Accent::Sky,
        Accent::Teal,
    ];

    const NAMES: &'static [&'static str] = &[
        "indigo", "violet", "pink", "rose", "amber", "emerald", "sky", "teal",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Accent::Indigo => "indigo",
            Accent::Violet => "violet",
            Accent::Pink => "pink",
            Accent::Rose => "rose",
            Accent::Amber => "amber",
            Accent::Emerald => "emerald",
            Accent::Sky => "sky",
            Accent::Teal => "teal",
        }
    }

    /// Terminal colour the accent is rendered with
    pub fn color(self) -> colored::Color {
        use colored::Color;

        match self {
            Accent::Indigo => Color::TrueColor { r: 99, g: 102, b: 241 },
            Accent::Violet => Color::TrueColor { r: 139, g: 92, b: 246 },
            Accent::Pink => Color::TrueColor { r: 236, g: 72, b: 153 },
            Accent::Rose => Color::TrueColor { r: 244, g: 63, b: 94 },
            Accent::Amber => Color::TrueColor { r: 245, g: 158, b: 11 },
            Accent::Emerald => Color::TrueColor { r: 16, g: 185, b: 129 },
            Accent::Sky => Color::TrueColor { r: 14, g: 165, b: 233 },
            Accent::Teal => Color::TrueColor { r: 20, g: 184, b: 166 },
        }
    }
}

impl FromStr for Accent {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Accent::ALL
            .into_iter()
            .find(|accent| accent.as_str() == lowered)
            .ok_or_else(|| ParseEnumError {
                kind: "accent",
                value: s.to_string(),
                expected: Accent::NAMES,
            })
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
