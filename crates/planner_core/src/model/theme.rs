//! Background theme preference values.

use crate::model::category::Rgba;
use serde::{Deserialize, Serialize};

/// App background theme persisted as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundTheme {
    #[default]
    Dark,
    Blue,
    Purple,
    Navy,
}

impl BackgroundTheme {
    pub const ALL: [BackgroundTheme; 4] = [Self::Dark, Self::Blue, Self::Purple, Self::Navy];

    /// Integer code stored in settings.
    pub fn code(self) -> i64 {
        match self {
            Self::Dark => 0,
            Self::Blue => 1,
            Self::Purple => 2,
            Self::Navy => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|theme| theme.code() == code)
    }

    pub fn color(self) -> Rgba {
        match self {
            Self::Dark => Rgba::from_rgb8(24, 28, 31),
            Self::Blue => Rgba::from_rgb8(36, 52, 63),
            Self::Purple => Rgba::from_rgb8(45, 53, 73),
            Self::Navy => Rgba::from_rgb8(24, 31, 52),
        }
    }
}
