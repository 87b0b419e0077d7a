//! Category domain model and color palette.
//!
//! # Responsibility
//! - Define the named, colored grouping notes can point at.
//! - Own the fixed palette new categories draw their colors from.
//!
//! # Invariants
//! - Color channels are finite and within `[0, 1]`.
//! - Deleting a category never deletes notes; it only clears their reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a category.
pub type CategoryId = Uuid;

/// Color stored as four independent channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            1.0,
        )
    }

    pub fn channels(&self) -> [f64; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    pub fn is_valid(&self) -> bool {
        self.channels()
            .iter()
            .all(|channel| channel.is_finite() && (0.0..=1.0).contains(channel))
    }
}

/// Validation failures for category writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryValidationError {
    BlankName,
    /// `field` is `background` or `text`.
    ColorOutOfRange { field: &'static str },
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "category name cannot be blank"),
            Self::ColorOutOfRange { field } => {
                write!(f, "category {field} color channels must be within [0, 1]")
            }
        }
    }
}

impl Error for CategoryValidationError {}

/// Named, colored grouping of notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub background: Rgba,
    pub text: Rgba,
    pub created_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Creates a category with a fresh id and no creation timestamp.
    pub fn new(name: impl Into<String>, background: Rgba, text: Rgba) -> Self {
        Self::with_id(Uuid::new_v4(), name, background, text)
    }

    pub fn with_id(id: CategoryId, name: impl Into<String>, background: Rgba, text: Rgba) -> Self {
        Self {
            id,
            name: name.into(),
            background,
            text,
            created_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::BlankName);
        }
        if !self.background.is_valid() {
            return Err(CategoryValidationError::ColorOutOfRange {
                field: "background",
            });
        }
        if !self.text.is_valid() {
            return Err(CategoryValidationError::ColorOutOfRange { field: "text" });
        }
        Ok(())
    }
}

/// Background/text colors assigned together to a new category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    pub background: Rgba,
    pub text: Rgba,
}

const PALETTE_RGB8: [([u8; 3], [u8; 3]); 7] = [
    ([112, 70, 70], [130, 83, 83]),
    ([112, 108, 70], [130, 125, 83]),
    ([78, 112, 70], [93, 130, 83]),
    ([70, 112, 99], [83, 130, 116]),
    ([70, 87, 112], [83, 102, 130]),
    ([91, 70, 112], [107, 83, 130]),
    ([112, 70, 95], [130, 83, 111]),
];

/// Number of entries in the category palette.
pub fn palette_len() -> usize {
    PALETTE_RGB8.len()
}

/// Palette entry at `index`, wrapping around the palette length.
pub fn palette_pair(index: usize) -> ColorPair {
    let ([br, bg, bb], [tr, tg, tb]) = PALETTE_RGB8[index % PALETTE_RGB8.len()];
    ColorPair {
        background: Rgba::from_rgb8(br, bg, bb),
        text: Rgba::from_rgb8(tr, tg, tb),
    }
}

/// Uniformly picks one palette entry.
pub fn random_palette_pair() -> ColorPair {
    let draw = Uuid::new_v4().as_u128();
    palette_pair((draw % PALETTE_RGB8.len() as u128) as usize)
}

#[cfg(test)]
mod tests {
    use super::{
        palette_len, palette_pair, random_palette_pair, Category, CategoryValidationError, Rgba,
    };

    #[test]
    fn from_rgb8_scales_channels_and_is_opaque() {
        let color = Rgba::from_rgb8(255, 0, 51);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 0.2).abs() < 1e-9);
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn validate_rejects_out_of_range_channels() {
        let pair = palette_pair(0);
        let mut category = Category::new("Work", pair.background, pair.text);
        assert!(category.validate().is_ok());

        category.text = Rgba::new(0.5, 0.5, 1.5, 1.0);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::ColorOutOfRange { field: "text" })
        );

        category.background = Rgba::new(f64::NAN, 0.0, 0.0, 1.0);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::ColorOutOfRange {
                field: "background"
            })
        );
    }

    #[test]
    fn validate_rejects_blank_name() {
        let pair = palette_pair(3);
        let category = Category::new("  ", pair.background, pair.text);
        assert_eq!(category.validate(), Err(CategoryValidationError::BlankName));
    }

    #[test]
    fn palette_entries_are_valid_and_random_pick_is_a_member() {
        let members: Vec<_> = (0..palette_len()).map(palette_pair).collect();
        assert!(members
            .iter()
            .all(|pair| pair.background.is_valid() && pair.text.is_valid()));
        assert_eq!(palette_pair(palette_len()), members[0]);

        for _ in 0..20 {
            assert!(members.contains(&random_palette_pair()));
        }
    }
}
