//! Session colors for spending labels
//!
//! Each label gets a color the first time it is seen, cycling through a
//! fixed palette. Assignments live only as long as the palette value; they
//! are never persisted.

use std::collections::HashMap;

use colored::{ColoredString, Colorize};

/// The fixed chart palette, in assignment order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteColor {
    Blue,
    Green,
    Orange,
    Red,
    Purple,
    Pink,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 6] = [
        Self::Blue,
        Self::Green,
        Self::Orange,
        Self::Red,
        Self::Purple,
        Self::Pink,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Pink => "pink",
        }
    }

    /// Render `text` in this color
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            Self::Blue => text.blue(),
            Self::Green => text.green(),
            Self::Orange => text.truecolor(255, 149, 0),
            Self::Red => text.red(),
            Self::Purple => text.purple(),
            Self::Pink => text.truecolor(255, 105, 180),
        }
    }
}

/// Lazily assigns a stable color to each label
#[derive(Debug, Default)]
pub struct CategoryPalette {
    assigned: HashMap<String, PaletteColor>,
}

impl CategoryPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// The label's color, assigning the next palette entry on first sight
    pub fn color_for(&mut self, label: &str) -> PaletteColor {
        if let Some(color) = self.assigned.get(label) {
            return *color;
        }
        let color = PaletteColor::ALL[self.assigned.len() % PaletteColor::ALL.len()];
        self.assigned.insert(label.to_string(), color);
        color
    }

    /// Color already given to `label`, without assigning one
    pub fn get(&self, label: &str) -> Option<PaletteColor> {
        self.assigned.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
