//! Color module: The fixed palette and the color pair table.
//!
//! The palette is the eight classic terminal colors plus [`Color::Clear`],
//! which stands for the terminal's own default rather than a concrete
//! color. Styled output never names colors directly at the driver level;
//! it goes through [`PairTable`], which registers every
//! foreground/background combination once at startup and hands out
//! opaque [`AttrToken`]s afterwards.

use crate::driver::{AttrToken, Driver};

/// A color from the fixed terminal palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// The terminal's default color (not an RGB value).
    Clear,
    /// Black.
    Black,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Yellow.
    Yellow,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
    /// Cyan.
    Cyan,
    /// White.
    White,
}

impl Color {
    /// Every palette member, in pair-registration order.
    pub const ALL: [Self; 9] = [
        Self::Clear,
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
    ];

    /// SGR parameter selecting this color as the foreground.
    pub(crate) const fn fg_code(self) -> u8 {
        match self {
            Self::Clear => 39,
            Self::Black => 30,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
        }
    }

    /// SGR parameter selecting this color as the background.
    pub(crate) const fn bg_code(self) -> u8 {
        self.fg_code() + 10
    }
}

/// One registered foreground/background combination.
#[derive(Debug, Clone, Copy)]
struct PairEntry {
    foreground: Color,
    background: Color,
    token: AttrToken,
}

/// Process-wide table of registered color pairs.
///
/// Built exactly once when a screen session starts, immutable
/// afterwards. The palette cross product is small (81 pairs), so lookup
/// is a linear scan; it only runs once per styled print call.
#[derive(Debug)]
pub struct PairTable {
    entries: Vec<PairEntry>,
}

impl PairTable {
    /// Enumerate the palette cross product and register every pair with
    /// the driver. Pair indices start at 1; index 0 is reserved for the
    /// terminal default.
    pub fn build(driver: &dyn Driver) -> Self {
        let mut entries = Vec::with_capacity(Color::ALL.len() * Color::ALL.len());
        let mut index: u16 = 0;

        for foreground in Color::ALL {
            for background in Color::ALL {
                index += 1;
                let token = AttrToken(index);
                driver.register_pair(token, foreground, background);
                entries.push(PairEntry {
                    foreground,
                    background,
                    token,
                });
            }
        }

        Self { entries }
    }

    /// An empty table for color-less sessions. Every lookup yields the
    /// terminal-default attribute.
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up the attribute token for a foreground/background pair.
    ///
    /// Falls back to [`AttrToken::DEFAULT`] when no entry matches,
    /// which only happens for the empty table.
    pub fn pair_for(&self, foreground: Color, background: Color) -> AttrToken {
        self.entries
            .iter()
            .find(|e| e.foreground == foreground && e.background == background)
            .map_or(AttrToken::DEFAULT, |e| e.token)
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
