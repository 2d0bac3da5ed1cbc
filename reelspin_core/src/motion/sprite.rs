use serde::{Deserialize, Serialize};

/// One symbol on a reel strip, independent of any rendering library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolSprite {
    pub texture_index: usize,
    /// Offset along the scroll axis from the top of the reel
    pub position: f64,
    pub opacity: f64,
}

impl SymbolSprite {
    pub fn new(texture_index: usize, position: f64) -> Self {
        Self {
            texture_index,
            position,
            opacity: 1.0,
        }
    }

    /// Moves by `displacement`, wrapping back one strip height once the
    /// sprite reaches the bottom of the strip.
    pub fn scroll(&mut self, displacement: f64, strip_height: f64) {
        self.position += displacement;
        if self.position >= strip_height {
            self.position -= strip_height;
        }
    }
}
