//! Translation of strip records into surface placements

use serde::{Deserialize, Serialize};

use super::{config::MotionConfig, reel::ReelMotionController, sprite::SymbolSprite};

/// A sprite as the presentation surface sees it. `x` is the horizontal
/// centre (sprites are anchored at the middle of their top edge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpritePlacement {
    pub reel: usize,
    pub texture_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub alpha: f64,
}

impl SpritePlacement {
    pub fn new(config: &MotionConfig, reel: usize, sprite: &SymbolSprite) -> Self {
        let reel_width = config.reel_width();
        Self {
            reel,
            texture_index: sprite.texture_index,
            x: reel as f64 * reel_width + reel_width / 2.0,
            y: config.reel_top_offset + sprite.position,
            width: reel_width * 0.8,
            height: config.symbol_height * 0.75,
            alpha: sprite.opacity,
        }
    }

    /// Whether any part of the sprite lies inside a canvas of `canvas_height`.
    pub fn is_visible(&self, canvas_height: f64) -> bool {
        self.alpha > 0.0 && self.y < canvas_height && self.y + self.height > 0.0
    }
}

pub trait PresentationSurface {
    fn begin_frame(&mut self) {}
    fn draw(&mut self, placement: &SpritePlacement);
    fn end_frame(&mut self) {}
}

pub fn render_reels<S: PresentationSurface + ?Sized>(
    config: &MotionConfig,
    reels: &[ReelMotionController],
    surface: &mut S,
) {
    surface.begin_frame();
    for reel in reels {
        for sprite in reel.strip() {
            surface.draw(&SpritePlacement::new(config, reel.index(), sprite));
        }
    }
    surface.end_frame();
}
