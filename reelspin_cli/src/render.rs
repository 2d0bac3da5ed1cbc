use std::path::Path;

use reelspin_core::{
    MotionConfig, PresentationSurface, SpritePlacement, SymbolCatalog, REEL_COUNT, ROW_COUNT,
};

/// Renders reels as rows of symbol labels. Sprites are grouped by reel and
/// the top three visible ones become the three rows.
pub struct TextSurface {
    labels: Vec<String>,
    canvas_height: f64,
    cell_width: usize,
    columns: Vec<Vec<SpritePlacement>>,
}

impl TextSurface {
    pub fn new(catalog: &SymbolCatalog, config: &MotionConfig) -> Self {
        let labels: Vec<String> = catalog.images().iter().map(|image| label(image)).collect();
        let cell_width = labels.iter().map(|l| l.len()).max().unwrap_or(1).max(1);
        Self {
            labels,
            canvas_height: config.canvas_height,
            cell_width,
            columns: vec![Vec::new(); REEL_COUNT],
        }
    }

    /// The last completed frame, one line per row.
    pub fn lines(&self) -> Vec<String> {
        (0..ROW_COUNT)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| {
                        let cell = column.get(row).map_or(String::new(), |p| self.cell(p));
                        format!("[ {cell:^width$} ]", width = self.cell_width)
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    fn cell(&self, placement: &SpritePlacement) -> String {
        if placement.alpha < 0.5 {
            return "·".repeat(self.cell_width.min(3));
        }
        self.labels
            .get(placement.texture_index)
            .cloned()
            .unwrap_or_else(|| "?".into())
    }
}

impl PresentationSurface for TextSurface {
    fn begin_frame(&mut self) {
        for column in &mut self.columns {
            column.clear();
        }
    }

    fn draw(&mut self, placement: &SpritePlacement) {
        if !placement.is_visible(self.canvas_height) {
            return;
        }
        if let Some(column) = self.columns.get_mut(placement.reel) {
            column.push(*placement);
        }
    }

    fn end_frame(&mut self) {
        for column in &mut self.columns {
            column.sort_by(|a, b| a.y.total_cmp(&b.y));
            column.truncate(ROW_COUNT);
        }
    }
}

/// `.../images/sym3.png` -> `sym3`
fn label(image: &str) -> String {
    Path::new(image)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(image)
        .to_string()
}
