//! Debug text grid
//!
//! Text is placed on a grid of character cells. Each print carries a VGA
//! style attribute byte: the high nibble selects the background color and
//! the low nibble the foreground color from [`PALETTE`].

/// Width of one character cell in pixels.
pub const CELL_WIDTH: f32 = 8.0;
/// Height of one character cell in pixels.
pub const CELL_HEIGHT: f32 = 16.0;

/// The 16-color text mode palette, as sRGB bytes.
pub const PALETTE: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00], // black
    [0x00, 0x00, 0xaa], // blue
    [0x00, 0xaa, 0x00], // green
    [0x00, 0xaa, 0xaa], // cyan
    [0xaa, 0x00, 0x00], // red
    [0xaa, 0x00, 0xaa], // magenta
    [0xaa, 0x55, 0x00], // brown
    [0xaa, 0xaa, 0xaa], // light gray
    [0x55, 0x55, 0x55], // dark gray
    [0x55, 0x55, 0xff], // light blue
    [0x55, 0xff, 0x55], // light green
    [0x55, 0xff, 0xff], // light cyan
    [0xff, 0x55, 0x55], // light red
    [0xff, 0x55, 0xff], // light magenta
    [0xff, 0xff, 0x55], // yellow
    [0xff, 0xff, 0xff], // white
];

/// Foreground and background sRGB colors encoded by an attribute byte.
pub fn attribute_colors(attr: u8) -> ([u8; 3], [u8; 3]) {
    let foreground = PALETTE[(attr & 0x0f) as usize];
    let background = PALETTE[(attr >> 4) as usize];
    (foreground, background)
}

/// One printed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub column: u16,
    pub row: u16,
    pub attr: u8,
    pub text: String,
}

impl TextEntry {
    /// Number of cells the text occupies.
    pub fn width_in_cells(&self) -> usize {
        self.text.chars().count()
    }

    /// Pixel rectangle `(x, y, width, height)` covered by the entry.
    pub fn pixel_rect(&self) -> (f32, f32, f32, f32) {
        (
            self.column as f32 * CELL_WIDTH,
            self.row as f32 * CELL_HEIGHT,
            self.width_in_cells() as f32 * CELL_WIDTH,
            CELL_HEIGHT,
        )
    }
}

/// Text printed over the scene for the current frame.
#[derive(Debug, Clone, Default)]
pub struct DebugText {
    entries: Vec<TextEntry>,
}

impl DebugText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything printed so far.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Print `text` starting at cell (`column`, `row`). Later prints draw on
    /// top of earlier ones.
    pub fn print(&mut self, column: u16, row: u16, attr: u8, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.entries.push(TextEntry {
            column,
            row,
            attr,
            text,
        });
    }

    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten the grid into plain text, one string per row up to the last
    /// used row. Overlapping prints overwrite cells in print order.
    pub fn to_rows(&self) -> Vec<String> {
        let Some(last_row) = self.entries.iter().map(|e| e.row).max() else {
            return Vec::new();
        };

        let mut grid: Vec<Vec<char>> = vec![Vec::new(); last_row as usize + 1];
        for entry in &self.entries {
            let row = &mut grid[entry.row as usize];
            let start = entry.column as usize;
            let end = start + entry.width_in_cells();
            if row.len() < end {
                row.resize(end, ' ');
            }
            for (cell, ch) in row[start..end].iter_mut().zip(entry.text.chars()) {
                *cell = ch;
            }
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_nibbles() {
        let (fg, bg) = attribute_colors(0x4f);
        assert_eq!(fg, [0xff, 0xff, 0xff]);
        assert_eq!(bg, [0xaa, 0x00, 0x00]);

        let (fg, bg) = attribute_colors(0x0f);
        assert_eq!(fg, [0xff, 0xff, 0xff]);
        assert_eq!(bg, [0x00, 0x00, 0x00]);

        let (fg, bg) = attribute_colors(0x6f);
        assert_eq!(fg, PALETTE[15]);
        assert_eq!(bg, PALETTE[6]);
    }

    #[test]
    fn test_print_and_clear() {
        let mut text = DebugText::new();
        text.print(0, 1, 0x4f, "01-cubes");
        text.print(0, 2, 0x6f, "");
        assert_eq!(text.entries().len(), 1);
        text.clear();
        assert!(text.is_empty());
    }

    #[test]
    fn test_rows_layout() {
        let mut text = DebugText::new();
        text.print(0, 1, 0x4f, "title");
        text.print(2, 3, 0x0f, "Frame");
        assert_eq!(text.to_rows(), vec!["", "title", "", "  Frame"]);
    }

    #[test]
    fn test_later_print_overwrites() {
        let mut text = DebugText::new();
        text.print(0, 0, 0x0f, "abcdef");
        text.print(2, 0, 0x0f, "XY");
        assert_eq!(text.to_rows(), vec!["abXYef"]);
    }

    #[test]
    fn test_pixel_rect() {
        let entry = TextEntry {
            column: 3,
            row: 2,
            attr: 0x0f,
            text: "Dim: 12".to_string(),
        };
        assert_eq!(entry.pixel_rect(), (24.0, 32.0, 56.0, 16.0));
    }
}
