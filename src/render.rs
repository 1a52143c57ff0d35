//! Text rendering of the grid.
//!
//! One glyph per cell over the full `rows x cols` extent, drawn inside a
//! box-drawing frame:
//!
//! ```text
//! ┌────┬────┬────┐
//! │ 🌾 │ ⬛ │ ⛰️ │
//! ├────┼────┼────┤
//! │ 🐇 │ ⬛ │ 🐺 │
//! └────┴────┴────┘
//! ```

use crate::world::{Cell, Entity, Grid, EMPTY_GLYPH};

/// Shown before the first turn of an interactive session.
pub const GREETING: &str = "\
Welcome to Ecosim!

Plants grow, herbivores graze, predators hunt.

  Space  pause
  Enter  resume
  Esc    stop

Press any key to begin.";

/// Width of one cell segment in terminal columns (glyphs are two wide).
const SEGMENT: &str = "────";

/// Glyph for a cell: the occupant's own glyph, or the empty glyph.
///
/// Cells off the grid render as empty.
#[must_use]
pub fn glyph_at(grid: &Grid, cell: Cell) -> &'static str {
    grid.get(cell)
        .ok()
        .flatten()
        .map_or(EMPTY_GLYPH, Entity::glyph)
}

/// Glyphs for one row, left to right.
#[must_use]
pub fn row_glyphs(grid: &Grid, row: u16) -> Vec<&'static str> {
    (0..grid.cols())
        .map(|col| glyph_at(grid, Cell::new(row, col)))
        .collect()
}

/// Render the whole grid as a framed block of text.
#[must_use]
pub fn render_frame(grid: &Grid) -> String {
    let cols = usize::from(grid.cols());
    let border = |left: &str, mid: &str, right: &str| {
        format!("{left}{}{right}\n", vec![SEGMENT; cols].join(mid))
    };

    let mut output = border("┌", "┬", "┐");
    for row in 0..grid.rows() {
        if row > 0 {
            output.push_str(&border("├", "┼", "┤"));
        }
        let cells: Vec<String> = row_glyphs(grid, row)
            .into_iter()
            .map(|glyph| format!(" {glyph} "))
            .collect();
        output.push('│');
        output.push_str(&cells.join("│"));
        output.push_str("│\n");
    }
    output.push_str(&border("└", "┴", "┘"));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Kind;

    #[test]
    fn test_glyph_at() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.place(Cell::new(0, 1), Entity::herbivore(3, 3)).unwrap();
        assert_eq!(glyph_at(&grid, Cell::new(0, 0)), EMPTY_GLYPH);
        assert_eq!(glyph_at(&grid, Cell::new(0, 1)), Kind::Herbivore.glyph());
        assert_eq!(glyph_at(&grid, Cell::new(9, 9)), EMPTY_GLYPH);
    }

    #[test]
    fn test_frame_one_glyph_per_cell() {
        let mut grid = Grid::new(3, 4).unwrap();
        grid.place(Cell::new(0, 0), Entity::plant()).unwrap();
        grid.place(Cell::new(2, 3), Entity::predator(5, 5, 4)).unwrap();

        let frame = render_frame(&grid);
        let lines: Vec<&str> = frame.lines().collect();
        // top, 3 rows, 2 separators, bottom
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with('┌'));
        assert!(lines[6].starts_with('└'));
        assert_eq!(frame.matches(EMPTY_GLYPH).count(), 10);
        assert_eq!(frame.matches(Kind::Plant.glyph()).count(), 1);
        assert_eq!(frame.matches(Kind::Predator.glyph()).count(), 1);
        assert!(lines[1].starts_with(&format!("│ {} │", Kind::Plant.glyph())));
    }

    #[test]
    fn test_row_glyphs() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.place(Cell::new(0, 2), Entity::rock()).unwrap();
        assert_eq!(
            row_glyphs(&grid, 0),
            vec![EMPTY_GLYPH, EMPTY_GLYPH, Kind::Rock.glyph()]
        );
    }

    #[test]
    fn test_greeting_names_controls() {
        assert!(GREETING.contains("Space"));
        assert!(GREETING.contains("Enter"));
        assert!(GREETING.contains("Esc"));
    }
}
