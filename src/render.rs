use crate::color::Rgb;
use crate::math::multiply_matrix_vector;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

/// A point after projection onto the character grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Column and row, fractional
    pub screen: [f64; 2],
    /// Distance in front of the camera
    pub depth: f64,
}

/// Perspective camera on the +Z axis looking towards the origin
#[derive(Debug, Clone)]
pub struct Camera {
    fov_y: f64,
    near: f64,
    far: f64,
    distance: f64,
    cols: u16,
    rows: u16,
}

impl Camera {
    pub fn new(cols: u16, rows: u16) -> Self {
        Camera {
            fov_y: 75f64.to_radians(),
            near: 0.1,
            far: 1000.0,
            distance: 15.0,
            cols,
            rows,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    #[cfg(test)]
    pub fn viewport(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Width over height of the viewport in square units
    pub fn aspect(&self) -> f64 {
        if self.rows == 0 {
            return 1.0;
        }
        self.cols as f64 / (self.rows as f64 * CELL_ASPECT)
    }

    fn focal(&self) -> f64 {
        1.0 / (self.fov_y / 2.0).tan()
    }

    /// Rotates `point` and projects it, or `None` if it falls outside the
    /// near/far range
    pub fn project(&self, rotation: &[[f64; 3]; 3], point: [f64; 3]) -> Option<Projected> {
        let [x, y, z] = multiply_matrix_vector(rotation, &point);
        let depth = self.distance - z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let f = self.focal();
        let ndc_x = x * f / (self.aspect() * depth);
        let ndc_y = y * f / depth;
        Some(Projected {
            screen: [
                (ndc_x + 1.0) * 0.5 * self.cols as f64,
                (1.0 - ndc_y) * 0.5 * self.rows as f64,
            ],
            depth,
        })
    }

    /// Radius in rows of a sphere of `radius` at `depth`
    pub fn projected_radius(&self, radius: f64, depth: f64) -> f64 {
        radius * self.focal() / depth * 0.5 * self.rows as f64
    }
}

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Rgb,
    pub bg: Option<Rgb>,
    depth: f64,
}

impl Cell {
    fn blank() -> Self {
        Cell {
            glyph: ' ',
            fg: Rgb::WHITE,
            bg: None,
            depth: f64::INFINITY,
        }
    }
}

/// Character grid with a depth buffer
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    background: Rgb,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, background: Rgb) -> Self {
        Canvas {
            cols,
            rows,
            background,
            cells: vec![Cell::blank(); cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Resizes and clears
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::blank(); cols as usize * rows as usize];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank());
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn index(&self, col: isize, row: isize) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as isize || row >= self.rows as isize {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    /// Draws `glyph` at a fractional position if nothing nearer is there
    pub fn plot(&mut self, screen: [f64; 2], depth: f64, glyph: char, color: Rgb) {
        let Some(i) = self.index(screen[0].floor() as isize, screen[1].floor() as isize) else {
            return;
        };
        let cell = &mut self.cells[i];
        if depth < cell.depth {
            cell.glyph = glyph;
            cell.fg = color;
            cell.depth = depth;
        }
    }

    /// Draws a line between two points using Bresenham's algorithm; only
    /// fills empty cells
    pub fn draw_line(&mut self, from: [f64; 2], to: [f64; 2], glyph: char, color: Rgb) {
        let (mut x0, mut y0, x1, y1) = (
            from[0].floor() as isize,
            from[1].floor() as isize,
            to[0].floor() as isize,
            to[1].floor() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            if let Some(i) = self.index(x0, y0) {
                let cell = &mut self.cells[i];
                if cell.glyph == ' ' {
                    cell.glyph = glyph;
                    cell.fg = color;
                }
            }

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Writes text on top of everything, clipped to the canvas
    pub fn text(&mut self, col: u16, row: u16, text: &str, fg: Rgb, bg: Option<Rgb>) {
        for (offset, ch) in text.chars().enumerate() {
            let Some(i) = self.index(col as isize + offset as isize, row as isize) else {
                break;
            };
            let cell = &mut self.cells[i];
            cell.glyph = ch;
            cell.fg = fg;
            cell.bg = bg;
            cell.depth = f64::NEG_INFINITY;
        }
    }

    /// Fills a rectangle with blank cells of color `bg`
    pub fn fill(&mut self, col: u16, row: u16, width: u16, height: u16, bg: Rgb) {
        for r in row..row.saturating_add(height) {
            for c in col..col.saturating_add(width) {
                if let Some(i) = self.index(c as isize, r as isize) {
                    self.cells[i] = Cell {
                        glyph: ' ',
                        fg: Rgb::WHITE,
                        bg: Some(bg),
                        depth: f64::NEG_INFINITY,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::group_rotation;

    const IDENTITY: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    #[test]
    fn origin_projects_to_viewport_center() {
        let camera = Camera::new(80, 24);
        let p = camera.project(&IDENTITY, [0.0, 0.0, 0.0]).unwrap();
        assert_eq!(p.screen, [40.0, 12.0]);
        assert_eq!(p.depth, 15.0);
    }

    #[test]
    fn points_behind_the_camera_are_clipped() {
        let camera = Camera::new(80, 24);
        assert!(camera.project(&IDENTITY, [0.0, 0.0, 15.0]).is_none());
        assert!(camera.project(&IDENTITY, [0.0, 0.0, 20.0]).is_none());
    }

    #[test]
    fn up_is_towards_row_zero() {
        let camera = Camera::new(80, 24);
        let p = camera.project(&IDENTITY, [0.0, 3.0, 0.0]).unwrap();
        assert!(p.screen[1] < 12.0);
    }

    #[test]
    fn resize_changes_aspect_and_projection() {
        let mut camera = Camera::new(80, 40);
        assert_eq!(camera.aspect(), 1.0);
        camera.resize(160, 40);
        assert_eq!(camera.aspect(), 2.0);
        assert_eq!(camera.viewport(), (160, 40));
        let p = camera.project(&group_rotation(0.0, 0.0), [0.0, 0.0, 0.0]).unwrap();
        assert_eq!(p.screen, [80.0, 20.0]);
    }

    #[test]
    fn nearer_plot_wins() {
        let mut canvas = Canvas::new(4, 4, Rgb::BLACK);
        canvas.plot([1.5, 1.5], 10.0, 'a', Rgb::WHITE);
        canvas.plot([1.2, 1.9], 12.0, 'b', Rgb::WHITE);
        assert_eq!(canvas.cell(1, 1).unwrap().glyph, 'a');
        canvas.plot([1.0, 1.0], 5.0, 'c', Rgb::WHITE);
        assert_eq!(canvas.cell(1, 1).unwrap().glyph, 'c');
    }

    #[test]
    fn line_covers_both_endpoints_and_clips() {
        let mut canvas = Canvas::new(5, 3, Rgb::BLACK);
        canvas.draw_line([0.0, 0.0], [4.0, 2.0], '*', Rgb::WHITE);
        assert_eq!(canvas.cell(0, 0).unwrap().glyph, '*');
        assert_eq!(canvas.cell(4, 2).unwrap().glyph, '*');
        canvas.draw_line([-10.0, 1.0], [10.0, 1.0], '-', Rgb::WHITE);
        assert_eq!(canvas.cell(0, 1).unwrap().glyph, '-');
    }

    #[test]
    fn text_overrides_particles_and_clips() {
        let mut canvas = Canvas::new(6, 1, Rgb::BLACK);
        canvas.plot([2.0, 0.0], 1.0, 'o', Rgb::WHITE);
        canvas.text(1, 0, "hello world", Rgb::WHITE, None);
        let row: String = canvas.cells().iter().map(|c| c.glyph).collect();
        assert_eq!(row, " hello");
        canvas.plot([2.0, 0.0], 0.5, 'o', Rgb::WHITE);
        assert_eq!(canvas.cell(2, 0).unwrap().glyph, 'e');
    }
}
