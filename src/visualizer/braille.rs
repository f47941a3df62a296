use ratatui::prelude::*;

use crate::color::{to_color, Rgb};

/// Braille dot positions within a 2x4 cell:
/// (0,0)=0x01 (1,0)=0x08
/// (0,1)=0x02 (1,1)=0x10
/// (0,2)=0x04 (1,2)=0x20
/// (0,3)=0x40 (1,3)=0x80
pub const DOT_MAP: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40],
    [0x08, 0x10, 0x20, 0x80],
];

/// One lit dot. Higher priority wins both the dot and its cell's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub color: Rgb,
    pub priority: u8,
}

/// A canvas for sub-character braille rendering.
/// Each terminal character cell maps to a 2x4 grid of braille dots.
pub struct BrailleCanvas {
    grid: Vec<Option<Dot>>,
    pub grid_w: usize,
    pub grid_h: usize,
    char_w: usize,
    char_h: usize,
}

impl BrailleCanvas {
    /// Create a new braille canvas for the given character dimensions.
    pub fn new(char_w: usize, char_h: usize) -> Self {
        let grid_w = char_w * 2;
        let grid_h = char_h * 4;
        Self {
            grid: vec![None; grid_w * grid_h],
            grid_w,
            grid_h,
            char_w,
            char_h,
        }
    }

    pub fn get(&self, gx: usize, gy: usize) -> Option<Dot> {
        if gx < self.grid_w && gy < self.grid_h {
            self.grid[gy * self.grid_w + gx]
        } else {
            None
        }
    }

    /// Set a single dot on the braille grid (bounds-checked).
    #[inline]
    pub fn set(&mut self, gx: isize, gy: isize, dot: Dot) {
        if gx < 0 || gy < 0 || gx >= self.grid_w as isize || gy >= self.grid_h as isize {
            return;
        }
        let slot = &mut self.grid[gy as usize * self.grid_w + gx as usize];
        match slot {
            Some(existing) if existing.priority > dot.priority => {}
            _ => *slot = Some(dot),
        }
    }

    /// Draw a line using Bresenham's algorithm.
    pub fn line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, dot: Dot) {
        bresenham_line(x0, y0, x1, y1, |x, y| self.set(x, y, dot));
    }

    /// Filled disc; a radius below one dot still lights the center.
    pub fn disc(&mut self, cx: f64, cy: f64, radius: f64, dot: Dot) {
        let center_x = cx.floor() as isize;
        let center_y = cy.floor() as isize;
        self.set(center_x, center_y, dot);

        let reach = radius.ceil() as isize;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let x = center_x + dx;
                let y = center_y + dy;
                let ox = x as f64 + 0.5 - cx;
                let oy = y as f64 + 0.5 - cy;
                if ox * ox + oy * oy <= radius * radius {
                    self.set(x, y, dot);
                }
            }
        }
    }

    /// Encode braille grid to characters and write to the frame buffer.
    /// Each cell takes the color of its highest-priority dot.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_to_buffer(frame.buffer_mut(), area);
    }

    pub fn render_to_buffer(&self, buf: &mut Buffer, area: Rect) {
        for cy in 0..self.char_h.min(area.height as usize) {
            for cx in 0..self.char_w.min(area.width as usize) {
                let mut braille: u8 = 0;
                let mut top: Option<Dot> = None;

                for (dx, col) in DOT_MAP.iter().enumerate() {
                    for (dy, &bit) in col.iter().enumerate() {
                        if let Some(dot) = self.get(cx * 2 + dx, cy * 4 + dy) {
                            braille |= bit;
                            if top.map_or(true, |t| dot.priority > t.priority) {
                                top = Some(dot);
                            }
                        }
                    }
                }

                if let Some(dot) = top {
                    let ch = char::from_u32(0x2800 + braille as u32).unwrap_or(' ');
                    if let Some(cell) = buf.cell_mut((area.x + cx as u16, area.y + cy as u16)) {
                        cell.set_char(ch);
                        cell.set_fg(to_color(dot.color));
                    }
                }
            }
        }
    }
}

/// Walk the grid points of a line using Bresenham's algorithm.
pub fn bresenham_line(
    x0: isize,
    y0: isize,
    x1: isize,
    y1: isize,
    mut plot: impl FnMut(isize, isize),
) {
    let mut x0 = x0;
    let mut y0 = y0;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        plot(x0, y0);

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
