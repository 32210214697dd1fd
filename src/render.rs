//! Heatmap rasterizer and window frontend
//!
//! Two-phase drawing, mirroring the decode/blit split of a capture viewer:
//!   Phase 1 (rasterize): interpolated grid -> owned `Vec<u32>` frame buffer.
//!     `set_data` touches only the image region; `set_clim` additionally
//!     re-rasterizes the colorbar strip.
//!   Phase 2 (present): frame buffer -> window, every iteration.
//!
//! The rasterizer is window-free so it can be exercised headless; `ViewerWindow`
//! is a thin minifb wrapper on top.

use crate::interp::{InterpGrid, INTERP_DIM};
use crate::Result;
use minifb::{Key, Window, WindowOptions};

/// Screen pixels per interpolated cell.
pub const CELL_PX: usize = 10;

/// Gap between the image region and the colorbar, pixels.
const BAR_GAP: usize = 16;

/// Colorbar strip width, pixels.
const BAR_WIDTH: usize = 24;

/// Right margin past the colorbar, pixels.
const RIGHT_MARGIN: usize = 16;

/// Initial color limits, degrees C.
pub const DEFAULT_CLIM: (f64, f64) = (18.0, 27.0);

const BG: u32 = 0x00202020;

fn rgb_pixel(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | (b as u32)
}

/// 256-entry color lookup table over a diverging blue-to-red gradient
/// (reversed RdBu: blue = cold, red = hot).
pub struct ColorMap {
    lut: [u32; 256],
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorMap {
    pub fn new() -> Self {
        let gradient = colorgrad::rd_bu();
        let mut lut = [0u32; 256];
        for (i, entry) in lut.iter_mut().enumerate() {
            // RdBu runs red -> blue; sample reversed so index 255 is hot.
            let t = 1.0 - i as f64 / 255.0;
            let [r, g, b, _] = gradient.at(t).to_rgba8();
            *entry = rgb_pixel(r, g, b);
        }
        Self { lut }
    }

    /// Color for a normalized value; `t` is clamped to `[0, 1]`.
    pub fn lookup(&self, t: f64) -> u32 {
        let idx = (t.clamp(0.0, 1.0) * 255.0).round() as usize;
        self.lut[idx]
    }
}

/// Color-mapped heatmap canvas: image region plus a colorbar strip.
pub struct Heatmap {
    buf: Vec<u32>,
    width: usize,
    height: usize,
    clim: (f64, f64),
    cmap: ColorMap,
}

impl Default for Heatmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heatmap {
    pub fn new() -> Self {
        let width = Self::image_px() + BAR_GAP + BAR_WIDTH + RIGHT_MARGIN;
        let height = Self::image_px();
        let mut heatmap = Self {
            buf: vec![BG; width * height],
            width,
            height,
            clim: DEFAULT_CLIM,
            cmap: ColorMap::new(),
        };
        heatmap.draw_colorbar();
        heatmap
    }

    /// Edge length of the square image region, pixels.
    pub const fn image_px() -> usize {
        INTERP_DIM * CELL_PX
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Active color limits `(lower, upper)`.
    pub fn clim(&self) -> (f64, f64) {
        self.clim
    }

    /// Backing frame buffer, row-major `width * height`.
    pub fn buffer(&self) -> &[u32] {
        &self.buf
    }

    /// Normalize a temperature against the active color limits.
    fn normalize(&self, value: f64) -> f64 {
        let (lower, upper) = self.clim;
        let range = upper - lower;
        if range <= 0.0 {
            return 0.5;
        }
        (value - lower) / range
    }

    /// Rasterize a new interpolated grid into the image region only.
    ///
    /// The colorbar and margins keep their previous contents (partial redraw).
    pub fn set_data(&mut self, grid: &InterpGrid) {
        for row in 0..INTERP_DIM {
            for col in 0..INTERP_DIM {
                let color = self.cmap.lookup(self.normalize(grid.get(row, col)));
                let y0 = row * CELL_PX;
                let x0 = col * CELL_PX;
                for y in y0..y0 + CELL_PX {
                    let line = &mut self.buf[y * self.width + x0..y * self.width + x0 + CELL_PX];
                    line.fill(color);
                }
            }
        }
    }

    /// Update the color limits and re-rasterize the colorbar.
    ///
    /// The image region is left as-is; the next `set_data` repaints it against
    /// the new limits.
    pub fn set_clim(&mut self, lower: f64, upper: f64) {
        self.clim = (lower, upper);
        self.draw_colorbar();
    }

    fn draw_colorbar(&mut self) {
        let x0 = Self::image_px() + BAR_GAP;
        for y in 0..self.height {
            // Top row = hot end.
            let t = 1.0 - y as f64 / (self.height - 1) as f64;
            let color = self.cmap.lookup(t);
            let line = &mut self.buf[y * self.width + x0..y * self.width + x0 + BAR_WIDTH];
            line.fill(color);
        }
    }
}

/// Native window for presenting a `Heatmap`.
pub struct ViewerWindow {
    window: Window,
}

impl ViewerWindow {
    pub fn new(title: &str, heatmap: &Heatmap) -> Result<Self> {
        let mut window = Window::new(
            title,
            heatmap.width(),
            heatmap.height(),
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    /// True until the window is closed or Escape is pressed.
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Status line in the title bar.
    pub fn set_status(&mut self, status: &str) {
        self.window.set_title(status);
    }

    /// Push the frame buffer to the screen and pump window events.
    pub fn present(&mut self, heatmap: &Heatmap) -> Result<()> {
        self.window
            .update_with_buffer(heatmap.buffer(), heatmap.width(), heatmap.height())?;
        Ok(())
    }
}
