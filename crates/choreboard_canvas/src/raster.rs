//! # Software Raster Surface
//!
//! CPU rasterizer for confetti frames. Used by the headless host so sessions
//! can be rendered, inspected and dumped without a browser.
//!
//! The buffer is `viewport * device_pixel_ratio` physical pixels. Commands
//! arrive in logical pixels and are scaled once here; coverage is a single
//! sample at each pixel center (no anti-aliasing).

use std::io::{self, Write};

use bytemuck::{Pod, Zeroable};
use choreboard_confetti::{Color, FrameBatch, RenderCommand, Surface, Viewport};

/// One RGBA8 pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque pixel of the given color.
    #[must_use]
    pub const fn opaque(color: Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        }
    }
}

/// Software drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    viewport: Viewport,
    device_pixel_ratio: f32,
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    frames: u64,
    resizes: u32,
    last_draw_count: usize,
}

impl Raster {
    /// Creates a cleared raster for a viewport.
    #[must_use]
    pub fn new(viewport: Viewport, device_pixel_ratio: f32) -> Self {
        let mut raster = Self {
            viewport,
            device_pixel_ratio,
            width: 0,
            height: 0,
            pixels: Vec::new(),
            frames: 0,
            resizes: 0,
            last_draw_count: 0,
        };
        raster.resize(viewport, device_pixel_ratio);
        raster
    }

    /// Physical width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Physical height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Logical viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current device-pixel-ratio transform.
    #[must_use]
    pub const fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Frames submitted so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of `resize` calls, including the initial sizing.
    #[must_use]
    pub const fn resize_count(&self) -> u32 {
        self.resizes
    }

    /// Shapes drawn in the most recent frame.
    #[must_use]
    pub const fn last_draw_count(&self) -> usize {
        self.last_draw_count
    }

    /// Returns the pixel at physical coordinates.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    /// Number of non-transparent pixels.
    #[must_use]
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a != 0).count()
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Writes the frame as a binary PPM, transparent pixels on white.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width as usize * 3);
        for line in self.as_bytes().chunks_exact(self.width.max(1) as usize * 4) {
            row.clear();
            for px in line.chunks_exact(4) {
                if px[3] == 0 {
                    row.extend_from_slice(&[255, 255, 255]);
                } else {
                    row.extend_from_slice(&px[..3]);
                }
            }
            out.write_all(&row)?;
        }
        out.flush()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn clear(&mut self, width: f32, height: f32) {
        let Some((x0, x1)) = span(0.0, width * self.device_pixel_ratio, self.width) else {
            return;
        };
        let Some((y0, y1)) = span(0.0, height * self.device_pixel_ratio, self.height) else {
            return;
        };
        for y in y0..y1 {
            let start = self.index(x0, y);
            let end = self.index(x1, y);
            self.pixels[start..end].fill(Rgba8::TRANSPARENT);
        }
    }

    fn fill_rect(&mut self, center: (f32, f32), size: (f32, f32), rotation: f32, color: Color) {
        let dpr = self.device_pixel_ratio;
        let (cx, cy) = (center.0 * dpr, center.1 * dpr);
        let (hw, hh) = (size.0 * 0.5 * dpr, size.1 * 0.5 * dpr);
        let reach = hw.hypot(hh);
        let (sin, cos) = rotation.sin_cos();

        self.fill_where(cx, cy, reach, color, |dx, dy| {
            // Rotate the sample into the rectangle's frame
            let lx = dx * cos + dy * sin;
            let ly = -dx * sin + dy * cos;
            lx.abs() <= hw && ly.abs() <= hh
        });
    }

    fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        let dpr = self.device_pixel_ratio;
        let r = radius * dpr;
        self.fill_where(center.0 * dpr, center.1 * dpr, r, color, |dx, dy| {
            dx * dx + dy * dy <= r * r
        });
    }

    /// Paints every pixel within `reach` of (cx, cy) whose center passes `inside`.
    fn fill_where(
        &mut self,
        cx: f32,
        cy: f32,
        reach: f32,
        color: Color,
        inside: impl Fn(f32, f32) -> bool,
    ) {
        let Some((x0, x1)) = span(cx - reach, cx + reach, self.width) else {
            return;
        };
        let Some((y0, y1)) = span(cy - reach, cy + reach, self.height) else {
            return;
        };
        let fill = Rgba8::opaque(color);

        for y in y0..y1 {
            let dy = y as f32 + 0.5 - cy;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                if inside(dx, dy) {
                    let i = self.index(x, y);
                    self.pixels[i] = fill;
                }
            }
        }
    }
}

impl Surface for Raster {
    fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f32) {
        self.viewport = viewport;
        self.device_pixel_ratio = device_pixel_ratio;
        self.width = physical(viewport.width, device_pixel_ratio);
        self.height = physical(viewport.height, device_pixel_ratio);
        self.pixels.clear();
        self.pixels
            .resize(self.width as usize * self.height as usize, Rgba8::TRANSPARENT);
        self.resizes += 1;
    }

    fn submit(&mut self, batch: &FrameBatch) {
        let mut drawn = 0;
        for command in batch.commands() {
            match *command {
                RenderCommand::Clear { width, height } => self.clear(width, height),
                RenderCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    rotation,
                    color,
                } => {
                    self.fill_rect((x, y), (width, height), rotation, color);
                    drawn += 1;
                }
                RenderCommand::Circle {
                    x,
                    y,
                    radius,
                    color,
                } => {
                    self.fill_circle((x, y), radius, color);
                    drawn += 1;
                }
            }
        }
        self.frames += 1;
        self.last_draw_count = drawn;
    }
}

/// Logical extent to whole physical pixels.
fn physical(logical: f32, device_pixel_ratio: f32) -> u32 {
    let px = (logical * device_pixel_ratio).round();
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

/// Clips `[lo, hi)` to `[0, limit)` in whole pixels.
fn span(lo: f32, hi: f32, limit: u32) -> Option<(u32, u32)> {
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(limit as f32);
    if hi <= lo {
        return None;
    }
    Some((lo as u32, hi as u32))
}
