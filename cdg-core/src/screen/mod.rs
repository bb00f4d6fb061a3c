mod palette;
mod rgba_buf;

use crate::{
    Instruction,
    instruction::{Scroll, TILE_ROWS, Tile},
    trace,
};
use alloc::{vec, vec::Vec};
use rgba_buf::Window;

pub use palette::{PALETTE_SIZE, Palette};
pub use rgba_buf::BPP;

pub const PX_WIDTH: u16 = 300;
pub const PX_HEIGHT: u16 = 216;
pub const VISIBLE_WIDTH: u16 = 288;
pub const VISIBLE_HEIGHT: u16 = 192;

pub const TILE_WIDTH: usize = 6;
pub const TILE_HEIGHT: usize = 12;

pub const RGBA_BUF_SIZE: usize = PX_TOTAL * BPP;
pub const VISIBLE_RGBA_BUF_SIZE: usize = VISIBLE_WIDTH as usize * VISIBLE_HEIGHT as usize * BPP;

const WIDTH: usize = PX_WIDTH as usize;
const HEIGHT: usize = PX_HEIGHT as usize;
const PX_TOTAL: usize = WIDTH * HEIGHT;

// The border is one tile wide on every side
const BORDER_X: usize = TILE_WIDTH;
const BORDER_Y: usize = TILE_HEIGHT;

const MAX_H_OFFSET: u8 = TILE_WIDTH as u8 - 1;
const MAX_V_OFFSET: u8 = TILE_HEIGHT as u8 - 1;

const FULL_WINDOW: Window = Window {
    x: 0,
    y: 0,
    width: WIDTH,
    height: HEIGHT,
};

/// Indexed color frame buffer driven by CDG instructions.
///
/// State is cumulative: the only way to know what the screen looks like at a
/// given time is to apply every instruction up to it, in order.
#[derive(Clone, Debug)]
pub struct Renderer {
    h_offset: u8,
    palette: Palette,
    // Row-major, every cell is a palette index in 0..16
    pixels: [u8; PX_TOTAL],
    transparent: Option<u8>,
    v_offset: u8,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            h_offset: 0,
            palette: Palette::default(),
            pixels: [0; PX_TOTAL],
            transparent: None,
            v_offset: 0,
        }
    }
}

impl Renderer {
    #[inline]
    pub fn apply(&mut self, instruction: &Instruction) {
        trace::instruction(instruction);

        match *instruction {
            Instruction::MemoryPreset { color, repeat } => {
                // Only the first copy of a repeated preset has to clear the screen
                if repeat == 0 {
                    self.pixels.fill(color);
                }
            }
            Instruction::BorderPreset { color } => self.border_preset(color),
            Instruction::TileBlock(ref tile) => self.tile_block(tile),
            Instruction::Scroll(ref scroll) => self.scroll(scroll),
            Instruction::DefineTransparent { color } => self.transparent = Some(color),
            Instruction::LoadColorTable { ref colors, offset } => {
                self.palette.load(offset, colors);
            }
        }
    }

    fn border_preset(&mut self, color: u8) {
        for (y, row) in self.pixels.chunks_exact_mut(WIDTH).enumerate() {
            if y < BORDER_Y || y >= HEIGHT - BORDER_Y {
                row.fill(color);
            } else {
                row[..BORDER_X].fill(color);
                row[WIDTH - BORDER_X..].fill(color);
            }
        }
    }

    #[must_use]
    #[inline]
    pub const fn h_offset(&self) -> u8 {
        self.h_offset
    }

    #[must_use]
    #[inline]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index at `(x, y)` of the full buffer.
    #[must_use]
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= WIDTH {
            return None;
        }
        self.pixels.get(y * WIDTH + x).copied()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.h_offset = 0;
        self.palette.reset();
        self.pixels.fill(0);
        self.transparent = None;
        self.v_offset = 0;
    }

    /// The whole 300x216 buffer, border included.
    #[must_use]
    #[inline]
    pub fn rgba_frame(&self) -> Vec<u8> {
        let mut buf = vec![0; RGBA_BUF_SIZE];
        self.write_rgba_frame(&mut buf);
        buf
    }

    fn scroll(&mut self, scroll: &Scroll) {
        self.h_offset = scroll.h_offset.min(MAX_H_OFFSET);
        self.v_offset = scroll.v_offset.min(MAX_V_OFFSET);

        let (dx, dy) = (scroll.dx(), scroll.dy());
        if dx == 0 && dy == 0 {
            return;
        }

        let src = self.pixels.to_vec();
        #[expect(
            clippy::cast_possible_wrap,
            reason = "Buffer dimensions are far below isize::MAX"
        )]
        let (w, h) = (WIDTH as isize, HEIGHT as isize);

        for (y, row) in (0..h).zip(self.pixels.chunks_exact_mut(WIDTH)) {
            for (x, px) in (0..w).zip(row.iter_mut()) {
                let (sx, sy) = (x - dx, y - dy);

                *px = if scroll.copy {
                    src[(sy.rem_euclid(h) * w + sx.rem_euclid(w)).unsigned_abs()]
                } else if (0..w).contains(&sx) && (0..h).contains(&sy) {
                    src[(sy * w + sx).unsigned_abs()]
                } else {
                    scroll.color
                };
            }
        }
    }

    fn tile_block(&mut self, tile: &Tile) {
        let x0 = usize::from(tile.column) * TILE_WIDTH;
        let y0 = usize::from(tile.row) * TILE_HEIGHT;

        if x0 + TILE_WIDTH > WIDTH || y0 + TILE_ROWS > HEIGHT {
            return;
        }

        for (dy, bits) in tile.pixels.iter().enumerate() {
            let start = (y0 + dy) * WIDTH + x0;
            let row = &mut self.pixels[start..start + TILE_WIDTH];

            for (col, px) in row.iter_mut().enumerate() {
                let color = if bits & (1 << (TILE_WIDTH - 1 - col)) != 0 {
                    tile.color1
                } else {
                    tile.color0
                };

                if tile.xor {
                    *px ^= color;
                } else {
                    *px = color;
                }
            }
        }
    }

    #[must_use]
    #[inline]
    pub const fn transparent(&self) -> Option<u8> {
        self.transparent
    }

    #[must_use]
    #[inline]
    pub const fn v_offset(&self) -> u8 {
        self.v_offset
    }

    /// The 288x192 area inside the border, shifted by the current sub-tile
    /// scroll offsets.
    #[must_use]
    #[inline]
    pub fn visible_rgba_frame(&self) -> Vec<u8> {
        let mut buf = vec![0; VISIBLE_RGBA_BUF_SIZE];
        self.write_visible_rgba_frame(&mut buf);
        buf
    }

    const fn visible_window(&self) -> Window {
        Window {
            x: BORDER_X + self.h_offset as usize,
            y: BORDER_Y + self.v_offset as usize,
            width: VISIBLE_WIDTH as usize,
            height: VISIBLE_HEIGHT as usize,
        }
    }

    /// Copies the full frame into `buf`, which must be [`RGBA_BUF_SIZE`]
    /// bytes long.
    #[inline]
    pub fn write_rgba_frame(&self, buf: &mut [u8]) {
        rgba_buf::write_window(
            buf,
            &self.pixels,
            &self.palette,
            self.transparent,
            FULL_WINDOW,
        );
    }

    /// Copies the visible frame into `buf`, which must be
    /// [`VISIBLE_RGBA_BUF_SIZE`] bytes long.
    #[inline]
    pub fn write_visible_rgba_frame(&self, buf: &mut [u8]) {
        rgba_buf::write_window(
            buf,
            &self.pixels,
            &self.palette,
            self.transparent,
            self.visible_window(),
        );
    }
}
