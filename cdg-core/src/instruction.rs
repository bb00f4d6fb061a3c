//! CDG instruction set.
//!
//! A packet is 24 bytes: a command byte, an instruction byte, two parity
//! bytes, 16 bytes of instruction data and four more parity bytes. Only the
//! low 6 bits of every byte carry information, the top two bits are the P and
//! Q subcode channels and are ignored.

use crate::PACKET_SIZE;

const SUBCODE_MASK: u8 = 0x3F;
const CDG_COMMAND: u8 = 0x09;

// Instruction opcodes
const MEMORY_PRESET: u8 = 1;
const BORDER_PRESET: u8 = 2;
const TILE_BLOCK: u8 = 6;
const SCROLL_PRESET: u8 = 20;
const SCROLL_COPY: u8 = 24;
const DEFINE_TRANSPARENT: u8 = 28;
const LOAD_COLOR_TABLE_LOW: u8 = 30;
const LOAD_COLOR_TABLE_HIGH: u8 = 31;
const TILE_BLOCK_XOR: u8 = 38;

const DATA_START: usize = 4;
const DATA_SIZE: usize = 16;

const COLOR_MASK: u8 = 0x0F;
const ROW_MASK: u8 = 0x1F;
const COLUMN_MASK: u8 = 0x3F;
const SCROLL_CMD_MASK: u8 = 0x30;
const H_OFFSET_MASK: u8 = 0x07;
const V_OFFSET_MASK: u8 = 0x0F;

pub const TILE_ROWS: usize = 12;
pub const COLORS_PER_TABLE: usize = 8;

type Data = [u8; DATA_SIZE];

/// 24 bit color, each channel expanded from the 4 bit CDG palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    // Two subcode bytes hold the channels as RRRRGG GGBBBB
    const fn from_packed(hi: u8, lo: u8) -> Self {
        const fn scale_channel(c: u8) -> u8 {
            c * 17
        }

        let hi = hi & SUBCODE_MASK;
        let lo = lo & SUBCODE_MASK;

        let r = hi >> 2;
        let g = ((hi & 0x03) << 2) | ((lo >> 4) & 0x03);
        let b = lo & 0x0F;

        Self::new(scale_channel(r), scale_channel(g), scale_channel(b))
    }
}

/// A 6x12 tile write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub color0: u8,
    pub color1: u8,
    pub column: u8,
    /// One 6 bit row per entry, leftmost pixel in bit 5
    pub pixels: [u8; TILE_ROWS],
    pub row: u8,
    pub xor: bool,
}

/// Whole screen shift plus sub-tile viewport offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scroll {
    pub color: u8,
    /// Wrap pixels around instead of filling with `color`
    pub copy: bool,
    pub h_offset: u8,
    /// 1 scrolls right, 2 scrolls left, anything else doesn't move
    pub h_scroll: u8,
    pub v_offset: u8,
    /// 1 scrolls down, 2 scrolls up, anything else doesn't move
    pub v_scroll: u8,
}

impl Scroll {
    /// Horizontal displacement in pixels.
    #[must_use]
    #[inline]
    pub const fn dx(&self) -> isize {
        match self.h_scroll {
            1 => crate::TILE_WIDTH as isize,
            2 => -(crate::TILE_WIDTH as isize),
            _ => 0,
        }
    }

    /// Vertical displacement in pixels.
    #[must_use]
    #[inline]
    pub const fn dy(&self) -> isize {
        match self.v_scroll {
            1 => crate::TILE_HEIGHT as isize,
            2 => -(crate::TILE_HEIGHT as isize),
            _ => 0,
        }
    }
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instruction {
    BorderPreset { color: u8 },
    DefineTransparent { color: u8 },
    LoadColorTable {
        colors: [Rgb; COLORS_PER_TABLE],
        offset: u8,
    },
    /// Discs repeat this instruction for resilience, `repeat` counts the copies
    MemoryPreset { color: u8, repeat: u8 },
    Scroll(Scroll),
    TileBlock(Tile),
}

impl Instruction {
    /// Decodes a single packet.
    ///
    /// Returns `None` for packets that don't belong to the graphics channel
    /// and for unknown opcodes.
    #[must_use]
    #[inline]
    pub fn from_packet(packet: &[u8; PACKET_SIZE]) -> Option<Self> {
        if packet[0] & SUBCODE_MASK != CDG_COMMAND {
            return None;
        }

        let data: &Data = packet
            .get(DATA_START..DATA_START + DATA_SIZE)?
            .try_into()
            .ok()?;

        match packet[1] & SUBCODE_MASK {
            MEMORY_PRESET => Some(Self::MemoryPreset {
                color: data[0] & COLOR_MASK,
                repeat: data[1] & COLOR_MASK,
            }),
            BORDER_PRESET => Some(Self::BorderPreset {
                color: data[0] & COLOR_MASK,
            }),
            TILE_BLOCK => Some(Self::TileBlock(tile(data, false))),
            TILE_BLOCK_XOR => Some(Self::TileBlock(tile(data, true))),
            SCROLL_PRESET => Some(Self::Scroll(scroll(data, false))),
            SCROLL_COPY => Some(Self::Scroll(scroll(data, true))),
            DEFINE_TRANSPARENT => Some(Self::DefineTransparent {
                color: data[0] & COLOR_MASK,
            }),
            LOAD_COLOR_TABLE_LOW => Some(color_table(data, 0)),
            LOAD_COLOR_TABLE_HIGH => Some(color_table(data, 8)),
            _ => None,
        }
    }

    /// Short name used in logs.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BorderPreset { .. } => "border_preset",
            Self::DefineTransparent { .. } => "define_transparent",
            Self::LoadColorTable { .. } => "load_color_table",
            Self::MemoryPreset { .. } => "memory_preset",
            Self::Scroll(Scroll { copy: false, .. }) => "scroll_preset",
            Self::Scroll(Scroll { copy: true, .. }) => "scroll_copy",
            Self::TileBlock(Tile { xor: false, .. }) => "tile_block",
            Self::TileBlock(Tile { xor: true, .. }) => "tile_block_xor",
        }
    }
}

fn tile(data: &Data, xor: bool) -> Tile {
    let mut pixels = [0; TILE_ROWS];
    for (px, &byte) in pixels.iter_mut().zip(&data[4..4 + TILE_ROWS]) {
        *px = byte & SUBCODE_MASK;
    }

    Tile {
        color0: data[0] & COLOR_MASK,
        color1: data[1] & COLOR_MASK,
        row: data[2] & ROW_MASK,
        column: data[3] & COLUMN_MASK,
        pixels,
        xor,
    }
}

const fn scroll(data: &Data, copy: bool) -> Scroll {
    Scroll {
        color: data[0] & COLOR_MASK,
        copy,
        h_scroll: (data[1] & SCROLL_CMD_MASK) >> 4,
        h_offset: data[1] & H_OFFSET_MASK,
        v_scroll: (data[2] & SCROLL_CMD_MASK) >> 4,
        v_offset: data[2] & V_OFFSET_MASK,
    }
}

fn color_table(data: &Data, offset: u8) -> Instruction {
    let mut colors = [Rgb::BLACK; COLORS_PER_TABLE];
    for (color, pair) in colors.iter_mut().zip(data.chunks_exact(2)) {
        *color = Rgb::from_packed(pair[0], pair[1]);
    }

    Instruction::LoadColorTable { colors, offset }
}
