use super::{Palette, PX_WIDTH};

pub const BPP: usize = 4; // bytes per pixel

const OPAQUE: u8 = 0xFF;
const TRANSPARENT: u8 = 0x00;

/// A rectangle of the index buffer to convert.
#[derive(Clone, Copy)]
pub(super) struct Window {
    pub height: usize,
    pub width: usize,
    pub x: usize,
    pub y: usize,
}

impl Window {
    pub(super) const fn buf_size(self) -> usize {
        self.width * self.height * BPP
    }
}

/// Writes `window` of `pixels` as RGBA8 into `out`, row-major.
///
/// Pixels equal to `transparent` get alpha 0, everything else is opaque.
pub(super) fn write_window(
    out: &mut [u8],
    pixels: &[u8],
    palette: &Palette,
    transparent: Option<u8>,
    window: Window,
) {
    debug_assert_eq!(out.len(), window.buf_size());

    let stride = usize::from(PX_WIDTH);
    let rows = pixels
        .chunks_exact(stride)
        .skip(window.y)
        .take(window.height);

    for (out_row, row) in out.chunks_exact_mut(window.width * BPP).zip(rows) {
        let src = row.iter().skip(window.x).take(window.width);

        for (px, &index) in out_row.chunks_exact_mut(BPP).zip(src) {
            let rgb = palette.color(index);
            px[0] = rgb.r;
            px[1] = rgb.g;
            px[2] = rgb.b;
            px[3] = if transparent == Some(index) {
                TRANSPARENT
            } else {
                OPAQUE
            };
        }
    }
}
