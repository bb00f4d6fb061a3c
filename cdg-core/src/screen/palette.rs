use crate::{Rgb, instruction::COLORS_PER_TABLE};

pub const PALETTE_SIZE: usize = 16;

const INDEX_MASK: u8 = 0x0F;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PALETTE_SIZE],
}

impl Palette {
    #[must_use]
    #[inline]
    pub const fn color(&self, index: u8) -> Rgb {
        self.colors[(index & INDEX_MASK) as usize]
    }

    #[must_use]
    #[inline]
    pub const fn colors(&self) -> &[Rgb; PALETTE_SIZE] {
        &self.colors
    }

    // offset is either 0 or 8, the upper half of the table can't overflow
    pub(super) fn load(&mut self, offset: u8, colors: &[Rgb; COLORS_PER_TABLE]) {
        let start = usize::from(offset & 0x08);
        if let Some(slots) = self.colors.get_mut(start..start + COLORS_PER_TABLE) {
            slots.copy_from_slice(colors);
        }
    }

    pub(super) fn reset(&mut self) {
        self.colors = [Rgb::BLACK; PALETTE_SIZE];
    }
}
