//! Tile colors.
//!
//! Classic 2048 palette keyed by tile value. Values above the table (a
//! custom win tile past 2048, or play continuing in a host that never stops)
//! reuse the 2048 color.

use crate::fb::{CellStyle, Rgb};
use crate::types::Tile;

/// Board background behind and between tiles
pub const BOARD_BG: Rgb = Rgb::hex(0xbbada0);

/// Empty cell fill
pub const EMPTY_BG: Rgb = Rgb::hex(0xcdc1b4);

const DARK_TEXT: Rgb = Rgb::hex(0x776e65);
const LIGHT_TEXT: Rgb = Rgb::hex(0xf9f6f2);

const TILE_BG: [(Tile, Rgb); 11] = [
    (2, Rgb::hex(0xeee4da)),
    (4, Rgb::hex(0xede0c8)),
    (8, Rgb::hex(0xf2b179)),
    (16, Rgb::hex(0xf59563)),
    (32, Rgb::hex(0xf67c5f)),
    (64, Rgb::hex(0xf65e3b)),
    (128, Rgb::hex(0xedcf72)),
    (256, Rgb::hex(0xedcc61)),
    (512, Rgb::hex(0xedc850)),
    (1024, Rgb::hex(0xedc53f)),
    (2048, Rgb::hex(0xedc22e)),
];

/// Fill color for a tile value
pub fn tile_bg(value: Tile) -> Rgb {
    if value == 0 {
        return EMPTY_BG;
    }
    TILE_BG
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, rgb)| *rgb)
        .unwrap_or(TILE_BG[TILE_BG.len() - 1].1)
}

/// Full style for a tile: dark bold text on the two light tiles, light text
/// elsewhere.
pub fn tile_style(value: Tile) -> CellStyle {
    let bg = tile_bg(value);
    if value <= 4 {
        CellStyle::new(DARK_TEXT, bg).bold()
    } else {
        CellStyle::new(LIGHT_TEXT, bg)
    }
}
