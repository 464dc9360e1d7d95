pub mod batch;
mod color;
mod describe;
mod extract;
mod grid;
mod palette;
mod tools;

pub use crate::{
    color::{parse, Color, InvalidColorFormat, Parsed, PRESET},
    describe::{describe, name_of, Description, Hsv, Hue, Level, Tone},
    extract::{
        extract, extract_file, main_color, ColorCluster, Options, DEFAULT_COLORS, MAX_COLORS,
        MAX_SIDE,
    },
    grid::{Grid, Search, Swatch},
    palette::Palette,
    tools::{repaint, repaint_with, Error},
};
