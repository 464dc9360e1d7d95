use {
    crate::{color::Color, palette::Palette},
    im::{Rgb, RgbImage},
    thiserror::Error,
};

/// Repaints the image with the closest palette colors.
///
/// # Errors
/// Returns [`Error::EmptyPalette`] if there are no colors.
pub fn repaint(im: &RgbImage, colors: &[Color]) -> Result<RgbImage, Error> {
    let mut palette = Palette::new(colors).ok_or(Error::EmptyPalette)?;
    Ok(repaint_with(im, &mut palette))
}

/// Repaints the image with an already built palette.
#[must_use]
pub fn repaint_with(im: &RgbImage, palette: &mut Palette) -> RgbImage {
    let mut out = im.clone();
    for Rgb(col) in out.pixels_mut() {
        let Color(new) = palette.closest(Color(*col));
        *col = new;
    }

    out
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty palette")]
    EmptyPalette,
}
