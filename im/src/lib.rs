use {
    image::{
        imageops::{self, FilterType},
        io::Reader,
        ImageError,
    },
    std::{
        ffi::OsStr,
        io,
        path::{Path, PathBuf},
    },
    thiserror::Error,
};

pub use image::{Rgb, RgbImage};

/// File extensions recognized as images when a directory is scanned.
pub const EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Checks if the path has one of the known image [extensions](EXTENSIONS).
/// The comparison ignores ASCII case.
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Decodes the image file and normalizes it to 8-bit rgb.
///
/// The format is guessed from the file content, so the extension
/// doesn't have to match. Alpha and gray sources are converted.
///
/// # Errors
/// See [`Error`] for details.
pub fn decode(path: &Path) -> Result<RgbImage, Error> {
    let open_err = |err| Error::Open {
        path: path.to_owned(),
        err,
    };

    let reader = Reader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?;

    match reader.decode() {
        Ok(im) => Ok(im.into_rgb8()),
        Err(err) => Err(Error::Decode {
            path: path.to_owned(),
            err,
        }),
    }
}

/// Encodes the image to the file, the format is picked by the extension.
///
/// # Errors
/// See [`Error`] for details.
pub fn encode(im: &RgbImage, path: &Path) -> Result<(), Error> {
    im.save(path).map_err(|err| Error::Encode {
        path: path.to_owned(),
        err,
    })
}

/// Returns dimensions scaled so the larger side equals `max_side`.
/// Dimensions that already fit are returned unchanged.
#[must_use]
pub fn fitted_dimensions((width, height): (u32, u32), max_side: u32) -> (u32, u32) {
    let larger = width.max(height);
    if larger <= max_side {
        return (width, height);
    }

    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(max_side) / u64::from(larger);
        (scaled as u32).max(1)
    };

    (scale(width), scale(height))
}

/// Downscales the image with area averaging until it fits into `max_side`.
#[must_use]
pub fn fit(im: RgbImage, max_side: u32) -> RgbImage {
    let (width, height) = fitted_dimensions(im.dimensions(), max_side);
    if (width, height) == im.dimensions() {
        return im;
    }

    imageops::thumbnail(&im, width, height)
}

/// Turns the image into a mosaic of `block` sized squares.
///
/// The image is shrunk by the block size with nearest sampling and
/// then enlarged back, so the output keeps the source dimensions.
///
/// # Errors
/// Returns [`Error::ZeroBlock`] if the block size is zero.
pub fn pixelate(im: &RgbImage, block: u32) -> Result<RgbImage, Error> {
    if block == 0 {
        return Err(Error::ZeroBlock);
    }

    let (width, height) = im.dimensions();
    if width == 0 || height == 0 {
        return Ok(im.clone());
    }

    let small = imageops::resize(
        im,
        (width / block).max(1),
        (height / block).max(1),
        FilterType::Nearest,
    );

    Ok(imageops::resize(&small, width, height, FilterType::Nearest))
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {path:?}: {err}")]
    Open { path: PathBuf, err: io::Error },

    #[error("failed to decode {path:?}: {err}")]
    Decode { path: PathBuf, err: ImageError },

    #[error("failed to encode {path:?}: {err}")]
    Encode { path: PathBuf, err: ImageError },

    #[error("block size must be greater than zero")]
    ZeroBlock,
}
