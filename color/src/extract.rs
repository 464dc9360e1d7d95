use {
    crate::color::Color,
    im::{Rgb, RgbImage},
    kmeans_colors::get_kmeans,
    palette::Srgb,
    serde::Serialize,
    std::{borrow::Cow, collections::HashSet, path::Path},
    tracing::{debug, warn},
};

/// Number of colors extracted by default.
pub const DEFAULT_COLORS: usize = 10;

/// The upper limit of colors extracted from one image.
pub const MAX_COLORS: usize = 200;

/// Images with a larger side are downscaled before clustering.
pub const MAX_SIDE: u32 = 800;

/// A dominant color with the number of pixels it represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColorCluster {
    pub color: Color,
    pub count: usize,
}

/// Extraction parameters.
#[derive(Clone, Debug)]
pub struct Options {
    /// Requested number of colors, capped by [`MAX_COLORS`].
    pub colors: usize,
    pub max_side: u32,
    pub max_iterations: usize,
    /// Convergence threshold of the centroid shift in normalized rgb.
    pub convergence: f32,
    /// Fixed seed for the cluster initialization, random if not set.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
            max_side: MAX_SIDE,
            max_iterations: 100,
            convergence: 0.0025,
            seed: None,
        }
    }
}

/// Extracts dominant colors of the image, the most frequent first.
///
/// The result is empty if the image has no pixels. An image with
/// fewer distinct colors than requested yields fewer clusters.
#[must_use]
pub fn extract(im: &RgbImage, options: &Options) -> Vec<ColorCluster> {
    let k = options.colors.min(MAX_COLORS);
    if k == 0 || im.width() == 0 || im.height() == 0 {
        return vec![];
    }

    let im = if im.width().max(im.height()) > options.max_side {
        let fitted = im::fit(im.clone(), options.max_side);
        debug!(
            "downscale {:?} to {:?} before clustering",
            im.dimensions(),
            fitted.dimensions(),
        );

        Cow::Owned(fitted)
    } else {
        Cow::Borrowed(im)
    };

    let distinct: HashSet<_> = im.pixels().map(|&px| Color::from(px)).collect();
    let k = k.min(distinct.len());
    let points: Vec<Srgb> = im
        .pixels()
        .map(|&Rgb([r, g, b])| Srgb::new(r, g, b).into_format())
        .collect();

    let seed = options.seed.unwrap_or_else(rand::random);
    let kmeans = get_kmeans(
        k,
        options.max_iterations,
        options.convergence,
        false,
        &points,
        seed,
    );

    let mut counts = vec![0; kmeans.centroids.len()];
    for &idx in &kmeans.indices {
        counts[usize::from(idx)] += 1;
    }

    let mut clusters: Vec<_> = kmeans
        .centroids
        .iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(centroid, count)| {
            let rgb: Srgb<u8> = centroid.into_format();
            ColorCluster {
                color: Color([rgb.red, rgb.green, rgb.blue]),
                count,
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.count.cmp(&a.count));
    clusters.truncate(k);
    debug!(
        "found {} clusters of {} pixels, score {}",
        clusters.len(),
        points.len(),
        kmeans.score,
    );

    clusters
}

/// Decodes the image file and extracts its dominant colors.
///
/// A file that can't be decoded yields an empty result.
#[must_use]
pub fn extract_file(path: &Path, options: &Options) -> Vec<ColorCluster> {
    match im::decode(path) {
        Ok(im) => extract(&im, options),
        Err(err) => {
            warn!("no colors extracted: {err}");
            vec![]
        }
    }
}

/// Returns the single most representative color of the image.
#[must_use]
pub fn main_color(im: &RgbImage) -> Option<Color> {
    let options = Options {
        colors: 1,
        ..Options::default()
    };

    extract(im, &options).first().map(|cluster| cluster.color)
}
