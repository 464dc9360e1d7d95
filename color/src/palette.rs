use {crate::color::Color, std::collections::HashMap};

/// A non-empty set of target colors for the nearest color search.
#[derive(Clone)]
pub struct Palette {
    colors: Vec<Color>,
    cache: HashMap<Color, Color>,
}

impl Palette {
    /// Creates a new palette, or `None` if there are no colors.
    #[must_use]
    pub fn new(colors: &[Color]) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }

        Some(Self {
            colors: colors.to_vec(),
            cache: HashMap::with_capacity(128),
        })
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[cfg(test)]
    pub(crate) fn resolved(&self) -> usize {
        self.cache.len()
    }

    /// Returns the palette color closest to the target in rgb space.
    ///
    /// Of several equally close colors the earliest one wins.
    pub fn closest(&mut self, target: Color) -> Color {
        let colors = &self.colors;
        *self.cache.entry(target).or_insert_with(|| {
            let diffs = colors.iter().map(|&col| col.distance_squared(target));
            let (min_idx, _) = (0..)
                .zip(diffs)
                .fold((0, u32::MAX), |min @ (_, min_diff), (idx, diff)| {
                    if diff < min_diff {
                        (idx, diff)
                    } else {
                        min
                    }
                });

            colors[min_idx]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert!(Palette::new(&[]).is_none());
    }

    #[test]
    fn self_match() {
        let colors = [
            Color([10, 20, 30]),
            Color([10, 20, 31]),
            Color([200, 0, 0]),
            Color([10, 20, 30]),
        ];

        let mut palette = Palette::new(&colors).expect("palette");
        for col in colors {
            assert_eq!(palette.closest(col), col);
        }
    }

    #[test]
    fn first_wins_ties() {
        let red = Color([255, 0, 0]);
        let blue = Color([0, 0, 255]);
        for mid in [Color([128, 0, 128]), Color([100, 50, 100]), Color([0, 0, 0])] {
            assert_eq!(mid.distance_squared(red), mid.distance_squared(blue));

            let mut palette = Palette::new(&[red, blue]).expect("palette");
            assert_eq!(palette.closest(mid), red);

            let mut palette = Palette::new(&[blue, red]).expect("palette");
            assert_eq!(palette.closest(mid), blue);
        }

        let black = Color([0, 0, 0]);
        let gray = Color([2, 2, 2]);
        let mut palette = Palette::new(&[black, gray]).expect("palette");
        assert_eq!(palette.closest(Color([1, 1, 1])), black);
    }

    #[test]
    fn nearest() {
        let mut palette = Palette::new(&[
            Color([255, 0, 0]),
            Color([0, 255, 0]),
            Color([0, 0, 255]),
        ])
        .expect("palette");

        assert_eq!(palette.closest(Color([200, 40, 40])), Color([255, 0, 0]));
        assert_eq!(palette.closest(Color([30, 180, 90])), Color([0, 255, 0]));
        assert_eq!(palette.closest(Color([60, 60, 61])), Color([0, 0, 255]));
    }
}
