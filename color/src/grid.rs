use crate::{color::Color, extract::ColorCluster};

/// An item which can be shown as a color swatch.
pub trait Swatch {
    fn color(&self) -> Color;
}

impl Swatch for Color {
    fn color(&self) -> Color {
        *self
    }
}

impl Swatch for ColorCluster {
    fn color(&self) -> Color {
        self.color
    }
}

/// The outcome of a [search](Grid::search).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Search {
    /// The grid shows this many matched colors.
    Matched(usize),

    /// Nothing matched, the grid is left as it was.
    NoMatches,

    /// The query was blank, the grid is left as it was.
    EmptyQuery,
}

/// A browsable grid of ranked colors.
///
/// The grid keeps the full set and the currently displayed subset.
/// Indices passed to [`select`](Self::select) refer to the displayed subset.
pub struct Grid<T> {
    items: Vec<T>,
    shown: Vec<usize>,
    columns: usize,
}

impl<T> Grid<T>
where
    T: Swatch,
{
    pub const DEFAULT_COLUMNS: usize = 10;

    /// Creates a new grid which displays all items.
    /// A zero column count is treated as one column.
    pub fn new(items: Vec<T>, columns: usize) -> Self {
        Self {
            shown: (0..items.len()).collect(),
            items,
            columns: columns.max(1),
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of displayed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shown.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Number of all items regardless of the filter.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.shown.len() != self.items.len()
    }

    pub fn displayed(&self) -> impl Iterator<Item = &T> + '_ {
        self.shown.iter().map(|&idx| &self.items[idx])
    }

    /// Displayed items split in rows, the last row may be shorter.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&T>> + '_ {
        self.shown
            .chunks(self.columns)
            .map(|row| row.iter().map(|&idx| &self.items[idx]).collect())
    }

    /// Shows only colors whose `#rrggbb` form contains the query.
    /// The case of the query is ignored.
    pub fn search(&mut self, query: &str) -> Search {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return Search::EmptyQuery;
        }

        let matched: Vec<_> = (0..self.items.len())
            .filter(|&idx| self.items[idx].color().to_string().contains(&query))
            .collect();

        if matched.is_empty() {
            return Search::NoMatches;
        }

        self.shown = matched;
        Search::Matched(self.shown.len())
    }

    /// Shows all items again.
    pub fn reset(&mut self) {
        self.shown = (0..self.items.len()).collect();
    }

    #[must_use]
    pub fn select(&self, index: usize) -> Option<&T> {
        let &idx = self.shown.get(index)?;
        self.items.get(idx)
    }
}
