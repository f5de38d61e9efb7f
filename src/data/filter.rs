use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{CellValue, TableView};
use crate::error::DashboardResult;

// ---------------------------------------------------------------------------
// Category filter: which distinct values are selected in a column
// ---------------------------------------------------------------------------

/// Selected values of one categorical column.
/// An empty set means "no filter" (every category included).
pub type CategorySelection = BTreeSet<CellValue>;

/// Keep rows whose value in `column` is one of `selected`.
///
/// An empty selection returns the view unchanged.
pub fn filter_by_category<'a>(
    view: &TableView<'a>,
    column: &str,
    selected: &CategorySelection,
) -> DashboardResult<TableView<'a>> {
    if selected.is_empty() {
        // Still fail on a missing column, as any other access would.
        view.values(column)?;
        return Ok(view.clone());
    }
    view.retain_by(column, |v| selected.contains(v))
}

// ---------------------------------------------------------------------------
// Numeric range filter
// ---------------------------------------------------------------------------

/// Keep rows whose numeric value in `column` lies within `range` (inclusive).
/// Missing and non-numeric cells never match.
pub fn filter_by_range<'a>(
    view: &TableView<'a>,
    column: &str,
    range: &RangeInclusive<f64>,
) -> DashboardResult<TableView<'a>> {
    view.retain_by(column, |v| v.as_f64().is_some_and(|x| range.contains(&x)))
}

/// Lower / upper limit of a numeric column, used as slider limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn as_range(&self) -> RangeInclusive<f64> {
        self.min..=self.max
    }
}

/// Min / max over the numeric values of `column` in the view.
/// `None` when the view holds no numeric value for it.
pub fn column_bounds(view: &TableView<'_>, column: &str) -> DashboardResult<Option<Bounds>> {
    let values = view.numeric_values(column)?;
    let Some(&first) = values.first() else {
        return Ok(None);
    };
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    Ok(Some(Bounds { min, max }))
}

// ---------------------------------------------------------------------------
// Range slider state
// ---------------------------------------------------------------------------

/// The value held by a two-ended range slider.
///
/// A slider is identified by its limits: when the limits it is rendered
/// against change, the previous selection is dropped and the full range is
/// selected again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSelection {
    bounds: Bounds,
    lo: f64,
    hi: f64,
}

impl RangeSelection {
    /// Select the whole of `bounds`.
    pub fn full(bounds: Bounds) -> Self {
        RangeSelection {
            bounds,
            lo: bounds.min,
            hi: bounds.max,
        }
    }

    /// Reconcile a stored slider value with the limits of this run.
    pub fn resolve(slot: &mut Option<RangeSelection>, bounds: Bounds) -> RangeSelection {
        match slot {
            Some(sel) if sel.bounds == bounds => *sel,
            _ => {
                let sel = RangeSelection::full(bounds);
                *slot = Some(sel);
                sel
            }
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Move both ends, clamping into the limits and keeping `lo <= hi`.
    pub fn set(&mut self, lo: f64, hi: f64) {
        let lo = lo.clamp(self.bounds.min, self.bounds.max);
        let hi = hi.clamp(self.bounds.min, self.bounds.max);
        if lo <= hi {
            self.lo = lo;
            self.hi = hi;
        } else {
            self.lo = hi;
            self.hi = lo;
        }
    }

    pub fn as_range(&self) -> RangeInclusive<f64> {
        self.lo..=self.hi
    }
}
