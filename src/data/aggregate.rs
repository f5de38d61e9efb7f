use std::collections::{BTreeMap, HashMap};

use super::model::{CellValue, TableView};
use crate::error::DashboardResult;

// ---------------------------------------------------------------------------
// Frequencies
// ---------------------------------------------------------------------------

/// Count of each distinct non-missing value of `column`, most frequent
/// first. Ties keep the order in which the values first appear.
pub fn value_counts(view: &TableView<'_>, column: &str) -> DashboardResult<Vec<(CellValue, usize)>> {
    let mut counts: Vec<(CellValue, usize)> = Vec::new();
    let mut slot: HashMap<&CellValue, usize> = HashMap::new();

    for value in view.values(column)? {
        if value.is_null() {
            continue;
        }
        match slot.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(value, counts.len());
                counts.push((value.clone(), 1));
            }
        }
    }

    // `sort_by` is stable, so ties stay in appearance order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

// ---------------------------------------------------------------------------
// Means
// ---------------------------------------------------------------------------

/// Mean of `value` per distinct non-missing key of `by`, keys ascending.
/// A group without any numeric `value` has mean `None`.
pub fn grouped_mean(
    view: &TableView<'_>,
    by: &str,
    value: &str,
) -> DashboardResult<Vec<(CellValue, Option<f64>)>> {
    let keys = view.values(by)?;
    let values = view.values(value)?;

    let mut groups: BTreeMap<&CellValue, (f64, usize)> = BTreeMap::new();
    for (key, v) in keys.into_iter().zip(values) {
        if key.is_null() {
            continue;
        }
        let acc = groups.entry(key).or_insert((0.0, 0));
        if let Some(x) = v.as_f64() {
            acc.0 += x;
            acc.1 += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(k, (sum, n))| (k.clone(), (n > 0).then(|| sum / n as f64)))
        .collect())
}

/// Mean of each listed column over its numeric entries, in the given order.
pub fn column_means(
    view: &TableView<'_>,
    columns: &[String],
) -> DashboardResult<Vec<(String, Option<f64>)>> {
    columns
        .iter()
        .map(|col| {
            let values = view.numeric_values(col)?;
            Ok((col.clone(), mean(&values)))
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram: `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// `(left edge, right edge, count)` for each bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin `values` with an automatically chosen bin count.
///
/// Bin width is the smaller of the Sturges and Freedman–Diaconis estimates,
/// falling back to Sturges when the interquartile range is zero. An empty
/// input yields a single empty `[0, 1]` bin; a constant input a single bin
/// of width one centred on the value.
pub fn histogram(values: &[f64]) -> Histogram {
    if values.is_empty() {
        return Histogram {
            edges: vec![0.0, 1.0],
            counts: vec![0],
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let data_min = sorted[0];
    let data_max = sorted[sorted.len() - 1];

    let (first, last) = if data_min == data_max {
        (data_min - 0.5, data_max + 0.5)
    } else {
        (data_min, data_max)
    };

    let width = auto_bin_width(&sorted);
    let n_bins = if width > 0.0 {
        (((last - first) / width).ceil() as usize).max(1)
    } else {
        1
    };

    let edges: Vec<f64> = (0..=n_bins)
        .map(|i| first + (last - first) * i as f64 / n_bins as f64)
        .collect();

    let mut counts = vec![0usize; n_bins];
    let scale = n_bins as f64 / (last - first);
    for &x in &sorted {
        let mut idx = (((x - first) * scale) as usize).min(n_bins - 1);
        // Float rounding can land one bin off near an edge.
        if x < edges[idx] && idx > 0 {
            idx -= 1;
        } else if idx + 1 < n_bins && x >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

fn auto_bin_width(sorted: &[f64]) -> f64 {
    let n = sorted.len() as f64;
    let ptp = sorted[sorted.len() - 1] - sorted[0];
    let sturges = ptp / (n.log2() + 1.0);
    let iqr = percentile(sorted, 75.0) - percentile(sorted, 25.0);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    if fd > 0.0 {
        fd.min(sturges)
    } else {
        sturges
    }
}

/// Linear-interpolated percentile of already sorted data.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.into())
    }

    #[test]
    fn counts_only_values_present() {
        let t = table(&[("Education", &["A", "B", "A"])]);
        let counts = value_counts(&t.view(), "Education").unwrap();
        assert_eq!(counts, vec![(s("A"), 2), (s("B"), 1)]);
        assert!(!counts.iter().any(|(v, _)| *v == s("C")));
    }

    #[test]
    fn count_ties_keep_first_appearance() {
        let t = table(&[("Marital_Status", &["Single", "Married", "", "Together", "Married", "Single"])]);
        let counts = value_counts(&t.view(), "Marital_Status").unwrap();
        assert_eq!(
            counts,
            vec![(s("Single"), 2), (s("Married"), 2), (s("Together"), 1)]
        );
    }

    #[test]
    fn grouped_mean_per_key() {
        let t = table(&[
            ("MntWines", &["10", "5", "10", ""]),
            ("Income", &["100", "50", "300", "10"]),
        ]);
        let by_self = grouped_mean(&t.view(), "MntWines", "MntWines").unwrap();
        assert_eq!(
            by_self,
            vec![(CellValue::Integer(5), Some(5.0)), (CellValue::Integer(10), Some(10.0))]
        );
        let income = grouped_mean(&t.view(), "MntWines", "Income").unwrap();
        assert_eq!(income[1], (CellValue::Integer(10), Some(200.0)));
    }

    #[test]
    fn column_means_follow_requested_order() {
        let t = table(&[
            ("NumWebPurchases", &["4", "6"]),
            ("NumStorePurchases", &["1", ""]),
        ]);
        let cols = vec!["NumStorePurchases".to_string(), "NumWebPurchases".to_string()];
        let means = column_means(&t.view(), &cols).unwrap();
        assert_eq!(
            means,
            vec![
                ("NumStorePurchases".to_string(), Some(1.0)),
                ("NumWebPurchases".to_string(), Some(5.0)),
            ]
        );
        assert!(column_means(&t.view(), &[]).unwrap().is_empty());
        assert_eq!(
            column_means(&t.view().empty(), &cols).unwrap()[0].1,
            None
        );
    }

    #[test]
    fn empty_histogram_has_one_empty_bin() {
        let h = histogram(&[]);
        assert_eq!(h.edges, vec![0.0, 1.0]);
        assert_eq!(h.counts, vec![0]);
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn constant_histogram_is_centred() {
        let h = histogram(&[0.0, 0.0, 0.0]);
        assert_eq!(h.edges, vec![-0.5, 0.5]);
        assert_eq!(h.counts, vec![3]);
    }

    #[test]
    fn binary_flags_use_sturges_bins() {
        // IQR is zero, Sturges width = 1 / (log2(10) + 1) -> 5 bins.
        let values = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
        let h = histogram(&values);
        assert_eq!(h.counts, vec![8, 0, 0, 0, 2]);
        assert_eq!(h.edges.first(), Some(&0.0));
        assert_eq!(h.edges.last(), Some(&1.0));
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| (i % 17) as f64 * 1.3).collect();
        let h = histogram(&values);
        assert_eq!(h.total(), 100);
        for (lo, hi, _) in h.bins() {
            assert!(hi > lo);
        }
    }
}
