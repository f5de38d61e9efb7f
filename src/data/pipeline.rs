use super::aggregate::{Histogram, column_means, grouped_mean, histogram, value_counts};
use super::filter::{
    CategorySelection, RangeSelection, column_bounds, filter_by_category, filter_by_range,
};
use super::model::{CellValue, CustomerTable, TableView};
use crate::error::DashboardResult;

// ---------------------------------------------------------------------------
// Column names the dashboard reads
// ---------------------------------------------------------------------------

pub const EDUCATION: &str = "Education";
pub const MARITAL_STATUS: &str = "Marital_Status";
pub const CUSTOMER_AGE: &str = "Customer_Age";
pub const INCOME: &str = "Income";
pub const RECENCY: &str = "Recency";
pub const YEARS_SINCE_ENROLLMENT: &str = "Years_Since_Enrollment";
pub const RESPONSE: &str = "Response";
pub const COMPLAIN: &str = "Complain";

/// Spending columns offered by the product selector.
pub const PRODUCT_COLUMNS: [&str; 6] = [
    "MntWines",
    "MntFruits",
    "MntMeatProducts",
    "MntFishProducts",
    "MntSweetProducts",
    "MntGoldProds",
];

/// Purchase-count columns offered by the channel selector.
pub const PURCHASE_CHANNELS: [&str; 4] = [
    "NumDealsPurchases",
    "NumWebPurchases",
    "NumCatalogPurchases",
    "NumStorePurchases",
];

/// One-time preparation of a freshly loaded table, before any filtering:
/// coerce `Years_Since_Enrollment` to numeric. Returns the number of cells
/// that could not be parsed and became missing.
pub fn prepare(table: &mut CustomerTable) -> DashboardResult<usize> {
    let coerced = table.coerce_numeric(YEARS_SINCE_ENROLLMENT)?;
    if coerced > 0 {
        log::warn!("{coerced} '{YEARS_SINCE_ENROLLMENT}' values are not numeric; treated as missing");
    }
    Ok(coerced)
}

// ---------------------------------------------------------------------------
// Widget values
// ---------------------------------------------------------------------------

/// Current value of every input widget. This is the only state that
/// survives between runs.
#[derive(Debug, Clone)]
pub struct Selections {
    pub education: CategorySelection,
    pub age: Option<RangeSelection>,
    pub product: String,
    /// Selected channels in the order they were picked.
    pub channels: Vec<String>,
    pub income: Option<RangeSelection>,
    pub recency: Option<RangeSelection>,
    pub enrollment: Option<RangeSelection>,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            education: CategorySelection::new(),
            age: None,
            product: PRODUCT_COLUMNS[0].to_string(),
            channels: Vec::new(),
            income: None,
            recency: None,
            enrollment: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

/// Result of the average-spending panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SpendingPanel {
    /// `(spending amount, average spending)` per distinct amount.
    Bars(Vec<(f64, f64)>),
    /// The selected product column is not in the filtered data.
    MissingColumn(String),
}

/// Row counts of every filtered view, for the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewSizes {
    pub total: usize,
    pub education: usize,
    pub age: usize,
    pub income: usize,
    pub segment: usize,
    pub enrollment: usize,
}

/// Everything the panels render for one run.
#[derive(Debug, Clone)]
pub struct DashboardFrame {
    pub education_options: Vec<CellValue>,
    pub education_counts: Vec<(CellValue, usize)>,
    pub marital_counts: Vec<(CellValue, usize)>,
    /// Effective slider values; `None` when the column has no numeric
    /// value in the view the slider is built from.
    pub age: Option<RangeSelection>,
    pub spending: SpendingPanel,
    pub purchase_means: Vec<(String, Option<f64>)>,
    pub income: Option<RangeSelection>,
    pub recency: Option<RangeSelection>,
    /// `[income, recency]` per customer in the segment view.
    pub segment_points: Vec<[f64; 2]>,
    pub enrollment: Option<RangeSelection>,
    pub response_hist: Histogram,
    pub complaint_hist: Histogram,
    /// Rows of the education view, for the data preview.
    pub education_rows: Vec<usize>,
    pub sizes: ViewSizes,
}

// ---------------------------------------------------------------------------
// The filter chain
// ---------------------------------------------------------------------------

/// Run the whole filter chain and compute every panel.
///
/// Order is fixed: education, age, product / channels, income, recency,
/// enrollment. The age view feeds the spending and channel panels, the
/// income view feeds the recency filter and the scatter plot, and the
/// enrollment filter starts again from the education view. Slider values in
/// `selections` are reconciled with the limits of this run.
pub fn run(table: &CustomerTable, selections: &mut Selections) -> DashboardResult<DashboardFrame> {
    let all = table.view();
    let education_options = table.distinct_values(EDUCATION)?;

    // -- Customer demographics --
    let education_view = filter_by_category(&all, EDUCATION, &selections.education)?;
    let education_counts = value_counts(&education_view, EDUCATION)?;
    let marital_counts = value_counts(&education_view, MARITAL_STATUS)?;

    let (age_view, age) = range_step(&education_view, CUSTOMER_AGE, &mut selections.age)?;

    // -- Spending patterns --
    let spending = spending_panel(&age_view, &selections.product)?;
    let purchase_means = column_means(&age_view, &selections.channels)?;

    // -- Customer segmentation --
    let (income_view, income) = range_step(&education_view, INCOME, &mut selections.income)?;
    let (segment_view, recency) = range_step(&income_view, RECENCY, &mut selections.recency)?;
    let segment_points = paired_points(&segment_view, INCOME, RECENCY)?;

    // -- Responses and complaints --
    let (enrollment_view, enrollment) = range_step(
        &education_view,
        YEARS_SINCE_ENROLLMENT,
        &mut selections.enrollment,
    )?;
    let response_hist = histogram(&enrollment_view.numeric_values(RESPONSE)?);
    let complaint_hist = histogram(&enrollment_view.numeric_values(COMPLAIN)?);

    let sizes = ViewSizes {
        total: table.len(),
        education: education_view.len(),
        age: age_view.len(),
        income: income_view.len(),
        segment: segment_view.len(),
        enrollment: enrollment_view.len(),
    };
    log::debug!("pipeline run: {sizes:?}");

    Ok(DashboardFrame {
        education_options,
        education_counts,
        marital_counts,
        age,
        spending,
        purchase_means,
        income,
        recency,
        segment_points,
        enrollment,
        response_hist,
        complaint_hist,
        education_rows: education_view.rows().to_vec(),
        sizes,
    })
}

/// Build the slider for `column` from `view` and apply it.
fn range_step<'a>(
    view: &TableView<'a>,
    column: &str,
    slot: &mut Option<RangeSelection>,
) -> DashboardResult<(TableView<'a>, Option<RangeSelection>)> {
    match column_bounds(view, column)? {
        Some(bounds) => {
            let selection = RangeSelection::resolve(slot, bounds);
            let filtered = filter_by_range(view, column, &selection.as_range())?;
            Ok((filtered, Some(selection)))
        }
        None => {
            log::debug!("no numeric '{column}' values in view; range filter yields no rows");
            Ok((view.empty(), None))
        }
    }
}

fn spending_panel(view: &TableView<'_>, product: &str) -> DashboardResult<SpendingPanel> {
    if !view.has_column(product) {
        return Ok(SpendingPanel::MissingColumn(product.to_string()));
    }
    let bars = grouped_mean(view, product, product)?
        .into_iter()
        .filter_map(|(key, mean)| Some((key.as_f64()?, mean?)))
        .collect();
    Ok(SpendingPanel::Bars(bars))
}

/// `[x, y]` for rows where both columns are numeric.
fn paired_points(view: &TableView<'_>, x: &str, y: &str) -> DashboardResult<Vec<[f64; 2]>> {
    let xs = view.values(x)?;
    let ys = view.values(y)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .filter_map(|(a, b)| Some([a.as_f64()?, b.as_f64()?]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table;

    /// Five customers with every column the dashboard reads.
    fn customers() -> CustomerTable {
        let mut t = table(&[
            ("Education", &["PhD", "PhD", "Basic", "Master", "PhD"]),
            ("Marital_Status", &["Single", "Married", "Single", "Together", "Single"]),
            ("Customer_Age", &["30", "45", "60", "38", "52"]),
            ("Income", &["40000", "80000", "", "55000", "61000"]),
            ("Recency", &["10", "50", "20", "90", "70"]),
            ("Years_Since_Enrollment", &["9", "10", "11", "oops", "10"]),
            ("MntWines", &["100", "300", "100", "50", "300"]),
            ("MntFruits", &["1", "2", "3", "4", "5"]),
            ("MntMeatProducts", &["1", "2", "3", "4", "5"]),
            ("MntFishProducts", &["1", "2", "3", "4", "5"]),
            ("MntSweetProducts", &["1", "2", "3", "4", "5"]),
            ("MntGoldProds", &["1", "2", "3", "4", "5"]),
            ("NumDealsPurchases", &["1", "3", "5", "7", "9"]),
            ("NumWebPurchases", &["2", "2", "2", "2", "2"]),
            ("NumCatalogPurchases", &["0", "1", "0", "1", "0"]),
            ("NumStorePurchases", &["4", "6", "8", "10", "12"]),
            ("Response", &["0", "1", "0", "0", "1"]),
            ("Complain", &["0", "0", "1", "0", "0"]),
        ]);
        prepare(&mut t).unwrap();
        t
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.into())
    }

    #[test]
    fn prepare_coerces_enrollment_years() {
        let mut t = table(&[("Years_Since_Enrollment", &["9", "oops"])]);
        assert_eq!(prepare(&mut t).unwrap(), 1);
        assert_eq!(
            t.column(YEARS_SINCE_ENROLLMENT).unwrap().values,
            vec![CellValue::Integer(9), CellValue::Null]
        );
    }

    #[test]
    fn default_run_uses_full_ranges() {
        let t = customers();
        let mut sel = Selections::default();
        let frame = run(&t, &mut sel).unwrap();

        assert_eq!(frame.sizes.education, 5);
        assert_eq!(frame.sizes.age, 5);
        // Row 2 has no income.
        assert_eq!(frame.sizes.income, 4);
        assert_eq!(frame.sizes.segment, 4);
        // Row 3 has a non-numeric enrollment value.
        assert_eq!(frame.sizes.enrollment, 4);
        assert_eq!(
            frame.education_counts,
            vec![(s("PhD"), 3), (s("Basic"), 1), (s("Master"), 1)]
        );
        assert_eq!(sel.age.map(|a| a.as_range()), Some(30.0..=60.0));
    }

    #[test]
    fn education_selection_narrows_every_panel() {
        let t = customers();
        let mut sel = Selections {
            education: [s("PhD")].into_iter().collect(),
            ..Default::default()
        };
        let frame = run(&t, &mut sel).unwrap();

        assert_eq!(frame.education_counts, vec![(s("PhD"), 3)]);
        assert_eq!(frame.marital_counts, vec![(s("Single"), 2), (s("Married"), 1)]);
        assert_eq!(frame.sizes.enrollment, 3);
        assert_eq!(frame.education_rows, vec![0, 1, 4]);
        // Options always come from the whole table, in file order.
        assert_eq!(frame.education_options, vec![s("PhD"), s("Basic"), s("Master")]);
    }

    #[test]
    fn age_filter_feeds_spending_and_channels_only() {
        let t = customers();
        let mut sel = Selections::default();
        run(&t, &mut sel).unwrap();

        let mut age = sel.age.unwrap();
        age.set(30.0, 40.0);
        sel.age = Some(age);
        sel.channels = vec!["NumStorePurchases".into(), "NumDealsPurchases".into()];

        let frame = run(&t, &mut sel).unwrap();
        assert_eq!(frame.sizes.age, 2);
        assert_eq!(
            frame.purchase_means,
            vec![
                ("NumStorePurchases".to_string(), Some(7.0)),
                ("NumDealsPurchases".to_string(), Some(4.0)),
            ]
        );
        assert_eq!(frame.spending, SpendingPanel::Bars(vec![(50.0, 50.0), (100.0, 100.0)]));
        // Segmentation and enrollment views ignore the age slider.
        assert_eq!(frame.sizes.segment, 4);
        assert_eq!(frame.sizes.enrollment, 4);
    }

    #[test]
    fn no_channels_gives_empty_line() {
        let t = customers();
        let frame = run(&t, &mut Selections::default()).unwrap();
        assert!(frame.purchase_means.is_empty());
    }

    #[test]
    fn missing_product_column_reports_warning() {
        let t = customers();
        let mut sel = Selections {
            product: "MntToys".into(),
            ..Default::default()
        };
        let frame = run(&t, &mut sel).unwrap();
        assert_eq!(frame.spending, SpendingPanel::MissingColumn("MntToys".into()));
    }

    #[test]
    fn recency_limits_follow_income_view() {
        let t = customers();
        let mut sel = Selections::default();
        let frame = run(&t, &mut sel).unwrap();
        // Row 2 (recency 20) has no income, so it never reaches the slider.
        assert_eq!(frame.recency.map(|r| r.as_range()), Some(10.0..=90.0));

        let mut income = sel.income.unwrap();
        income.set(50000.0, 90000.0);
        sel.income = Some(income);
        let mut recency = sel.recency.unwrap();
        recency.set(60.0, 90.0);
        sel.recency = Some(recency);

        let frame = run(&t, &mut sel).unwrap();
        // New recency limits reset the recency slider to its full range.
        assert_eq!(frame.recency.map(|r| r.as_range()), Some(50.0..=90.0));
        assert_eq!(
            frame.segment_points,
            vec![[80000.0, 50.0], [55000.0, 90.0], [61000.0, 70.0]]
        );
    }

    #[test]
    fn enrollment_range_excluding_everything_yields_empty_histograms() {
        let t = customers();
        let mut sel = Selections::default();
        run(&t, &mut sel).unwrap();

        let mut enrollment = sel.enrollment.unwrap();
        enrollment.set(9.2, 9.8);
        sel.enrollment = Some(enrollment);

        let frame = run(&t, &mut sel).unwrap();
        assert_eq!(frame.sizes.enrollment, 0);
        assert_eq!(frame.response_hist.total(), 0);
        assert_eq!(frame.complaint_hist.total(), 0);
    }

    #[test]
    fn missing_required_column_fails_the_run() {
        let t = table(&[("Education", &["PhD"])]);
        assert!(run(&t, &mut Selections::default()).is_err());
    }
}
