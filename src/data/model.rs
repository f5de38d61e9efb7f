use std::collections::BTreeSet;
use std::fmt;

use crate::error::{DashboardError, DashboardResult};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the customer table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream, so it must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Missing-value marker.
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

// Equality agrees with `Ord` and `Hash`: floats compare by `total_cmp`.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Infer the type of a raw text cell.
    ///
    /// Empty text and `NaN` become [`CellValue::Null`]; integers are tried
    /// before floats so `"42"` stays an `Integer`.
    pub fn from_text(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_nan() {
                return CellValue::Null;
            }
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Numeric interpretation of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Convert to a numeric value, mapping anything unparseable to `Null`.
    fn to_numeric(&self) -> CellValue {
        match self {
            CellValue::Integer(_) | CellValue::Null => self.clone(),
            CellValue::Float(f) if f.is_nan() => CellValue::Null,
            CellValue::Float(_) => self.clone(),
            CellValue::Bool(b) => CellValue::Integer(i64::from(*b)),
            CellValue::String(s) => match CellValue::from_text(s.trim()) {
                v @ (CellValue::Integer(_) | CellValue::Float(_)) => v,
                _ => CellValue::Null,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Column / CustomerTable – the loaded dataset
// ---------------------------------------------------------------------------

/// One named column of the customer table.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

/// The full customer record table, one row per customer.
#[derive(Debug, Clone, Default)]
pub struct CustomerTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl CustomerTable {
    /// Build a table from columns, which must all have the same length.
    pub fn from_columns(columns: Vec<Column>) -> DashboardResult<Self> {
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(DashboardError::RaggedColumn {
                column: bad.name.clone(),
                expected: n_rows,
                found: bad.values.len(),
            });
        }
        Ok(CustomerTable { columns, n_rows })
    }

    /// Number of rows (customers).
    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> DashboardResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
    }

    fn column_mut(&mut self, name: &str) -> DashboardResult<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
    }

    /// Sorted set of distinct non-missing values in a column.
    pub fn unique_values(&self, name: &str) -> DashboardResult<BTreeSet<CellValue>> {
        Ok(self
            .column(name)?
            .values
            .iter()
            .filter(|v| !v.is_null())
            .cloned()
            .collect())
    }

    /// Distinct non-missing values of a column in order of first appearance.
    pub fn distinct_values(&self, name: &str) -> DashboardResult<Vec<CellValue>> {
        let mut seen = BTreeSet::new();
        Ok(self
            .column(name)?
            .values
            .iter()
            .filter(|v| !v.is_null() && seen.insert(*v))
            .cloned()
            .collect())
    }

    /// Coerce a column to numeric in place.
    ///
    /// Unparseable cells become `Null`; the column as a whole never fails.
    /// Returns how many non-missing cells were turned into `Null`.
    pub fn coerce_numeric(&mut self, name: &str) -> DashboardResult<usize> {
        let column = self.column_mut(name)?;
        let mut coerced = 0;
        for value in column.values.iter_mut() {
            let numeric = value.to_numeric();
            if numeric.is_null() && !value.is_null() {
                coerced += 1;
            }
            *value = numeric;
        }
        Ok(coerced)
    }

    /// A view over every row.
    pub fn view(&self) -> TableView<'_> {
        TableView {
            table: self,
            rows: (0..self.n_rows).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// TableView – a filtered subset of rows
// ---------------------------------------------------------------------------

/// A filtered view: the table plus the indices of surviving rows, in
/// table order.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a CustomerTable,
    rows: Vec<usize>,
}

impl<'a> TableView<'a> {
    /// Indices into the underlying table.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    /// A view over the same table with no rows.
    pub fn empty(&self) -> TableView<'a> {
        TableView {
            table: self.table,
            rows: Vec::new(),
        }
    }

    /// Values of `name` for the rows in this view.
    pub fn values(&self, name: &str) -> DashboardResult<Vec<&'a CellValue>> {
        let column = self.table.column(name)?;
        Ok(self.rows.iter().map(|&i| &column.values[i]).collect())
    }

    /// Numeric, non-missing values of `name` for the rows in this view.
    pub fn numeric_values(&self, name: &str) -> DashboardResult<Vec<f64>> {
        Ok(self
            .values(name)?
            .into_iter()
            .filter_map(CellValue::as_f64)
            .collect())
    }

    /// Keep the rows whose value in `name` satisfies `pred`.
    pub fn retain_by<F>(&self, name: &str, pred: F) -> DashboardResult<TableView<'a>>
    where
        F: Fn(&CellValue) -> bool,
    {
        let column = self.table.column(name)?;
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| pred(&column.values[i]))
            .collect();
        Ok(TableView {
            table: self.table,
            rows,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a table from `(name, raw cells)` pairs using load-time inference.
    pub(crate) fn table(cols: &[(&str, &[&str])]) -> CustomerTable {
        let columns = cols
            .iter()
            .map(|(name, cells)| Column {
                name: name.to_string(),
                values: cells.iter().map(|c| CellValue::from_text(c)).collect(),
            })
            .collect();
        CustomerTable::from_columns(columns).unwrap()
    }

    #[test]
    fn infers_cell_types() {
        assert_eq!(CellValue::from_text(""), CellValue::Null);
        assert_eq!(CellValue::from_text("42"), CellValue::Integer(42));
        assert_eq!(CellValue::from_text("58138.5"), CellValue::Float(58138.5));
        assert_eq!(CellValue::from_text("NaN"), CellValue::Null);
        assert_eq!(CellValue::from_text("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::from_text("Graduation"),
            CellValue::String("Graduation".into())
        );
    }

    #[test]
    fn ordering_groups_by_type_then_value() {
        let mut values = vec![
            CellValue::String("b".into()),
            CellValue::Float(1.5),
            CellValue::Null,
            CellValue::Integer(3),
            CellValue::String("a".into()),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Integer(3),
                CellValue::Float(1.5),
                CellValue::String("a".into()),
                CellValue::String("b".into()),
            ]
        );
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = CustomerTable::from_columns(vec![
            Column {
                name: "a".into(),
                values: vec![CellValue::Integer(1), CellValue::Integer(2)],
            },
            Column {
                name: "b".into(),
                values: vec![CellValue::Integer(1)],
            },
        ])
        .unwrap_err();
        assert!(matches!(err, DashboardError::RaggedColumn { found: 1, .. }));
    }

    #[test]
    fn missing_column_is_an_error() {
        let t = table(&[("Education", &["PhD"])]);
        let err = t.view().values("Income").unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(c) if c == "Income"));
    }

    #[test]
    fn coercion_nulls_only_bad_cells() {
        let mut t = table(&[("Years_Since_Enrollment", &["10", "unknown", "9.5", ""])]);
        let coerced = t.coerce_numeric("Years_Since_Enrollment").unwrap();
        assert_eq!(coerced, 1);
        let values = &t.column("Years_Since_Enrollment").unwrap().values;
        assert_eq!(
            values,
            &vec![
                CellValue::Integer(10),
                CellValue::Null,
                CellValue::Float(9.5),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn coercion_parses_padded_numeric_strings() {
        let mut t = CustomerTable::from_columns(vec![Column {
            name: "x".into(),
            values: vec![CellValue::String(" 7 ".into()), CellValue::Bool(true)],
        }])
        .unwrap();
        assert_eq!(t.coerce_numeric("x").unwrap(), 0);
        assert_eq!(
            t.column("x").unwrap().values,
            vec![CellValue::Integer(7), CellValue::Integer(1)]
        );
    }

    #[test]
    fn unique_values_skip_missing() {
        let t = table(&[("Education", &["PhD", "", "Basic", "PhD"])]);
        let uniq: Vec<_> = t.unique_values("Education").unwrap().into_iter().collect();
        assert_eq!(
            uniq,
            vec![CellValue::String("Basic".into()), CellValue::String("PhD".into())]
        );
    }

    #[test]
    fn distinct_values_keep_first_appearance() {
        let t = table(&[("Education", &["PhD", "", "Basic", "PhD", "Master"])]);
        assert_eq!(
            t.distinct_values("Education").unwrap(),
            vec![
                CellValue::String("PhD".into()),
                CellValue::String("Basic".into()),
                CellValue::String("Master".into()),
            ]
        );
    }

    #[test]
    fn signed_zeros_are_distinct_keys() {
        use std::collections::HashSet;

        let pos = CellValue::Float(0.0);
        let neg = CellValue::Float(-0.0);
        assert_ne!(pos, neg);
        assert_ne!(pos.cmp(&neg), std::cmp::Ordering::Equal);

        let keys: HashSet<CellValue> = [pos.clone(), neg, pos].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn retain_keeps_table_order() {
        let t = table(&[("n", &["5", "1", "4", "2"])]);
        let view = t
            .view()
            .retain_by("n", |v| v.as_f64().is_some_and(|x| x > 1.5))
            .unwrap();
        assert_eq!(view.rows(), &[0, 2, 3]);
        assert_eq!(view.numeric_values("n").unwrap(), vec![5.0, 4.0, 2.0]);
        assert!(view.empty().is_empty());
    }
}
