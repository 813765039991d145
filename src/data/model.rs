use std::fmt;

use serde::Serialize;

/// Decimal places every cell is rounded to at load time, so that later
/// exact-match filtering is not defeated by floating-point noise.
pub const VALUE_DECIMALS: u32 = 8;

/// Round a value to [`VALUE_DECIMALS`] places.
pub fn round_value(v: f64) -> f64 {
    let scale = 10f64.powi(VALUE_DECIMALS as i32);
    (v * scale).round() / scale
}

// ---------------------------------------------------------------------------
// Dimensions – table shape after vector expansion
// ---------------------------------------------------------------------------

/// Shape of a loaded table: row count plus the expanded column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    /// Number of evaluations (rows).
    pub rows: usize,
    /// Number of scalar parameter columns after expansion.
    pub parameters: usize,
    /// Number of scalar objective columns after expansion.
    pub objectives: usize,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows × ({} parameters + {} objectives)",
            self.rows, self.parameters, self.objectives
        )
    }
}

// ---------------------------------------------------------------------------
// ArrayField – registry entry for an expanded vector field
// ---------------------------------------------------------------------------

/// A declared field whose raw cells packed several comma-separated components.
/// After expansion the original name survives only here, mapping the logical
/// axis label back to the scalar columns generated from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayField {
    /// Original declared name, e.g. `"position m"`.
    pub label: String,
    /// Generated scalar column names, in component order,
    /// e.g. `["position1 m", "position2 m", "position3 m"]`.
    pub columns: Vec<String>,
}

// ---------------------------------------------------------------------------
// ResultsTable – the complete normalized dataset
// ---------------------------------------------------------------------------

/// The normalized results table: one row per evaluation, all cells scalar,
/// parameters first (in declared order with expansions applied in place),
/// then objectives. Built once by the loader and read-only afterwards; row
/// index is the evaluation's identity and never changes.
#[derive(Debug, Clone)]
pub struct ResultsTable {
    rows: Vec<Vec<f64>>,
    parameter_names: Vec<String>,
    objective_names: Vec<String>,
    array_fields: Vec<ArrayField>,
}

impl ResultsTable {
    pub(crate) fn new(
        rows: Vec<Vec<f64>>,
        parameter_names: Vec<String>,
        objective_names: Vec<String>,
        array_fields: Vec<ArrayField>,
    ) -> Self {
        debug_assert!(rows
            .iter()
            .all(|r| r.len() == parameter_names.len() + objective_names.len()));
        ResultsTable {
            rows,
            parameter_names,
            objective_names,
            array_fields,
        }
    }

    /// Number of evaluations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no evaluations.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            rows: self.rows.len(),
            parameters: self.parameter_names.len(),
            objectives: self.objective_names.len(),
        }
    }

    /// Expanded parameter column names, in column order.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Expanded objective column names, in column order.
    pub fn objective_names(&self) -> &[String] {
        &self.objective_names
    }

    /// Vector fields that were expanded at load time, for grouped axis pickers.
    pub fn array_fields(&self) -> &[ArrayField] {
        &self.array_fields
    }

    /// All column names, parameters then objectives.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.parameter_names
            .iter()
            .chain(self.objective_names.iter())
            .map(String::as_str)
    }

    /// Index of a column by name, across parameters and objectives.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names().position(|n| n == name)
    }

    /// One evaluation's cells, parameters then objectives.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell value at (row, column).
    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.rows[row][column]
    }

    /// All values of one named column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[col]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_value_clips_noise_at_eight_places() {
        assert_eq!(round_value(0.123456789), 0.12345679);
        assert_eq!(round_value(1.000000004), 1.0);
        assert_eq!(round_value(-2.5e-9), -0.0);
        assert_eq!(round_value(42.0), 42.0);
    }

    #[test]
    fn column_lookup_spans_parameters_and_objectives() {
        let table = ResultsTable::new(
            vec![vec![1.0, 2.0, 3.0]],
            vec!["a u".into(), "b u".into()],
            vec!["score pts".into()],
            vec![],
        );
        assert_eq!(table.column_index("a u"), Some(0));
        assert_eq!(table.column_index("score pts"), Some(2));
        assert_eq!(table.column_index("missing"), None);
        assert_eq!(table.column("score pts"), Some(vec![3.0]));
        assert_eq!(
            table.dimensions(),
            Dimensions {
                rows: 1,
                parameters: 2,
                objectives: 1
            }
        );
    }
}
