use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;

use super::model::{round_value, ResultsTable};

// ---------------------------------------------------------------------------
// RangeError – bad arguments to a filter call
// ---------------------------------------------------------------------------

/// A rejected filter call. The parameter's previous active range is kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("'{0}' is not a parameter column")]
    UnknownParameter(String),

    #[error("{value} is not an observed value of '{parameter}'")]
    NotInDomain { parameter: String, value: f64 },
}

/// Callback invoked after a parameter's active range changes, with the new
/// effective `(low, high)` bounds.
pub type RangeObserver = Box<dyn FnMut(&str, (f64, f64))>;

// ---------------------------------------------------------------------------
// Per-parameter state
// ---------------------------------------------------------------------------

struct AxisState {
    /// Column index in the table.
    column: usize,
    /// Ascending distinct observed values.
    domain: Vec<f64>,
    /// Inclusive active range, as indices into `domain`.
    low: usize,
    high: usize,
    /// Rows whose value falls inside the active range.
    rows: BTreeSet<usize>,
}

impl AxisState {
    fn recompute_rows(&mut self, table: &ResultsTable) {
        let low = self.domain[self.low];
        let high = self.domain[self.high];
        self.rows = (0..table.len())
            .filter(|&r| {
                let v = table.value(r, self.column);
                v >= low && v <= high
            })
            .collect();
    }

    fn active_range(&self) -> (f64, f64) {
        (self.domain[self.low], self.domain[self.high])
    }
}

// ---------------------------------------------------------------------------
// SelectionFilter – conjunction of per-parameter discrete ranges
// ---------------------------------------------------------------------------

/// Per-parameter range filters over an immutable results table.
///
/// Each parameter column carries the ascending sequence of its distinct
/// observed values (its domain) and an inclusive sub-range of that sequence.
/// A row is selected iff every parameter's value lies inside that parameter's
/// active range. The selection is a pure function of the static table and the
/// current ranges, so re-deriving it after any sequence of `set_range` calls
/// yields the same set.
pub struct SelectionFilter {
    table: Arc<ResultsTable>,
    axes: BTreeMap<String, AxisState>,
    observers: Vec<RangeObserver>,
}

impl SelectionFilter {
    /// Build a filter over the table's parameter columns, every range at its
    /// full domain (all rows selected).
    pub fn new(table: Arc<ResultsTable>) -> Self {
        // Parameter columns come first in the table, so the declaration
        // index is the column index.
        let axes = table
            .parameter_names()
            .iter()
            .enumerate()
            .map(|(column, name)| {
                let mut domain: Vec<f64> =
                    (0..table.len()).map(|r| table.value(r, column)).collect();
                domain.sort_by(f64::total_cmp);
                domain.dedup();

                let high = domain.len().saturating_sub(1);
                let axis = AxisState {
                    column,
                    domain,
                    low: 0,
                    high,
                    rows: (0..table.len()).collect(),
                };
                (name.clone(), axis)
            })
            .collect();

        SelectionFilter {
            table,
            axes,
            observers: Vec::new(),
        }
    }

    /// Parameter names this filter knows about.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(String::as_str)
    }

    /// Ascending distinct observed values of one parameter.
    pub fn domain(&self, parameter: &str) -> Option<&[f64]> {
        self.axes.get(parameter).map(|a| a.domain.as_slice())
    }

    /// Current inclusive `(low, high)` bounds of one parameter.
    pub fn active_range(&self, parameter: &str) -> Option<(f64, f64)> {
        self.axes.get(parameter).map(AxisState::active_range)
    }

    /// Subscribe to range changes. Every successful `set_range` (and reset)
    /// reports the parameter name and its new effective bounds.
    pub fn observe_ranges(&mut self, observer: impl FnMut(&str, (f64, f64)) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace one parameter's active range with the closed domain slice
    /// between `lower` and `upper` (both must be domain members; order does
    /// not matter). Returns the effective `(low, high)` bounds. On error the
    /// previous range is untouched.
    pub fn set_range(
        &mut self,
        parameter: &str,
        lower: f64,
        upper: f64,
    ) -> Result<(f64, f64), RangeError> {
        let axis = self
            .axes
            .get_mut(parameter)
            .ok_or_else(|| RangeError::UnknownParameter(parameter.to_string()))?;

        let lower_idx = domain_index(&axis.domain, parameter, lower)?;
        let upper_idx = domain_index(&axis.domain, parameter, upper)?;

        // The slider cursors can cross; the range always spans the smaller
        // to the larger domain entry.
        (axis.low, axis.high) = if lower_idx <= upper_idx {
            (lower_idx, upper_idx)
        } else {
            (upper_idx, lower_idx)
        };
        axis.recompute_rows(&self.table);

        let range = axis.active_range();
        log::debug!(
            "Range for '{parameter}' set to [{}, {}], {} rows match",
            range.0,
            range.1,
            axis.rows.len()
        );
        for observer in &mut self.observers {
            observer(parameter, range);
        }
        Ok(range)
    }

    /// Widen one parameter's range back to its full domain.
    pub fn reset(&mut self, parameter: &str) -> Result<(f64, f64), RangeError> {
        let (low, high) = {
            let axis = self
                .axes
                .get(parameter)
                .ok_or_else(|| RangeError::UnknownParameter(parameter.to_string()))?;
            (axis.domain[0], axis.domain[axis.domain.len() - 1])
        };
        self.set_range(parameter, low, high)
    }

    /// Widen every parameter's range back to its full domain.
    pub fn reset_all(&mut self) {
        let parameters: Vec<String> = self.axes.keys().cloned().collect();
        for parameter in parameters {
            // Axes can't disappear, so reset never fails here.
            let _ = self.reset(&parameter);
        }
    }

    /// Rows satisfying every parameter's active range simultaneously.
    /// An empty result is a legitimate state (mutually exclusive ranges),
    /// not an error.
    pub fn selected_rows(&self) -> BTreeSet<usize> {
        let mut selected: BTreeSet<usize> = (0..self.table.len()).collect();
        for axis in self.axes.values() {
            selected = selected.intersection(&axis.rows).copied().collect();
        }
        selected
    }

    /// Domain member with the minimum absolute distance to `probe`; on ties
    /// the lower (earlier) domain entry wins. A probe that already is a
    /// member comes back unchanged.
    pub fn snap_to_domain(&self, parameter: &str, probe: f64) -> Result<f64, RangeError> {
        let axis = self
            .axes
            .get(parameter)
            .ok_or_else(|| RangeError::UnknownParameter(parameter.to_string()))?;

        let mut best = axis.domain[0];
        for &candidate in &axis.domain[1..] {
            if (candidate - probe).abs() < (best - probe).abs() {
                best = candidate;
            }
        }
        Ok(best)
    }
}

fn domain_index(domain: &[f64], parameter: &str, value: f64) -> Result<usize, RangeError> {
    let value = round_value(value);
    domain
        .iter()
        .position(|&d| d == value)
        .ok_or_else(|| RangeError::NotInDomain {
            parameter: parameter.to_string(),
            value,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
