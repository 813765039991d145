use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::data::filter::{RangeError, SelectionFilter};
use crate::data::model::ResultsTable;

// ---------------------------------------------------------------------------
// Launch seam
// ---------------------------------------------------------------------------

/// Launches the simulation run behind one table row. The row index is the
/// only thing the core hands over; executable paths and argument formatting
/// live entirely with the implementor.
pub trait SolutionLauncher {
    fn launch(&self, solution: usize) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Axis bindings
// ---------------------------------------------------------------------------

/// Plot axis a column can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
    Color,
}

#[derive(Debug, Clone)]
struct AxisBindings {
    x: String,
    y: String,
    z: String,
    color: String,
}

// ---------------------------------------------------------------------------
// Session – rendering-independent exploration state
// ---------------------------------------------------------------------------

/// One exploration session over a loaded table: the filter, the cached
/// selection, the current solution, and the plot-axis bindings. Constructed
/// explicitly and passed to whoever needs it; the table it wraps is shared
/// read-only.
pub struct Session {
    table: Arc<ResultsTable>,
    filter: SelectionFilter,
    selected: BTreeSet<usize>,
    current_solution: usize,
    axes: AxisBindings,
}

impl Session {
    pub fn new(table: Arc<ResultsTable>) -> Self {
        let filter = SelectionFilter::new(Arc::clone(&table));
        let selected = filter.selected_rows();

        // Default axes mirror column order: x on the first column, the rest
        // on the second (or first, for a single-column table).
        let first = table.column_names().next().unwrap_or_default().to_string();
        let second = table
            .column_names()
            .nth(1)
            .map(str::to_string)
            .unwrap_or_else(|| first.clone());
        let axes = AxisBindings {
            x: first,
            y: second.clone(),
            z: second.clone(),
            color: second,
        };

        Session {
            table,
            filter,
            selected,
            current_solution: 0,
            axes,
        }
    }

    pub fn table(&self) -> &Arc<ResultsTable> {
        &self.table
    }

    pub fn filter(&self) -> &SelectionFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut SelectionFilter {
        &mut self.filter
    }

    /// Narrow or widen one parameter's range and refresh the cached
    /// selection. A rejected call leaves both untouched.
    pub fn set_range(
        &mut self,
        parameter: &str,
        lower: f64,
        upper: f64,
    ) -> Result<(f64, f64), RangeError> {
        let range = self.filter.set_range(parameter, lower, upper)?;
        self.selected = self.filter.selected_rows();
        Ok(range)
    }

    /// Snap a free-text probe value onto a parameter's discrete domain.
    pub fn snap_to_domain(&self, parameter: &str, probe: f64) -> Result<f64, RangeError> {
        self.filter.snap_to_domain(parameter, probe)
    }

    /// Rows passing every active range.
    pub fn selected_rows(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Rows failing some active range, for the dimmed plot layer.
    pub fn deselected_rows(&self) -> Vec<usize> {
        (0..self.table.len())
            .filter(|i| !self.selected.contains(i))
            .collect()
    }

    /// Make a picked row the current solution.
    pub fn pick_solution(&mut self, row: usize) -> Result<()> {
        if row >= self.table.len() {
            bail!("row {row} is out of range (table has {} rows)", self.table.len());
        }
        self.current_solution = row;
        Ok(())
    }

    pub fn current_solution(&self) -> usize {
        self.current_solution
    }

    /// Cells of the current solution, parameters then objectives.
    pub fn current_solution_values(&self) -> &[f64] {
        // The index is validated on every pick and 0 is always valid:
        // the loader refuses empty tables.
        self.table.row(self.current_solution).unwrap_or(&[])
    }

    /// Bind a plot axis to a named column.
    pub fn set_axis(&mut self, axis: Axis, column: &str) -> Result<()> {
        if self.table.column_index(column).is_none() {
            bail!("unknown column '{column}'");
        }
        let slot = match axis {
            Axis::X => &mut self.axes.x,
            Axis::Y => &mut self.axes.y,
            Axis::Z => &mut self.axes.z,
            Axis::Color => &mut self.axes.color,
        };
        *slot = column.to_string();
        Ok(())
    }

    pub fn axis_column(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.axes.x,
            Axis::Y => &self.axes.y,
            Axis::Z => &self.axes.z,
            Axis::Color => &self.axes.color,
        }
    }

    /// Hand the current solution's row index to the launcher.
    pub fn launch_current(&self, launcher: &dyn SolutionLauncher) -> Result<()> {
        log::info!("Launching solution {}", self.current_solution);
        launcher.launch(self.current_solution)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::loader::parse_results;

    fn session() -> Session {
        let table = parse_results(
            "a u;b u|score pts\n1;10|0.1\n1;20|0.2\n2;10|0.3\n2;20|0.4\n",
        )
        .unwrap();
        Session::new(Arc::new(table))
    }

    #[test]
    fn defaults_follow_column_order() {
        let s = session();
        assert_eq!(s.axis_column(Axis::X), "a u");
        assert_eq!(s.axis_column(Axis::Y), "b u");
        assert_eq!(s.axis_column(Axis::Color), "b u");
        assert_eq!(s.selected_rows().len(), 4);
        assert!(s.deselected_rows().is_empty());
        assert_eq!(s.current_solution(), 0);
    }

    #[test]
    fn range_changes_refresh_the_cached_selection() {
        let mut s = session();
        s.set_range("b u", 20.0, 20.0).unwrap();
        assert_eq!(s.selected_rows().iter().copied().collect::<Vec<_>>(), [1, 3]);
        assert_eq!(s.deselected_rows(), [0, 2]);

        // A rejected call changes nothing.
        assert!(s.set_range("b u", 15.0, 20.0).is_err());
        assert_eq!(s.selected_rows().len(), 2);
    }

    #[test]
    fn picking_and_launching_use_the_row_index() {
        struct Recorder(Cell<Option<usize>>);
        impl SolutionLauncher for Recorder {
            fn launch(&self, solution: usize) -> Result<()> {
                self.0.set(Some(solution));
                Ok(())
            }
        }

        let mut s = session();
        s.pick_solution(3).unwrap();
        assert_eq!(s.current_solution_values(), &[2.0, 20.0, 0.4]);
        assert!(s.pick_solution(99).is_err());
        assert_eq!(s.current_solution(), 3);

        let recorder = Recorder(Cell::new(None));
        s.launch_current(&recorder).unwrap();
        assert_eq!(recorder.0.get(), Some(3));
    }

    #[test]
    fn axis_bindings_validate_the_column() {
        let mut s = session();
        s.set_axis(Axis::Y, "score pts").unwrap();
        assert_eq!(s.axis_column(Axis::Y), "score pts");
        assert!(s.set_axis(Axis::Z, "nope").is_err());
        assert_eq!(s.axis_column(Axis::Z), "b u");
    }
}
