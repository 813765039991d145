use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::{round_value, ArrayField, ResultsTable};

// ---------------------------------------------------------------------------
// FormatError – anything that makes the results file unusable
// ---------------------------------------------------------------------------

/// Fatal parse errors. The load aborts on the first one; no partial table
/// is ever returned.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("results file is empty")]
    MissingHeader,

    #[error("header must have exactly 2 '|'-delimited segments, found {segments}")]
    Header { segments: usize },

    #[error("no data rows after the header")]
    EmptyBody,

    #[error("row {row}: {cells} cells, but {expected} columns are declared")]
    ShortRow {
        row: usize,
        cells: usize,
        expected: usize,
    },

    #[error("row {row}, column '{column}': '{value}' is not numeric")]
    NonNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}, column '{column}': {found} vector components, expected {expected}")]
    ComponentCount {
        row: usize,
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("vector field '{name}' must be named '<base> <unit>' (exactly one space)")]
    FieldName { name: String },

    #[error("malformed table body")]
    Body(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a results file from disk. See [`parse_results`] for the format.
pub fn load_results(path: &Path) -> Result<ResultsTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading results file {}", path.display()))?;
    let table = parse_results(&text)
        .with_context(|| format!("parsing results file {}", path.display()))?;
    log::info!(
        "Loaded {} from {}",
        table.dimensions(),
        path.display()
    );
    Ok(table)
}

/// Parse results text into a normalized [`ResultsTable`].
///
/// Format: the first line is a metadata header of two `|`-delimited segments,
/// each a `;`-separated list of `"<base> <unit>"` column names (parameters,
/// then objectives). Every following line is one evaluation whose cells are
/// separated by `;` or `|` and align positionally with the declared names.
/// A cell of a vector field packs its components with `,`
/// (e.g. `"1.2,3.4,5.6"`); such fields are expanded in place into
/// `"<base>1 <unit>" .. "<base>N <unit>"` scalar columns, with N taken from
/// the first row and enforced on every other row.
pub fn parse_results(text: &str) -> Result<ResultsTable, FormatError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or(FormatError::MissingHeader)?;

    let segments: Vec<&str> = header.split('|').collect();
    if segments.len() != 2 {
        return Err(FormatError::Header {
            segments: segments.len(),
        });
    }
    let parameter_names: Vec<String> = split_names(segments[0]);
    let objective_names: Vec<String> = split_names(segments[1]);
    let declared = parameter_names.len() + objective_names.len();

    let cells = read_body(lines, declared)?;
    if cells.is_empty() {
        return Err(FormatError::EmptyBody);
    }

    expand_columns(cells, parameter_names, objective_names)
}

fn split_names(segment: &str) -> Vec<String> {
    segment.split(';').map(|n| n.trim().to_string()).collect()
}

/// Read the body rows, treating `;` and `|` interchangeably as column
/// delimiters. Cells beyond the declared names are dropped; the framework
/// writing these files sometimes appends trailing bookkeeping columns
/// nothing names.
fn read_body<'a>(
    lines: impl Iterator<Item = &'a str>,
    declared: usize,
) -> Result<Vec<Vec<String>>, FormatError> {
    let body: String = lines.collect::<Vec<_>>().join("\n").replace('|', ";");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < declared {
            return Err(FormatError::ShortRow {
                row,
                cells: record.len(),
                expected: declared,
            });
        }
        rows.push(record.iter().take(declared).map(str::to_string).collect());
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Column classification and vector expansion
// ---------------------------------------------------------------------------

/// How a declared column stores its values, decided once from the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Scalar,
    /// Comma-packed vector with this many components.
    Vector(usize),
}

fn classify(cells: &[Vec<String>], column: usize, name: &str) -> Result<ColumnKind, FormatError> {
    let sample = &cells[0][column];
    if sample.parse::<f64>().is_ok() {
        return Ok(ColumnKind::Scalar);
    }
    let components = sample.split(',').count();
    if sample.split(',').all(|c| c.trim().parse::<f64>().is_ok()) {
        Ok(ColumnKind::Vector(components))
    } else {
        Err(FormatError::NonNumeric {
            row: 0,
            column: name.to_string(),
            value: sample.clone(),
        })
    }
}

/// Expand vector columns in place and produce the final row-major table.
fn expand_columns(
    cells: Vec<Vec<String>>,
    parameter_names: Vec<String>,
    objective_names: Vec<String>,
) -> Result<ResultsTable, FormatError> {
    let n_params = parameter_names.len();
    let declared: Vec<String> = parameter_names
        .into_iter()
        .chain(objective_names)
        .collect();

    // Columns of the expanded table, in final order.
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(declared.len());
    let mut final_params: Vec<String> = Vec::new();
    let mut final_objectives: Vec<String> = Vec::new();
    let mut array_fields: Vec<ArrayField> = Vec::new();

    for (col, name) in declared.iter().enumerate() {
        let names_out = if col < n_params {
            &mut final_params
        } else {
            &mut final_objectives
        };

        match classify(&cells, col, name)? {
            ColumnKind::Scalar => {
                let mut values = Vec::with_capacity(cells.len());
                for (row, cells_row) in cells.iter().enumerate() {
                    values.push(parse_cell(&cells_row[col], row, name)?);
                }
                columns.push(values);
                names_out.push(name.clone());
            }
            ColumnKind::Vector(width) => {
                let (base, unit) = split_base_unit(name)?;
                let mut components: Vec<Vec<f64>> =
                    vec![Vec::with_capacity(cells.len()); width];
                for (row, cells_row) in cells.iter().enumerate() {
                    let parts: Vec<&str> = cells_row[col].split(',').collect();
                    if parts.len() != width {
                        return Err(FormatError::ComponentCount {
                            row,
                            column: name.clone(),
                            expected: width,
                            found: parts.len(),
                        });
                    }
                    for (i, part) in parts.iter().enumerate() {
                        components[i].push(parse_cell(part, row, name)?);
                    }
                }

                let generated: Vec<String> = (1..=width)
                    .map(|i| format!("{base}{i} {unit}"))
                    .collect();
                columns.extend(components);
                names_out.extend(generated.iter().cloned());
                array_fields.push(ArrayField {
                    label: name.clone(),
                    columns: generated,
                });
            }
        }
    }

    // Transpose into row-major order.
    let n_rows = cells.len();
    let rows: Vec<Vec<f64>> = (0..n_rows)
        .map(|r| columns.iter().map(|c| c[r]).collect())
        .collect();

    Ok(ResultsTable::new(
        rows,
        final_params,
        final_objectives,
        array_fields,
    ))
}

fn parse_cell(cell: &str, row: usize, column: &str) -> Result<f64, FormatError> {
    cell.trim()
        .parse::<f64>()
        .map(round_value)
        .map_err(|_| FormatError::NonNumeric {
            row,
            column: column.to_string(),
            value: cell.trim().to_string(),
        })
}

/// Split a declared vector-field name into its base and unit tokens.
fn split_base_unit(name: &str) -> Result<(&str, &str), FormatError> {
    let mut tokens = name.split(' ');
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(base), Some(unit), None) if !base.is_empty() && !unit.is_empty() => {
            Ok((base, unit))
        }
        _ => Err(FormatError::FieldName {
            name: name.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
