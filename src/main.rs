use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};

use sweepview::{load_results, SelectionFilter};

fn main() -> Result<()> {
    env_logger::init();

    let mut json = false;
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument '{arg}'");
        }
    }
    let Some(path) = path else {
        bail!("usage: sweepview <results-file> [--json]");
    };

    let table = Arc::new(load_results(&path)?);
    let filter = SelectionFilter::new(Arc::clone(&table));
    let dims = table.dimensions();

    if json {
        let summary = serde_json::json!({
            "dimensions": dims,
            "parameters": table.parameter_names(),
            "objectives": table.objective_names(),
            "array_fields": table.array_fields(),
            "domains": filter
                .parameters()
                .map(|p| (p, filter.domain(p).unwrap_or_default()))
                .collect::<std::collections::BTreeMap<_, _>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}: {dims}", path.display());
    for field in table.array_fields() {
        println!(
            "  vector field '{}' expanded into {} columns",
            field.label,
            field.columns.len()
        );
    }
    for parameter in filter.parameters() {
        let domain = filter.domain(parameter).unwrap_or_default();
        println!("  {parameter}: {} distinct values", domain.len());
    }
    println!(
        "  objectives: {}",
        table.objective_names().join(", ")
    );

    Ok(())
}
