//! The `pathfit questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use pathfit_core::config::load_config;
use pathfit_core::model::{Instrument, Question};

pub fn execute(catalog_path: Option<PathBuf>, instrument: Option<String>) -> Result<()> {
    let catalog = load_config()?.load_catalog(catalog_path.as_deref())?;

    let instruments: Vec<Instrument> = match instrument {
        Some(name) => vec![name.parse().map_err(anyhow::Error::msg)?],
        None => Instrument::ALL.to_vec(),
    };

    println!("{} v{}", catalog.name, catalog.version);

    let mut table = Table::new();
    table.set_header(vec!["#", "ID", "Instrument", "Facet", "Type", "Prompt"]);

    for instrument in instruments {
        for q in catalog.questions_for(instrument) {
            let number = catalog
                .number_of(&q.id)
                .map(|n| n.to_string())
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(number),
                Cell::new(&q.id),
                Cell::new(instrument.label()),
                Cell::new(&q.facet),
                Cell::new(q.kind),
                Cell::new(prompt_line(q)),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}

fn prompt_line(q: &Question) -> String {
    if q.choices.is_empty() {
        q.prompt.clone()
    } else {
        format!("{} [{}]", q.prompt, q.choices.join(" | "))
    }
}
