use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::info_span;

use nsfg_cli::check::{CheckReport, run_check};
use nsfg_ingest::read_stata_dct;

use crate::cli::{CheckArgs, LayoutArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

pub fn run_check_command(args: &CheckArgs) -> Result<CheckReport> {
    run_check(&args.plan())
}

pub fn run_layout(args: &LayoutArgs) -> Result<()> {
    let span = info_span!("layout", dictionary = %args.dictionary.display());
    let _guard = span.enter();
    let dictionary = read_stata_dct(&args.dictionary)
        .with_context(|| format!("read dictionary {}", args.dictionary.display()))?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Start"),
        header_cell("Width"),
        header_cell("Type"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in &dictionary {
        let label = match &column.label {
            Some(label) => Cell::new(label),
            None => dim_cell("-"),
        };
        // Stata positions are 1-based.
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(column.start + 1),
            Cell::new(column.width),
            Cell::new(column.kind.label()),
            label,
        ]);
    }
    println!("{table}");
    println!(
        "{} columns, record length {}",
        dictionary.len(),
        dictionary.record_length()
    );
    Ok(())
}
