use std::{fs::File, io::Read, path::PathBuf};

use anyhow::Context;
use ndb::{common::Error, table::Table};

fn main() -> Result<(), Error> {
    env_logger::init();

    let Some(table_file_name) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: ndb_dump <table-file.ndb>");
        std::process::exit(1);
    };

    let mut table_file = File::open(&table_file_name).context("Cannot open table file")?;
    let mut data_buf: Vec<u8> = vec![];
    table_file
        .read_to_end(&mut data_buf)
        .context("Failed reading table file")?;

    let mut table = Table::default();
    table
        .import_from_binary(&data_buf)
        .context("Failed decoding table file")?;

    // SCHEMA
    for (idx, column) in table.columns().iter().enumerate() {
        println!(
            "Column #{}: {} ({}) required={} unique={} default={:?}",
            idx,
            column.name(),
            column.kind(),
            column.is_required(),
            column.is_unique(),
            column.default_value()
        );
    }

    // ROWS
    for (row_idx, row) in table.select().iter().enumerate() {
        println!("Row #{row_idx}: {}", row.id);
        for (column_name, value) in &row.data {
            println!("\t{column_name} = {value}");
        }
    }

    println!("{} row(s)", table.len());

    Ok(())
}
