use std::{
    fs,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Result;
use rowbinary::{Column, Value};

use crate::render::{to_json, to_text};

pub trait RowSink {
    fn write_row(&mut self, columns: &[Column], row: &[Value]) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

fn destination(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(fs::File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

// --- tab-separated text ---

pub struct TextWriter {
    dest: Box<dyn Write>,
    header: bool,
    header_written: bool,
}

impl TextWriter {
    pub fn new(output: Option<&Path>, header: bool) -> Result<Self> {
        Ok(Self {
            dest: destination(output)?,
            header,
            header_written: false,
        })
    }
}

impl RowSink for TextWriter {
    fn write_row(&mut self, columns: &[Column], row: &[Value]) -> Result<()> {
        if self.header && !self.header_written {
            let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
            writeln!(self.dest, "{}", names.join("\t"))?;
            self.header_written = true;
        }
        let cells: Vec<String> = columns
            .iter()
            .zip(row)
            .map(|(column, value)| to_text(value, Some(&column.ty)))
            .collect();
        writeln!(self.dest, "{}", cells.join("\t"))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.dest.flush()?;
        Ok(())
    }
}

// --- JSON Lines ---

pub struct JsonlWriter {
    dest: Box<dyn Write>,
}

impl JsonlWriter {
    pub fn new(output: Option<&Path>) -> Result<Self> {
        Ok(Self {
            dest: destination(output)?,
        })
    }
}

impl RowSink for JsonlWriter {
    fn write_row(&mut self, columns: &[Column], row: &[Value]) -> Result<()> {
        let object: serde_json::Map<String, serde_json::Value> = columns
            .iter()
            .zip(row)
            .map(|(column, value)| (column.name.clone(), to_json(value, Some(&column.ty))))
            .collect();
        serde_json::to_writer(&mut self.dest, &object)?;
        self.dest.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.dest.flush()?;
        Ok(())
    }
}
