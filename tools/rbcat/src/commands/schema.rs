use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use clap::Args;
use rowbinary::RowReader;

use crate::input::{ReaderArgs, mmap_file};

#[derive(Args)]
pub struct SchemaArgs {
    /// Path to a RowBinaryWithNames or RowBinaryWithNamesAndTypes file
    input: PathBuf,

    #[command(flatten)]
    reader: ReaderArgs,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let options = self.reader.options(config)?;
        if !options.format.has_names() {
            bail!("{} files have no header", options.format);
        }
        let schema = self.reader.columns()?;
        let mmap = mmap_file(&self.input)?;
        let reader = RowReader::new(&mmap[..], &options, &schema)?;

        let mut text = String::new();
        for column in reader.columns() {
            writeln!(text, "{}\t{}", column.name, column.ty)?;
        }

        match self.output {
            Some(path) => fs::write(path, text)?,
            None => print!("{text}"),
        }
        Ok(())
    }
}
