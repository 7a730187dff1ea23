use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use rowbinary::RowReader;
use tracing::debug;

use crate::{
    input::{ReaderArgs, mmap_file},
    writer::{JsonlWriter, RowSink, TextWriter},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    Jsonl,
}

#[derive(Args)]
pub struct DumpArgs {
    /// Path to the RowBinary file
    input: PathBuf,

    #[command(flatten)]
    reader: ReaderArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    to: OutputFormat,

    /// Print a line of column names before text output
    #[arg(long)]
    header: bool,

    /// Stop after this many rows
    #[arg(short = 'n', long)]
    limit: Option<u64>,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DumpArgs {
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let options = self.reader.options(config)?;
        let schema = self.reader.columns()?;
        let mmap = mmap_file(&self.input)?;

        let mut reader = RowReader::new(&mmap[..], &options, &schema)?;
        let columns = reader.columns().to_vec();
        let mut sink: Box<dyn RowSink> = match self.to {
            OutputFormat::Text => Box::new(TextWriter::new(self.output.as_deref(), self.header)?),
            OutputFormat::Jsonl => Box::new(JsonlWriter::new(self.output.as_deref())?),
        };

        while self.limit.is_none_or(|limit| reader.rows_read() < limit) {
            let Some(row) = reader.next_row()? else {
                break;
            };
            sink.write_row(&columns, &row)?;
        }
        sink.finish()?;
        debug!(rows = reader.rows_read(), "dump finished");
        Ok(())
    }
}
