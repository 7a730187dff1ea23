use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use rowbinary::{Column, Format, ReaderOptions, core::Tz};
use tracing::debug;

pub fn mmap_file(path: &Path) -> Result<Mmap> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    // SAFETY: the map is read-only and dropped before the command returns.
    Ok(unsafe { Mmap::map(&file) }?)
}

/// Reader flags shared by the commands that open a file.
#[derive(clap::Args)]
pub struct ReaderArgs {
    /// Framing of the input (e.g. RowBinaryWithNamesAndTypes)
    #[arg(short, long)]
    format: Option<Format>,

    /// Column schema as `name Type` pairs, e.g. "id UInt64, tags Array(String)"
    #[arg(short, long)]
    schema: Option<String>,

    /// Zone for DateTime columns declared without one
    #[arg(long)]
    time_zone: Option<String>,

    /// Accept enum ordinals missing from the enum table
    #[arg(long)]
    lenient_enums: bool,
}

impl ReaderArgs {
    pub fn options(&self, config: Option<&Path>) -> Result<ReaderOptions> {
        let mut options = match config {
            Some(path) => ReaderOptions::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ReaderOptions::default(),
        };
        if let Some(format) = self.format {
            options.format = format;
        }
        if let Some(name) = &self.time_zone {
            let tz: Tz = name
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown time zone '{name}'"))?;
            options.codec = options.codec.with_time_zone(tz);
        }
        if self.lenient_enums {
            options.codec.strict_enums = false;
        }
        debug!(?options, "reader options");
        Ok(options)
    }

    pub fn columns(&self) -> Result<Vec<Column>> {
        match &self.schema {
            Some(text) => parse_schema(text),
            None => Ok(Vec::new()),
        }
    }
}

/// Splits `name Type, name Type` at top-level commas.
fn parse_schema(text: &str) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted && depth == 0 => {
                columns.push(parse_column(&text[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if !text[start..].trim().is_empty() {
        columns.push(parse_column(&text[start..])?);
    }
    Ok(columns)
}

fn parse_column(text: &str) -> Result<Column> {
    let text = text.trim();
    let Some((name, type_name)) = text.split_once(char::is_whitespace) else {
        bail!("column '{text}' needs a name and a type");
    };
    Ok(Column::parse(name, type_name.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_splits_at_top_level_commas() {
        let columns = parse_schema("id UInt64, m Map(String, Enum8('a,b' = 1))").unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[1].ty.to_string(), "Map(String, Enum8('a,b' = 1))");
        assert!(parse_schema("id").is_err());
        assert!(parse_schema("").unwrap().is_empty());
    }
}
