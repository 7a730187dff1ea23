use anyhow::{Context, Result, bail};
use bytes::Buf;
use clap::Args;
use rowbinary::{
    codec::{read_type_tag, write_type_tag},
    typename::parse_type_name,
};

#[derive(Args)]
pub struct TagArgs {
    /// Type name, e.g. "Map(String, Array(Nullable(Float64)))"
    type_name: String,
}

impl TagArgs {
    pub fn run(self) -> Result<()> {
        let ty = parse_type_name(&self.type_name)?;
        let mut tag = Vec::new();
        write_type_tag(&mut tag, &ty)?;
        println!("{}", hex::encode(tag));
        Ok(())
    }
}

#[derive(Args)]
pub struct UntagArgs {
    /// Type tag bytes in hex; whitespace is ignored
    hex: String,
}

impl UntagArgs {
    pub fn run(self) -> Result<()> {
        let digits: String = self.hex.split_whitespace().collect();
        let bytes = hex::decode(&digits).context("type tag is not valid hex")?;
        let mut cursor = &bytes[..];
        let ty = read_type_tag(&mut cursor)?;
        if cursor.has_remaining() {
            bail!("{} trailing bytes after {ty}", cursor.remaining());
        }
        println!("{ty}");
        Ok(())
    }
}
