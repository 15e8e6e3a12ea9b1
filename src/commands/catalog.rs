use crate::catalog::listing;
use crate::output::{create_writer, OutputFormat};
use anyhow::Result;

pub fn show_catalog(format: OutputFormat) -> Result<()> {
    let mut writer = create_writer(format, None)?;
    writer.write_catalog(&listing())
}
