use crate::conf::{Overrides, load_config};
use std::path::Path;

pub fn dump(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<()> {
    let cfg = load_config(path, overrides)?;
    let s = serde_json::to_string_pretty(&cfg)?;
    println!("{s}");
    Ok(())
}
