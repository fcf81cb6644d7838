use crate::errors::WithPath;
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Reads a query file and an optional variables file.
pub fn load<P1: AsRef<Path>, P2: AsRef<Path>>(
    query: P1,
    variables: Option<P2>,
) -> Result<(String, String)> {
    let query = WithPath::context(query, |p| fs::read_to_string(p))?;
    let variables = match variables {
        Some(variables) => WithPath::context(variables, |p| fs::read_to_string(p))?,
        None => String::new(),
    };
    Ok((query, variables))
}
