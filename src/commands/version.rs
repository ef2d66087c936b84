//! Version command implementation

use miette::Result;

/// Version line printed by `terramaid version`
pub fn version_line() -> String {
    format!("terramaid: {}", env!("CARGO_PKG_VERSION"))
}

pub fn execute_version_command() -> Result<()> {
    println!("{}", version_line());
    Ok(())
}
