use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("srvmon version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
