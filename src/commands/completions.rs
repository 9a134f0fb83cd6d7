use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use clap_complete::{generate, Shell};
use std::io;

const SUPPORTED: &str = "bash, zsh, fish, powershell, elvish";

fn parse_shell(name: &str) -> Option<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}

/// Generate shell completions for the specified shell
pub fn execute(matches: &ArgMatches, cli: &mut Command) -> Result<()> {
    let Some(shell_str) = matches.get_one::<String>("shell") else {
        bail!("shell argument is required (supported: {})", SUPPORTED);
    };

    let Some(shell) = parse_shell(shell_str) else {
        bail!("Unsupported shell: {} (supported: {})", shell_str, SUPPORTED);
    };

    generate(shell, cli, "srvmon", &mut io::stdout());
    Ok(())
}
