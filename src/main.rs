use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use srvmon::commands;

fn socket_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Websocket URL of the daemon (overrides the config file)"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .value_name("TOKEN")
                .help("Token sent in the auth event (overrides the config file)"),
        )
}

fn build_cli() -> Command {
    Command::new("srvmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live server resource telemetry with region lookup")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            socket_args(
                Command::new("watch").about("Show the live server details dashboard"),
            ),
        )
        .subcommand(
            socket_args(
                Command::new("stats")
                    .about("Stream server stats as lines until Ctrl-C")
                    .arg(
                        Arg::new("json")
                            .long("json")
                            .help("Print one JSON object per update")
                            .action(ArgAction::SetTrue),
                    ),
            ),
        )
        .subcommand(
            Command::new("locate")
                .about("Resolve the region of an address (default allocation if omitted)")
                .arg(
                    Arg::new("address")
                        .help("IP address or host name to locate")
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage configuration (use 'srvmon config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show the current configuration"))
                .subcommand(
                    Command::new("set")
                        .about("Set a configuration value ('none' clears optional keys)")
                        .long_about(
                            "Set a configuration value\n\nKEYS:\n    socket-url      Websocket URL (ws/wss)\n    socket-token    Token for the auth event\n    dns-endpoint    DNS-over-HTTPS JSON endpoint\n    geo-endpoint    Geo-IP lookup endpoint\n    timeout         HTTP request timeout in seconds\n    cpu-limit       CPU limit in percent (0 = unlimited)\n    memory-limit    Memory limit in MiB (0 = unlimited)\n    disk-limit      Disk limit in MiB (0 = unlimited)\n    status          offline, starting, stopping or running",
                        )
                        .arg(Arg::new("key").help("Key to set").required(true).index(1))
                        .arg(Arg::new("value").help("New value").required(true).index(2)),
                )
                .subcommand(
                    Command::new("allocation")
                        .about("Manage server allocations")
                        .subcommand_required(true)
                        .arg_required_else_help(true)
                        .subcommand(
                            Command::new("add")
                                .about("Add an allocation")
                                .arg(Arg::new("ip").help("IP address").required(true).index(1))
                                .arg(
                                    Arg::new("port")
                                        .help("Port")
                                        .required(true)
                                        .index(2)
                                        .value_parser(clap::value_parser!(u16)),
                                )
                                .arg(
                                    Arg::new("alias")
                                        .long("alias")
                                        .value_name("ALIAS")
                                        .help("Name shown instead of the IP"),
                                )
                                .arg(
                                    Arg::new("default")
                                        .long("default")
                                        .help("Make this the default allocation")
                                        .action(ArgAction::SetTrue),
                                ),
                        )
                        .subcommand(Command::new("clear").about("Remove all allocations")),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    let mut cli = build_cli();
    let matches = cli.clone().get_matches();

    // The TUI owns the terminal, so it only logs when RUST_LOG asks for it
    let level = match matches.subcommand_name() {
        Some("watch") => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    };
    srvmon::init_logging(level);

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("watch", sub_matches)) => commands::watch(sub_matches)?,
        Some(("stats", sub_matches)) => commands::stats(sub_matches)?,
        Some(("locate", sub_matches)) => commands::locate(sub_matches)?,
        Some(("config", sub_matches)) => commands::config::execute(sub_matches)?,
        Some(("completions", sub_matches)) => {
            commands::completions::execute(sub_matches, &mut cli)?
        }
        Some(("version", _)) => commands::version()?,
        _ => {
            println!("Welcome to srvmon!");
            println!("Use 'srvmon --help' for more information.");
        }
    }

    Ok(())
}
