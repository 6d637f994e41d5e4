#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_main;
mod network;
mod query_main;
mod tui;

use anyhow::Context;
use battle_of_roles::api::GameId;
use battle_of_roles::bootstrap::GameBootstrap;
use battle_of_roles::config::ClientConfig;
use battle_of_roles::player::PlayerNum;
use clap::{ArgMatches, Command, arg};

use crate::network::HttpTransport;


fn main() -> anyhow::Result<()> {
    // Logs go to stderr so that they can be redirected away from the TUI.
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let session_arg = || arg!(--"session" <cookie> "Cookie header value, e.g. \"session=...\"");
    let matches = Command::new("Battle of Roles")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Battle of Roles console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("client")
                .about("Play a game in the terminal")
                .arg(arg!(<server> "Server URL, e.g. http://localhost:5000"))
                .arg(arg!(<game_id> "Game ID").value_parser(clap::value_parser!(GameId)))
                .arg(arg!(<player_num> "Your seat").value_parser(["1", "2"]))
                .arg(arg!(--"guest" "Playing as a guest (enables /convert)"))
                .arg(session_arg())
                .arg(arg!(--"config" <config_file> "Path to a yaml-serialized ClientConfig")),
        )
        .subcommand(
            Command::new("state")
                .about("Fetch the game state once and print it")
                .arg(arg!(<server> "Server URL"))
                .arg(arg!(<game_id> "Game ID").value_parser(clap::value_parser!(GameId)))
                .arg(arg!(<player_num> "Point of view").value_parser(["1", "2"]))
                .arg(session_arg()),
        )
        .subcommand(
            Command::new("wait-ready")
                .about("Wait until an opponent joins the game")
                .arg(arg!(<server> "Server URL"))
                .arg(arg!(<game_id> "Game ID").value_parser(clap::value_parser!(GameId)))
                .arg(session_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("client", sub_matches)) => {
            let client_config = read_client_config(sub_matches)?;
            let bootstrap = GameBootstrap {
                game_id: game_id_arg(sub_matches)?,
                me: player_num_arg(sub_matches)?,
                is_guest: sub_matches.get_flag("guest"),
            };
            client_main::run(client_main::ConsoleClientConfig {
                bootstrap,
                client_config,
                cookie: sub_matches.get_one::<String>("session").cloned(),
            })
        }
        Some(("state", sub_matches)) => {
            let transport = make_transport(sub_matches, ClientConfig::default())?;
            query_main::run_state(
                &transport,
                game_id_arg(sub_matches)?,
                player_num_arg(sub_matches)?,
            )
        }
        Some(("wait-ready", sub_matches)) => {
            let transport = make_transport(sub_matches, ClientConfig::default())?;
            query_main::run_wait_ready(&transport, game_id_arg(sub_matches)?)
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn server_arg(matches: &ArgMatches) -> anyhow::Result<String> {
    matches.get_one::<String>("server").cloned().context("Missing server")
}

fn game_id_arg(matches: &ArgMatches) -> anyhow::Result<GameId> {
    matches.get_one::<GameId>("game_id").copied().context("Missing game ID")
}

fn player_num_arg(matches: &ArgMatches) -> anyhow::Result<PlayerNum> {
    let player_num = matches.get_one::<String>("player_num").context("Missing player number")?;
    player_num
        .parse()
        .ok()
        .and_then(PlayerNum::from_number)
        .with_context(|| format!("Invalid player number: {player_num}"))
}

fn read_client_config(matches: &ArgMatches) -> anyhow::Result<ClientConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(filename) => {
            let contents = std::fs::read_to_string(filename)
                .with_context(|| format!("Reading config file {filename}"))?;
            ClientConfig::from_yaml(&contents).context("Parsing config file")?
        }
        None => ClientConfig::default(),
    };
    // The server given on the command line wins over the one in the config file.
    config.base_url = server_arg(matches)?;
    Ok(config)
}

fn make_transport(matches: &ArgMatches, mut config: ClientConfig) -> anyhow::Result<HttpTransport> {
    config.base_url = server_arg(matches)?;
    HttpTransport::new(config, matches.get_one::<String>("session").cloned())
}
