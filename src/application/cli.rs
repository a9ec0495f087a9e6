use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::CredentialStore;
use crate::infrastructure::mirror::SqliteMirror;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions").about("Generates shell completions.").arg(
        Arg::new("shell")
            .short('s')
            .long("shell")
            .help("Which shell to generate completions for.")
            .action(ArgAction::Set)
            .value_parser(value_parser!(Shell))
            .required(true),
    );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_logout() -> Command {
    return Command::new("logout")
        .about("Removes the persisted API key. The next start lands on the login view.");
}

fn subcommand_mirror() -> Command {
    return Command::new("mirror")
        .about("Manage the local message mirror.")
        .arg_required_else_help(true)
        .subcommand(Command::new("clear").about("Deletes every message in the mirror database."))
        .subcommand(Command::new("path").about("Prints the mirror database path."));
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("BLIPDESK_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to a TOML configuration file. [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ));
}

fn arg_credential_file() -> Arg {
    return Arg::new(ConfigKey::CredentialFile.to_string())
        .long(ConfigKey::CredentialFile.to_string())
        .env("BLIPDESK_CREDENTIAL_FILE")
        .num_args(1)
        .help("Path to the persisted credential file. Defaults to the platform config dir.");
}

fn arg_gateway_url() -> Arg {
    return Arg::new(ConfigKey::GatewayURL.to_string())
        .short('u')
        .long(ConfigKey::GatewayURL.to_string())
        .env("BLIPDESK_GATEWAY_URL")
        .num_args(1)
        .help(format!(
            "URL of the Blip command gateway. [default: {}]",
            Config::default(ConfigKey::GatewayURL)
        ));
}

fn arg_gateway_timeout() -> Arg {
    return Arg::new(ConfigKey::GatewayTimeout.to_string())
        .long(ConfigKey::GatewayTimeout.to_string())
        .env("BLIPDESK_GATEWAY_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds before a gateway command times out. [default: {}]",
            Config::default(ConfigKey::GatewayTimeout)
        ));
}

fn arg_ingest_listen() -> Arg {
    return Arg::new(ConfigKey::IngestListen.to_string())
        .long(ConfigKey::IngestListen.to_string())
        .env("BLIPDESK_INGEST_LISTEN")
        .num_args(1)
        .help(format!(
            "Address the message ingest endpoint listens on. [default: {}]",
            Config::default(ConfigKey::IngestListen)
        ));
}

fn arg_mirror_file() -> Arg {
    return Arg::new(ConfigKey::MirrorFile.to_string())
        .long(ConfigKey::MirrorFile.to_string())
        .env("BLIPDESK_MIRROR_FILE")
        .num_args(1)
        .help("Path to the mirror database. Defaults to the platform data dir.");
}

fn arg_page_size() -> Arg {
    return Arg::new(ConfigKey::PageSize.to_string())
        .short('p')
        .long(ConfigKey::PageSize.to_string())
        .env("BLIPDESK_PAGE_SIZE")
        .num_args(1)
        .help(format!(
            "Number of contacts per page in the contact list. [default: {}]",
            Config::default(ConfigKey::PageSize)
        ));
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("blipdesk")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .arg(arg_config_file())
        .arg(arg_credential_file())
        .arg(arg_gateway_url())
        .arg(arg_gateway_timeout())
        .arg(arg_ingest_listen())
        .arg(arg_mirror_file())
        .arg(arg_page_size())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_logout())
        .subcommand(subcommand_mirror());
}

/// Returns true when the TUI should start, false when a subcommand handled
/// the invocation.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("create", _)) => {
                    create_config_file().await?;
                }
                Some(("default", _)) => {
                    print!("{}", Config::serialize_default(build()));
                }
                Some(("path", _)) => {
                    println!("{}", Config::default(ConfigKey::ConfigFile));
                }
                _ => {
                    println!("Run with `config --help` to see options.");
                }
            }
            return Ok(false);
        }
        Some(("logout", _)) => {
            Config::load(vec![&matches]).await?;
            CredentialStore::from_config().clear()?;
            println!("Credencial removida.");
            return Ok(false);
        }
        Some(("mirror", subcmd_matches)) => {
            Config::load(vec![&matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("clear", _)) => {
                    let mirror = SqliteMirror::from_config();
                    mirror.init()?;
                    mirror.clear()?;
                    println!("Mirror limpo.");
                }
                Some(("path", _)) => {
                    println!("{}", Config::get(ConfigKey::MirrorFile));
                }
                _ => {}
            }
            return Ok(false);
        }
        _ => {
            Config::load(vec![&matches]).await?;
            return Ok(true);
        }
    }
}
