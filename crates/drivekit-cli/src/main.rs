use std::{env, fs, process::Command};

use clap::Parser;
use cli::{Args, Commands};
use download::{download, DownloadContext};
use drivekit_client::{
    error::Result,
    http_client::{configure_http_client, ClientConfig},
    DriveService, HttpTransport,
};
use drivekit_config::config::{self, get_config, set_config_path, Config, CONFIG_PATH};
use inspect::{show_about, show_file, show_path};
use list::{find_file, list_files, search_files, SearchFilter};
use logging::setup_logging;
use tracing::{debug, info, warn};
use utils::{resolve_path, COLOR};

mod cli;
mod download;
mod inspect;
mod list;
mod logging;
mod progress;
mod utils;

fn show_config(edit: Option<Option<String>>) -> Result<()> {
    let config_path = CONFIG_PATH.read().unwrap().clone();
    match edit {
        Some(editor) => {
            let editor = editor
                .or_else(|| env::var("EDITOR").ok())
                .unwrap_or_else(|| "vi".to_string());
            Command::new(&editor).arg(&config_path).status()?;
        }
        None => {
            let content = match fs::read_to_string(&config_path) {
                Ok(content) => content,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    warn!("Config file {} not found", config_path.display());
                    Config::default_config().to_toml()?
                }
                Err(err) => return Err(err.into()),
            };
            info!("{}", content);
        }
    }
    Ok(())
}

/// Applies command-line overrides on top of the loaded config.
fn apply_overrides(
    mut config: Config,
    token: Option<String>,
    proxy: Option<String>,
    user_agent: Option<String>,
) -> Config {
    if token.is_some() {
        config.access_token = token;
    }
    if proxy.is_some() {
        config.proxy = proxy;
    }
    if user_agent.is_some() {
        config.user_agent = user_agent;
    }
    config
}

fn run_command(command: Commands, config: &Config, show_progress: bool) -> Result<()> {
    let client_config = ClientConfig::from_config(config)?;
    configure_http_client(|c| *c = client_config);

    let transport = HttpTransport::from_config(config)?;
    debug!("using {}", transport.base_url());
    let service = DriveService::connect(transport)?.with_page_size(config.page_size());
    let file_fields = config.file_fields();

    match command {
        Commands::Config {
            edit,
        } => show_config(edit)?,
        Commands::About {
            fields,
        } => show_about(&service, &fields)?,
        Commands::Get {
            id,
        } => show_file(&service, &id, file_fields)?,
        Commands::Path {
            id,
        } => show_path(&service, &id)?,
        Commands::List {
            parent,
            all,
            page_size,
        } => {
            let page_size = page_size.unwrap_or_else(|| config.page_size());
            list_files(&service, parent, all, page_size, file_fields)?;
        }
        Commands::Search {
            name,
            not_name,
            mime_type,
            text,
            starred,
            parent,
            exclude_trashed,
            any,
        } => {
            let filter = SearchFilter {
                name,
                not_name,
                mime_type,
                text,
                starred,
                exclude_trashed,
                any,
            };
            search_files(&service, &filter, parent, file_fields)?;
        }
        Commands::Find {
            name,
            folder,
            trashed,
        } => find_file(&service, &name, folder, trashed, file_fields)?,
        Commands::Download {
            id,
            output,
            force,
        } => {
            let ctx = DownloadContext {
                output,
                default_dir: config.download_dir(),
                force,
                show_progress,
            };
            download(&service, &id, ctx)?;
        }
    }

    Ok(())
}

fn handle_cli() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        let mut color = COLOR.write().unwrap();
        *color = false;
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }

    let show_progress = !args.quiet && !args.json;

    match args.command {
        Commands::Config {
            edit,
        } => show_config(edit),
        command => {
            config::init()?;
            let config = apply_overrides(get_config(), args.token, args.proxy, args.user_agent);
            run_command(command, &config, show_progress)
        }
    }
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
