use anyhow::Context;
use clap::{Parser, Subcommand};
use fortune_wheel::config::{self, PresentationChoice};
use fortune_wheel::events::AppEvent;
use fortune_wheel::gui::app::{AppInit, AppModel};
use fortune_wheel::sys::{runtime, server};
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force a wheel or bar ("auto" picks by item count)
    #[arg(short, long)]
    kind: Option<PresentationChoice>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a running instance to spin, to INDEX or a random item
    Spin { index: Option<usize> },
    /// Ask a running instance to reload its config
    Reload,
    /// Write the default config if none exists and print its path
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    match cli.command {
        Some(Commands::Spin { index }) => {
            return server::send_command(&AppEvent::Spin(index))
                .context("No running instance to spin");
        }
        Some(Commands::Reload) => {
            return server::send_command(&AppEvent::ConfigReload)
                .context("No running instance to reload");
        }
        Some(Commands::InitConfig) => {
            let path = config::write_default_config(&config_path)?;
            println!("{}", path.display());
            return Ok(());
        }
        None => {}
    }

    let config = config::load_or_builtin(&config_path);
    let presentation = cli
        .kind
        .unwrap_or(config.presentation)
        .resolve(config.items.len());
    let fortune = config.build(presentation)?;
    log::info!(
        "Showing {} items as a {}",
        fortune.items().len(),
        presentation
    );

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx, config_path.clone());

    let app = RelmApp::new("org.fortune.wheel").with_args(Vec::new());
    app.run::<AppModel>(AppInit {
        fortune,
        config_path,
        events: rx,
    });

    Ok(())
}
