use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, EnvFilter};

use mushaf::app::AppContext;
use mushaf::cli::{commands, Cli, Commands};
use mushaf::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui { chapter: None });

    // The reader owns the terminal, so its logs go to a file.
    let log_path = match (&cli.log, &command) {
        (Some(path), _) => Some(path.clone()),
        (None, Commands::Tui { .. }) => default_log_path(),
        _ => None,
    };
    let ansi = log_path.is_none();
    let writer = match log_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(ansi))
        .with(EnvFilter::from_default_env())
        .init();

    let config = match cli.config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(cli.db, config)?;

    match command {
        Commands::Tui { chapter } => {
            mushaf::tui::run(Arc::new(ctx), chapter).await?;
        }
        Commands::Show { chapter } => {
            commands::show_chapter(&ctx, chapter).await?;
        }
        Commands::Copy { verse, share } => {
            commands::copy_verse(&ctx, verse, share).await?;
        }
        Commands::Chapters => {
            commands::list_chapters();
        }
        Commands::Reciters => {
            commands::list_reciters(&ctx);
        }
        Commands::Translations => {
            commands::list_translations(&ctx);
        }
        Commands::Favorites => {
            commands::list_favorites(&ctx);
        }
        Commands::Favorite { verse } => {
            commands::favorite_verse(&ctx, verse)?;
        }
        Commands::Prefs(args) => {
            commands::update_preferences(&ctx, &args)?;
        }
    }

    Ok(())
}

fn default_log_path() -> Option<PathBuf> {
    let dir = dirs::data_dir()?.join("mushaf");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("mushaf.log"))
}
