// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use shutter::app::AppModel;
use shutter::constants::ui;
use shutter::i18n;

mod cli;

#[derive(Parser)]
#[command(name = "shutter")]
#[command(about = "Photo camera with review, save and gallery for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run in terminal mode (renders camera to terminal)
    Terminal {
        /// Use in-memory services instead of the camera and photo folder
        #[arg(long)]
        demo: bool,
    },

    /// List available cameras
    List,

    /// Take a photo and save it to the library
    Photo {
        /// Use the front camera
        #[arg(short, long)]
        front: bool,

        /// Fire the flash
        #[arg(long)]
        flash: bool,

        /// Use in-memory services instead of the camera and photo folder
        #[arg(long)]
        demo: bool,
    },

    /// List photos in the library, newest first
    Gallery {
        /// Print the assets as JSON
        #[arg(long)]
        json: bool,

        /// Use in-memory services instead of the photo folder
        #[arg(long)]
        demo: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=shutter=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    // Terminal and command output is localized too
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    match cli.command {
        Some(Commands::Terminal { demo }) => shutter::terminal::run(demo),
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Photo { front, flash, demo }) => cli::take_photo(front, flash, demo),
        Some(Commands::Gallery { json, demo }) => cli::list_gallery(json, demo),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(ui::WINDOW_WIDTH, ui::WINDOW_HEIGHT))
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(ui::MIN_WIDTH)
                .min_height(ui::MIN_HEIGHT),
        );

    // `None` selects the desktop camera, permissions and photo folder.
    cosmic::app::run::<AppModel>(settings, None)?;

    Ok(())
}
