use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::app::{self, Settings};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "slidecast")]
#[command(version, about)]
#[command(long_about = "Play an audio track and a slide deck in sync.\n\n\
    Slides advance automatically at the timestamps listed in the description\n\
    file (one `<time>@<page>` event per line); arrow keys seek and page\n\
    manually, `o` toggles the on-screen display.\n\n\
    Examples:\n  \
    slidecast talk.desc                  Probe talk.flac/talk.mp3/... and talk/\n  \
    slidecast talk.desc -a voice.ogg     Explicit audio track\n  \
    slidecast talk.desc --no-dialogs     Report startup errors on stderr")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Description file listing slide changes, one `<time>@<page>` per line
    pub description: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path of the audio file (probed next to the description when omitted)
    #[arg(short, long)]
    pub audio: Option<PathBuf>,

    /// Directory of slide page images (probed when omitted)
    #[arg(short, long)]
    pub slides: Option<PathBuf>,

    /// Width of the video output
    #[arg(long)]
    pub width: Option<i32>,

    /// Height of the video output
    #[arg(long)]
    pub height: Option<i32>,

    /// Use the standard output instead of GUI dialogs for error reporting
    #[arg(long)]
    pub no_dialogs: bool,

    /// Disable the on-screen display entirely
    #[arg(long)]
    pub no_osd: bool,

    /// Disable the OSD progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.width, defaults.seek_step_secs)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Whether startup errors should go to a dialog window rather than the
    /// console. Only the playback path opens dialogs.
    pub fn wants_dialogs(&self) -> bool {
        self.command.is_none() && self.description.is_some() && !self.no_dialogs
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("slidecast {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(description) = self.description {
                    let config = Config::load_or_default();
                    let settings = Settings::new(
                        description,
                        self.audio,
                        self.slides,
                        self.width,
                        self.height,
                        self.no_osd,
                        self.no_progress,
                        &config,
                    )?;
                    app::run(settings)?;
                    println!("{}", "Exited gracefully".green());
                    Ok(())
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
