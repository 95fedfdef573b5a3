use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::resolve::StartQuery;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about)]
#[command(long_about = "A full-viewport project slide deck for portfolios.\n\n\
    Scroll, swipe or use the arrow keys to move between projects.\n\n\
    Examples:\n  \
    folio                              Show the built-in deck (fullscreen)\n  \
    folio projects.yaml --windowed     Show a deck file in a window\n  \
    folio --project toner              Start on the project with slug 'toner'\n  \
    folio --url 'https://site/projects.html?slide=3'\n  \
    folio list --filter branding       List projects tagged 'branding'")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file (YAML or JSON). Defaults to the built-in deck
    pub slides: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub start: StartArgs,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Parameters that pick the starting slide.
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Start on the project with this slug (or matching title/image text)
    #[arg(long)]
    pub project: Option<String>,

    /// Start on this slide (1-indexed)
    #[arg(long)]
    pub slide: Option<String>,

    /// Read `project`/`slide` from a page URL or query string
    #[arg(long)]
    pub url: Option<String>,
}

impl StartArgs {
    /// Explicit flags win over values parsed from `--url`.
    pub fn to_query(&self) -> StartQuery {
        let base = self
            .url
            .as_deref()
            .map(StartQuery::parse)
            .unwrap_or_default();
        base.with_overrides(self.project.clone(), self.slide.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the slides of a deck
    List {
        /// Deck file (defaults to the built-in deck)
        slides: Option<PathBuf>,

        /// Only show slides with this tag ('all', '*' or 'everything' for no filter)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Print the slide a start query resolves to
    Resolve {
        /// Deck file (defaults to the built-in deck)
        slides: Option<PathBuf>,

        #[command(flatten)]
        start: StartArgs,
    },

    /// Save a slide's download asset
    Download {
        /// Slide number (1-indexed)
        index: usize,

        /// Deck file (defaults to the built-in deck)
        slides: Option<PathBuf>,

        /// Output directory (defaults to the user's download directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

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
        /// Configuration key (e.g. defaults.theme, deck.cooldown_ms)
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
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::List { slides, filter }) => {
                crate::commands::list::run(slides.as_deref(), filter.as_deref())
            }
            Some(Commands::Resolve { slides, start }) => {
                crate::commands::resolve::run(slides.as_deref(), &start.to_query())
            }
            Some(Commands::Download {
                index,
                slides,
                output_dir,
            }) => crate::commands::download::run(index, slides.as_deref(), output_dir),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("folio {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = &self.slides {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(crate::app::LaunchOptions {
                    slides: self.slides,
                    query: self.start.to_query(),
                    windowed: self.windowed,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_launch_flags() {
        let cli = Cli::try_parse_from(["folio", "deck.yaml", "--project", "toner", "--windowed"])
            .unwrap();
        assert_eq!(cli.slides, Some(PathBuf::from("deck.yaml")));
        assert!(cli.windowed);
        assert_eq!(cli.start.to_query().project.as_deref(), Some("toner"));
    }

    #[test]
    fn test_flags_override_url() {
        let cli = Cli::try_parse_from([
            "folio",
            "--url",
            "https://example.com/projects.html?project=salad&slide=4",
            "--slide",
            "2",
        ])
        .unwrap();
        let query = cli.start.to_query();
        assert_eq!(query.project.as_deref(), Some("salad"));
        assert_eq!(query.slide.as_deref(), Some("2"));
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["folio", "list", "--filter", "branding"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::List { filter: Some(_), .. })
        ));

        let cli = Cli::try_parse_from(["folio", "download", "3", "-o", "out"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Download { index: 3, .. })
        ));

        let cli = Cli::try_parse_from(["folio", "resolve", "--slide", "9", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Resolve { .. })));
    }
}
