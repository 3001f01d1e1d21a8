//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};
use crate::core::{SortKey, ViewState};
use crate::error::AppError;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub(crate) enum SortOrder {
    /// Smallest first
    Asc,
    /// Largest first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "readstats")]
#[command(about = "Reading statistics from an e-reader statistics database", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Statistics database (SQLite)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub(crate) file: Option<PathBuf>,

    /// Hide books read for less than this many minutes
    #[arg(
        short,
        long,
        global = true,
        value_name = "N",
        allow_negative_numbers = true
    )]
    pub(crate) min_minutes: Option<i64>,

    /// Book table sort column (title, authors, duration)
    #[arg(short, long, global = true, value_name = "COLUMN")]
    pub(crate) sort: Option<String>,

    /// Sort direction for the book table
    #[arg(short, long, global = true, value_enum)]
    pub(crate) order: Option<SortOrder>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Filter JSON output with jq expression (requires jq installed)
    #[arg(long, global = true, value_name = "FILTER")]
    pub(crate) jq: Option<String>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Timezone for calendar days (e.g., "Europe/Berlin", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (e.g., "en", "de", "fr")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,

    /// Compact output (no authors column)
    #[arg(short = 'c', long, global = true)]
    pub(crate) compact: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if !self.compact && config.compact {
            self.compact = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        if self.order.is_none() {
            self.order = config.order.map(|order| match order {
                ConfigSortOrder::Asc => SortOrder::Asc,
                ConfigSortOrder::Desc => SortOrder::Desc,
            });
        }

        if self.color == ColorMode::Auto
            && let Some(color) = config.color
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.file.is_none() {
            self.file.clone_from(&config.file);
        }
        if self.min_minutes.is_none() {
            self.min_minutes = config.min_minutes;
        }
        if self.sort.is_none() {
            self.sort.clone_from(&config.sort);
        }
        if self.timezone.is_none() {
            self.timezone.clone_from(&config.timezone);
        }
        if self.locale.is_none() {
            self.locale.clone_from(&config.locale);
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    /// Starting view state: `--sort` as a header click from the defaults,
    /// then `--order` pins the direction
    pub(crate) fn view_state(&self) -> Result<ViewState, AppError> {
        let mut state = ViewState::default();
        if let Some(sort) = &self.sort {
            let key: SortKey = sort.parse()?;
            if key != state.sort_key() {
                state.select_sort(key);
            }
        }
        if let Some(order) = self.order {
            state.set_ascending(order == SortOrder::Asc);
        }
        if let Some(minutes) = self.min_minutes {
            state.set_min_minutes(minutes);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["readstats"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn default_view_state() {
        let state = parse(&[]).view_state().unwrap();
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn sort_by_title_starts_ascending() {
        let state = parse(&["--sort", "title"]).view_state().unwrap();
        assert_eq!(state.sort_key(), SortKey::Title);
        assert!(state.ascending());
    }

    #[test]
    fn sort_by_default_column_keeps_direction() {
        let state = parse(&["--sort", "duration"]).view_state().unwrap();
        assert_eq!(state.sort_key(), SortKey::TotalReadTime);
        assert!(!state.ascending());
    }

    #[test]
    fn order_overrides_direction() {
        let state = parse(&["--sort", "authors", "--order", "desc"])
            .view_state()
            .unwrap();
        assert_eq!(state.sort_key(), SortKey::Authors);
        assert!(!state.ascending());
    }

    #[test]
    fn negative_min_minutes_is_accepted_and_clamped() {
        let state = parse(&["--min-minutes", "-5"]).view_state().unwrap();
        assert_eq!(state.threshold_secs(), 0);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let err = parse(&["--sort", "pages"]).view_state().unwrap_err();
        assert!(matches!(err, AppError::InvalidSort { .. }));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = parse(&["books", "--file", "stats.sqlite3", "-m", "10"]);
        assert!(matches!(cli.command, Some(Commands::Books)));
        assert_eq!(cli.file, Some(PathBuf::from("stats.sqlite3")));
        assert_eq!(cli.min_minutes, Some(10));
    }

    #[test]
    fn config_fills_unset_options_only() {
        let config: Config = toml::from_str(
            r#"
            file = "/data/statistics.sqlite3"
            min_minutes = 20
            sort = "title"
            order = "desc"
            compact = true
            "#,
        )
        .unwrap();
        let cli = parse(&["--min-minutes", "5"]).with_config(&config);
        assert_eq!(cli.file, Some(PathBuf::from("/data/statistics.sqlite3")));
        assert_eq!(cli.min_minutes, Some(5));
        assert_eq!(cli.sort.as_deref(), Some("title"));
        assert_eq!(cli.order, Some(SortOrder::Desc));
        assert!(cli.compact);
    }

    #[test]
    fn config_color_applies_when_cli_is_auto() {
        let config: Config = toml::from_str(r#"color = "never""#).unwrap();
        let cli = parse(&[]).with_config(&config);
        assert_eq!(cli.color, ColorMode::Never);
        assert!(!cli.use_color());

        let cli = parse(&["--color", "always"]).with_config(&config);
        assert_eq!(cli.color, ColorMode::Always);
    }
}
