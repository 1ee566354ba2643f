use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use daily_rotate::{config, dates, output, pack, rotate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daily-rotate")]
#[command(about = "Build the rolling daily puzzle pack")]
#[command(long_about = "\
Build the rolling daily puzzle pack

Reads the puzzle manifest, selects the puzzles for the last seven days
(ending today), stamps each with its date, and writes them as a single
MessagePack pack.

Project layout (paths configurable in daily-rotate.toml):

  <root>/
  ├── daily-rotate.toml            # Optional config overrides
  ├── daily/
  │   ├── manifest.json            # { \"epoch\": \"YYYY-MM-DD\", \"puzzles\": [{ \"id\": ... }] }
  │   └── puzzles/
  │       └── <id>.pl8             # One MessagePack record per puzzle
  └── daily.pl8                    # Output pack, replaced on every run

Puzzle N in the manifest is published on epoch + N days. Before the epoch
an empty pack is written; an empty manifest writes nothing.

Run 'daily-rotate gen-config' to print a documented daily-rotate.toml.
Set RUST_LOG=debug for per-puzzle logging.")]
#[command(version)]
struct Cli {
    /// Project root; config and relative paths resolve against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Date to rotate for (YYYY-MM-DD); defaults to the current UTC date
    #[arg(long, global = true, value_parser = dates::parse_iso_date)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write the daily pack (default)
    Rotate,
    /// Show which puzzles today's window covers, without writing anything
    Window,
    /// List the puzzles in the current output pack
    Show,
    /// Print a stock daily-rotate.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());

    match cli.command.unwrap_or(Command::Rotate) {
        Command::Rotate => {
            let settings = config::load_config(&cli.root)?;
            let layout = settings.layout(&cli.root);
            let outcome = rotate::rotate(&settings, &layout, today, &layout.puzzle_source())?;
            output::print_rotate_output(&outcome);
        }
        Command::Window => {
            let settings = config::load_config(&cli.root)?;
            let layout = settings.layout(&cli.root);
            let plan = rotate::plan(&settings, &layout, today)?;
            output::print_plan(&plan);
        }
        Command::Show => {
            let settings = config::load_config(&cli.root)?;
            let layout = settings.layout(&cli.root);
            let daily = pack::read_pack(&layout.output)?;
            output::print_pack(&daily);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
