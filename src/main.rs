use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use xfchess_pgn::core::{load_settings, save_settings, settings_path, NotationSettings};
use xfchess_pgn::game::resources::{GameCursor, MoveId, MoveTree};
use xfchess_pgn::game::rules::StandardRules;
use xfchess_pgn::notation::{import_game, resolve, PgnWriter};

/// Read, check and rewrite chess games with variations
#[derive(Parser, Debug)]
#[command(name = "xfpgn", version, about)]
struct Cli {
    /// Settings file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: SubCommands,
}

#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Rewrite a game in canonical form
    Normalize {
        /// Game file, or `-` for stdin
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the configured line width (0 = no wrapping)
        #[arg(long)]
        width: Option<usize>,

        #[arg(long, default_value = "false")]
        no_tags: bool,
    },
    /// Replay a game and report every move that fails
    Check {
        /// Game file, or `-` for stdin
        input: PathBuf,
    },
    /// Print the move tree of a game
    Tree {
        /// Game file, or `-` for stdin
        input: PathBuf,

        /// Dump nodes as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Resolve a SAN move after a sequence of moves
    Resolve {
        san: String,

        /// Moves played before, e.g. "e4 e5 Nf3"
        #[arg(short, long, default_value = "")]
        moves: String,
    },
    /// Show the settings in effect, or write them to the settings file
    Config {
        #[arg(long, default_value = "false")]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref());
    match cli.command {
        SubCommands::Normalize {
            input,
            output,
            width,
            no_tags,
        } => normalize(&input, output.as_deref(), width, no_tags, &settings),
        SubCommands::Check { input } => check(&input),
        SubCommands::Tree { input, json } => tree(&input, json),
        SubCommands::Resolve { san, moves } => resolve_move(&san, &moves),
        SubCommands::Config { init } => config(init, cli.config.as_deref(), &settings),
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read game from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn normalize(
    input: &Path,
    output: Option<&Path>,
    width: Option<usize>,
    no_tags: bool,
    settings: &NotationSettings,
) -> Result<()> {
    let text = read_input(input)?;
    let rules = StandardRules::new();
    let game = import_game(&text, &rules).context("Failed to import game")?;
    for error in &game.variation_errors {
        warn!("[PGN] Dropped variation move {}", error);
    }

    let mut writer = PgnWriter::from_settings(settings);
    if let Some(width) = width {
        writer.line_width = width;
    }
    writer.include_tags &= !no_tags;

    let result = game.result.unwrap_or(settings.default_result);
    let pgn = writer.write(&game.tags, &game.tree, result);

    match output {
        Some(path) => {
            fs::write(path, &pgn).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("[PGN] Wrote {} moves to {}", game.tree.len(), path.display());
        }
        None => print!("{pgn}"),
    }
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    let text = read_input(input)?;
    let game = import_game(&text, &StandardRules::new()).context("Failed to import game")?;

    println!(
        "{} moves, {} on the main line, {} tags",
        game.tree.len(),
        game.tree.mainline_len(),
        game.tags.len()
    );
    for error in &game.variation_errors {
        println!("  {error}");
    }
    if !game.is_clean() {
        bail!("{} variations could not be replayed", game.variation_errors.len());
    }
    Ok(())
}

fn tree(input: &Path, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let game = import_game(&text, &StandardRules::new()).context("Failed to import game")?;

    if json {
        let nodes: Vec<_> = game.tree.iter().collect();
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        print_children(&game.tree, MoveId::ROOT, 0);
    }
    Ok(())
}

fn print_children(tree: &MoveTree, id: MoveId, depth: usize) {
    for child in tree.children_of(id) {
        let marker = if child.is_variation_root() { "+" } else { " " };
        println!(
            "{:indent$}{marker}{} {} ({}{})",
            "",
            child.id,
            child.display_notation(),
            child.from,
            child.to,
            indent = depth * 2
        );
        print_children(tree, child.id, depth + 1);
    }
}

fn resolve_move(san: &str, moves: &str) -> Result<()> {
    let mut cursor = GameCursor::new(StandardRules::new());
    for played in moves.split_whitespace() {
        cursor
            .play(played)
            .with_context(|| format!("Failed to play {played}"))?;
    }

    let color = cursor.side_to_move();
    let resolution = resolve(san, color, cursor.board(), cursor.rules())
        .with_context(|| format!("Failed to resolve {san} for {color}"))?;
    let promotion = resolution
        .promotion
        .and_then(|piece_type| piece_type.san_letter())
        .map(|c| format!("={c}"))
        .unwrap_or_default();
    println!("{}{}{}", resolution.from, resolution.to, promotion);
    if resolution.is_ambiguous() {
        println!("ambiguous: {} candidates", resolution.candidates);
    }
    Ok(())
}

fn config(init: bool, path: Option<&Path>, settings: &NotationSettings) -> Result<()> {
    if init {
        let written = save_settings(settings, path).context("Failed to save settings")?;
        println!("{}", written.display());
        return Ok(());
    }
    let location = path.map_or_else(settings_path, Path::to_path_buf);
    println!("# {}", location.display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}
