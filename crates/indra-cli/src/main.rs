mod config;
mod output;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indra_core::{LimitCurve, TileConfig, Tiles, TraversalConfig, Word, WordRange};

use crate::config::{GroupConfig, IndraConfig};
use crate::output::{Format, TILE_HEADER, write_curve, write_tile};

#[derive(Parser)]
#[command(name = "indra", about = "Limit sets of two-generator Kleinian groups")]
struct Cli {
    /// TOML config file (defaults to $INDRA_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace the limit set as an ordered point sequence
    Limit {
        #[command(flatten)]
        group: GroupArgs,

        /// Stop a branch once its point is this close to the previous one
        #[arg(long)]
        eps: Option<f64>,

        /// Maximum word length
        #[arg(long)]
        max_level: Option<usize>,

        /// First subtree to report, e.g. "aB"
        #[arg(long)]
        start: Option<Word>,

        /// Last subtree to report
        #[arg(long)]
        end: Option<Word>,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Enumerate tiles (images of the seed circles) as CSV
    Tiles {
        #[command(flatten)]
        group: GroupArgs,

        /// Deepest level to subdivide
        #[arg(long)]
        max_level: Option<usize>,

        /// Do not subdivide tiles at or below this radius
        #[arg(long)]
        min_radius: Option<f64>,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Inspect words and their order in the traversal
    Word {
        word: Word,

        /// Compare against another word
        other: Option<Word>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Recipe {
    Kissing,
    Grandma,
    Jorgensen,
}

/// Recipe flags; anything left out comes from the config file.
#[derive(Args, Debug)]
struct GroupArgs {
    #[arg(long, value_enum)]
    recipe: Option<Recipe>,

    /// Kissing Schottky: b circle parameter
    #[arg(long)]
    y: Option<f64>,

    /// Kissing Schottky: a circle parameter
    #[arg(long)]
    v: Option<f64>,

    /// Trace of a as RE[,IM]
    #[arg(long, value_parser = parse_complex, allow_hyphen_values = true)]
    ta: Option<[f64; 2]>,

    /// Trace of b as RE[,IM]
    #[arg(long, value_parser = parse_complex, allow_hyphen_values = true)]
    tb: Option<[f64; 2]>,
}

fn parse_complex(s: &str) -> std::result::Result<[f64; 2], String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad number '{part}': {e}"))
    };
    match s.split_once(',') {
        Some((re, im)) => Ok([parse(re)?, parse(im)?]),
        None => Ok([parse(s)?, 0.0]),
    }
}

impl GroupArgs {
    fn resolve(&self, base: GroupConfig) -> GroupConfig {
        let recipe = self.recipe.unwrap_or(match base {
            GroupConfig::Kissing { .. } => Recipe::Kissing,
            GroupConfig::Grandma { .. } => Recipe::Grandma,
            GroupConfig::Jorgensen { .. } => Recipe::Jorgensen,
        });
        let (y, v) = match base {
            GroupConfig::Kissing { y, v } => (y, v),
            _ => (1.0, 0.5),
        };
        let (ta, tb) = match base {
            GroupConfig::Grandma { ta, tb } | GroupConfig::Jorgensen { ta, tb } => (ta, tb),
            _ => ([2.0, 0.0], [2.0, 0.0]),
        };
        let (ta, tb) = (self.ta.unwrap_or(ta), self.tb.unwrap_or(tb));
        match recipe {
            Recipe::Kissing => GroupConfig::Kissing {
                y: self.y.unwrap_or(y),
                v: self.v.unwrap_or(v),
            },
            Recipe::Grandma => GroupConfig::Grandma { ta, tb },
            Recipe::Jorgensen => GroupConfig::Jorgensen { ta, tb },
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn word_or(word: Option<&Word>, fallback: &str) -> Result<Word> {
    match word {
        Some(word) => Ok(word.clone()),
        None => Ok(fallback.parse()?),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = IndraConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Limit {
            group,
            eps,
            max_level,
            start,
            end,
            format,
            output,
        } => {
            let mut traversal = config.traversal;
            traversal.eps = eps.unwrap_or(traversal.eps);
            traversal.max_level = max_level.unwrap_or(traversal.max_level);
            // an open end defaults to the first or last subtree
            let range = match (start, end) {
                (None, None) => None,
                _ => Some(WordRange::new(
                    word_or(start.as_ref(), "a")?,
                    word_or(end.as_ref(), "b")?,
                )?),
            };
            cmd_limit(
                group.resolve(config.group),
                traversal,
                range,
                *format,
                output.as_deref(),
            )
        }
        Commands::Tiles {
            group,
            max_level,
            min_radius,
            output,
        } => {
            let mut tiles = config.tiles;
            tiles.max_level = max_level.unwrap_or(tiles.max_level);
            tiles.min_radius = min_radius.unwrap_or(tiles.min_radius);
            cmd_tiles(group.resolve(config.group), tiles, output.as_deref())
        }
        Commands::Word { word, other } => cmd_word(word, other.as_ref()),
    }
}

fn cmd_limit(
    group: GroupConfig,
    traversal: TraversalConfig,
    range: Option<WordRange>,
    format: Format,
    output: Option<&Path>,
) -> Result<()> {
    tracing::info!(
        recipe = group.name(),
        eps = traversal.eps,
        max_level = traversal.max_level,
        "tracing limit set"
    );
    let set = group.build().context("failed to build generators")?;
    let commutator = set.commutator_trace();
    if (commutator + 2.0).norm() > 1e-6 {
        tracing::warn!(%commutator, "commutator is not parabolic; the limit set is not a curve");
    }

    let curve = match range {
        Some(range) => LimitCurve::trace_range(&set.generators, traversal, range),
        None => LimitCurve::trace(&set.generators, traversal),
    }
    .context("traversal failed")?;

    let mut out = open_output(output)?;
    write_curve(&mut out, &curve, format)?;
    tracing::info!(points = curve.len(), closed = curve.closed, "done");
    Ok(())
}

fn cmd_tiles(group: GroupConfig, config: TileConfig, output: Option<&Path>) -> Result<()> {
    tracing::info!(
        recipe = group.name(),
        max_level = config.max_level,
        min_radius = config.min_radius,
        "enumerating tiles"
    );
    let set = group.build().context("failed to build generators")?;
    let Some(circles) = &set.circles else {
        bail!("recipe '{}' with these parameters has no seed circles", group.name());
    };

    let mut out = open_output(output)?;
    writeln!(out, "{TILE_HEADER}")?;
    let mut count = 0usize;
    for tile in Tiles::new(&set.generators, circles, config)? {
        write_tile(&mut out, &tile.context("tile enumeration failed")?)?;
        count += 1;
    }
    out.flush()?;
    tracing::info!(tiles = count, "done");
    Ok(())
}

fn cmd_word(word: &Word, other: Option<&Word>) -> Result<()> {
    let tags: Vec<String> = word.tags().iter().map(|t| t.index().to_string()).collect();
    let inverse: String = word.tags().iter().rev().map(|t| t.inverse().letter()).collect();
    println!("word:     {word}");
    println!("tags:     {}", tags.join(" "));
    println!("length:   {}", word.len());
    println!("inverse:  {inverse}");

    if let Some(other) = other {
        let relation = match word.cmp(other) {
            std::cmp::Ordering::Less => "<",
            std::cmp::Ordering::Equal => "=",
            std::cmp::Ordering::Greater => ">",
        };
        println!("order:    {word} {relation} {other}");
        if other.starts_with(word) && other != word {
            println!("subtree:  {other} lies below {word}");
        }
    }
    Ok(())
}
