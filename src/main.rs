use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::{Attribute, Print, SetAttribute};
use ropey::Rope;
use tracing_subscriber::EnvFilter;

use ai_textobjects::{
    AiType, Config, LineSource, Outcome, Position, Query, Region, Resolver, SearchMethod, Side,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find the textobject around a position", long_about = None)]
struct Args {
    /// File to search (stdin if omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Cursor line (1-based)
    #[arg(short, long)]
    line: usize,

    /// Cursor byte column (1-based)
    #[arg(short, long)]
    col: usize,

    /// Textobject id, e.g. `)`, `q`, `a`
    #[arg(long)]
    id: char,

    /// Select inside instead of around
    #[arg(short, long)]
    inside: bool,

    #[arg(short = 'n', long)]
    n_times: Option<usize>,

    /// Lines searched around the reference before giving up
    #[arg(long)]
    n_lines: Option<usize>,

    /// cover, cover_or_next, cover_or_prev, cover_or_nearest, next, prev or nearest
    #[arg(short, long)]
    search_method: Option<SearchMethod>,

    /// End line of a selection to search from
    #[arg(long, requires = "to_col")]
    to_line: Option<usize>,

    /// End column of a selection to search from
    #[arg(long, requires = "to_line")]
    to_col: Option<usize>,

    /// Print where the cursor moves instead of the region
    #[arg(long, value_enum)]
    goto: Option<Goto>,

    /// Left edge for the `?` textobject
    #[arg(long)]
    left: Option<String>,

    /// Right edge for the `?` textobject
    #[arg(long)]
    right: Option<String>,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the buffer with the region in reverse video
    #[arg(long)]
    highlight: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Goto {
    Left,
    Right,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };

    let text = match &args.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };
    let rope = Rope::from_str(&text);

    let cursor = Position::new(args.line, args.col);
    let ai_type = if args.inside {
        AiType::Inside
    } else {
        AiType::Around
    };
    let mut query = Query::new(args.id, ai_type);
    query.options = config.options();
    if let Some(n) = args.n_times {
        query.options.n_times = n;
    }
    if let Some(n) = args.n_lines {
        query.options.n_lines = n;
    }
    if let Some(method) = args.search_method {
        query.options.search_method = method;
    }
    if let (Some(line), Some(col)) = (args.to_line, args.to_col) {
        query.options.reference_region = Some(Region::new(cursor, Position::new(line, col)));
    }

    let (left, right) = (args.left.clone(), args.right.clone());
    let mut prompt = |label: &str| {
        if label.starts_with("Left") {
            left.clone()
        } else {
            right.clone()
        }
    };

    let mut resolver = Resolver::from_config(&config);
    match args.goto {
        Some(goto) => {
            let side = match goto {
                Goto::Left => Side::Left,
                Goto::Right => Side::Right,
            };
            match resolver.move_cursor(&rope, cursor, &query, side, &mut prompt)? {
                Outcome::Found(position) => println!("{position}"),
                Outcome::Failed(failure) => {
                    eprintln!("{failure}");
                    std::process::exit(1);
                }
            }
        }
        None => match resolver.find_textobject(&rope, cursor, &query, &mut prompt)? {
            Outcome::Found(region) => {
                println!("{region}");
                if args.highlight {
                    highlight(&rope, &region).context("failed to write output")?;
                }
            }
            Outcome::Failed(failure) => {
                eprintln!("{failure}");
                std::process::exit(1);
            }
        },
    }
    Ok(())
}

/// Print every line of `rope` with `region` in reverse video.
fn highlight(rope: &Rope, region: &Region) -> Result<()> {
    let mut out = io::stdout().lock();
    for number in 1..=LineSource::line_count(rope) {
        let line = LineSource::line(rope, number);
        let (from, to) = line_selection(&line, number, region);
        crossterm::queue!(
            out,
            Print(&line[..from]),
            SetAttribute(Attribute::Reverse),
            Print(&line[from..to]),
            SetAttribute(Attribute::Reset),
            Print(&line[to..]),
            Print("\n"),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Byte range of `line` (number `number`) inside `region`, on char boundaries.
fn line_selection(line: &str, number: usize, region: &Region) -> (usize, usize) {
    if region.is_empty() || number < region.left.line || number > region.right.line {
        return (0, 0);
    }
    let from = if number == region.left.line {
        region.left.col.saturating_sub(1)
    } else {
        0
    };
    let to = if number == region.right.line {
        region.right.col
    } else {
        line.len()
    };
    let from = char_boundary(line, from);
    let to = char_boundary(line, to).max(from);
    (from, to)
}

fn char_boundary(line: &str, mut idx: usize) -> usize {
    idx = idx.min(line.len());
    while !line.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
