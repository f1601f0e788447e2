//! seqview - Terminal Sequence Layout Viewer
//!
//! Shows a DNA/RNA sequence as rows of codon groups with their translation
//! and stacked annotation lanes.
//!
//! ## Usage
//!
//! ```bash
//! seqview <sequence_file>
//! seqview -a features.tsv -r 2 <sequence_file>   # Annotations, frame +2
//! seqview -w 30 -o - <sequence_file>             # Text layout on stdout
//! ```
//!
//! ## Supported Formats
//!
//! - FASTA (.fasta, .fa, .fas, .fna, .ffn, .frn), first record only
//! - Plain sequence text (any other extension)
//!
//! ## Navigation (Vim-style)
//!
//! - `h/j/k/l`: Move left/down/up/right
//! - `1/2/3`: Reading frame
//! - `:q`: Quit
//! - `:h`: Help

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use seqview::config::LayoutConfig;
use seqview::controller::run_app;
use seqview::formats::annotations::load_annotations_file;
use seqview::formats::{load_sequence_file, InputFormat};
use seqview::genetic_code::GeneticCode;
use seqview::layout::SequenceLayout;
use seqview::logging;
use seqview::model::{Annotation, AppState, Sequence};
use seqview::segment::ReadingFrame;
use seqview::text_view::write_layout;
use seqview::ui::glyphs;

/// File format specification for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// FASTA format
    Fasta,
    /// Bare sequence text
    Plain,
    /// Auto-detect from extension and content
    Auto,
}

impl From<FormatArg> for Option<InputFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fasta => Some(InputFormat::Fasta),
            FormatArg::Plain => Some(InputFormat::Plain),
            FormatArg::Auto => None,
        }
    }
}

/// seqview - A Vim-style terminal viewer for annotated DNA/RNA sequences
///
/// When run without -o/--output, opens an interactive TUI viewer.
/// With -o/--output, writes the text layout to a file (or stdout with "-").
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sequence file to display (FASTA or plain sequence)
    file: PathBuf,

    /// Tab-separated annotation file: start, end, label, [color], [type]
    #[arg(short = 'a', long = "annotations")]
    annotations: Option<PathBuf>,

    /// Force a specific file format (overrides auto-detection)
    #[arg(short = 'f', long = "format", value_enum, default_value = "auto")]
    format: FormatArg,

    /// Reading frame (1-3, default: 1)
    #[arg(short = 'r', long = "reading-frame", default_value = "1")]
    reading_frame: u8,

    /// Bases per row (default: 60)
    #[arg(short = 'w', long = "width", default_value = "60")]
    width: usize,

    /// Genetic code for translation (NCBI id, default: 1 = Standard)
    #[arg(short = 'g', long = "genetic-code", default_value = "1")]
    genetic_code: u8,

    /// Hide the translation line
    #[arg(long = "no-translation")]
    no_translation: bool,

    /// Output file (enables text mode). Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Draw annotation bars with box-drawing glyphs
    #[arg(long = "fancy")]
    fancy: bool,
}

/// Builds the layout configuration from validated arguments.
fn layout_config(args: &Args) -> Result<LayoutConfig> {
    if !(1..=3).contains(&args.reading_frame) {
        anyhow::bail!("Reading frame must be 1-3 (got {})", args.reading_frame);
    }
    if args.width == 0 {
        anyhow::bail!("Row width must be at least 1");
    }
    let Some(code) = GeneticCode::by_id(args.genetic_code) else {
        let known: Vec<String> = GeneticCode::all().map(|c| c.id.to_string()).collect();
        anyhow::bail!(
            "Unknown genetic code: {} (available: {})",
            args.genetic_code,
            known.join(", ")
        );
    };

    Ok(LayoutConfig::default()
        .with_row_width(args.width)
        .with_frame(ReadingFrame::from_offset(args.reading_frame as usize - 1))
        .with_genetic_code(code)
        .with_translation(!args.no_translation))
}

/// Runs text mode: lay out the sequence and write it to output.
fn run_text_mode(
    sequence: &Sequence,
    annotations: &[Annotation],
    config: &LayoutConfig,
    output: &str,
    fancy: bool,
) -> Result<()> {
    let layout = SequenceLayout::compute(sequence, config);
    let glyphs = glyphs::select(fancy);

    if output == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_layout(&mut handle, sequence, &layout, annotations, config, &glyphs)?;
    } else {
        let file = File::create(output).with_context(|| format!("Cannot create {}", output))?;
        let mut writer = BufWriter::new(file);
        write_layout(&mut writer, sequence, &layout, annotations, config, &glyphs)?;
        writer.flush()?;
        eprintln!("Wrote {} rows to {}", layout.row_count(), output);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = layout_config(&args)?;

    if args.output.is_some() {
        logging::init_stderr()?;
    } else {
        logging::init_file()?;
    }

    let sequence = load_sequence_file(&args.file, args.format.into())
        .with_context(|| format!("Cannot load {}", args.file.display()))?;
    let annotations = match &args.annotations {
        Some(path) => load_annotations_file(path)
            .with_context(|| format!("Cannot load annotations from {}", path.display()))?,
        None => Vec::new(),
    };
    info!(
        bases = sequence.len(),
        seq_type = %sequence.seq_type(),
        annotations = annotations.len(),
        "sequence loaded"
    );

    if let Some(output) = args.output.as_deref() {
        run_text_mode(&sequence, &annotations, &config, output, args.fancy)?;
    } else {
        let mut state = AppState::new(sequence, annotations, config);
        state.fancy_glyphs = args.fancy;
        run_app(state)?;
    }

    Ok(())
}
