use anyhow::{Context, Result};
use chartdeck::assign::{self, EditEvent};
use chartdeck::catalog::{self, DatasetCatalog};
use chartdeck::compiler;
use chartdeck::model::{ChartDocument, ContainerSize};
use chartdeck::preview::{self, PreviewConfig};
use chartdeck::rows::{self, RowSet};
use chartdeck::validate;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "chartdeck")]
#[command(about = "Edit chart configurations and compile them into chart options", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a chart document and result rows into a chart option (JSON)
    Compile {
        #[command(flatten)]
        input: RenderInput,

        #[arg(long = "compact", help = "Print JSON on a single line")]
        compact: bool,
    },
    /// Apply a list of edit events to a chart document
    Apply {
        #[arg(short = 'd', long = "document", help = "Chart document JSON")]
        document: PathBuf,

        #[arg(short = 'e', long = "events", help = "JSON array of edit events")]
        events: PathBuf,
    },
    /// Check whether a chart document can be committed
    Validate {
        #[arg(short = 'd', long = "document", help = "Chart document JSON")]
        document: PathBuf,

        #[arg(short = 'c', long = "catalog", help = "Dataset catalog JSON used to flag stale fields")]
        catalog: Option<PathBuf>,
    },
    /// Draw a PNG preview of the compiled chart to stdout or a file
    Preview {
        #[command(flatten)]
        input: RenderInput,

        #[arg(short = 'o', long = "output", help = "Output file (defaults to stdout)")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RenderInput {
    #[arg(short = 'd', long = "document", help = "Chart document JSON")]
    document: PathBuf,

    #[arg(short = 'r', long = "rows", default_value = "-", help = "Result rows CSV ('-' reads stdin)")]
    rows: PathBuf,

    #[arg(long = "width", help = "Container width in pixels (defaults to the document's)")]
    width: Option<u32>,

    #[arg(long = "height", help = "Container height in pixels (defaults to the document's)")]
    height: Option<u32>,
}

impl RenderInput {
    /// Document with the size overrides applied, plus its rows cut to the result limit
    fn load(&self) -> Result<(ChartDocument, RowSet)> {
        let mut document = read_document(&self.document)?;
        if let Some(width) = self.width {
            document.container.width = width as f64;
        }
        if let Some(height) = self.height {
            document.container.height = height as f64;
        }

        let rows = rows::load(&self.rows).context("Failed to read result rows")?;
        let rows = rows.limited(document.data.result_limit.max_rows());
        Ok((document, rows))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Compile { input, compact } => {
            let (document, rows) = input.load()?;
            let spec = compiler::compile(&rows, document.kind, &document.data, &document.style, document.container);
            let json = if compact {
                serde_json::to_string(&spec)
            } else {
                serde_json::to_string_pretty(&spec)
            }
            .context("Failed to serialize chart option")?;
            write_stdout(format!("{}\n", json).as_bytes())
        }
        Command::Apply { document, events } => {
            let mut document = read_document(&document)?;
            let text = fs::read_to_string(&events)
                .with_context(|| format!("Failed to read events from {}", events.display()))?;
            let events: Vec<EditEvent> = serde_json::from_str(&text).context("Failed to parse edit events")?;

            for (i, event) in events.into_iter().enumerate() {
                document = assign::apply(&document, event)
                    .map_err(|rejection| anyhow::anyhow!("{} ({})", rejection, rejection.key()))
                    .with_context(|| format!("Edit event #{} was rejected", i))?;
            }

            let json = serde_json::to_string_pretty(&document).context("Failed to serialize chart document")?;
            write_stdout(format!("{}\n", json).as_bytes())
        }
        Command::Validate { document, catalog } => {
            let mut document = read_document(&document)?;
            if let Some(path) = catalog {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
                let catalog: DatasetCatalog = serde_json::from_str(&text).context("Failed to parse dataset catalog")?;
                catalog::mark_stale_fields(&mut document.data, &catalog);
            }

            match validate::validate_for_commit(&document.data, document.kind) {
                Ok(()) => write_stdout(b"ok\n"),
                Err(err) => {
                    write_stdout(format!("{}\n", err.key()).as_bytes())?;
                    anyhow::bail!("Chart document is not valid: {}", err)
                }
            }
        }
        Command::Preview { input, output } => {
            let (document, rows) = input.load()?;
            let spec = compiler::compile(&rows, document.kind, &document.data, &document.style, document.container);
            let config = preview_size(document.container)?;
            let png_bytes = preview::render_png(&spec, &config).context("Failed to render preview")?;

            match output {
                Some(path) => fs::write(&path, &png_bytes)
                    .with_context(|| format!("Failed to write PNG to {}", path.display())),
                None => write_stdout(&png_bytes),
            }
        }
    }
}

fn read_document(path: &Path) -> Result<ChartDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chart document from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse chart document {}", path.display()))
}

fn preview_size(size: ContainerSize) -> Result<PreviewConfig> {
    if size.is_degenerate() {
        anyhow::bail!("Cannot preview a {}x{} container", size.width, size.height);
    }
    Ok(PreviewConfig { width: size.width.round() as u32, height: size.height.round() as u32 })
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(bytes).context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
