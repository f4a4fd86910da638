use clap::{Parser, ValueEnum};
use prisma_uml::graph::Direction;
use prisma_uml::locate::find_schema;
use prisma_uml::measure::TextMetrics;
use prisma_uml::relation::ImplicitGroupPolicy;
use prisma_uml::schema::SchemaDocument;
use prisma_uml::svg::SvgRenderer;
use prisma_uml::theme::{ColorThemeKind, Palette};
use prisma_uml::{Config, Error, build_diagram, build_mermaid};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Svg,
    Mermaid,
}

/// Render a Prisma schema (DMMF JSON) as an entity diagram
#[derive(Parser, Debug)]
#[command(name = "prisma-uml", version)]
#[command(about = "Lay out a data model as a UML-style entity diagram", long_about = None)]
struct Args {
    /// Schema JSON file, or a directory holding schema.json / dmmf.json
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Layout direction: TB or LR
    #[arg(short, long, value_parser = parse_direction)]
    direction: Option<Direction>,

    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Colour theme for SVG output: light, dark, high-contrast, high-contrast-light
    #[arg(long, value_parser = parse_theme)]
    theme: Option<ColorThemeKind>,

    /// Fail on implicit relations that do not pair exactly two fields
    #[arg(long)]
    strict_implicit: bool,

    /// Grow node boxes so the largest model fits its fields
    #[arg(long)]
    fit: bool,
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::from_str(s).ok_or_else(|| format!("expected TB or LR, got {s}"))
}

fn parse_theme(s: &str) -> Result<ColorThemeKind, String> {
    ColorThemeKind::from_str(s).ok_or_else(|| format!("unknown theme {s}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prisma_uml=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(direction) = args.direction {
        config.direction = direction;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if args.strict_implicit {
        config.implicit_policy = ImplicitGroupPolicy::Reject;
    }

    let path = find_schema(&args.input)?;
    let source = fs::read_to_string(&path).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    let document = SchemaDocument::from_json(&source)?;

    if args.fit {
        let (models, _) = prisma_uml::transform::transform(&document);
        config.layout.fit_to_models(&models, &TextMetrics::default());
    }

    let output = match args.format {
        Format::Json => {
            let snapshot = build_diagram(&document, &config)?;
            snapshot.to_json()?
        }
        Format::Svg => {
            let snapshot = build_diagram(&document, &config)?;
            SvgRenderer::default().render(&snapshot, &Palette::for_theme(config.theme), &config.layout)
        }
        Format::Mermaid => build_mermaid(&document, &config)?,
    };

    match &args.output {
        Some(out) => fs::write(out, &output).map_err(|source| Error::Io {
            path: out.clone(),
            source,
        })?,
        None => print!("{output}"),
    }
    Ok(())
}
