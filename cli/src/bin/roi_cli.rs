use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use roi_bridge::{
    fetch_objects, io, send_objects, ConverterOptions, MemoryRoiStore, ShapeConverter,
};
use roi_cli::{load_options, read_rois, schema_json, write_rois};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a GeoJSON object file into a JSON batch of ROIs
    Export {
        /// GeoJSON file with the local objects
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the ROI batch
        #[arg(short, long)]
        output: PathBuf,
        /// Converter options (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Convert a JSON batch of ROIs into a GeoJSON object file
    Import {
        /// ROI batch file
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the GeoJSON objects
        #[arg(short, long)]
        output: PathBuf,
        /// Converter options (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write GeoJSON objects into a JSON-file ROI store
    Push {
        /// GeoJSON file with the local objects
        #[arg(short, long)]
        input: PathBuf,
        /// Store file, created when missing
        #[arg(short, long)]
        store: PathBuf,
        /// Delete the ROIs already in the store once the new ones are written
        #[arg(long)]
        replace: bool,
        /// Converter options (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Read every ROI of a JSON-file store into a GeoJSON object file
    Pull {
        /// Store file
        #[arg(short, long)]
        store: PathBuf,
        /// Where to write the GeoJSON objects
        #[arg(short, long)]
        output: PathBuf,
        /// Converter options (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the JSON schema of the ROI batch format
    Schema {
        /// Print the schema of the converter options instead
        #[arg(long)]
        options: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Export { input, output, config } => {
            export(input, output, config.as_deref())?;
        }
        Commands::Import { input, output, config } => {
            import(input, output, config.as_deref())?;
        }
        Commands::Push { input, store, replace, config } => {
            push(input, store, *replace, config.as_deref())?;
        }
        Commands::Pull { store, output, config } => {
            pull(store, output, config.as_deref())?;
        }
        Commands::Schema { options } => {
            println!("{}", schema_json(*options)?);
        }
    }

    Ok(())
}

fn converter(options: ConverterOptions) -> ShapeConverter {
    ShapeConverter::builder().options(options).build()
}

fn export(input: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let converter = converter(load_options(config)?);
    let objects = io::from_geojson_file(input)?;
    info!("Read {} top-level object(s) from {:?}", objects.len(), input);

    let rois = converter.to_remote_rois(&objects);
    write_rois(output, &rois)?;
    info!("Wrote {} ROI(s) to {:?}", rois.len(), output);
    Ok(())
}

fn import(input: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let options = load_options(config)?;
    let segments = options.ellipse_segments;
    let converter = converter(options);

    let rois = read_rois(input)?;
    let mut classes: BTreeSet<String> = BTreeSet::new();
    let objects = converter.to_local_objects(&rois, &mut classes);
    log_classes(&classes);

    io::save_geojson(&objects, segments, output)?;
    info!("Wrote {} top-level object(s) to {:?}", objects.len(), output);
    Ok(())
}

fn push(input: &Path, store_path: &Path, replace: bool, config: Option<&Path>) -> Result<()> {
    let converter = converter(load_options(config)?);
    let objects = io::from_geojson_file(input)?;

    let mut store = MemoryRoiStore::from_json_file(store_path)?;
    let report = send_objects(&converter, &mut store, &objects, replace)?;
    store.to_json_file(store_path)?;

    info!(
        "Store {:?} now holds {} ROI(s) ({} written, {} deleted)",
        store_path,
        store.len(),
        report.written,
        report.deleted
    );
    Ok(())
}

fn pull(store_path: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let options = load_options(config)?;
    let segments = options.ellipse_segments;
    let converter = converter(options);

    let store = MemoryRoiStore::from_json_file(store_path)?;
    let mut classes: BTreeSet<String> = BTreeSet::new();
    let objects = fetch_objects(&converter, &store, &mut classes)?;
    log_classes(&classes);

    io::save_geojson(&objects, segments, output)?;
    info!("Wrote {} top-level object(s) to {:?}", objects.len(), output);
    Ok(())
}

fn log_classes(classes: &BTreeSet<String>) {
    if !classes.is_empty() {
        info!(
            "Classes seen: {}",
            classes.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
}
