//! Megascans Materializer CLI
//!
//! Browse a local asset library and materialize assets into a scene dump.

use clap::{Parser, Subcommand};
use megascans_materializer::{
    AssetType, Config, HostVersion, Listing, Materializer, Mode, SceneDb, Status, TreeRef,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "megascans")]
#[command(author, version, about = "Index a scanned-asset library and materialize assets", long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, global = true, default_value = "megascans.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List assets of one type by category
    List {
        /// Asset type (e.g., "3d", "surface", "brush")
        #[arg(short, long, value_parser = parse_asset_type)]
        r#type: AssetType,

        /// Category (defaults to ALL)
        #[arg(long)]
        category: Option<String>,

        /// Subcategory (defaults to ALL)
        #[arg(long)]
        subcategory: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Search assets of one type by pattern
    Search {
        /// Asset type (e.g., "3d", "surface", "brush")
        #[arg(short, long, value_parser = parse_asset_type)]
        r#type: AssetType,

        /// Case-insensitive pattern matched against the search string
        pattern: String,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show details of one asset
    Details {
        /// Asset id
        asset_id: String,
    },

    /// Materialize an asset into a fresh scene
    Materialize {
        /// Asset id
        asset_id: String,

        /// Materialization mode (defaults by asset type)
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Host version the graphs are built for (e.g., "4.1")
        #[arg(long, default_value = "4.2", value_parser = parse_host_version)]
        host_version: HostVersion,

        /// Write the resulting scene as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_asset_type(s: &str) -> Result<AssetType, String> {
    AssetType::from_key(s).ok_or_else(|| format!("Unknown asset type: '{}'", s))
}

fn parse_host_version(s: &str) -> Result<HostVersion, String> {
    let parts: Vec<u32> = s
        .split('.')
        .map(|p| p.parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("Invalid version format: '{}'. Use major.minor[.patch]", s))?;
    match parts.as_slice() {
        [major, minor] => Ok(HostVersion::new(*major, *minor, 0)),
        [major, minor, patch] => Ok(HostVersion::new(*major, *minor, *patch)),
        _ => Err(format!("Invalid version format: '{}'. Use major.minor[.patch]", s)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = Config::from_file(&cli.config)?;
    let mut materializer = Materializer::new(config);

    match cli.command {
        Commands::List {
            r#type,
            category,
            subcategory,
            page,
        } => {
            let listing = materializer.list(
                r#type,
                category.as_deref(),
                subcategory.as_deref(),
                None,
                page,
            );
            print_listing(&listing);
        }
        Commands::Search {
            r#type,
            pattern,
            page,
        } => {
            let listing = materializer.list(r#type, None, None, Some(&pattern), page);
            print_listing(&listing);
        }
        Commands::Details { asset_id } => {
            let details = materializer.preview_details(&asset_id)?;
            println!("{} ({})", details.name, details.id);
            println!("  Type: {}", details.asset_type);
            println!("  Canonical name: {}", details.canonical_name);
            println!("  Directory: {:?}", details.directory);
            match details.preview_size {
                Some([w, h]) => println!("  Preview: {:?} ({}x{})", details.preview, w, h),
                None => println!("  Preview: {:?}", details.preview),
            }
            if !details.tags.is_empty() {
                println!("  Tags: {}", details.tags.join(", "));
            }
            for (label, value) in &details.meta {
                println!("  {}: {}", label, value);
            }
        }
        Commands::Materialize {
            asset_id,
            mode,
            host_version,
            output,
        } => {
            let mode = match mode {
                Some(mode) => mode,
                None => Mode::for_asset(materializer.preview_details(&asset_id)?.asset_type),
            };
            let mut scene = scratch_scene(host_version);
            let report = materializer.materialize(&mut scene, &asset_id, mode);
            println!("{}", report);

            if let Some(path) = output {
                fs::write(&path, serde_json::to_string_pretty(&scene)?)?;
                println!("Wrote scene to {:?}", path);
            }
            if report.status == Status::Cancelled {
                return Err(report.message.into());
            }
        }
    }

    Ok(())
}

/// A scene with an open material editor and an active brush, so every mode has a target.
fn scratch_scene(version: HostVersion) -> SceneDb {
    let mut scene = SceneDb::new(version);
    scene.ensure_material("Material");
    scene.editor = Some(TreeRef::Material("Material".to_string()));
    scene.add_brush("TexDraw");
    scene
}

fn print_listing(listing: &Listing) {
    if let Some(reason) = &listing.missing {
        println!("Library missing: {}", reason);
        return;
    }
    println!(
        "Page {}/{} ({} assets)",
        listing.page, listing.total_pages, listing.total
    );
    for asset in &listing.assets {
        println!("  {:<12} {:<10} {}", asset.id, asset.asset_type, asset.name);
    }
}
