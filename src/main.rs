use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{error, info, LevelFilter};

use legoworship::catalog::{self, Layout, OutputFormat, SortBy};
use legoworship::page::{self, PageOptions};
use legoworship::resource::{self, CollectOptions, Extensions, ResourceType};

#[derive(Parser)]
#[command(
    name = "legoworship",
    about = "Sort a song catalog by pinyin title and write it out for the site",
    version
)]
struct Cli {
    /// Catalog csv file to read
    input: PathBuf,

    /// File to write the sorted catalog to
    output: PathBuf,

    /// Output format (default: inferred from the output extension)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Input uses the legacy `name,key,hymn_ref,sheet_type` header
    #[arg(long)]
    legacy: bool,

    /// Field to sort by
    #[arg(short, long, value_enum, default_value_t = SortBy::Title)]
    sort_by: SortBy,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Also write one song page per song into this directory
    #[arg(long)]
    pages: Option<PathBuf>,

    /// Sheet library searched for each song's sheets
    #[arg(long, requires = "pages")]
    sheets: Option<PathBuf>,

    /// Site root stripped from sheet paths to build links
    #[arg(long, default_value = "docs")]
    site_root: PathBuf,

    /// Library searched for each song's resources to collect
    #[arg(long, requires = "collect_into")]
    collect_from: Option<PathBuf>,

    /// Copy collected resources into `<DIR>/<title>/`
    #[arg(long, requires = "collect_from")]
    collect_into: Option<PathBuf>,

    /// Kind of resource to collect
    #[arg(long, value_enum, default_value_t = ResourceType::Sheet)]
    resource_type: ResourceType,

    /// Collect only files with this extension instead of the type's defaults
    #[arg(long)]
    extension: Option<String>,

    /// Copy collected resources straight into the collect directory
    #[arg(long, requires = "collect_into")]
    flat: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize the logger
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    let mut logger = pretty_env_logger::formatted_builder();
    logger.filter(None, level);
    if let Ok(filters) = env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> legoworship::Result<()> {
    let layout = if cli.legacy {
        Layout::Legacy
    } else {
        Layout::Catalog
    };

    let mut songs = catalog::load(&cli.input, layout)?;
    catalog::derive_sort_keys(&mut songs)?;
    catalog::sort(&mut songs, cli.sort_by, cli.desc);

    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&cli.output));
    catalog::write(&songs, &cli.output, format)?;

    if let (Some(library), Some(destination)) = (cli.collect_from, cli.collect_into) {
        let options = CollectOptions {
            library,
            destination,
            extensions: Extensions::new(cli.resource_type, cli.extension.as_deref()),
            subfolder: !cli.flat,
        };
        let copied = resource::collect_resources(&songs, &options)?;
        info!("Copied {} resources to {}", copied, options.destination.display());
    }

    if let Some(page_dir) = cli.pages {
        let options = PageOptions {
            page_dir,
            sheet_library: cli.sheets,
            site_root: cli.site_root,
        };
        let written = page::write_pages(&songs, &options)?;
        info!("Wrote {} song pages to {}", written, options.page_dir.display());
    }

    Ok(())
}
