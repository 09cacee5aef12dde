use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use sortfile::page_store::PageStore;
use sortfile::sorted_file::{Record, SortConfig, SortField, SortedFile, Sorter};
use sortfile::utils;

#[derive(Parser)]
#[command(name = "sortfile")]
#[command(about = "Sort files of fixed-length records on a paged store with a bounded block budget")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, help = "Configuration file path (JSON)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Verbose output")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Sort a file by one of its fields into a new sorted file
    Sort {
        input: PathBuf,
        output: PathBuf,

        #[arg(short, long, default_value_t = 0, help = "Field index: 0 id, 1 name, 2 surname, 3 city")]
        field: u8,

        #[arg(short, long, help = "Memory budget in blocks (minimum 3)")]
        buffer_size: Option<usize>,
    },

    /// Print every record of a sorted file as a fixed-width table
    Print { file: PathBuf },

    /// Create a new, empty sorted file
    Create { file: PathBuf },

    /// Append one record to a sorted file
    Insert {
        file: PathBuf,
        id: i32,
        name: String,
        surname: String,
        city: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SortConfig::from_file(path)?,
        None => SortConfig::default(),
    };
    if args.verbose {
        config.verbose = true;
    }
    utils::setup_logging(config.verbose)?;

    let store = PageStore::new();

    match args.command {
        Command::Sort {
            input,
            output,
            field,
            buffer_size,
        } => {
            if let Some(buffer_size) = buffer_size {
                config.buffer_size = buffer_size;
            }
            let field = SortField::try_from(field)?;
            let sorter = Sorter::new(&store, config, field)?;

            info!("Sorting {} into {}", input.display(), output.display());
            let stats = sorter.sort(&input, &output)?;

            info!("Records sorted: {}", stats.records);
            info!("Data blocks: {}", stats.data_blocks);
            info!("Initial runs: {}", stats.initial_runs);
            info!("Merge passes: {}", stats.merge_passes);
            info!("Elapsed: {} ms", stats.elapsed_ms);
        }
        Command::Print { file } => {
            let mut sorted = SortedFile::open(&store, &file)?;
            let stdout = std::io::stdout();
            sorted.print(&mut stdout.lock())?;
            sorted.close()?;
        }
        Command::Create { file } => {
            SortedFile::create(&store, &file)?;
            info!("Created sorted file {}", file.display());
        }
        Command::Insert {
            file,
            id,
            name,
            surname,
            city,
        } => {
            let record = Record::new(id, &name, &surname, &city)?;
            let mut sorted = SortedFile::open(&store, &file)?;
            sorted.insert(&record)?;
            sorted.close()?;
        }
    }

    Ok(())
}
