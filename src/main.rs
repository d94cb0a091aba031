use clap::{Parser, Subcommand};
use pstwalk::pst::PstArchive;
use pstwalk::walk::{WalkMode, Walker};
use pstwalk::{Result, report, session};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pstwalk")]
#[command(about = "A CLI tool to walk and report the folder and message tree of PST files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the folder hierarchy as an indented tree
    Folders {
        /// Path to the PST file
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Print the subject and plain text body of every message
    Messages {
        /// Path to the PST file
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Open and close the PST file to verify it is readable
    Check {
        /// Path to the PST file
        #[arg(required = true)]
        file: PathBuf,
    },
}

fn print_folders(file: &Path) -> Result<()> {
    let archive = PstArchive::open(file)?;
    session::with_archive(archive, |root| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        report::write_folder_tree(Walker::new(root, WalkMode::Hierarchy), &mut out)?;
        writeln!(out)?;
        Ok(())
    })
}

fn print_messages(file: &Path) -> Result<()> {
    let archive = PstArchive::open(file)?;
    session::with_archive(archive, |root| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        report::write_message_listing(Walker::new(root, WalkMode::Listing), &mut out)?;
        writeln!(out)?;
        Ok(())
    })
}

fn check(file: &Path) -> Result<()> {
    let archive = PstArchive::open(file)?;
    session::with_archive(archive, |_root| Ok(()))
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Folders { file } => print_folders(file),
        Commands::Messages { file } => print_messages(file),
        Commands::Check { file } => check(file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
