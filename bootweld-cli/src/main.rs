//! Bootweld CLI - executable jar assembly.
//!
//! Welds a compiled application jar, its dependency jars and a boot loader
//! jar into one self-executing archive.

mod commands;

use clap::{Parser, Subcommand};
use commands::{cmd_assemble, cmd_list};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bootweld")]
#[command(author, version, about = "Executable jar assembler")]
#[command(long_about = "
Bootweld assembles self-executing jars: the application's classes land under
BOOT-INF/classes/, dependency jars are embedded uncompressed under
BOOT-INF/lib/, and the boot loader's classes sit at the archive root with a
manifest pointing the JVM at the launcher.

Examples:
  bootweld assemble app.jar --loader loader.jar --main-class com.acme.App \\
      --lib libs/a.jar --lib libs/b.jar -o app-boot.jar
  bootweld list app-boot.jar
  bootweld list app-boot.jar --json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble an executable jar
    #[command(alias = "a")]
    Assemble {
        /// Compiled application jar to embed
        source: PathBuf,

        /// Boot loader jar whose classes run first
        #[arg(short = 'L', long)]
        loader: PathBuf,

        /// Output jar path
        #[arg(short, long)]
        output: PathBuf,

        /// Application entry-point class
        #[arg(short, long)]
        main_class: String,

        /// Dependency jar to embed (repeatable, classpath order)
        #[arg(short, long = "lib")]
        lib: Vec<PathBuf>,

        /// Loader version recorded in the manifest
        #[arg(short = 'V', long, default_value = "3.2.0")]
        version_tag: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List contents of a jar or zip archive
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assemble {
            source,
            loader,
            output,
            main_class,
            lib,
            version_tag,
            verbose,
        } => cmd_assemble(
            &source,
            &loader,
            &output,
            &main_class,
            &lib,
            &version_tag,
            verbose,
        ),
        Commands::List {
            archive,
            verbose,
            json,
        } => cmd_list(&archive, verbose, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
