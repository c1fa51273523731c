//! Oasify CLI
//!
//! Command-line interface for converting Postman collections into OpenAPI 3
//! specifications.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use oasify_common::{ConversionLog, ConvertOptions, InfoOverride};
use oasify_generator::{convert_file, inject_file, PrimaryConverter, StrictConverter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "oasify")]
#[command(version, about = "Convert Postman collections into OpenAPI 3 specifications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Postman collection into an OpenAPI YAML document
    #[command(after_help = "EXAMPLES:\n  \
        # Convert with the collection's own metadata\n  \
        oasify convert collection.json openapi.yaml\n\n  \
        # Override title and version, tag root requests as \"Misc\"\n  \
        oasify convert collection.json out/openapi.yaml \\\n    \
        --title \"Shop API\" \\\n    \
        --api-version 2.0.0 \\\n    \
        --tag Misc")]
    Convert {
        /// Path to the Postman collection (JSON, UTF-8 or UTF-16)
        input: PathBuf,

        /// Path of the OpenAPI YAML file to write
        output: PathBuf,

        /// Skip the strict converter and synthesize the document directly
        #[arg(long)]
        fallback_only: bool,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Add example responses from a collection to an existing OpenAPI file
    #[command(after_help = "EXAMPLES:\n  \
        # Enrich a document produced by another tool, in place\n  \
        oasify inject collection.json openapi.yaml --title \"Shop API\"")]
    Inject {
        /// Path to the Postman collection
        collection: PathBuf,

        /// Path to the OpenAPI YAML file (rewritten in place)
        openapi: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args, Debug, Default)]
struct OptionArgs {
    /// Options file (YAML or JSON); flags below override its values
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// API title
    #[arg(short, long)]
    title: Option<String>,

    /// API description
    #[arg(short, long)]
    description: Option<String>,

    /// API version
    #[arg(short = 'v', long)]
    api_version: Option<String>,

    /// Tag for requests outside any folder
    #[arg(short = 'g', long)]
    tag: Option<String>,
}

impl OptionArgs {
    /// Options file first, then flag overrides
    fn resolve(&self) -> Result<ConvertOptions> {
        let mut options = match &self.options {
            Some(path) => ConvertOptions::load(path)
                .with_context(|| format!("Failed to load options from {}", path.display()))?,
            None => ConvertOptions::default(),
        };

        if let Some(tag) = &self.tag {
            options.default_tag = tag.clone();
        }
        options.info = options.info.merged_with(InfoOverride {
            title: self.title.clone(),
            description: self.description.clone(),
            version: self.api_version.clone(),
        });

        Ok(options)
    }
}

/// Colored terminal output; progress lines only in verbose mode
struct ConsoleLog {
    verbose: bool,
}

impl ConversionLog for ConsoleLog {
    fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "→".cyan(), message);
        }
    }

    fn success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }
    let log = ConsoleLog {
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Convert {
            input,
            output,
            fallback_only,
            options,
        } => {
            convert_command(&input, &output, fallback_only, &options.resolve()?, &log)?;
        }
        Commands::Inject {
            collection,
            openapi,
            options,
        } => {
            inject_command(&collection, &openapi, &options.resolve()?, &log)?;
        }
    }

    Ok(())
}

fn convert_command(
    input: &Path,
    output: &Path,
    fallback_only: bool,
    options: &ConvertOptions,
    log: &ConsoleLog,
) -> Result<()> {
    if !input.exists() {
        bail!("Input file does not exist: {}", input.display());
    }

    println!(
        "{} Converting Postman collection: {}",
        "→".cyan(),
        input.display()
    );
    if log.verbose {
        println!("  Output: {}", output.display());
        println!("  Default tag: {}", options.default_tag);
    }

    let strict = StrictConverter::new();
    let primary: Option<&dyn PrimaryConverter> = if fallback_only {
        None
    } else {
        Some(&strict)
    };

    let conversion = convert_file(input, output, options, primary, log)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    if conversion.used_fallback {
        println!(
            "{} Document synthesized directly from the collection",
            "→".cyan()
        );
    }
    println!(
        "{} Enhanced {} API endpoints with example responses",
        "✓".green(),
        conversion.enhanced_count
    );
    println!("\n{}", "✓ Conversion complete!".green().bold());
    println!("  📄 {}", output.display());

    Ok(())
}

fn inject_command(
    collection: &Path,
    openapi: &Path,
    options: &ConvertOptions,
    log: &ConsoleLog,
) -> Result<()> {
    for path in [collection, openapi] {
        if !path.exists() {
            bail!("Input file does not exist: {}", path.display());
        }
    }

    println!(
        "{} Injecting examples from {} into {}",
        "→".cyan(),
        collection.display(),
        openapi.display()
    );

    let enhanced_count = inject_file(collection, openapi, options, log)
        .with_context(|| format!("Failed to enrich {}", openapi.display()))?;

    println!(
        "{} Enhanced {} API endpoints with example responses",
        "✓".green(),
        enhanced_count
    );

    Ok(())
}
