use clap::{Parser, Subcommand};
use docgen::{config, generate, logging, output, scan, template::Template};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("DOCGEN_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("DOCGEN_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docgen")]
#[command(about = "Static documentation site generator")]
#[command(long_about = "\
Static documentation site generator

Your filesystem is the data source. Markdown files become HTML pages at the
mirrored path, other files are copied as-is, and every directory with
markdown gets an index page.

Source structure:

  docs/
  ├── docgen.toml                  # Site config (optional)
  ├── getting-started.md           # → getting-started.html
  ├── logo.png                     # Copied as-is
  └── technical/
      ├── index.md                 # Landing text for technical/index.html
      ├── 010-overview.md          # Numbered: listed first
      └── Setup_Guide.md           # → technical/setup-guide.html

Titles come from the first `# heading`, else the file name.
Links to other .md files are rewritten to the generated .html pages.

Run 'docgen gen-config' to generate a documented docgen.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Output directory (deleted and recreated on build)
    #[arg(long, default_value = "site", global = true)]
    output: PathBuf,

    /// Template directory (base.html, styles.css, highlight.css); overrides
    /// `template_dir` from docgen.toml
    #[arg(long, global = true)]
    template: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the source and build the site
    Build,
    /// Validate the source and template without writing anything
    Check,
    /// Print the scan manifest as JSON
    Scan,
    /// Print a stock docgen.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan_source(&cli)?;
            output::print_scan_output(&manifest, has_config_file(&cli));

            let template = Template::resolve(&manifest.config, cli.template.as_deref(), &cli.source)?;

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate(&manifest, &cli.source, &cli.output, &template)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan_source(&cli)?;
            Template::resolve(&manifest.config, cli.template.as_deref(), &cli.source)?;
            output::print_scan_output(&manifest, has_config_file(&cli));
            println!("==> Source is valid");
        }
        Command::Scan => {
            let manifest = scan_source(&cli)?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Scan `--source`, skipping `--output` and `--template` if they live inside it.
fn scan_source(cli: &Cli) -> Result<scan::Manifest, scan::ScanError> {
    scan::scan_with_template(&cli.source, &cli.output, cli.template.as_deref())
}

fn has_config_file(cli: &Cli) -> bool {
    cli.source.join(config::CONFIG_FILE).is_file()
}
