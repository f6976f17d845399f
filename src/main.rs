use clap::{Parser, Subcommand};
use folio::config;
use folio::contact::{ContactForm, ContactSubmission, MessageSubmitter, RelayTarget, SubmissionStatus};
use folio::relay::EmailJsRelay;
use folio::simulate::{self, ScrollScript};
use folio::{catalog, generate, output};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for animated single-page portfolios")]
#[command(long_about = "\
Static site generator for animated single-page portfolios

One content directory becomes one self-contained index.html. Sections fade
in as they scroll into view, the hero enters on a short delay, and the
contact form posts to an EmailJS-compatible relay.

Content structure:

  content/
  ├── portfolio.toml     # Profile, links, facts, projects, skills, contact
  ├── about.md           # About section body (markdown)
  ├── config.toml        # Reveal margins, hero delay, relay, colors (optional)
  └── assets/            # Images, resume, icons → copied to output root

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log debug detail (reveal signals, relay calls) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site into the output directory
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Replay a scroll script and print when each section reveals
    Simulate {
        /// Scroll script (TOML: viewport, section bounds, timed frames)
        script: PathBuf,
        /// Print the timeline as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send one contact message through the configured relay
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Build => {
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let summary = generate::generate(&cli.source, &cli.output)?;
            output::print_generate_summary(&summary, &cli.output);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let catalog = catalog::AssetCatalog::load(&cli.source)?;
            output::print_catalog_inventory(&catalog, &site_config, &cli.source);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Simulate { script, json } => {
            let site_config = config::load_config(&cli.source)?;
            let script = ScrollScript::load(&script)?;
            let timeline = simulate::run(&script, &site_config.reveal);
            if json {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                output::print_timeline(&timeline);
            }
        }
        Command::Send {
            name,
            email,
            message,
        } => {
            let site_config = config::load_config(&cli.source)?;
            let relay = EmailJsRelay::new(&site_config.relay)?;
            let submitter = MessageSubmitter::new(relay, RelayTarget::from(&site_config.relay));
            let mut form = ContactForm::new(submitter);
            form.fields = ContactSubmission::new(name, email, message);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let status = runtime.block_on(form.submit())?;
            let detail = form.submitter().last_error();
            output::print_submission(status, detail.as_deref());
            if status == SubmissionStatus::Failed {
                return Err("contact message was not delivered".into());
            }
        }
    }

    Ok(())
}
