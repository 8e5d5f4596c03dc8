//! cardsheet CLI
//!
//! Usage:
//!   cardsheet [OPTIONS] <COMMAND>
//!
//! Commands:
//!   templates  List the effective templates for a tenant
//!   fonts      List fonts a template needs beyond the built-in set
//!   preview    Render one card face to SVG
//!   print      Render a print sheet for a selection of entities
//!   profile    Print the default print profile
//!
//! Options:
//!   -p, --profile <FILE>  Print profile (TOML format)
//!   -v, --verbose         Log debug output
//!   -d, --debug           Dump the packed sheet to stderr
//!   -h, --help            Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cardsheet::model::{EntityId, Roster, Selection, Side, TemplateId};
use cardsheet::profile::DEFAULT_PROFILE;
use cardsheet::template::TemplateRegistry;
use cardsheet::{
    generate_preview, generate_print_document, required_fonts, resolve_for_tenant, PrintConfig,
    PrintProfile, PrintRequest, PreviewRequest,
};

#[derive(Parser)]
#[command(name = "cardsheet")]
#[command(about = "ID-card template resolution and print sheet generation")]
struct Cli {
    /// Print profile (TOML format)
    #[arg(short, long, global = true)]
    profile: Option<PathBuf>,

    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Debug mode: dump the packed sheet to stderr
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct StoreArgs {
    /// JSON file with template records
    #[arg(short, long)]
    store: PathBuf,

    /// Tenant to resolve templates for
    #[arg(short, long)]
    tenant: String,
}

#[derive(Subcommand)]
enum Command {
    /// List the effective templates for a tenant
    Templates {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// List fonts a template needs beyond the built-in set
    Fonts {
        #[command(flatten)]
        store: StoreArgs,

        /// Template id (a system id selects the tenant's override)
        #[arg(long)]
        template: String,
    },

    /// Render one card face to SVG
    Preview {
        #[command(flatten)]
        store: StoreArgs,

        /// JSON file with entity records
        #[arg(short, long)]
        roster: PathBuf,

        #[arg(long)]
        template: String,

        #[arg(short, long)]
        entity: String,

        #[arg(long, value_enum, default_value_t = SideArg::Front)]
        side: SideArg,

        #[arg(short, long, default_value_t = 1.0)]
        zoom: f64,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Render a print sheet for a selection of entities
    Print {
        #[command(flatten)]
        store: StoreArgs,

        /// JSON file with entity records
        #[arg(short, long)]
        roster: PathBuf,

        #[arg(long)]
        template: String,

        /// Entity ids in print order, comma separated
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the default print profile
    Profile,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Front,
    Back,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Front => Side::Front,
            SideArg::Back => Side::Back,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let profile = match &cli.profile {
        Some(path) => match PrintProfile::from_file(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error loading profile '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => PrintProfile::default(),
    };
    let config = profile.print_config().with_debug(cli.debug);

    match cli.command {
        Command::Templates { store } => list_templates(&store),
        Command::Fonts { store, template } => list_fonts(&store, &template, &config),
        Command::Preview {
            store,
            roster,
            template,
            entity,
            side,
            zoom,
            out,
        } => {
            let registry = load_store(&store.store);
            let roster = load_roster(&roster);
            let request = PreviewRequest {
                tenant: store.tenant,
                template_id: TemplateId::new(template),
                entity_id: EntityId::new(entity),
                side: side.into(),
                zoom,
            };
            match generate_preview(&registry, &roster, &request, &config).await {
                Ok(svg) => write_output(out.as_deref(), &svg),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Print {
            store,
            roster,
            template,
            select,
            out,
        } => {
            let registry = load_store(&store.store);
            let roster = load_roster(&roster);
            let selection = Selection::new(
                select
                    .iter()
                    .map(|id| id.trim())
                    .filter(|id| !id.is_empty()),
            );
            let request = PrintRequest::new(store.tenant, TemplateId::new(template), selection);
            match generate_print_document(&registry, &roster, &request, &config).await {
                Ok(job) => {
                    write_output(out.as_deref(), &job.document);
                    if job.placeholder_count() > 0 {
                        eprintln!("Warning: {} card(s) replaced by placeholders", job.placeholder_count());
                    }
                    if !job.missing_fonts().is_empty() {
                        eprintln!(
                            "Warning: fonts not found, using default font: {}",
                            job.missing_fonts().join(", ")
                        );
                    }
                    for ambiguity in &job.ambiguities {
                        eprintln!(
                            "Warning: template '{}' has several overrides: {}",
                            ambiguity.parent,
                            ambiguity
                                .candidates
                                .iter()
                                .map(|c| c.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Profile => println!("{}", DEFAULT_PROFILE.trim()),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("cardsheet=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_store(path: &Path) -> TemplateRegistry {
    match TemplateRegistry::from_file(path) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error loading templates '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn load_roster(path: &Path) -> Roster {
    match Roster::from_file(path) {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("Error loading roster '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn list_templates(args: &StoreArgs) {
    let registry = load_store(&args.store);
    let resolution = resolve_for_tenant(&registry, &args.tenant);
    for effective in resolution.iter() {
        let template = &effective.template;
        let (width, height) = template.trim_size_mm();
        let shadows = effective
            .shadows()
            .map(|id| format!(" (replaces {})", id))
            .unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{:.1} x {:.1} mm{}",
            template.id,
            effective.status.as_str(),
            template.name,
            width,
            height,
            shadows
        );
    }
    for ambiguity in &resolution.ambiguities {
        eprintln!(
            "Warning: template '{}' has {} overrides",
            ambiguity.parent,
            ambiguity.candidates.len()
        );
    }
}

fn list_fonts(args: &StoreArgs, template: &str, config: &PrintConfig) {
    let registry = load_store(&args.store);
    let resolution = resolve_for_tenant(&registry, &args.tenant);
    let id = TemplateId::new(template);
    let Some(effective) = resolution.find(&id) else {
        eprintln!(
            "Error: template '{}' is not available to tenant '{}'",
            template, args.tenant
        );
        std::process::exit(1);
    };
    for family in required_fonts(&effective.template, &config.fonts) {
        println!("{}", family);
    }
}

fn write_output(path: Option<&Path>, svg: &str) {
    match path {
        Some(path) => {
            if let Err(e) = fs::write(path, svg) {
                eprintln!("Error writing file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => println!("{}", svg),
    }
}
