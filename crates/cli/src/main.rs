use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use fhir::FhirVersion;
use ruler_core::constants::{ENV_CONFIG_FILE, ENV_FHIR_VERSION, ENV_HELLO_WORLD_MESSAGE};
use ruler_core::{
    CodeableConceptSettings, CodingSettings, CompositionBuilder, ConfigOverrides, RulerConfig,
};
use ruler_plugins::{cpg::create_error_outcome, HelloWorldProvider};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ruler")]
#[command(about = "Build FHIR resources with the ruler plugins")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a Composition and print it as FHIR JSON
    Composition {
        /// FHIR release (dstu2, dstu2_1, dstu2_hl7org, dstu3, r4, r5); defaults to configuration
        #[arg(long)]
        fhir_version: Option<String>,
        /// Resource id (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Composition status code
        #[arg(long)]
        status: String,
        /// Document title
        #[arg(long)]
        title: String,
        /// Document type coding system
        #[arg(long, default_value = "http://loinc.org")]
        type_system: String,
        /// Document type code
        #[arg(long)]
        type_code: String,
        /// Document type display
        #[arg(long)]
        type_display: Option<String>,
        /// Author reference, e.g. Practitioner/123
        #[arg(long)]
        author: String,
        /// Subject patient id or reference
        #[arg(long)]
        subject: Option<String>,
        /// Custodian organization id or reference
        #[arg(long)]
        custodian: Option<String>,
        /// Composition date (RFC 3339); defaults to now
        #[arg(long)]
        date: Option<String>,
        /// Profile canonical URL (repeatable)
        #[arg(long)]
        profile: Vec<String>,
    },
    /// Print an error OperationOutcome carrying a display message
    ErrorOutcome {
        /// Message to carry in the issue details
        display: String,
    },
    /// Print the configured `$hello-world` response
    Hello,
    /// List supported FHIR releases
    Versions,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Composition {
            fhir_version,
            id,
            status,
            title,
            type_system,
            type_code,
            type_display,
            author,
            subject,
            custodian,
            date,
            profile,
        }) => {
            let version = match fhir_version {
                Some(v) => v.parse::<FhirVersion>()?,
                None => load_config()?.fhir_version(),
            };

            let mut coding = CodingSettings::new(type_system, type_code);
            if let Some(display) = type_display {
                coding = coding.with_display(display);
            }

            let mut builder = CompositionBuilder::new(version)
                .with_status(status)
                .with_title(title)
                .with_type(CodeableConceptSettings::new().add(coding))
                .with_author(author)?;
            if let Some(id) = id {
                builder = builder.with_id(id);
            }
            if let Some(subject) = subject {
                builder = builder.with_subject(subject);
            }
            if let Some(custodian) = custodian {
                builder = builder.with_custodian(custodian);
            }
            if let Some(date) = date {
                let date = DateTime::parse_from_rfc3339(&date)
                    .with_context(|| format!("invalid --date '{date}'"))?;
                builder = builder.with_date(date.with_timezone(&Utc));
            }
            for p in profile {
                builder = builder.with_profile(p);
            }

            println!("{}", builder.build()?.to_json_pretty()?);
        }
        Some(Commands::ErrorOutcome { display }) => {
            let outcome = create_error_outcome(&display);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Some(Commands::Hello) => {
            let cfg = load_config()?;
            let provider = HelloWorldProvider::new(cfg.hello_world().clone());
            println!("{}", serde_json::to_string_pretty(&provider.hello_world())?);
        }
        Some(Commands::Versions) => {
            for version in FhirVersion::ALL {
                println!("{:<14} {}", version.as_str(), version.fhir_release());
            }
        }
        None => {
            println!("Use 'ruler --help' for commands");
        }
    }

    Ok(())
}

fn load_config() -> anyhow::Result<RulerConfig> {
    let file = std::env::var(ENV_CONFIG_FILE).ok().map(PathBuf::from);
    let overrides = ConfigOverrides {
        fhir_version: std::env::var(ENV_FHIR_VERSION).ok(),
        hello_world_message: std::env::var(ENV_HELLO_WORLD_MESSAGE).ok(),
        rest_addr: None,
    };
    Ok(RulerConfig::load(file.as_deref(), overrides)?)
}
