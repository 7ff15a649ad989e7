use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use openaire_core::{
    ApplyOutcome, CHOOSE_ONE_KEY, ExportClassification, NoLocalizer, SaveError, SectionKey,
    SectionMetadata, SectionMetadataExtension, Vocabulary, VocabularyCatalog,
};
use openaire_store::DuckStore;

mod display;

#[derive(Parser)]
#[command(name = "openaire", version, about = "Section resource type and audience metadata")]
struct Cli {
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the COAR resource types.
    ResourceTypes,
    /// List the audiences.
    Audiences,
    /// Print the select options for one vocabulary.
    Options {
        vocabulary: VocabularyArg,
        /// Label for the "no selection" entry.
        #[arg(long)]
        choose_one: Option<String>,
    },
    /// Check a candidate pair against the vocabularies.
    Validate {
        #[command(flatten)]
        candidate: Candidate,
    },
    /// Show a section's stored pair and its export resolution.
    Show {
        #[command(flatten)]
        target: Target,
    },
    /// Save a pair onto a section. Without a resource type nothing is written.
    Set {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        candidate: Candidate,
    },
}

#[derive(Args)]
struct Target {
    #[arg(long)]
    section: u64,
    /// Owning journal id.
    #[arg(long)]
    context: Option<u64>,
    /// DuckDB file holding section settings.
    #[arg(long, env = "OPENAIRE_DB", default_value = "openaire.duckdb")]
    db: PathBuf,
}

impl Target {
    fn key(&self) -> SectionKey {
        SectionKey::new(self.section, self.context)
    }

    fn open(&self) -> anyhow::Result<DuckStore> {
        DuckStore::open_persistent(&self.db)
            .with_context(|| format!("opening {}", self.db.display()))
    }

    /// Open without creating the database file.
    fn open_existing(&self) -> anyhow::Result<DuckStore> {
        DuckStore::open_existing(&self.db)
            .with_context(|| format!("opening {}", self.db.display()))
    }
}

#[derive(Args)]
struct Candidate {
    #[arg(long, default_value = "")]
    resource_type: String,
    #[arg(long, default_value = "")]
    audience: String,
}

impl From<Candidate> for SectionMetadata {
    fn from(c: Candidate) -> Self {
        SectionMetadata::new(c.resource_type, c.audience)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum VocabularyArg {
    ResourceType,
    Audience,
}

impl From<VocabularyArg> for Vocabulary {
    fn from(v: VocabularyArg) -> Self {
        match v {
            VocabularyArg::ResourceType => Vocabulary::ResourceType,
            VocabularyArg::Audience => Vocabulary::Audience,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::debug!("openaire v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let ext = SectionMetadataExtension::default();
    let catalog = ext.catalog();

    match cli.command {
        Command::ResourceTypes => {
            if cli.json {
                print_json(&catalog.list_resource_types())?;
            } else {
                display::print_resource_types(catalog);
            }
        }
        Command::Audiences => {
            if cli.json {
                print_json(&catalog.list_audiences())?;
            } else {
                display::print_audiences(catalog);
            }
        }
        Command::Options {
            vocabulary,
            choose_one,
        } => {
            let options = match choose_one {
                Some(label) => {
                    let strings = HashMap::from([(CHOOSE_ONE_KEY.to_string(), label)]);
                    catalog.options_with_localizer(vocabulary.into(), &strings)
                }
                None => catalog.options_with_localizer(vocabulary.into(), &NoLocalizer),
            };
            if cli.json {
                print_json(&options)?;
            } else {
                display::print_options(&options);
            }
        }
        Command::Validate { candidate } => {
            let violations = ext.validate(&candidate.into());
            if cli.json {
                print_json(&violations)?;
            } else {
                display::print_violations(&violations);
            }
            if !violations.is_empty() {
                bail!("candidate rejected");
            }
        }
        Command::Show { target } => {
            let store = target.open_existing()?;
            let key = target.key();
            let metadata = ext.load(&store, key).context("loading section settings")?;
            let export = ExportClassification::resolve(catalog, &metadata);
            if cli.json {
                print_json(&serde_json::json!({
                    "section": key,
                    "metadata": metadata,
                    "export": export.as_ref().ok(),
                    "exportError": export.as_ref().err().map(ToString::to_string),
                }))?;
            } else {
                display::print_section_card(key, &metadata, &export);
            }
            export.with_context(|| format!("resolving stored values of {key}"))?;
        }
        Command::Set { target, candidate } => {
            let mut store = target.open()?;
            let key = target.key();
            match ext.save(&mut store, key, &candidate.into()) {
                Ok(outcome) => {
                    if cli.json {
                        print_json(&outcome)?;
                    } else {
                        match outcome {
                            ApplyOutcome::Written => println!("saved {key}"),
                            ApplyOutcome::Skipped => {
                                println!("no resource type given; {key} left unchanged")
                            }
                        }
                    }
                }
                Err(SaveError::Invalid(failed)) => {
                    if cli.json {
                        print_json(&failed.violations)?;
                    } else {
                        display::print_violations(&failed.violations);
                    }
                    bail!("candidate rejected");
                }
                Err(err @ SaveError::Store(_)) => {
                    return Err(err).with_context(|| format!("saving {key}"));
                }
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
