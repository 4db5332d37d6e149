use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use postergen_core::PosterClient;
use postergen_core::config::Config;
use prettytable::{Table, row};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(name = "postergen", version)]
#[command(about = "CLI for the poster-generation backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Poster template catalog
    Templates {
        #[command(subcommand)]
        cmd: TemplatesCommands,
    },
    /// Predefined logo library
    Logos {
        #[command(subcommand)]
        cmd: LogosCommands,
    },
    /// Generate a poster from a template
    Generate(GenerateArgs),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show effective config
    Doctor,
    /// Persist configuration values to the config file
    Set {
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        file_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum TemplatesCommands {
    /// List available templates
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum LogosCommands {
    /// List available logos
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Parser)]
struct GenerateArgs {
    #[arg(long)]
    template_id: u64,
    #[arg(long)]
    business_name: String,
    /// Dynamic field values as a JSON object, e.g. '{"till_number":"123"}'
    #[arg(long)]
    data: Option<String>,
    /// Styling overrides as a JSON object, e.g. '{"primary_color":"#ff0000"}'
    #[arg(long)]
    customization: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let client = PosterClient::new(config.clone())?;

    match cli.command {
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Doctor => {
                let report = config.doctor();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).expect("serializable doctor report")
                );
            }
            ConfigCommands::Set { api_url, file_url } => {
                let mut updated = config.clone();
                if let Some(api_url) = api_url {
                    updated.api_base_url = api_url;
                }
                if let Some(file_url) = file_url {
                    updated.file_base_url = file_url;
                }
                updated.save()?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&updated.doctor())
                        .expect("serializable doctor report")
                );
            }
        },
        Commands::Templates { cmd } => match cmd {
            TemplatesCommands::List { format } => {
                let templates = client.fetch_templates().await?;
                emit_json_or_table(format, &templates, |items| {
                    let mut table = Table::new();
                    table.add_row(row!["id", "name", "type", "price", "active", "fields"]);
                    for t in items {
                        table.add_row(row![
                            t.id.map(|v| v.to_string()).unwrap_or_default(),
                            t.name.clone().unwrap_or_default(),
                            t.kind.clone().unwrap_or_default(),
                            t.price.map(|v| v.to_string()).unwrap_or_default(),
                            t.is_active.map(|v| v.to_string()).unwrap_or_default(),
                            t.required_fields.len()
                        ]);
                    }
                    table
                });
            }
        },
        Commands::Logos { cmd } => match cmd {
            LogosCommands::List { format } => {
                let logos = client.fetch_logos().await?;
                emit_json_or_table(format, &logos, |items| {
                    let mut table = Table::new();
                    table.add_row(row!["#", "logo"]);
                    for (idx, logo) in items.iter().enumerate() {
                        table.add_row(row![idx, logo]);
                    }
                    table
                });
            }
        },
        Commands::Generate(args) => {
            let data = parse_json_object(args.data.as_deref(), "--data")?;
            let customization = parse_json_object(args.customization.as_deref(), "--customization")?;
            let poster = client
                .generate_poster(args.template_id, &args.business_name, data, customization)
                .await?;
            emit_json_or_table(args.format, &poster, |p| {
                let mut table = Table::new();
                table.add_row(row!["pdf_url", p.pdf_url]);
                table
            });
        }
    }
    Ok(())
}

fn parse_json_object(raw: Option<&str>, flag: &str) -> Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON"))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!("{flag} must be a JSON object")),
    }
}

fn emit_json_or_table<T: Serialize>(
    format: OutputFormat,
    value: &T,
    table_builder: impl FnOnce(&T) -> Table,
) {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).expect("serializable output");
            println!("{json}");
        }
        OutputFormat::Table => {
            let table = table_builder(value);
            table.printstd();
        }
    }
}
