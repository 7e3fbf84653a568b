//! dm8-schema CLI - compile schema blueprints to DM8 DDL and read the catalog.

use clap::{Parser, Subcommand};
use dm8_schema::{
    connection, Blueprint, Config, Dm8Grammar, GrammarConfig, SchemaError, SchemaManager,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "dm8-schema")]
#[command(about = "Schema grammar and catalog introspection for DM8")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file (defaults to DB_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long, global = true)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text", global = true)]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn", global = true)]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a YAML or JSON blueprint into DDL statements
    Compile {
        /// Blueprint file
        #[arg(short, long)]
        blueprint: PathBuf,

        /// Never add implicit defaults to NOT NULL columns
        #[arg(long)]
        strict: bool,

        /// Use character length semantics for varchar2 (true or false)
        #[arg(long)]
        length_in_char: Option<bool>,

        /// Schema prefix for table names
        #[arg(long)]
        schema_prefix: Option<String>,

        /// Table prefix for table and index names
        #[arg(long)]
        table_prefix: Option<String>,
    },

    /// List the columns of a table
    Columns {
        #[arg(short, long)]
        table: String,
    },

    /// List the indexes of a table
    Indexes {
        #[arg(short, long)]
        table: String,
    },

    /// List the tables of the configured owner
    Tables,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), SchemaError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(SchemaError::Config)?;

    match cli.command {
        Commands::Compile {
            ref blueprint,
            strict,
            length_in_char,
            ref schema_prefix,
            ref table_prefix,
        } => {
            let mut grammar_config = match &cli.config {
                Some(path) => Config::load(path)?.grammar,
                None => GrammarConfig::default(),
            };
            if strict {
                grammar_config.strict_mode = true;
            }
            if let Some(v) = length_in_char {
                grammar_config.length_in_char = v;
            }
            if let Some(prefix) = schema_prefix {
                grammar_config.schema_prefix = prefix.clone();
            }
            if let Some(prefix) = table_prefix {
                grammar_config.table_prefix = prefix.clone();
            }

            let mut bp = Blueprint::load(blueprint)?;
            if bp.prefix.is_empty() {
                bp.prefix = grammar_config.table_prefix.clone();
            }
            debug!("Loaded blueprint for {} from {:?}", bp.table, blueprint);

            let grammar = Dm8Grammar::from_config(&grammar_config);
            let statements = grammar.to_sql(&mut bp)?;
            info!("Compiled {} statement(s)", statements.len());

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&statements)?);
            } else {
                for sql in &statements {
                    println!("{};", sql);
                }
            }
        }

        Commands::Columns { ref table } => {
            let manager = manager(&cli.config).await?;
            let columns = manager.list_table_columns(table).await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&columns)?);
            } else {
                for col in &columns {
                    println!(
                        "{:<30} {:<16} {:<10} {}",
                        col.name,
                        col.data_type,
                        if col.nullable { "null" } else { "not null" },
                        col.default.as_deref().unwrap_or("")
                    );
                }
            }
        }

        Commands::Indexes { ref table } => {
            let manager = manager(&cli.config).await?;
            let indexes = manager.list_table_indexes(table).await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&indexes)?);
            } else {
                for idx in &indexes {
                    println!(
                        "{:<40} {:<8} {}",
                        idx.name,
                        if idx.unique { "unique" } else { "" },
                        idx.index_type
                    );
                }
            }
        }

        Commands::Tables => {
            let manager = manager(&cli.config).await?;
            let tables = manager.list_table_names().await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                for table in &tables {
                    println!("{}", table);
                }
            }
        }
    }

    Ok(())
}

/// Load configuration and open a catalog reader for its owner.
async fn manager(config_path: &Option<PathBuf>) -> Result<SchemaManager, SchemaError> {
    let config = match config_path {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::from_env()?,
    };

    let conn = connection::connect(&config.connection).await?;
    Ok(SchemaManager::new(conn, config.owner()))
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("unknown verbosity: {}", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("unknown log format: {}", other)),
    }

    Ok(())
}
