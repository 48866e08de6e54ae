use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medtopics_search::config::Settings;
use medtopics_search::engine::EngineClient;
use medtopics_search::error::SearchError;
use medtopics_search::schema::build_index_config;
use medtopics_search::search_service::SearchService;
use medtopics_search::{api, indexer, synonyms};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "medtopics_search", about = "Index setup and query front end for health topics")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile the synonym source into the engine's synonym list
    Synonyms,
    /// Print the index configuration document
    Schema,
    /// Print the corpus as a newline-delimited bulk payload
    Frame,
    /// Compile synonyms, recreate the index and bulk-load the corpus
    Index,
    /// Classify a query, send it and print the engine response
    Search {
        query: String,
        #[arg(long)]
        from: Option<String>,
    },
    /// Show how the engine analyzes text for a field
    Analyze {
        text: String,
        #[arg(long, default_value = "@title")]
        field: String,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "HOST", default_value = "localhost")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = 4001)]
        port: u16,
        /// Run a full index build before serving
        #[arg(long)]
        bootstrap: bool,
    },
}

#[actix_rt::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Command::Synonyms => {
            let count = synonyms::compile_to_file(
                &settings.synonyms_source(),
                &settings.compiled_synonyms_path(),
            )?;
            println!("{}", count);
        }
        Command::Schema => {
            let config = build_index_config(&settings.resource_paths());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Frame => {
            let (_, payload) = indexer::frame_corpus(&settings)?;
            print!("{}", payload);
        }
        Command::Index => {
            let engine = EngineClient::from_settings(&settings)?;
            indexer::build_index(&settings, &engine).await?;
        }
        Command::Search { query, from } => {
            let (classification, request) = match SearchService::prepare(Some(&query), from.as_deref()) {
                Ok(prepared) => prepared,
                Err(SearchError::EmptyQuery) => {
                    warn!("Nothing to search for in {:?}", query);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            info!("Category: {} | Query: {}", classification.category, classification.residual);
            println!("{}", serde_json::to_string_pretty(&request)?);

            let engine = EngineClient::from_settings(&settings)?;
            let response = engine.search(&request).await?;
            println!("{}", response.body);
        }
        Command::Analyze { text, field } => {
            let engine = EngineClient::from_settings(&settings)?;
            let response = engine.analyze(&field, &text).await?;
            println!("{}", response.body);
        }
        Command::Serve {
            host,
            port,
            bootstrap,
        } => {
            let engine = EngineClient::from_settings(&settings)?;
            if bootstrap {
                indexer::build_index(&settings, &engine)
                    .await
                    .context("bootstrapping index")?;
            }
            api::start_server(SearchService::new(engine), host, port).await?;
        }
    }

    Ok(())
}
