use anyhow::Context;
use deepsearch::{
    AppState, DeepSearchConfig, ResearchCoordinator,
    api::routes,
    cli::{Cli, Commands, output::Output},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = DeepSearchConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    init_tracing(&config.server.log_level, cli.verbose);

    match cli.command {
        Commands::Ask {
            question,
            effort,
            json,
        } => {
            let coordinator = ResearchCoordinator::from_config(&config, effort)?;
            if !json {
                output.info(&format!("Researching with {} effort...", effort));
            }
            let report = match coordinator.research(&question).await {
                Ok(report) => report,
                Err(e) => {
                    output.error(&e.to_string());
                    std::process::exit(1);
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output.report(&report);
            }
        }
        Commands::Serve => {
            let state = AppState::from_config(config)?;
            let addr = state.bind_addr();
            info!(
                query_generator = %state.config.models.query_generator,
                web_search = %state.config.models.web_search,
                flash = %state.config.models.flash,
                pro = %state.config.models.pro,
                "Models configured"
            );

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("deepsearch listening on http://{}", addr);
            axum::serve(listener, routes::app(state)).await?;
        }
        #[cfg(feature = "mcp")]
        Commands::Mcp => {
            let clients = deepsearch::ResearchClients::from_config(&config)?;
            deepsearch::mcp::start_stdio_server(clients).await?;
        }
        Commands::Config { validate } => {
            output.header("Configuration");
            output.kv("File", &cli.config.display().to_string());
            output.kv(
                "Server",
                &format!("{}:{}", config.server.host, config.server.port),
            );
            output.kv("API base", &config.provider.api_base);
            output.kv("API key env", &config.provider.api_key_env);
            output.kv("Query generator", &config.models.query_generator);
            output.kv("Web search", &config.models.web_search);
            output.kv("Flash", &config.models.flash);
            output.kv("Pro", &config.models.pro);

            if validate {
                output.newline();
                match config.validate() {
                    Ok(()) => output.success("Configuration is valid"),
                    Err(e) => {
                        output.error(&e.to_string());
                        std::process::exit(1);
                    }
                }
                if let Err(e) = config.resolve_api_key() {
                    output.warning(&e.to_string());
                    output.hint(&format!(
                        "Set {} in your environment or .env file",
                        config.provider.api_key_env
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so `ask --json` and the MCP stdio transport keep stdout clean.
/// `RUST_LOG` overrides the configured level; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing(level: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deepsearch={},tower_http=info", default_level)));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
