use anyhow::Context;
use deepr::{
    api::docs::openapi_json,
    cli::{
        export,
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    create_app,
    types::ResearchRequest,
    utils::toml_config::{ConfigError, LogFormat, ResearchConfig, ServerConfig},
    AgentRegistry, AppState, ResearchWorkflow,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            provider,
            host,
            port,
        }) => {
            let config = InitConfig {
                path,
                force,
                provider,
                host,
                port,
            };
            match init::run(config, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => Err(anyhow::anyhow!(e)),
            }
        }
        Some(Commands::Openapi) => {
            println!("{}", openapi_json()?);
            Ok(())
        }
        Some(Commands::Config { full, validate }) => {
            let config = match ResearchConfig::load(&cli.config) {
                Ok(config) => config,
                Err(e) => {
                    output.error(&e.to_string());
                    return Err(e.into());
                }
            };
            show_config(&cli.config, &config, full, validate, &output)
        }
        Some(Commands::Research {
            query,
            json,
            output: output_dir,
        }) => {
            let config = load_or_default(&cli.config, cli.verbose)?;
            ResearchRequest {
                query: query.clone(),
            }
            .validate()?;

            let registry = AgentRegistry::from_config(&config).await?;
            let result = ResearchWorkflow::from_registry(&registry)
                .run(&query)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output.research_result(&result);
            }

            if let Some(dir) = output_dir {
                let files = export::save(&dir, &result, &export::timestamp_now())
                    .with_context(|| format!("Failed to save results to {}", dir.display()))?;
                if !json {
                    output.newline();
                    output.created("results", &files.result_json.display().to_string());
                    output.created("report", &files.report_json.display().to_string());
                    output.created("markdown", &files.report_markdown.display().to_string());
                }
            }
            Ok(())
        }
        Some(Commands::Serve { host, port }) => {
            let mut config = load_or_default(&cli.config, cli.verbose)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        None => serve(load_or_default(&cli.config, cli.verbose)?).await,
    }
}

/// Load `path`, falling back to built-in defaults when it does not exist.
/// Initializes logging from the resulting server settings.
fn load_or_default(path: &Path, verbose: bool) -> anyhow::Result<ResearchConfig> {
    match ResearchConfig::load(path) {
        Ok(config) => {
            init_tracing(&config.server, verbose);
            tracing::info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        Err(ConfigError::FileNotFound(_)) => {
            let mut config = ResearchConfig::default();
            config.apply_env_overrides();
            init_tracing(&config.server, verbose);
            tracing::warn!(
                path = %path.display(),
                "configuration file not found, using defaults (run `deepr-server init` to create one)"
            );
            Ok(config)
        }
        Err(e) => Err(e).with_context(|| format!("failed to load {}", path.display())),
    }
}

/// `RUST_LOG` overrides the configured level.
fn init_tracing(server: &ServerConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout stays clean for `research --json`
    match server.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn serve(config: ResearchConfig) -> anyhow::Result<()> {
    let registry = AgentRegistry::from_config(&config)
        .await
        .context("failed to initialize research agents")?;

    let address = config.bind_address();
    let environment = config.server.environment.clone();
    let app = create_app(AppState::new(config, &registry));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(address = %address, environment = %environment, "deepr server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn show_config(
    path: &Path,
    config: &ResearchConfig,
    full: bool,
    validate: bool,
    output: &Output,
) -> anyhow::Result<()> {
    if validate {
        // load() has already validated every reference
        output.success(&format!("{} is valid", path.display()));
        if !full {
            return Ok(());
        }
    }

    if full {
        println!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    output.header("Server");
    output.kv("address", &config.bind_address());
    output.kv("environment", &config.server.environment);
    output.kv("log_level", &config.server.log_level);

    output.header("Models");
    let mut models: Vec<_> = config.models.iter().collect();
    models.sort_by(|a, b| a.0.cmp(b.0));
    for (name, model) in models {
        output.list_item(&format!(
            "{name}: {} via {} (temperature {})",
            model.model, model.provider, model.temperature
        ));
    }

    output.header("Agents");
    for (role, model) in config.agents.model_refs() {
        output.kv(role, model);
    }
    Ok(())
}
