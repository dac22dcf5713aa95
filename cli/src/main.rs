//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use roundtable_application::{
    Actor, ConversationLogger, HistoryStore, LlmActor, LlmGateway, NoConversationLogger,
    NoHistory, NoProgress, ProgressNotifier, RunGameInput, RunGameUseCase, RunPipelineUseCase,
};
use roundtable_domain::{
    DEFAULT_SUCCESS_CRITERION, Model, OutputFormat, Participant, ParticipantId, PromptTemplate,
    SessionId,
};
use roundtable_infrastructure::{
    AnswerEngine, ConfigLoader, FileConfig, FileHistoryStore, InMemoryHistoryStore,
    JsonlConversationLogger, LocalCapabilityExecutor, RoutingGateway, analysis_tool_spec,
    research_tool_spec,
};
use roundtable_presentation::{
    AnalyzeArgs, Cli, Command, ConsoleFormatter, GameArgs, HistoryArgs, ProgressReporter,
    SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Everything a subcommand needs besides its own arguments
struct AppContext {
    config: FileConfig,
    format: OutputFormat,
    progress: Box<dyn ProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
    cancel: CancellationToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        ConsoleFormatter::disable_color();
    }

    let Some(command) = cli.command else {
        bail!("No command given. Try `roundtable game --words Apple,Pear,Apple` or `roundtable --help`.");
    };

    info!("Starting roundtable");

    // Ctrl-C stops the running session at its next checkpoint
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping");
                cancel.cancel();
            }
        }
    });

    let logger: Arc<dyn ConversationLogger> = match &cli.transcript {
        Some(path) => Arc::new(
            JsonlConversationLogger::open(path)
                .with_context(|| format!("Cannot open transcript {}", path.display()))?,
        ),
        None => Arc::new(NoConversationLogger),
    };

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let ctx = AppContext {
        format: cli
            .output
            .map(Into::into)
            .or(config.output.format)
            .unwrap_or_default(),
        config,
        progress,
        logger,
        cancel,
    };

    match command {
        Command::Game(args) => run_game(args, &ctx).await,
        Command::Analyze(args) => run_analyze(args, &ctx).await,
        Command::History(args) => run_history(args, &ctx).await,
    }
}

/// Verbosity sets the level unless `RUST_LOG` is present; `--log-file`
/// moves logs off stderr through a non-blocking writer.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create log directory {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

fn gateway(config: &FileConfig) -> Arc<dyn LlmGateway> {
    Arc::new(RoutingGateway::from_config(&config.providers))
}

fn parse_model(name: &str) -> Model {
    let Ok(model) = name.parse::<Model>();
    model
}

fn history_dir(config: &FileConfig) -> Option<PathBuf> {
    config
        .game
        .history_dir
        .clone()
        .or_else(FileHistoryStore::default_dir)
}

async fn run_game(args: GameArgs, ctx: &AppContext) -> Result<()> {
    let config = &ctx.config;
    let gateway = gateway(config);

    let seats: Vec<(ParticipantId, Model)> = if args.player.is_empty() {
        config.game.seats()
    } else {
        args.player
            .iter()
            .map(|(name, model)| (ParticipantId::new(name.as_str()), parse_model(model)))
            .collect()
    };

    let players: Vec<(Participant, Arc<dyn Actor>)> = seats
        .into_iter()
        .map(|(id, model)| {
            let actor: Arc<dyn Actor> = Arc::new(LlmActor::new(
                id.as_str(),
                gateway.clone(),
                model.clone(),
                PromptTemplate::player_system(&id),
            ));
            (Participant::player(id, model), actor)
        })
        .collect();

    let judge_model = match args.judge.as_deref().map(str::trim) {
        Some("") => None,
        Some(name) => Some(parse_model(name)),
        None => config.game.judge(),
    };
    let criterion = args
        .criterion
        .clone()
        .or_else(|| config.game.criterion.clone());

    let mut params = config.game_params()?;
    if args.seed.is_some() {
        params = params.with_seed(args.seed);
    }

    let history: Arc<dyn HistoryStore> = if args.no_history {
        Arc::new(NoHistory)
    } else if let Some(dir) = history_dir(config) {
        Arc::new(FileHistoryStore::new(dir))
    } else {
        warn!("No data directory on this platform; session history is kept in memory only");
        Arc::new(InMemoryHistoryStore::new())
    };

    let mut use_case = RunGameUseCase::new()
        .with_params(params)
        .with_history(history)
        .with_conversation_logger(ctx.logger.clone())
        .with_cancellation(ctx.cancel.clone());

    let max_rounds = args.max_rounds.unwrap_or(config.game.max_rounds);
    let mut input = RunGameInput::new(players, args.words, max_rounds);
    if let Some(id) = args.session {
        input = input.with_session_id(SessionId::new(id));
    }

    if let Some(model) = judge_model {
        info!(judge = %model, "Referee enabled");
        use_case = use_case.with_judge(Arc::new(LlmActor::new(
            "referee",
            gateway.clone(),
            model,
            PromptTemplate::judge_system(),
        )));
        input = input.with_criterion(
            criterion.unwrap_or_else(|| DEFAULT_SUCCESS_CRITERION.to_string()),
        );
    } else if let Some(criterion) = criterion {
        input = input.with_criterion(criterion);
    }

    let result = use_case
        .start_session_with_progress(input, ctx.progress.as_ref())
        .await?;

    let output = match ctx.format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output);

    Ok(())
}

async fn run_analyze(args: AnalyzeArgs, ctx: &AppContext) -> Result<()> {
    let config = &ctx.config;
    let gateway = gateway(config);
    let subject = args.subject();

    let researcher_model = args
        .researcher
        .as_deref()
        .map(parse_model)
        .unwrap_or_else(|| config.pipeline.researcher());
    let analyst_model = args
        .analyst
        .as_deref()
        .map(parse_model)
        .unwrap_or_else(|| config.pipeline.analyst());

    let research_tools =
        LocalCapabilityExecutor::with_timeout(research_tool_spec(), config.http_timeout());
    let mut analysis_tools =
        LocalCapabilityExecutor::with_timeout(analysis_tool_spec(), config.http_timeout());

    let perplexity = &config.providers.perplexity;
    match perplexity.resolve_api_key() {
        Some(key) => {
            analysis_tools = analysis_tools.with_answer_engine(AnswerEngine::new(
                perplexity.base_url.clone(),
                key,
                config.tools.perplexity_model.clone(),
            ));
        }
        None => warn!(
            "{} is not set; the analyst runs without answer_search",
            perplexity.api_key_env
        ),
    }

    let researcher = LlmActor::new(
        "researcher",
        gateway.clone(),
        researcher_model,
        PromptTemplate::researcher_system(),
    )
    .with_capabilities(Arc::new(research_tools))
    .with_params(config.pipeline_params());

    let analyst = LlmActor::new(
        "analyst",
        gateway,
        analyst_model,
        PromptTemplate::analyst_system(),
    )
    .with_capabilities(Arc::new(analysis_tools))
    .with_params(config.pipeline_params());

    let report = RunPipelineUseCase::new(Arc::new(researcher), Arc::new(analyst))
        .with_conversation_logger(ctx.logger.clone())
        .with_cancellation(ctx.cancel.clone())
        .run_pipeline_with_progress(&subject, ctx.progress.as_ref())
        .await?;

    let output = match ctx.format {
        OutputFormat::Full => ConsoleFormatter::format_report(&report, true),
        OutputFormat::Summary => ConsoleFormatter::format_report(&report, false),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", output);

    Ok(())
}

async fn run_history(args: HistoryArgs, ctx: &AppContext) -> Result<()> {
    let Some(dir) = history_dir(&ctx.config) else {
        bail!("No history directory: set game.history_dir in the config");
    };
    let store = FileHistoryStore::new(dir);

    let output = match args.session_id {
        Some(id) => {
            let Some(log) = store.load(&SessionId::new(id.as_str())).await? else {
                bail!("No stored session '{}' in {}", id, store.dir().display());
            };
            match ctx.format {
                OutputFormat::Json => ConsoleFormatter::format_json(&log),
                _ => ConsoleFormatter::format_log(&log),
            }
        }
        None => {
            let ids = store.list().await?;
            match ctx.format {
                OutputFormat::Json => ConsoleFormatter::format_json(&ids),
                _ => ConsoleFormatter::format_session_list(&ids),
            }
        }
    };
    println!("{}", output);

    Ok(())
}
