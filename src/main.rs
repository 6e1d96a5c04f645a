use std::{future::IntoFuture, process, sync::Arc};

use futures::{FutureExt, future::BoxFuture, future::Shared};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;
use undangan::{
    application::{
        compiler::{CompileOptions, ContentCompiler},
        content::ContentService,
        error::AppError,
        invalidation::InvalidationTrigger,
        repos::SectionRepos,
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};

type ShutdownSignal = Shared<BoxFuture<'static, ()>>;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Recompile(args) => run_recompile(settings, args).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let (content, invalidation) = build_services(&repositories, &settings);

    let state = HttpState {
        content,
        invalidation,
        health: repositories,
    };

    serve_http(&settings, state).await
}

async fn run_recompile(
    settings: config::Settings,
    args: config::RecompileArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let (content, _) = build_services(&repositories, &settings);

    if let Some(slug) = args.slug.as_deref() {
        let served = content.compile_and_cache(slug).await?;
        info!(
            slug,
            content_hash = %served.content_hash,
            "recompiled invitation content"
        );
        return Ok(());
    }

    let report = content.recompile_all(args.concurrency).await?;
    info!(
        compiled = report.compiled,
        missing = report.missing,
        failed = report.failed.len(),
        "recompile finished"
    );

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::unexpected(format!(
            "{} invitation(s) failed to recompile: {}",
            report.failed.len(),
            report.failed.join(", ")
        )))
    }
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_pool(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;
    info!("database migrations applied");
    Ok(())
}

async fn connect_pool(settings: &config::Settings) -> Result<sqlx::PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;
    Ok(pool)
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = connect_pool(settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;
    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_services(
    repositories: &Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> (ContentService, InvalidationTrigger) {
    let repos = SectionRepos::from_backend(repositories.clone());
    let options = CompileOptions {
        timeout: settings.compile.timeout,
        default_locale: settings.compile.default_locale,
    };
    let compiler = ContentCompiler::new(repos.clone(), options);
    let content = ContentService::new(compiler, repositories.clone(), repos.registrations);
    let invalidation = InvalidationTrigger::new(content.clone());
    (content, invalidation)
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let public_router = http::build_router(state.clone());
    let internal_router = http::build_internal_router(state);

    let public_addr = settings.server.public_addr;
    let admin_addr = settings.server.admin_addr;
    let public_listener = tokio::net::TcpListener::bind(public_addr)
        .await
        .map_err(|err| InfraError::bind(public_addr, err))?;
    let internal_listener = tokio::net::TcpListener::bind(admin_addr)
        .await
        .map_err(|err| InfraError::bind(admin_addr, err))?;

    info!(%public_addr, internal_addr = %admin_addr, "listening");

    let signal = shutdown_signal();
    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(signal.clone())
        .into_future();
    let internal_server = axum::serve(internal_listener, internal_router.into_make_service())
        .with_graceful_shutdown(signal.clone())
        .into_future();

    let grace = settings.server.graceful_shutdown;
    let drain_deadline = signal.then(move |()| tokio::time::sleep(grace));

    tokio::select! {
        result = async { try_join!(public_server, internal_server) } => {
            result.map_err(InfraError::from)?;
        }
        () = drain_deadline => {
            warn!(
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out, dropping connections"
            );
        }
    }

    Ok(())
}

fn shutdown_signal() -> ShutdownSignal {
    async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received, draining connections");
    }
    .boxed()
    .shared()
}
