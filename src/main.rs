use std::{path::PathBuf, process, sync::Arc};

use koborin::{
    application::{
        clock::{Clock, SystemClock},
        error::AppError,
        export::export_feeds,
        llms::LlmsService,
        navigation::NavigationService,
        repos::ContentRepo,
        scaffold::{ArticleDraft, write_draft},
        syndication::SyndicationService,
    },
    config,
    infra::{
        content::SnapshotRepo,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use metrics::gauge;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

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
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        InfraError::configuration(format!("failed to load configuration: {err}"))
    })?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Export(args) => run_export(settings, args).await,
        config::Command::New(args) => run_new(settings, args).await,
    }
}

/// Services sharing one corpus snapshot.
struct ApplicationContext {
    syndication: Arc<SyndicationService>,
    llms: Arc<LlmsService>,
    navigation: Arc<NavigationService>,
}

impl ApplicationContext {
    fn http_state(&self) -> HttpState {
        HttpState {
            syndication: Arc::clone(&self.syndication),
            llms: Arc::clone(&self.llms),
            navigation: Arc::clone(&self.navigation),
        }
    }
}

async fn build_application_context(
    settings: &config::Settings,
) -> Result<ApplicationContext, AppError> {
    let root = settings.content.directory.clone();
    let snapshot = load_snapshot(root).await?;

    let content: Arc<dyn ContentRepo> = Arc::new(snapshot);
    let site = Arc::new(settings.site.profile());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    Ok(ApplicationContext {
        syndication: Arc::new(SyndicationService::new(
            Arc::clone(&content),
            Arc::clone(&site),
            Arc::clone(&clock),
        )),
        llms: Arc::new(LlmsService::new(
            Arc::clone(&content),
            Arc::clone(&site),
            Arc::clone(&clock),
        )),
        navigation: Arc::new(NavigationService::new(content)),
    })
}

async fn load_snapshot(root: PathBuf) -> Result<SnapshotRepo, AppError> {
    info!(
        target = "koborin::content",
        directory = %root.display(),
        "Loading content"
    );

    let snapshot = tokio::task::spawn_blocking(move || SnapshotRepo::load(&root))
        .await
        .map_err(|err| AppError::unexpected(format!("content loader panicked: {err}")))?
        .map_err(InfraError::from)?;

    gauge!(telemetry::CONTENT_DOCUMENTS).set(snapshot.len() as f64);
    if snapshot.is_empty() {
        warn!(
            target = "koborin::content",
            "Content directory holds no documents; every feed will be empty"
        );
    }
    info!(
        target = "koborin::content",
        documents = snapshot.len(),
        "Content loaded"
    );
    Ok(snapshot)
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let app = build_application_context(&settings).await?;
    let router = http::build_router(app.http_state());

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "koborin::serve",
        addr = %settings.server.public_addr,
        origin = %settings.site.origin,
        "Listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "koborin::serve", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target = "koborin::serve", error = %err, "failed to listen for shutdown signal");
    }
}

async fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let app = build_application_context(&settings).await?;
    let output = args.output;

    info!(
        target = "koborin::export",
        path = %output.display(),
        "Starting export"
    );

    let written = export_feeds(&app.syndication, &app.llms, &app.navigation, &output).await?;
    info!(
        target = "koborin::export",
        files = written.len(),
        "Export completed"
    );
    Ok(())
}

async fn run_new(settings: config::Settings, args: config::NewArgs) -> Result<(), AppError> {
    let draft = ArticleDraft::new(args.language, args.category, &args.title, &args.description)?;
    let path = write_draft(&settings.content.directory, &draft, SystemClock.today()).await?;

    println!("{}", path.display());
    Ok(())
}
