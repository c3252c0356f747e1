use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tracing::info;

use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::telemetry;
use recruit_ai::workflows::screening::{
    ingest, screening_router, CannedQuestionBank, ExtractionError, LogNotifier,
    RequirementCatalog, ScreeningService, TextExtractor, TranscriptOnlySpeech,
};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Smart Recruitment Assistant",
    about = "Rank submitted resumes against a job description and gate candidates through the interview stages",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the screening pipeline end to end from the command line
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Directory of plain-text resume files to load instead of the built-in samples
    #[arg(long)]
    resume_dir: Option<PathBuf>,
    /// Job description label to rank against
    #[arg(long, default_value = "Python Developer")]
    requirement: String,
    /// Transcript submitted for the verbal check
    #[arg(
        long,
        default_value = "Python is programming language, used for ML and APIs."
    )]
    transcript: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo(args) => run_demo(args),
    }
}

fn build_service(
    config: &AppConfig,
) -> Arc<ScreeningService<LogNotifier, TranscriptOnlySpeech, CannedQuestionBank>> {
    Arc::new(ScreeningService::new(
        Arc::new(LogNotifier),
        Arc::new(TranscriptOnlySpeech),
        Arc::new(CannedQuestionBank::default()),
        RequirementCatalog::standard(),
        config.screening.clone(),
    ))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let service = build_service(&config);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(screening_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "smart recruitment assistant ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Reads resume files straight from disk. Stand-in for the PDF extraction
/// collaborator when demoing with plain-text resumes.
struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, location: &str) -> Result<String, ExtractionError> {
        fs::read_to_string(location).map_err(|err| ExtractionError::Unreadable(err.to_string()))
    }
}

fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let service = build_service(&config);

    println!("Candidate screening demo");

    match args.resume_dir {
        Some(dir) => {
            let locations = resume_locations(&dir)?;
            let report = ingest(&PlainTextExtractor, &locations);
            for failure in &report.failures {
                println!(
                    "! could not read {}: {}",
                    failure.identifier, failure.reason
                );
            }
            let loaded = service.load_documents(report.documents);
            println!("Loaded {loaded} resumes from {}", dir.display());
        }
        None => {
            let loaded = service.load_documents(sample_documents());
            println!("Loaded {loaded} built-in sample resumes");
        }
    }

    println!("Requirement: {}", args.requirement);
    let result = service.rank(&args.requirement)?;

    println!("\nCandidate rankings");
    for candidate in &result.ranked {
        let status = if candidate.eligible {
            "eligible"
        } else {
            "not eligible"
        };
        println!(
            "- {} | score {:.2} | {}",
            candidate.candidate_id, candidate.score, status
        );
    }

    let eligible = result.eligible();
    let Some(first) = eligible.first() else {
        println!("\nNo candidates eligible for this job description.");
        return Ok(());
    };

    println!("\nWalking {first} through the interview gate");
    let question = service.begin_verbal_check(&first.0)?;
    println!("Verbal question: {question}");

    let verdict = service.submit_verbal_answer(&first.0, &args.transcript)?;
    println!("Verbal verdict: {}", verdict.label());

    let final_question = service.begin_final_stage(&first.0)?;
    println!("Final-stage question: {final_question}");

    let view = service.complete_final_stage(&first.0, &final_question)?;
    println!("Session closed at stage {}", view.stage);

    Ok(())
}

fn resume_locations(dir: &PathBuf) -> Result<Vec<String>, AppError> {
    let mut locations = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|ext| ext == "txt").unwrap_or(false) {
            locations.push(path.to_string_lossy().into_owned());
        }
    }
    locations.sort();
    Ok(locations)
}

fn sample_documents() -> recruit_ai::workflows::screening::DocumentSet {
    use recruit_ai::workflows::screening::{CandidateDocument, CandidateId, DocumentSet};

    let document = |id: &str, text: &str| CandidateDocument {
        id: CandidateId(id.to_string()),
        text: text.to_string(),
    };

    DocumentSet::new(vec![
        document(
            "A.pdf",
            "Backend engineer with five years of Python, building REST APIs over SQL \
             databases and shipping ML scoring services to production.",
        ),
        document(
            "B.pdf",
            "Web designer focused on HTML, CSS and JavaScript animations for marketing sites.",
        ),
    ])
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
