use crate::infra::build_dispatcher;
use clap::Args;
use marketmind::config::AppConfig;
use marketmind::error::AppError;
use marketmind::workflows::marketing::{AnalyzeRequest, AnalyzeResponse, TaskDispatcher};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON file holding an analysis request (`{"leads": [...], "task": "..."}`)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Override the task named in the request file
    #[arg(long)]
    pub(crate) task: Option<String>,
    /// Skip the LLM even when OPENAI_API_KEY is set
    #[arg(long)]
    pub(crate) offline: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let body = std::fs::read(&args.file)?;
    let request = prepare_request(&body, args.task)?;

    let dispatcher = if args.offline {
        TaskDispatcher::offline()
    } else {
        let config = AppConfig::load()?;
        build_dispatcher(&config.llm)
    };

    let response = tokio::task::spawn_blocking(move || dispatcher.handle(request)).await?;
    print_response(&response)
}

fn prepare_request(body: &[u8], task: Option<String>) -> Result<AnalyzeRequest, AppError> {
    let mut request = AnalyzeRequest::from_slice(body)?;
    if let Some(task) = task {
        request.task = task;
    }
    Ok(request)
}

fn print_response(response: &AnalyzeResponse) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, response).map_err(std::io::Error::from)?;
    writeln!(stdout)?;
    Ok(())
}
