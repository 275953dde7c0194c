mod analyze;
mod cli;
mod console;
mod infra;
mod routes;
mod server;

use marketmind::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
