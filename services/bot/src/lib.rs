mod cli;
mod console;
mod infra;
mod routes;
mod server;

use coffee_hire::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
