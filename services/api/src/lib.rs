mod cli;
mod estimate;
mod infra;
mod routes;
mod server;

use care_cost::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
