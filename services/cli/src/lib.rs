mod cli;
mod commands;

use grantdesk::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
