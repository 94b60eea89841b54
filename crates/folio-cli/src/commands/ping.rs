use folio_core::ValuationService;

use crate::error::CliError;

pub async fn run(service: &ValuationService) -> Result<(), CliError> {
    let banner = service
        .ping()
        .await
        .map_err(|error| CliError::Unreachable(error.message().to_string()))?;
    println!("{}", banner.trim_end());
    Ok(())
}
