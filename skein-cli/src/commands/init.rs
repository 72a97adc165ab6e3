use std::path::Path;

use skein_bind::config::{BindingConfig, CONFIG_FILE_NAME};

use crate::error::CliError;
use crate::format::print_success;

pub fn run(dir: &str) -> Result<(), CliError> {
    let path = Path::new(dir).join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(CliError::Config(format!(
            "{} already exists, refusing to overwrite",
            path.display()
        )));
    }

    BindingConfig::init(dir)?;
    tracing::info!(dir, "binding configuration initialized");
    print_success(&format!("wrote {}", path.display()));
    Ok(())
}
