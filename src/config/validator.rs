use std::path::Path;

use super::BuildConfig;
use crate::interpreter::parse_version;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a loaded configuration, collecting every problem at once
    pub fn validate(config: &BuildConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        Self::check_path("venv_dir", &config.venv_dir, &mut errors);
        Self::check_path("manifest", &config.manifest, &mut errors);
        Self::check_path("descriptor", &config.descriptor, &mut errors);
        Self::check_path("output_dir", &config.output_dir, &mut errors);

        if let Some(interpreter) = &config.interpreter {
            if interpreter.trim().is_empty() {
                errors.push(ValidationError {
                    field: "interpreter".to_string(),
                    message: "Interpreter must not be empty".to_string(),
                });
            }
        }

        if let Some(version) = &config.min_python_version {
            if parse_version(version).is_none() {
                errors.push(ValidationError {
                    field: "min_python_version".to_string(),
                    message: format!("Invalid version: {version}"),
                });
            }
        }

        if config.install_browsers {
            if config.browsers.is_empty() {
                errors.push(ValidationError {
                    field: "browsers".to_string(),
                    message: "At least one browser is required when install_browsers is set"
                        .to_string(),
                });
            }
            for browser in &config.browsers {
                if browser.trim().is_empty() || browser.starts_with('-') {
                    errors.push(ValidationError {
                        field: "browsers".to_string(),
                        message: format!("Invalid browser name: '{browser}'"),
                    });
                }
            }
        }

        if let Some(icon) = &config.icon {
            Self::check_path("icon.source", &icon.source, &mut errors);
            Self::check_path("icon.target", &icon.target, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_path(field: &str, path: &Path, errors: &mut Vec<ValidationError>) {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: field.to_string(),
                message: "Path must not be empty".to_string(),
            });
        }
    }
}
