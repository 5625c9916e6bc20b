use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - excel_path is set and names an .xlsx file
/// - choice lists hold no blank or duplicate entries
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.excel_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "excel_path cannot be empty".to_string(),
        ));
    }

    let is_xlsx = config
        .excel_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        return Err(ConfigError::ValidationError(format!(
            "excel_path must point to an .xlsx file, got {}",
            config.excel_path.display()
        )));
    }

    validate_choices("programmes", &config.programmes)?;
    validate_choices("statuts", &config.statuts)?;
    validate_choices("priorites", &config.priorites)?;

    Ok(())
}

fn validate_choices(key: &str, choices: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for choice in choices {
        if choice.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot contain an empty entry",
                key
            )));
        }
        if !seen.insert(choice.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "{} lists '{}' more than once",
                key, choice
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config {
            excel_path: PathBuf::from("tickets.xlsx"),
            programmes: vec!["ProgA".to_string(), "ProgB".to_string()],
            statuts: vec!["Ouvert".to_string(), "Fermé".to_string()],
            priorites: vec!["P1".to_string()],
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_path_fails() {
        let config = Config {
            excel_path: PathBuf::new(),
            ..valid_config()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_non_xlsx_path_fails() {
        let config = Config {
            excel_path: PathBuf::from("tickets.csv"),
            ..valid_config()
        };
        assert!(validate_config(&config).is_err());

        let config = Config {
            excel_path: PathBuf::from("TICKETS.XLSX"),
            ..valid_config()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_blank_choice_fails() {
        let config = Config {
            statuts: vec!["Ouvert".to_string(), "  ".to_string()],
            ..valid_config()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("statuts"));
    }

    #[test]
    fn test_validate_duplicate_choice_fails() {
        let config = Config {
            priorites: vec!["P1".to_string(), "P1".to_string()],
            ..valid_config()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("'P1'"));
    }
}
