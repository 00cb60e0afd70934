//! Integration tests for config

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;
    use vaultiq_config::constants::DEFAULT_APPROVAL_THRESHOLD;
    use vaultiq_config::*;
    use vaultiq_types::{Collaborator, ColorChoice, OutputFormat, ScorePolicy};

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [
            "VAULTIQ_OUTPUT",
            "VAULTIQ_COLOR",
            "VAULTIQ_APPROVAL_THRESHOLD",
            "VAULTIQ_SCORE_POLICY",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.verification.approval_threshold, DEFAULT_APPROVAL_THRESHOLD);
        assert_eq!(config.verification.score_policy, ScorePolicy::Passthrough);
        assert_eq!(config.general.default_output, OutputFormat::Tty);
        assert_eq!(config.collaborators.missing().len(), 3);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
default_output = "json"
color = "never"

[verification]
approval_threshold = 0.75
score_policy = "clamp"

[collaborators.forgery]
program = "/usr/local/bin/forgery-check"
args = ["--input", "{{document}}"]

[collaborators.market]
program = "market-check"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.default_output, OutputFormat::Json);
        assert_eq!(config.general.color, ColorChoice::Never);
        assert_eq!(config.verification.approval_threshold, 0.75);
        assert_eq!(config.verification.score_policy, ScorePolicy::Clamp);

        let forgery = config.collaborators.get(Collaborator::Forgery).unwrap();
        assert_eq!(forgery.program, "/usr/local/bin/forgery-check");
        assert_eq!(forgery.args, vec!["--input", "{document}"]);
        assert_eq!(config.collaborators.missing(), vec![Collaborator::Ocr]);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let result = Config::load_from_file(std::path::Path::new("/nonexistent/vaultiq.toml")).await;
        assert!(matches!(
            result,
            Err(vaultiq_errors::Error::Config(vaultiq_errors::ConfigError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml_str("[verification]\napproval_threshold = \"high\"");
        assert!(matches!(
            result,
            Err(vaultiq_errors::Error::Config(vaultiq_errors::ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("VAULTIQ_OUTPUT", "plain");
        std::env::set_var("VAULTIQ_COLOR", "always");
        std::env::set_var("VAULTIQ_APPROVAL_THRESHOLD", "0.9");
        std::env::set_var("VAULTIQ_SCORE_POLICY", "reject");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.general.default_output, OutputFormat::Plain);
        assert_eq!(config.general.color, ColorChoice::Always);
        assert_eq!(config.verification.approval_threshold, 0.9);
        assert_eq!(config.verification.score_policy, ScorePolicy::Reject);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("VAULTIQ_SCORE_POLICY", "sometimes");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.verification.approval_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.collaborators.ocr = Some(CommandSpec::new("  "));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_document_placeholder_for_market() {
        use vaultiq_errors::UserFacingError;

        let mut config = Config::default();
        config.collaborators.forgery =
            Some(CommandSpec::new("forgery-check").with_args(["--input", "{document}"]));
        assert!(config.validate().is_ok());

        config.collaborators.market =
            Some(CommandSpec::new("market-check").with_args(["--file={document}"]));
        let err = config.validate().unwrap_err();
        assert_eq!(err.user_code(), Some("config.invalid"));
    }

    #[test]
    fn test_toml_output_round_trips() {
        let mut config = Config::default();
        config.collaborators.ocr = Some(CommandSpec::new("ocr-extract").with_args(["{document}"]));

        let text = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed.collaborators.ocr, config.collaborators.ocr);
        assert_eq!(parsed.verification.approval_threshold, 0.8);
    }
}
