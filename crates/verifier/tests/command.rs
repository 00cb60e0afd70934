//! Tests for command-backed collaborators

#[cfg(all(test, unix))]
#[allow(clippy::float_cmp)]
mod tests {
    use serde_json::json;
    use std::time::Duration;
    use vaultiq_config::CommandSpec;
    use vaultiq_errors::{Collaborator, CollaboratorError};
    use vaultiq_types::{Document, Metadata};
    use vaultiq_verifier::{CommandCollaborator, ForgeryDetector, MarketValidator, TextExtractor};

    fn shell(collaborator: Collaborator, script: &str) -> CommandCollaborator {
        CommandCollaborator::new(
            collaborator,
            CommandSpec::new("sh").with_args(["-c", script, "collaborator", "{document}"]),
        )
    }

    #[tokio::test]
    async fn test_bare_number_score() {
        let forgery = shell(Collaborator::Forgery, "echo 0.93");
        let score = forgery
            .check_forgery(&Document::from_identifier("doc-1"))
            .await
            .unwrap();
        assert_eq!(score, 0.93);
    }

    #[tokio::test]
    async fn test_json_score_object() {
        let forgery = shell(Collaborator::Forgery, r#"echo '{"score": 0.4, "model": "v3"}'"#);
        let score = forgery
            .check_forgery(&Document::from_identifier("doc-1"))
            .await
            .unwrap();
        assert_eq!(score, 0.4);
    }

    #[tokio::test]
    async fn test_document_path_substituted() {
        let ocr = shell(Collaborator::Ocr, r#"printf '{"path": "%s"}' "$1""#);
        let data = ocr
            .extract_text(&Document::from_path("/srv/uploads/deed.pdf"))
            .await
            .unwrap();
        assert_eq!(data.into_inner(), json!({"path": "/srv/uploads/deed.pdf"}));
    }

    #[tokio::test]
    async fn test_document_bytes_on_stdin() {
        let ocr = shell(Collaborator::Ocr, r#"test "$1" = "-" && cat"#);
        let data = ocr
            .extract_text(&Document::from(b"plain scan text".to_vec()))
            .await
            .unwrap();
        assert_eq!(data.into_inner(), json!("plain scan text"));
    }

    #[tokio::test]
    async fn test_large_output_before_reading_stdin() {
        // Writes more than a pipe buffer before consuming its input
        let ocr = shell(
            Collaborator::Ocr,
            r"head -c 262144 /dev/zero | tr '\0' a; cat > /dev/null",
        );
        let document = Document::from(vec![b'x'; 1 << 20]);

        let data = tokio::time::timeout(Duration::from_secs(30), ocr.extract_text(&document))
            .await
            .expect("collaborator should not stall on full pipes")
            .unwrap();
        let text = data.into_inner();
        assert_eq!(text.as_str().map(str::len), Some(262_144));
    }

    #[tokio::test]
    async fn test_metadata_on_stdin() {
        let market = CommandCollaborator::new(
            Collaborator::Market,
            CommandSpec::new("sh").with_args([
                "-c",
                r#"grep -q '"price":250000' && echo 0.7 || echo 0.1"#,
            ]),
        );
        let metadata = Metadata::parse(r#"{"price": 250000}"#).unwrap();
        let score = market.validate_market_value(&metadata).await.unwrap();
        assert_eq!(score, 0.7);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_command_failure() {
        let forgery = shell(Collaborator::Forgery, "echo 'model unavailable' >&2; exit 3");
        let err = forgery
            .check_forgery(&Document::from_identifier("doc-1"))
            .await
            .unwrap_err();

        match err {
            CollaboratorError::CommandFailed {
                collaborator,
                program,
                stderr,
                ..
            } => {
                assert_eq!(collaborator, Collaborator::Forgery);
                assert_eq!(program, "sh");
                assert_eq!(stderr, "model unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_score_is_invalid_output() {
        let forgery = shell(Collaborator::Forgery, "echo looks fine to me");
        let err = forgery
            .check_forgery(&Document::from_identifier("doc-1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::InvalidOutput {
                collaborator: Collaborator::Forgery,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_program_fails() {
        let market = CommandCollaborator::new(
            Collaborator::Market,
            CommandSpec::new("/nonexistent/vaultiq-market-check"),
        );
        let err = market
            .validate_market_value(&Metadata::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::Failed {
                collaborator: Collaborator::Market,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_child_ignoring_stdin_still_succeeds() {
        let market = CommandCollaborator::new(
            Collaborator::Market,
            CommandSpec::new("sh").with_args(["-c", "echo 0.5"]),
        );
        let metadata = Metadata::parse(r#"{"note": "x"}"#).unwrap();
        assert_eq!(market.validate_market_value(&metadata).await.unwrap(), 0.5);
    }
}
