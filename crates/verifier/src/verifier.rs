//! The verification aggregator

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;
use vaultiq_config::constants::DEFAULT_APPROVAL_THRESHOLD;
use vaultiq_config::{Config, VerificationConfig};
use vaultiq_errors::{Collaborator, CollaboratorError, ConfigError, Error};
use vaultiq_events::{AppEvent, EventEmitter, EventSender, VerificationEvent};
use vaultiq_types::{Document, Metadata, ScorePolicy, VerificationDetails, VerificationResult};

use crate::collaborator::{ForgeryDetector, MarketValidator, TextExtractor};
use crate::command::CommandCollaborator;
use crate::scoring::{aggregate, classify};

/// Runs the three collaborators in order and turns their scores into a verdict.
///
/// A `Verifier` holds only shared, immutable handles, so one instance can
/// serve any number of concurrent verifications.
pub struct Verifier {
    extractor: Arc<dyn TextExtractor>,
    forgery: Arc<dyn ForgeryDetector>,
    market: Arc<dyn MarketValidator>,
    approval_threshold: f64,
    score_policy: ScorePolicy,
    tx: Option<EventSender>,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("approval_threshold", &self.approval_threshold)
            .field("score_policy", &self.score_policy)
            .field("events", &self.tx.is_some())
            .finish_non_exhaustive()
    }
}

impl EventEmitter for Verifier {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl Verifier {
    /// Start building a verifier
    #[must_use]
    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::new()
    }

    #[must_use]
    pub fn approval_threshold(&self) -> f64 {
        self.approval_threshold
    }

    #[must_use]
    pub fn score_policy(&self) -> ScorePolicy {
        self.score_policy
    }

    /// Verify a document against its serialized metadata.
    ///
    /// Metadata is parsed first; then OCR extraction, forgery detection and
    /// market validation run one after another, each finishing before the
    /// next starts. Dropping the returned future abandons the run at its
    /// current await point.
    ///
    /// # Errors
    ///
    /// Returns `Error::Metadata` if `metadata_text` is not a JSON object, in
    /// which case no collaborator is called, or `Error::Collaborator` as soon
    /// as any collaborator fails or its score is refused by the score policy.
    pub async fn run_verification(
        &self,
        document: &Document,
        metadata_text: &str,
    ) -> Result<VerificationResult, Error> {
        self.verify_with_id(Uuid::new_v4(), document, metadata_text)
            .await
    }

    /// Like [`Verifier::run_verification`], but gives up as soon as `cancel`
    /// completes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` if `cancel` resolves first, otherwise the
    /// same errors as [`Verifier::run_verification`].
    pub async fn run_verification_until<C>(
        &self,
        document: &Document,
        metadata_text: &str,
        cancel: C,
    ) -> Result<VerificationResult, Error>
    where
        C: Future<Output = ()>,
    {
        let verification_id = Uuid::new_v4();
        tokio::select! {
            biased;
            () = cancel => {
                warn!(%verification_id, "verification cancelled");
                self.emit(AppEvent::Verification(VerificationEvent::Cancelled { verification_id }));
                Err(Error::Cancelled)
            }
            result = self.verify_with_id(verification_id, document, metadata_text) => result,
        }
    }

    async fn verify_with_id(
        &self,
        verification_id: Uuid,
        document: &Document,
        metadata_text: &str,
    ) -> Result<VerificationResult, Error> {
        let span = tracing::info_span!("verification", %verification_id, %document);
        async move {
            let started = Instant::now();
            self.emit_verification_started(verification_id, document.to_string());

            match self.pipeline(verification_id, document, metadata_text).await {
                Ok(result) => {
                    info!(score = result.score, status = %result.status, "verification finished");
                    self.emit_verification_completed(
                        verification_id,
                        result.score,
                        result.status,
                        started.elapsed(),
                    );
                    Ok(result)
                }
                Err(err) => {
                    warn!(error = %err, "verification failed");
                    self.emit_verification_failed(verification_id, err.collaborator(), &err);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn pipeline(
        &self,
        verification_id: Uuid,
        document: &Document,
        metadata_text: &str,
    ) -> Result<VerificationResult, Error> {
        let metadata = Metadata::parse(metadata_text)?;
        debug!(fields = metadata.len(), "metadata parsed");
        self.emit(AppEvent::Verification(VerificationEvent::MetadataParsed {
            verification_id,
            fields: metadata.len(),
        }));

        let (ocr_data, elapsed) = self
            .stage(
                verification_id,
                Collaborator::Ocr,
                self.extractor.extract_text(document),
            )
            .await?;
        self.emit_collaborator_completed(verification_id, Collaborator::Ocr, None, elapsed);

        let (fraud, elapsed) = self
            .stage(
                verification_id,
                Collaborator::Forgery,
                self.forgery.check_forgery(document),
            )
            .await?;
        let fraud = self.score_policy.apply(Collaborator::Forgery, fraud)?;
        self.emit_collaborator_completed(
            verification_id,
            Collaborator::Forgery,
            Some(fraud),
            elapsed,
        );

        let (market, elapsed) = self
            .stage(
                verification_id,
                Collaborator::Market,
                self.market.validate_market_value(&metadata),
            )
            .await?;
        let market = self.score_policy.apply(Collaborator::Market, market)?;
        self.emit_collaborator_completed(
            verification_id,
            Collaborator::Market,
            Some(market),
            elapsed,
        );

        let score = aggregate(fraud, market);
        let status = classify(score, self.approval_threshold);

        Ok(VerificationResult {
            score,
            status,
            details: VerificationDetails {
                fraud,
                market,
                ocr_data,
            },
        })
    }

    async fn stage<T, F>(
        &self,
        verification_id: Uuid,
        collaborator: Collaborator,
        call: F,
    ) -> Result<(T, Duration), CollaboratorError>
    where
        F: Future<Output = Result<T, CollaboratorError>>,
    {
        debug!(%collaborator, "calling collaborator");
        self.emit_collaborator_started(verification_id, collaborator);
        let started = Instant::now();
        let value = call.await?;
        Ok((value, started.elapsed()))
    }
}

/// Builder for [`Verifier`]
#[derive(Default)]
pub struct VerifierBuilder {
    extractor: Option<Arc<dyn TextExtractor>>,
    forgery: Option<Arc<dyn ForgeryDetector>>,
    market: Option<Arc<dyn MarketValidator>>,
    approval_threshold: Option<f64>,
    score_policy: ScorePolicy,
    tx: Option<EventSender>,
}

impl VerifierBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration: scoring settings plus a
    /// [`CommandCollaborator`] for every collaborator with a command.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new().with_verification_config(&config.verification);
        let commands = &config.collaborators;

        if let Some(spec) = &commands.ocr {
            builder = builder
                .with_text_extractor(CommandCollaborator::new(Collaborator::Ocr, spec.clone()));
        }
        if let Some(spec) = &commands.forgery {
            builder = builder
                .with_forgery_detector(CommandCollaborator::new(Collaborator::Forgery, spec.clone()));
        }
        if let Some(spec) = &commands.market {
            builder = builder
                .with_market_validator(CommandCollaborator::new(Collaborator::Market, spec.clone()));
        }
        builder
    }

    #[must_use]
    pub fn with_verification_config(mut self, config: &VerificationConfig) -> Self {
        self.approval_threshold = Some(config.approval_threshold);
        self.score_policy = config.score_policy;
        self
    }

    #[must_use]
    pub fn with_text_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    #[must_use]
    pub fn with_forgery_detector(mut self, detector: impl ForgeryDetector + 'static) -> Self {
        self.forgery = Some(Arc::new(detector));
        self
    }

    #[must_use]
    pub fn with_market_validator(mut self, validator: impl MarketValidator + 'static) -> Self {
        self.market = Some(Arc::new(validator));
        self
    }

    #[must_use]
    pub fn with_approval_threshold(mut self, threshold: f64) -> Self {
        self.approval_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_score_policy(mut self, policy: ScorePolicy) -> Self {
        self.score_policy = policy;
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Build the verifier
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorError::NotConfigured` if any collaborator is
    /// missing, or a config error if the threshold is not finite.
    pub fn build(self) -> Result<Verifier, Error> {
        let approval_threshold = self.approval_threshold.unwrap_or(DEFAULT_APPROVAL_THRESHOLD);
        if !approval_threshold.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "verification.approval_threshold".to_string(),
                value: approval_threshold.to_string(),
            }
            .into());
        }

        let extractor = self.extractor.ok_or(CollaboratorError::NotConfigured {
            collaborator: Collaborator::Ocr,
        })?;
        let forgery = self.forgery.ok_or(CollaboratorError::NotConfigured {
            collaborator: Collaborator::Forgery,
        })?;
        let market = self.market.ok_or(CollaboratorError::NotConfigured {
            collaborator: Collaborator::Market,
        })?;

        Ok(Verifier {
            extractor,
            forgery,
            market,
            approval_threshold,
            score_policy: self.score_policy,
            tx: self.tx,
        })
    }
}
