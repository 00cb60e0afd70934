//! Interfaces to the external scoring collaborators
//!
//! The verifier owns none of the models. Each collaborator is reached
//! through one of these traits, so an in-process model, a subprocess or a
//! test double can be plugged in interchangeably.

use async_trait::async_trait;
use std::sync::Arc;
use vaultiq_errors::CollaboratorError;
use vaultiq_types::{Document, ExtractedData, Metadata};

/// OCR extraction over a document
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, document: &Document) -> Result<ExtractedData, CollaboratorError>;
}

/// Forgery / fraud scoring over a document, nominally in `[0, 1]`
#[async_trait]
pub trait ForgeryDetector: Send + Sync {
    async fn check_forgery(&self, document: &Document) -> Result<f64, CollaboratorError>;
}

/// Market plausibility scoring over submission metadata, nominally in `[0, 1]`
#[async_trait]
pub trait MarketValidator: Send + Sync {
    async fn validate_market_value(&self, metadata: &Metadata) -> Result<f64, CollaboratorError>;
}

#[async_trait]
impl<T: TextExtractor + ?Sized> TextExtractor for Arc<T> {
    async fn extract_text(&self, document: &Document) -> Result<ExtractedData, CollaboratorError> {
        (**self).extract_text(document).await
    }
}

#[async_trait]
impl<T: ForgeryDetector + ?Sized> ForgeryDetector for Arc<T> {
    async fn check_forgery(&self, document: &Document) -> Result<f64, CollaboratorError> {
        (**self).check_forgery(document).await
    }
}

#[async_trait]
impl<T: MarketValidator + ?Sized> MarketValidator for Arc<T> {
    async fn validate_market_value(&self, metadata: &Metadata) -> Result<f64, CollaboratorError> {
        (**self).validate_market_value(metadata).await
    }
}
