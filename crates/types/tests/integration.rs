//! Integration tests for types

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;
    use vaultiq_types::*;

    #[test]
    fn test_result_serialization_shape() {
        let result = VerificationResult {
            score: 0.9,
            status: VerificationStatus::Approved,
            details: VerificationDetails {
                fraud: 0.95,
                market: 0.85,
                ocr_data: ExtractedData::new(json!({"text": "Deed of title"})),
            },
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "score": 0.9,
                "status": "approved",
                "details": {
                    "fraud": 0.95,
                    "market": 0.85,
                    "ocr_data": {"text": "Deed of title"}
                }
            })
        );
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&VerificationStatus::Flagged).unwrap();
        assert_eq!(json, r#""flagged""#);

        let status: VerificationStatus = serde_json::from_str(r#""approved""#).unwrap();
        assert!(status.is_approved());
    }

    #[test]
    fn test_document_display_hides_bytes() {
        let doc = Document::from(vec![0u8; 16]);
        assert_eq!(doc.to_string(), "<16 bytes>");
        assert_eq!(doc.as_bytes().map(<[u8]>::len), Some(16));
        assert!(doc.as_path().is_none());

        let doc = Document::from_identifier("ipfs://QmHash");
        assert_eq!(doc.to_string(), "ipfs://QmHash");
    }

    #[test]
    fn test_score_policy_default() {
        assert_eq!(ScorePolicy::default(), ScorePolicy::Passthrough);
        let json = serde_json::to_string(&ScorePolicy::Reject).unwrap();
        assert_eq!(json, r#""reject""#);
    }

    #[test]
    fn test_output_format_default() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt, OutputFormat::Tty);
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_in_unit_range(score in -10.0f64..10.0) {
            let clamped = ScorePolicy::Clamp.apply(Collaborator::Forgery, score).unwrap();
            prop_assert!((0.0..=1.0).contains(&clamped));
        }

        #[test]
        fn prop_object_metadata_round_trips(key in "[a-z]{1,8}", value in any::<i64>()) {
            let text = json!({ key.clone(): value }).to_string();
            let meta = Metadata::parse(&text).unwrap();
            prop_assert_eq!(meta.get(&key), Some(&json!(value)));
        }
    }
}
