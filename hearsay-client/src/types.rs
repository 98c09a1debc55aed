//! Wire-level data model for the detector API.
//!
//! Responses use presence of an `error` field to signal domain failure on any
//! HTTP status. That union is decoded exactly once, here, into a tagged
//! [`Reply`]; everything downstream works with plain typed values and never
//! re-checks for an `error` key.

use hearsay_common::HearsayError;
use serde::{Deserialize, Serialize};

/// Body for `POST /predict` and `POST /explain`.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimRequest {
    pub text: String,
}

/// Body for `POST /url`.
#[derive(Debug, Clone, Serialize)]
pub struct UrlRequest {
    pub url: String,
}

/// Category assigned to a pre-classified domain. Only meaningful when
/// [`Classification::is_known_site`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictType {
    Satire,
    Fake,
}

/// Percentage split between the two classes, 0..100 each. Rendered as-is;
/// the API owns the invariant that they describe one distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub fake: f64,
    #[serde(rename = "true")]
    pub true_: f64,
}

/// One corroborating fact-check source attached to a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMatch {
    #[serde(default)]
    pub verdict: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: String,
}

/// Successful classification payload from `/predict` or `/url`.
///
/// Exactly one of `text`/`url` is populated, matching the endpoint that was
/// called. `label` follows the API's convention: 0 means fake, anything else
/// (including the known-satire `-1`) does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: i32,
    pub prediction: String,
    pub confidence: f64,
    pub probabilities: Probabilities,
    #[serde(default = "default_decision_source")]
    pub decision_source: String,
    #[serde(default)]
    pub is_known_site: bool,
    #[serde(default)]
    pub verdict_type: Option<VerdictType>,
    #[serde(default)]
    pub wordnet_hits: Option<u32>,
    #[serde(default)]
    pub wordnet_total: Option<u32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_matches: Vec<ApiMatch>,
}

fn default_decision_source() -> String {
    "model".to_string()
}

/// One feature row from the explanation endpoint. Positive `contrib`
/// supports the TRUE class, negative supports FAKE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub tfidf: f64,
    pub coef: f64,
    pub contrib: f64,
}

/// Successful payload from `POST /explain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainReport {
    pub cleaned_text: String,
    #[serde(default)]
    pub top_positive_features: Vec<FeatureWeight>,
    #[serde(default)]
    pub top_negative_features: Vec<FeatureWeight>,
}

/// The `{error}`-discriminated reply union, decoded once at the boundary.
///
/// Failure is tried first: a body carrying `error` is a domain failure even
/// when every other field is present, while a success body can never match
/// it (the `error` key is required). That makes the discrimination total.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Reply<T> {
    Failure { error: String },
    Success(T),
}

impl<T> Reply<T> {
    pub(crate) fn into_result(self) -> Result<T, HearsayError> {
        match self {
            Reply::Failure { error } => Err(HearsayError::Domain(error)),
            Reply::Success(body) => Ok(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Classification, HearsayError> {
        serde_json::from_str::<Reply<Classification>>(json)
            .unwrap()
            .into_result()
    }

    #[test]
    fn model_scored_reply_decodes() {
        let reply = decode(
            r#"{
                "text": "the moon landing was faked",
                "prediction": "FAKE",
                "label": 0,
                "confidence": 92.0,
                "probabilities": {"fake": 92.0, "true": 8.0},
                "decision_source": "NLP Model",
                "wordnet_hits": 5,
                "wordnet_total": 7,
                "api_matches": [],
                "api_count": 0
            }"#,
        )
        .unwrap();

        assert_eq!(reply.label, 0);
        assert_eq!(reply.probabilities.true_, 8.0);
        assert!(!reply.is_known_site);
        assert_eq!(reply.wordnet_hits, Some(5));
        assert_eq!(reply.text.as_deref(), Some("the moon landing was faked"));
        assert!(reply.url.is_none());
        assert!(reply.api_matches.is_empty());
    }

    #[test]
    fn known_satire_reply_decodes_with_negative_label() {
        let reply = decode(
            r#"{
                "url": "https://theonion.com/story",
                "prediction": "Intentional Satire",
                "label": -1,
                "confidence": 100.0,
                "probabilities": {"fake": 0, "true": 0},
                "decision_source": "Known Site Database",
                "is_known_site": true,
                "verdict_type": "satire"
            }"#,
        )
        .unwrap();

        assert!(reply.is_known_site);
        assert_eq!(reply.verdict_type, Some(VerdictType::Satire));
        assert_eq!(reply.label, -1);
        assert!(reply.wordnet_hits.is_none());
    }

    #[test]
    fn error_body_wins_over_success_shape() {
        let err = decode(r#"{"error": "rate limited"}"#).unwrap_err();
        assert!(matches!(err, HearsayError::Domain(ref m) if m == "rate limited"));

        // An `error` key poisons the body even alongside a full payload.
        let err = decode(
            r#"{
                "error": "partial failure",
                "prediction": "FAKE",
                "label": 0,
                "confidence": 50.0,
                "probabilities": {"fake": 50.0, "true": 50.0}
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, HearsayError::Domain(ref m) if m == "partial failure"));
    }

    #[test]
    fn decision_source_defaults_to_model() {
        let reply = decode(
            r#"{
                "prediction": "TRUE",
                "label": 1,
                "confidence": 70.0,
                "probabilities": {"fake": 30.0, "true": 70.0}
            }"#,
        )
        .unwrap();
        assert_eq!(reply.decision_source, "model");
    }

    #[test]
    fn explain_reply_decodes() {
        let json = r#"{
            "cleaned_text": "moon landing faked",
            "top_positive_features": [
                {"feature": "landing", "tfidf": 0.4, "coef": 1.2, "contrib": 0.48}
            ],
            "top_negative_features": [
                {"feature": "faked", "tfidf": 0.6, "coef": -2.0, "contrib": -1.2}
            ]
        }"#;
        let report = serde_json::from_str::<Reply<ExplainReport>>(json)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(report.top_positive_features[0].feature, "landing");
        assert!(report.top_negative_features[0].contrib < 0.0);
    }
}
