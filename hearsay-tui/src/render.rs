//! The result renderer: a pure mapping from one API reply to everything the
//! results panel shows. Handlers build a [`ResultView`] here and hand it to
//! the draw code; nothing downstream looks at the wire shape again.

use hearsay_client::{Classification, ExplainReport, VerdictType};

use crate::state::Notice;
use crate::styles;

/// Verdict bucket; drives color and icon selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Fake,
    True,
    Satire,
}

impl Verdict {
    pub fn icon(self) -> &'static str {
        match self {
            Verdict::Fake => "✗",
            Verdict::True => "✓",
            Verdict::Satire => "🎭",
        }
    }
}

/// Percentage widths for the two confidence bars. Hidden entirely for
/// known-site verdicts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBars {
    pub fake: f64,
    pub true_: f64,
}

/// One corroborating source row, already carrying its 1-based ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub ordinal: usize,
    pub verdict: String,
    pub text: String,
    pub url: String,
}

/// Fully derived view state for one classification result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub verdict: Verdict,
    pub prediction: String,
    pub confidence: f64,
    pub decision_source: String,
    pub bars: Option<ConfidenceBars>,
    /// `"{hits}/{total} keywords"`, shown only for model-scored results.
    pub wordnet: Option<String>,
    /// The analyzed input: the claim text, or `URL: {url}` for URL checks.
    pub source_text: String,
    pub matches: Vec<SourceRow>,
}

/// Map a classification onto its view state.
///
/// Known-site status takes precedence over the label-derived category: a
/// known satire domain renders as satire and any other known domain as fake,
/// whatever `label` says. Model-scored results fall back to `label == 0` for
/// fake, everything else for true.
pub fn render_classification(reply: &Classification) -> ResultView {
    let verdict = if reply.is_known_site {
        match reply.verdict_type {
            Some(VerdictType::Satire) => Verdict::Satire,
            _ => Verdict::Fake,
        }
    } else if reply.label == 0 {
        Verdict::Fake
    } else {
        Verdict::True
    };

    let bars = (!reply.is_known_site).then_some(ConfidenceBars {
        fake: reply.probabilities.fake,
        true_: reply.probabilities.true_,
    });

    let wordnet = match (reply.is_known_site, reply.wordnet_hits, reply.wordnet_total) {
        (false, Some(hits), Some(total)) => Some(format!("{hits}/{total} keywords")),
        _ => None,
    };

    let source_text = match (&reply.text, &reply.url) {
        (Some(text), _) => text.clone(),
        (None, Some(url)) => format!("URL: {url}"),
        (None, None) => String::new(),
    };

    let matches = reply
        .api_matches
        .iter()
        .enumerate()
        .map(|(i, m)| SourceRow {
            ordinal: i + 1,
            verdict: m.verdict.clone(),
            text: m.text.clone(),
            url: m.url.clone(),
        })
        .collect();

    ResultView {
        verdict,
        prediction: reply.prediction.clone(),
        confidence: reply.confidence,
        decision_source: reply.decision_source.clone(),
        bars,
        wordnet,
        source_text,
        matches,
    }
}

/// View state for one explanation: feature/contribution pairs, strongest
/// first, as the API ordered them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainView {
    pub cleaned_text: String,
    pub toward_true: Vec<(String, f64)>,
    pub toward_fake: Vec<(String, f64)>,
}

impl From<&ExplainReport> for ExplainView {
    fn from(report: &ExplainReport) -> Self {
        let weights = |rows: &[hearsay_client::FeatureWeight]| {
            rows.iter()
                .map(|f| (f.feature.clone(), f.contrib))
                .collect::<Vec<_>>()
        };
        Self {
            cleaned_text: report.cleaned_text.clone(),
            toward_true: weights(&report.top_positive_features),
            toward_fake: weights(&report.top_negative_features),
        }
    }
}

/// Transcript lines for one explanation.
pub fn render_explain_lines(view: &ExplainView) -> Vec<Notice> {
    let mut out = vec![Notice::new("← Explanation".to_string(), styles::label())];
    out.push(Notice::new(
        format!("  model saw: {}", view.cleaned_text),
        styles::dim(),
    ));

    let mut section = |title: &str, rows: &[(String, f64)]| {
        if rows.is_empty() {
            return;
        }
        out.push(Notice::new(format!("  {title}"), styles::system()));
        for (feature, contrib) in rows {
            out.push(Notice::new(
                format!("    {contrib:+.4}  {feature}"),
                styles::value(),
            ));
        }
    };
    section("Pushes toward TRUE:", &view.toward_true);
    section("Pushes toward FAKE:", &view.toward_fake);

    out.push(Notice::new(String::new(), styles::system()));
    out
}

const COPY_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Fixed plain-text export of a rendered verdict, for the clipboard.
pub fn copy_template(view: &ResultView) -> String {
    format!(
        "Fake News Detector Results\n\
         {COPY_RULE}\n\
         Verdict: {}\n\
         Confidence: {}% Confidence\n\
         Decision Source: {}\n\
         \n\
         Claim: \"{}\"\n\
         {COPY_RULE}",
        view.prediction, view.confidence, view.decision_source, view.source_text
    )
}
