//! Pure presentation: a [`UiSnap`] snapshot in, terminal drawing out. No
//! state lives here and nothing here mutates state.

use anyhow::Result;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use std::io::Stdout;
use textwrap::wrap;

use crate::render::{ResultView, Verdict};
use crate::state::{Notice, Tab};
use crate::styles;

/// Width of one confidence bar, in characters.
const BAR_WIDTH: usize = 30;

pub struct UiSnap {
    pub tab: Tab,
    pub input: String,
    pub input_cursor: usize,
    pub busy: bool,
    pub spinner: &'static str,
    pub api_healthy: Option<bool>,
    pub results: Option<(ResultView, f64)>,
    pub transcript: Vec<Notice>,
    pub scroll: usize,
}

pub fn draw(term: &mut Terminal<CrosstermBackend<Stdout>>, snap: &UiSnap) -> Result<()> {
    term.draw(|frame| {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // header + tabs
                Constraint::Length(3),  // input
                Constraint::Min(3),     // results
                Constraint::Length(7),  // transcript
                Constraint::Length(3),  // status
            ])
            .split(area);

        frame.render_widget(header_line(snap.tab), layout[0]);

        // Input box, titled after the active tab
        let input_box = Paragraph::new(snap.input.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", snap.tab.title())),
        );
        frame.render_widget(Clear, layout[1]);
        frame.render_widget(input_box, layout[1]);

        let caret_x = layout[1].x + 1 + visual_caret_col(&snap.input, snap.input_cursor);
        let caret_y = layout[1].y + 1;
        frame.set_cursor_position(Position {
            x: caret_x,
            y: caret_y,
        });

        draw_results(frame, layout[2], snap);
        draw_transcript(frame, layout[3], snap);
        draw_status(frame, layout[4], snap);
    })?;

    Ok(())
}

fn header_line(active: Tab) -> Paragraph<'static> {
    let mut spans = vec![Span::styled(" Hearsay ", styles::label())];
    for tab in [Tab::Claim, Tab::Url] {
        spans.push(Span::raw("│ "));
        let style = if tab == active {
            styles::value().add_modifier(ratatui::style::Modifier::REVERSED)
        } else {
            styles::dim()
        };
        spans.push(Span::styled(format!(" {} ", tab.title()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("(Tab switches)", styles::dim()));
    Paragraph::new(Line::from(spans))
}

fn draw_results(
    frame: &mut ratatui::Frame,
    area: Rect,
    snap: &UiSnap,
) {
    let block = Block::default().borders(Borders::ALL).title(" Results ");
    match &snap.results {
        None => {
            let placeholder = if snap.busy {
                "Checking…"
            } else {
                "No check yet."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(placeholder, styles::dim())).block(block),
                area,
            );
        }
        Some((view, bar_progress)) => {
            let width = area.width.saturating_sub(2) as usize;
            let lines = result_lines(view, *bar_progress, width);
            frame.render_widget(
                Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
                area,
            );
        }
    }
}

/// Build the results panel content. Pure, so the §visibility rules can be
/// asserted without a terminal.
pub(crate) fn result_lines(view: &ResultView, bar_progress: f64, width: usize) -> Vec<Line<'static>> {
    let verdict_style = match view.verdict {
        Verdict::Fake => styles::verdict_fake(),
        Verdict::True => styles::verdict_true(),
        Verdict::Satire => styles::verdict_satire(),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} {}", view.verdict.icon(), view.prediction),
                verdict_style,
            ),
            Span::raw("   "),
            Span::styled(format!("{}% Confidence", view.confidence), styles::value()),
        ]),
        Line::default(),
    ];

    if let Some(bars) = &view.bars {
        lines.push(Line::from(vec![
            Span::styled(format!("FAKE {:>5}%  ", bars.fake), styles::label()),
            Span::styled(bar_span(bars.fake, bar_progress), styles::bar_fake()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("TRUE {:>5}%  ", bars.true_), styles::label()),
            Span::styled(bar_span(bars.true_, bar_progress), styles::bar_true()),
        ]));
        lines.push(Line::default());
    }

    let mut info = vec![
        Span::styled("Decision Source: ", styles::label()),
        Span::styled(view.decision_source.clone(), styles::value()),
    ];
    if let Some(wordnet) = &view.wordnet {
        info.push(Span::raw("   "));
        info.push(Span::styled("WordNet Match: ", styles::label()));
        info.push(Span::styled(wordnet.clone(), styles::value()));
    }
    lines.push(Line::from(info));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled("Analyzed:", styles::label())));
    for wrapped in wrap(&view.source_text, width.max(1)) {
        lines.push(Line::from(Span::styled(
            format!("  {wrapped}"),
            styles::system(),
        )));
    }

    if !view.matches.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Fact-Check Sources:",
            styles::label(),
        )));
        for m in &view.matches {
            lines.push(Line::from(vec![
                Span::styled(format!("  Source {}: ", m.ordinal), styles::label()),
                Span::styled(m.verdict.clone(), styles::value()),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    \"{}\"", m.text),
                styles::system(),
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", m.url),
                styles::link(),
            )));
        }
    }

    lines
}

/// Render one bar at its animated width: filled blocks up to
/// `percent * progress`, light shade for the remainder.
fn bar_span(percent: f64, progress: f64) -> String {
    let target = (percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64;
    let filled = (target * progress.clamp(0.0, 1.0)).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

fn draw_transcript(frame: &mut ratatui::Frame, area: Rect, snap: &UiSnap) {
    let visible_h = area.height.saturating_sub(2) as usize;
    let content_width = area.width.saturating_sub(2) as usize;
    let wrapped = wrap_transcript(&snap.transcript, content_width);
    let total = wrapped.len();
    let start = total.saturating_sub(visible_h + snap.scroll);
    let end = total.saturating_sub(snap.scroll.min(total));

    let items: Vec<ListItem> = wrapped[start..end]
        .iter()
        .map(|(text, style)| ListItem::new(Line::from(Span::styled(text.clone(), *style))))
        .collect();

    let body = List::new(items).block(Block::default().borders(Borders::ALL).title(" Messages "));
    frame.render_widget(body, area);
}

fn draw_status(frame: &mut ratatui::Frame, area: Rect, snap: &UiSnap) {
    let api = match snap.api_healthy {
        Some(true) => Span::styled("API ✓", styles::verdict_true()),
        Some(false) => Span::styled("API ✗", styles::error()),
        None => Span::styled("API ?", styles::dim()),
    };
    let status_line = Line::from(vec![
        Span::raw(" "),
        Span::styled(snap.spinner, styles::label()),
        Span::raw(" "),
        if snap.busy {
            Span::styled("Checking…", styles::label())
        } else {
            Span::styled("Idle", styles::verdict_true())
        },
        Span::raw(" • "),
        api,
        Span::raw(" • Ctrl+Enter check • /help"),
    ]);
    let status =
        Paragraph::new(status_line).block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, area);
}

fn visual_caret_col(input: &str, cursor: usize) -> u16 {
    use unicode_width::UnicodeWidthStr;
    UnicodeWidthStr::width(&input[..cursor.min(input.len())]) as u16
}

fn wrap_transcript(lines: &[Notice], width: usize) -> Vec<(String, Style)> {
    let effective_width = width.max(1);
    let mut out = Vec::new();

    for entry in lines {
        let style = entry.style;
        if entry.text.is_empty() {
            out.push((String::new(), style));
            continue;
        }

        for raw_line in entry.text.split('\n') {
            if raw_line.is_empty() {
                out.push((String::new(), style));
                continue;
            }

            let segments = wrap(raw_line, effective_width);
            if segments.is_empty() {
                out.push((String::new(), style));
            } else {
                out.extend(segments.into_iter().map(|seg| (seg.into_owned(), style)));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ConfidenceBars, SourceRow};

    fn plain(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn base_view() -> ResultView {
        ResultView {
            verdict: Verdict::Fake,
            prediction: "FAKE".to_string(),
            confidence: 92.0,
            decision_source: "NLP Model".to_string(),
            bars: Some(ConfidenceBars {
                fake: 92.0,
                true_: 8.0,
            }),
            wordnet: Some("4/6 keywords".to_string()),
            source_text: "the claim".to_string(),
            matches: Vec::new(),
        }
    }

    #[test]
    fn bars_render_for_model_scored_results() {
        let text = plain(&result_lines(&base_view(), 1.0, 80));
        assert!(text.contains("FAKE  92.0%") || text.contains("FAKE    92%"));
        assert!(text.contains("WordNet Match: 4/6 keywords"));
        assert!(text.contains("Analyzed:"));
    }

    #[test]
    fn bars_and_wordnet_absent_for_known_sites() {
        let mut view = base_view();
        view.bars = None;
        view.wordnet = None;
        let text = plain(&result_lines(&view, 1.0, 80));
        assert!(!text.contains('█'));
        assert!(!text.contains("WordNet"));
    }

    #[test]
    fn matches_panel_hidden_when_empty_and_shows_ordinals_otherwise() {
        let mut view = base_view();
        let text = plain(&result_lines(&view, 1.0, 80));
        assert!(!text.contains("Fact-Check Sources"));

        view.matches = vec![SourceRow {
            ordinal: 1,
            verdict: "False".to_string(),
            text: "the claim".to_string(),
            url: "https://factcheck.example/1".to_string(),
        }];
        let text = plain(&result_lines(&view, 1.0, 80));
        assert!(text.contains("Fact-Check Sources:"));
        assert_eq!(text.matches("Source 1:").count(), 1);
        assert!(text.contains("\"the claim\""));
        assert!(text.contains("https://factcheck.example/1"));
    }

    #[test]
    fn bar_animation_starts_collapsed() {
        assert_eq!(bar_span(92.0, 0.0), "░".repeat(BAR_WIDTH));
        let full = bar_span(100.0, 1.0);
        assert_eq!(full, "█".repeat(BAR_WIDTH));
        // Halfway through the animation, roughly half the target width.
        let half = bar_span(100.0, 0.5);
        assert_eq!(half.chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
    }
}
