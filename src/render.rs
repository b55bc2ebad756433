//! Plain-text rendering of a [`View`] for the terminal client.
//!
//! Search results are laid out in two columns, fact checks on the left and
//! news on the right. A failed stream shows one fixed message no matter why
//! it failed.

use chrono::DateTime;
use itertools::{EitherOrBoth, Itertools};
use std::fmt::Write;

use crate::models::{Article, FactCheck};
use crate::orchestrator::{ResultStream, SearchResults, View};
use crate::utils::fit_width;

/// Shown in place of a stream that failed, whatever the cause.
pub const NO_RESULTS_MESSAGE: &str = "No Query found in our database :(";

/// Shown for a claim that came back without any review.
pub const NO_RATING_MESSAGE: &str = "No rating available";

/// How a reviewer's textual rating is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Rated exactly `"True"`.
    Supported,
    /// Any other rating.
    Disputed,
    /// No review to take a rating from.
    Unrated,
}

impl Verdict {
    pub fn of(fact_check: &FactCheck) -> Self {
        match fact_check.representative() {
            Some(review) if review.textualRating == "True" => Verdict::Supported,
            Some(_) => Verdict::Disputed,
            None => Verdict::Unrated,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Verdict::Supported => "+",
            Verdict::Disputed => "x",
            Verdict::Unrated => "?",
        }
    }
}

/// One line for a fact check: marker, rating and review title.
pub fn fact_check_line(fact_check: &FactCheck) -> String {
    let verdict = Verdict::of(fact_check);
    match fact_check.representative() {
        Some(review) => format!("{} [{}] {}", verdict.marker(), review.textualRating, review.title),
        None => format!("{} [{}]", verdict.marker(), NO_RATING_MESSAGE),
    }
}

/// `YYYY-MM-DD` from the article's `publishedAt`, when it parses.
pub fn published_date(article: &Article) -> Option<String> {
    let raw = article.published_at()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn article_line(article: &Article) -> String {
    match published_date(article) {
        Some(date) => format!("{date} {}", article.title),
        None => article.title.clone(),
    }
}

fn column<T>(stream: &ResultStream<T>, line: impl Fn(&T) -> String) -> Vec<String> {
    let mut lines = Vec::new();
    if stream.is_error() {
        lines.push(NO_RESULTS_MESSAGE.to_string());
    }
    lines.extend(stream.items.iter().map(line));
    lines
}

/// Two columns side by side; the left one is padded or clipped to `width`.
fn side_by_side(left: &[String], right: &[String], width: usize) -> String {
    let mut out = String::new();
    for pair in left.iter().zip_longest(right.iter()) {
        let (l, r) = match pair {
            EitherOrBoth::Both(l, r) => (l.as_str(), r.as_str()),
            EitherOrBoth::Left(l) => (l.as_str(), ""),
            EitherOrBoth::Right(r) => ("", r.as_str()),
        };
        let row = format!("{} | {}", fit_width(l, width), r);
        let _ = writeln!(out, "{}", row.trim_end());
    }
    out
}

fn render_search(results: &SearchResults, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Results for {:?}\n", results.query);

    let mut left = vec![fit_width("Fact Checks", width), "-".repeat(width)];
    left.extend(column(&results.facts, fact_check_line));
    let mut right = vec!["Relevant News".to_string(), "-".repeat(width)];
    right.extend(column(&results.news, article_line));

    out.push_str(&side_by_side(&left, &right, width));
    out
}

/// Render `view` with columns `width` characters wide.
pub fn render_view(view: &View, width: usize) -> String {
    match view {
        View::Idle => "Write your query to verify it.\n".to_string(),
        View::Searching(progress) => format!("Searching for {:?}...\n", progress.query),
        View::LoadingHeadlines { .. } => "Loading latest headlines...\n".to_string(),
        View::Searched(results) => render_search(results, width),
        View::Headlines(stream) => {
            let mut out = "Latest headlines\n".to_string();
            for line in column(stream, article_line) {
                let _ = writeln!(out, "- {line}");
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fact_check(value: serde_json::Value) -> FactCheck {
        serde_json::from_value(value).unwrap()
    }

    fn article(title: &str, published: Option<&str>) -> Article {
        let mut value = json!({"title": title, "url": "https://news.example/x"});
        if let Some(p) = published {
            value["publishedAt"] = json!(p);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_verdict() {
        let supported = fact_check(json!({"claimReview": [{"textualRating": "True"}]}));
        let disputed = fact_check(json!({"claimReview": [{"textualRating": "Mostly False"}]}));
        let lowercase = fact_check(json!({"claimReview": [{"textualRating": "true"}]}));
        let unrated = fact_check(json!({"claimReview": []}));

        assert_eq!(Verdict::of(&supported), Verdict::Supported);
        assert_eq!(Verdict::of(&disputed), Verdict::Disputed);
        assert_eq!(Verdict::of(&lowercase), Verdict::Disputed);
        assert_eq!(Verdict::of(&unrated), Verdict::Unrated);
    }

    #[test]
    fn test_fact_check_line_without_review() {
        let line = fact_check_line(&fact_check(json!({"text": "claim"})));
        assert_eq!(line, "? [No rating available]");
    }

    #[test]
    fn test_fact_check_line_uses_first_review() {
        let line = fact_check_line(&fact_check(json!({
            "claimReview": [
                {"title": "First", "textualRating": "False"},
                {"title": "Second", "textualRating": "True"}
            ]
        })));
        assert_eq!(line, "x [False] First");
    }

    #[test]
    fn test_published_date() {
        assert_eq!(
            published_date(&article("a", Some("2025-05-06T14:30:00Z"))).as_deref(),
            Some("2025-05-06")
        );
        assert_eq!(published_date(&article("a", Some("yesterday"))), None);
        assert_eq!(published_date(&article("a", None)), None);
    }

    #[test]
    fn test_failed_stream_shows_fixed_message() {
        let results = SearchResults {
            query: "q".to_string(),
            facts: ResultStream::default(),
            news: ResultStream {
                items: vec![],
                error: Some("proxy answered HTTP 500".to_string()),
            },
        };
        let text = render_view(&View::Searched(results), 30);
        assert!(text.contains(NO_RESULTS_MESSAGE));
        assert!(!text.contains("HTTP 500"));
    }

    #[test]
    fn test_columns_line_up() {
        let results = SearchResults {
            query: "q".to_string(),
            facts: ResultStream {
                items: vec![fact_check(json!({"claimReview": [{"title": "T", "textualRating": "True"}]}))],
                error: None,
            },
            news: ResultStream {
                items: vec![article("one", None), article("two", None)],
                error: None,
            },
        };
        let text = render_view(&View::Searched(results), 12);
        let rows: Vec<&str> = text.lines().skip(2).collect();

        assert_eq!(rows[0], "Fact Checks  | Relevant News");
        assert_eq!(rows[2], "+ [True] T   | one");
        assert_eq!(rows[3], "             | two");
    }

    #[test]
    fn test_headlines_view() {
        let view = View::Headlines(ResultStream {
            items: vec![article("Top story", Some("2025-01-02T03:04:05Z"))],
            error: None,
        });
        assert_eq!(render_view(&view, 40), "Latest headlines\n- 2025-01-02 Top story\n");
    }
}
