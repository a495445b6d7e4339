// User statistics derived from repositories and public events.

use chrono::{DateTime, Months, Utc};

use crate::github::{Event, EventKind, Repository};

use super::colors::{OTHER_COLOR, language_color};

/// Languages shown individually before the rest are merged into "Other".
const TOP_LANGUAGES: usize = 5;

/// One segment of the language breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub count: usize,
    /// Share of language-tagged repositories, 0 to 100.
    pub percentage: f64,
    pub color: &'static str,
}

impl LanguageShare {
    /// Percentage with one decimal, as rendered.
    pub fn percentage_label(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

/// Aggregates shown on a user card.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub total_stars: u64,
    /// Push events within the last year.
    pub commits: usize,
    pub pull_requests: usize,
    pub issues: usize,
    pub languages: Vec<LanguageShare>,
}

impl UserStats {
    pub fn compute(repos: &[Repository], events: &[Event], now: DateTime<Utc>) -> Self {
        let one_year_ago = now.checked_sub_months(Months::new(12)).unwrap_or(now);

        let count_kind = |kind: EventKind| events.iter().filter(|e| e.kind == kind).count();

        let commits = events
            .iter()
            .filter(|e| e.kind == EventKind::PushEvent)
            .filter(|e| e.created_at.is_some_and(|at| at > one_year_ago))
            .count();

        Self {
            total_stars: repos.iter().map(|r| r.stargazers_count).sum(),
            commits,
            pull_requests: count_kind(EventKind::PullRequestEvent),
            issues: count_kind(EventKind::IssuesEvent),
            languages: language_breakdown(repos),
        }
    }
}

/// Repositories per language, largest first, top five plus "Other".
pub fn language_breakdown(repos: &[Repository]) -> Vec<LanguageShare> {
    // First-seen order breaks ties.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        match counts.iter_mut().find(|(name, _)| *name == language) {
            Some((_, count)) => *count += 1,
            None => counts.push((language, 1)),
        }
    }

    let total: usize = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let share = |count: usize| count as f64 / total as f64 * 100.0;

    let mut shares: Vec<LanguageShare> = counts
        .iter()
        .take(TOP_LANGUAGES)
        .map(|&(name, count)| LanguageShare {
            name: name.to_string(),
            count,
            percentage: share(count),
            color: language_color(name),
        })
        .collect();

    let other: usize = counts.iter().skip(TOP_LANGUAGES).map(|(_, count)| count).sum();
    if other > 0 {
        shares.push(LanguageShare {
            name: "Other".to_string(),
            count: other,
            percentage: share(other),
            color: OTHER_COLOR,
        });
    }

    shares
}
