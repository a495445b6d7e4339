// Language colors for the breakdown bar.

/// Color for languages missing from the table.
pub const DEFAULT_COLOR: &str = "#8cc8ff";

/// Color for the merged "Other" segment.
pub const OTHER_COLOR: &str = "#cccccc";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C#", "#239120"),
    ("PHP", "#4F5D95"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#F18E33"),
    ("Scala", "#c22d40"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Shell", "#89e051"),
    ("C", "#555555"),
    ("Objective-C", "#438eff"),
    ("R", "#198CE7"),
    ("Dart", "#00B4AB"),
];

pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}
