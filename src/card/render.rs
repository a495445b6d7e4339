// HTML fragments for repository, user, and error cards.

use crate::github::{Repository, User};

use super::args::CardArgs;
use super::stats::UserStats;

const OCTOCAT_SVG: &str = r#"<svg height="32" aria-hidden="true" viewBox="0 0 24 24" version="1.1" width="32" class="octicon octicon-mark-github v-align-middle"><path d="M12 1C5.923 1 1 5.923 1 12c0 4.867 3.149 8.979 7.521 10.436.55.096.756-.233.756-.522 0-.262-.013-1.128-.013-2.049-2.764.509-3.479-.674-3.699-1.292-.124-.317-.66-1.293-1.127-1.554-.385-.207-.936-.715-.014-.729.866-.014 1.485.797 1.691 1.128.99 1.663 2.571 1.196 3.204.907.096-.715.385-1.196.701-1.471-2.448-.275-5.005-1.224-5.005-5.432 0-1.196.426-2.186 1.128-2.956-.111-.275-.496-1.402.11-2.915 0 0 .921-.288 3.024 1.128a10.193 10.193 0 0 1 2.75-.371c.936 0 1.871.123 2.75.371 2.104-1.43 3.025-1.128 3.025-1.128.605 1.513.221 2.64.111 2.915.701.77 1.127 1.747 1.127 2.956 0 4.222-2.571 5.157-5.019 5.432.399.344.743 1.004.743 2.035 0 1.471-.014 2.654-.014 3.025 0 .289.206.632.756.522C19.851 20.979 23 16.854 23 12c0-6.077-4.922-11-11-11Z"></path></svg>"#;

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Opening `<div>` shared by both card kinds.
fn open_card(classes: &str, args: &CardArgs) -> String {
    let responsive = if args.is_responsive() { " responsive" } else { "" };
    let width = match &args.width {
        Some(width) => format!("width: {}px; ", escape_html(width)),
        None => String::new(),
    };
    format!(
        r#"<div class="{}{}" style="{}min-height: {}px; text-align: {};">"#,
        classes,
        responsive,
        width,
        escape_html(&args.height),
        escape_html(args.align.as_str()),
    )
}

/// Blog links without a scheme get `https://`.
fn blog_href(blog: &str) -> String {
    if blog.starts_with("http") {
        blog.to_string()
    } else {
        format!("https://{}", blog)
    }
}

pub fn render_repo_card(repo: &Repository, args: &CardArgs) -> String {
    let mut html = open_card("github-card github-repo-card", args);

    html.push_str(r#"<div class="github-repo-icon">📖</div>"#);
    html.push_str(r#"<div class="github-repo-info">"#);
    html.push_str(&format!(
        r#"<h3><a href="{}" target="_blank">{}</a></h3>"#,
        escape_html(&repo.html_url),
        escape_html(&repo.full_name),
    ));
    html.push_str(&format!(
        "<p>{}</p>",
        escape_html(repo.description.as_deref().unwrap_or_default())
    ));
    html.push_str(&format!(
        concat!(
            r#"<div class="github-repo-stats">"#,
            r#"<span class="github-repo-stat">⭐ {} Stars</span>"#,
            r#"<span class="github-repo-stat">🍴 {} Forks</span>"#,
            r#"<span class="github-repo-stat">Language: {}</span>"#,
            "</div>",
        ),
        repo.stargazers_count,
        repo.forks_count,
        escape_html(repo.language.as_deref().unwrap_or("N/A")),
    ));
    html.push_str("</div>");
    html.push_str(&format!(r#"<div class="github-repo-octocat">{}</div>"#, OCTOCAT_SVG));
    html.push_str("</div>");
    html
}

pub fn render_user_card(user: &User, stats: &UserStats, args: &CardArgs) -> String {
    let mut html = open_card("github-card", args);

    html.push_str(r#"<div class="github-card-header">"#);
    html.push_str(&format!(
        r#"<img src="{}" width="80" height="80" class="github-card-avatar">"#,
        escape_html(user.avatar_url.as_deref().unwrap_or_default()),
    ));
    html.push_str(&format!(
        r#"<h3 class="github-card-name"><a href="{}" target="_blank">{}</a></h3>"#,
        escape_html(user.html_url.as_deref().unwrap_or_default()),
        escape_html(user.display_name()),
    ));
    html.push_str(&format!(
        r#"<p class="github-card-username">@{}</p>"#,
        escape_html(&user.login)
    ));

    html.push_str(r#"<div class="github-card-details">"#);
    if let Some(location) = user.location.as_deref().filter(|s| !s.is_empty()) {
        html.push_str(&format!(
            r#"<p class="github-card-location">📍 {}</p>"#,
            escape_html(location)
        ));
    }
    if let Some(blog) = user.blog.as_deref().filter(|s| !s.is_empty()) {
        html.push_str(&format!(
            r#"<p class="github-card-blog">🔗 <a href="{}" target="_blank">{}</a></p>"#,
            escape_html(&blog_href(blog)),
            escape_html(blog),
        ));
    }
    if let Some(bio) = user.bio.as_deref().filter(|s| !s.is_empty()) {
        html.push_str(&format!(r#"<p class="github-card-bio">{}</p>"#, escape_html(bio)));
    }
    html.push_str("</div></div>");

    let stat_items = [
        ("📁", user.public_repos.to_string(), "Repositories"),
        ("⭐", stats.total_stars.to_string(), "Stars"),
        ("📈", stats.commits.to_string(), "Commits"),
        ("👥", user.followers.to_string(), "Followers"),
        ("🔄", stats.pull_requests.to_string(), "Pull Requests"),
        ("❗", stats.issues.to_string(), "Issues"),
    ];
    html.push_str(r#"<div class="github-card-stats">"#);
    for (icon, number, label) in stat_items {
        html.push_str(&format!(
            concat!(
                r#"<div class="github-card-stat">"#,
                r#"<div class="github-card-stat-number">{} {}</div>"#,
                r#"<div class="github-card-stat-label">{}</div>"#,
                "</div>",
            ),
            icon, number, label,
        ));
    }
    html.push_str("</div>");

    if !stats.languages.is_empty() {
        html.push_str(r#"<div class="github-card-languages">"#);
        html.push_str(r#"<div class="github-card-language-bar">"#);
        for lang in &stats.languages {
            html.push_str(&format!(
                r#"<div class="github-card-language-segment" style="width: {}%; background-color: {};"></div>"#,
                lang.percentage_label(),
                lang.color,
            ));
        }
        html.push_str("</div>");
        html.push_str(r#"<div class="github-card-languages-list">"#);
        for lang in &stats.languages {
            html.push_str(&format!(
                concat!(
                    r#"<span class="github-card-language-item">"#,
                    r#"<span class="github-card-language-dot" style="background-color: {};"></span>"#,
                    "{} {}%</span>",
                ),
                lang.color,
                escape_html(&lang.name),
                lang.percentage_label(),
            ));
        }
        html.push_str("</div></div>");
    }

    html.push_str("</div>");
    html
}

pub fn render_error_card(args: &CardArgs) -> String {
    format!(
        r#"<div class="github-card-error">Error loading GitHub data for {}</div>"#,
        escape_html(&args.target())
    )
}
