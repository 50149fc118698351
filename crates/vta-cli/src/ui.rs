//! UI utilities for the CLI

use chrono::DateTime;
use colored::*;
use std::io::{self, IsTerminal, Write};

use vta_core::{DocumentKind, Result, SimilarityResult};

use crate::links::SupportingLink;

/// Display startup banner
pub fn display_banner(documents: usize, model: &str) {
    let border = "─".repeat(56);

    println!();
    println!("{}", format!("┌{}", border).blue());
    println!("{}  {}", "│".blue(), "VTA - Virtual Teaching Assistant".bold());
    println!("{}  {} documents indexed", "│".blue(), documents);
    println!("{}  {}", "│".blue(), format!("model: {}", model).dimmed());
    println!("{}", format!("└{}", border).blue());
    println!();
    println!("{}", "💡 Tip: Ask a question in plain English, or 'exit' to quit".dimmed());
    println!();
}

/// Short date for a forum post timestamp, or the raw value if it does not parse
pub fn format_post_date(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}

/// One line describing where a result came from
pub fn describe_source(result: &SimilarityResult) -> String {
    match &result.document.kind {
        DocumentKind::ForumPost {
            author,
            created_at,
            like_count,
            ..
        } => {
            let mut line = format!("forum post by {}", author);
            if !created_at.is_empty() {
                line.push_str(&format!(" on {}", format_post_date(created_at)));
            }
            if *like_count > 0 {
                line.push_str(&format!(" ({} likes)", like_count));
            }
            line
        }
        DocumentKind::CourseContent { section } if !section.is_empty() => {
            format!("course content, {}", section)
        }
        DocumentKind::CourseContent { .. } => "course content".to_string(),
    }
}

/// Print ranked search results
pub fn render_results(results: &[SimilarityResult]) {
    if results.is_empty() {
        println!("{} No sufficiently similar posts found", "⚠️".yellow());
        return;
    }

    for result in results {
        println!(
            "{} {} {}",
            format!("{}.", result.rank).bold(),
            result.document.title.green(),
            format!("[{:.3}]", result.similarity).dimmed()
        );
        println!("   {}", describe_source(result).dimmed());
        if !result.document.url.is_empty() {
            println!("   {}", result.document.url.cyan());
        }
    }
}

/// Print supporting links
pub fn render_links(links: &[SupportingLink]) {
    if links.is_empty() {
        return;
    }
    println!("{}", "Links:".bold());
    for link in links {
        println!("  {} {}", "→".green(), link.url.cyan());
        println!("    {}", link.text.dimmed());
    }
}

/// Read one question, prompting only when attached to a terminal.
/// Returns `None` at end of input.
pub fn read_question() -> Result<Option<String>> {
    if io::stdin().is_terminal() {
        print!("{} ", "❓".cyan());
        io::stdout().flush()?;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}
