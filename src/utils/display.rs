// src/utils/display.rs

//! Console rendering of novels and run summaries.
//!
//! Diagnostics go through the `log` macros; this module is for the results
//! the user asked to see, so it always prints to stdout.

use crate::models::Novel;

const RULE_WIDTH: usize = 60;

/// Print a section header.
pub fn header(title: &str) {
    println!("{}", "═".repeat(RULE_WIDTH));
    println!("  {}", title);
    println!("{}", "═".repeat(RULE_WIDTH));
}

/// Print a step in a multi-step run.
pub fn step(step_num: usize, total: usize, message: &str) {
    println!("[STEP {}/{}] {}", step_num, total, message);
}

/// Print a summary section.
pub fn summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("[SUMMARY] {}", title);
    for (key, value) in items {
        println!("    {}: {}", key, value);
    }
}

/// One-line listing entry.
pub fn novel_line(novel: &Novel) -> String {
    let id = novel
        .id
        .as_ref()
        .map(|id| format!("#{}", id))
        .unwrap_or_else(|| "-".to_string());
    let status = novel
        .detail
        .status
        .map(|s| s.as_str())
        .unwrap_or("—");
    let star = if novel.opinion.favorite { " ★" } else { "" };

    format!(
        "{:<8} {:<40} {:<12} {:<13} {:>2}/10{}",
        id,
        truncate(&novel.name, 40),
        truncate(&novel.genre, 12),
        status,
        novel.opinion.rating,
        star
    )
}

/// Print a listing of novels.
pub fn novel_list(novels: &[Novel]) {
    for novel in novels {
        println!("{}", novel_line(novel));
    }
    println!("{}", "─".repeat(RULE_WIDTH));
    println!("{} novel(s)", novels.len());
}

/// Multi-line view of every field of one novel.
pub fn novel_card(novel: &Novel) -> String {
    let d = &novel.detail;
    let o = &novel.opinion;
    let progress = match d.total_chapters {
        Some(total) if total > 0 => format!("{}/{}", o.chapters_read, total),
        _ => o.chapters_read.to_string(),
    };

    let rows = [
        ("Name", novel.name.clone()),
        ("Original name", novel.original_name.clone()),
        ("Genre", novel.genre.clone()),
        ("Link", novel.link.clone()),
        ("Status", d.status.map(|s| s.to_string()).unwrap_or_default()),
        ("Progress", progress),
        ("MC", d.mc_name.clone()),
        ("MC trait", d.special_characteristic_of_mc.clone()),
        ("Tags", d.tag_list().join(", ")),
        ("Cover", d.novel_cover.clone()),
        ("Rating", format!("{}/10", o.rating)),
        ("Favorite", yes_no(o.favorite)),
        ("Worth continuing", yes_no(o.worth_to_continue)),
        ("Comments", o.comments.clone()),
        ("Description", d.description.clone()),
        (
            "Last updated",
            d.last_updated_on
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        ),
    ];

    let mut out = format!("{}\n", novel.label());
    for (label, value) in rows.iter().filter(|(_, v)| !v.is_empty()) {
        out.push_str(&format!("    {:<17} {}\n", format!("{}:", label), value));
    }
    out
}

fn yes_no(flag: bool) -> String {
    let word = if flag { "yes" } else { "no" };
    word.to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
