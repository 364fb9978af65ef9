use crate::model::CoverageStatus;
use crate::ui::{icon, theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{}", text.style(theme().header));
}

pub fn status(symbol: &'static str, label: &str, value: &str) {
    println!("{} {}: {}", icon(symbol), label.style(theme().dim), value);
}

pub fn success(label: &str) {
    println!("{} {}", icon(Icons::CHECK), label.style(theme().success));
}

pub fn error(label: &str) {
    eprintln!("{} {}", icon(Icons::CROSS), label.style(theme().error));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", icon(Icons::WARN), label.style(theme().warn));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        icon(Icons::INFO).style(theme().info),
        label.style(theme().dim),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted).to_string()
}

pub fn category(code: &str) -> String {
    code.style(theme().category).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}

/// "Showing 10 of 42" line under a paginated listing
pub fn page_summary(returned: usize, total: usize, has_more: Option<bool>) {
    let more = if has_more == Some(true) { " (more available)" } else { "" };
    println!("{}", muted(&format!("Showing {} of {}{}", returned, total, more)));
}

pub fn coverage(label: &str, status: CoverageStatus) {
    let (symbol, style) = match status {
        CoverageStatus::Covered => (Icons::CHECK, theme().success),
        CoverageStatus::Partial => (Icons::PARTIAL, theme().warn),
        CoverageStatus::NotCovered => (Icons::CROSS, theme().error),
        CoverageStatus::Unknown => (Icons::UNKNOWN, theme().muted),
    };
    println!("{} {}: {}", icon(symbol), label, status.as_str().style(style));
}
