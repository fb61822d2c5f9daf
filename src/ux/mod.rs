use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::history::HistoryEntry;
use crate::wire::{ListingOutputs, OutputField};

fn label(field: OutputField) -> &'static str {
    match field {
        OutputField::Heading => "HEADING",
        OutputField::Mls => "MLS",
        OutputField::Zillow => "ZILLOW",
        OutputField::Social => "SOCIAL",
        OutputField::Email => "EMAIL",
        OutputField::Tiktok => "TIKTOK",
    }
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_field(field: OutputField, text: &str) {
    println!("{}", format!("[{}]", label(field)).cyan().bold());
    if text.trim().is_empty() {
        println!("{}", "(empty)".dimmed());
    } else {
        println!("{text}");
    }
    println!();
}

pub fn print_outputs(outputs: &ListingOutputs) {
    println!();
    for field in OutputField::ALL {
        print_field(field, outputs.get(field));
    }
}

fn history_line(entry: &HistoryEntry) -> String {
    let star = if entry.favorite { "★".yellow().bold() } else { " ".normal() };
    format!(
        "{star} {}  {}  {}",
        entry.id.dimmed(),
        entry.created_at.format("%Y-%m-%d %H:%M"),
        format!("{} — {}", entry.form.property_type, entry.outputs.heading).bold()
    )
}

pub fn print_history(entries: &[&HistoryEntry]) {
    if entries.is_empty() {
        println!("(no history)");
        return;
    }
    for e in entries {
        println!("{}", history_line(e));
    }
}

pub fn print_entry(entry: &HistoryEntry) {
    println!("{} {}", "id:".bold(), entry.id);
    println!("{} {}", "created:".bold(), entry.created_at.to_rfc3339());
    println!("{} {}", "favorite:".bold(), entry.favorite);
    println!(
        "{} {} · tone {} · {} · {}",
        "form:".bold(),
        entry.form.property_type,
        entry.form.tone,
        entry.form.length,
        entry.form.language
    );
    print_outputs(&entry.outputs);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ListingForm;

    fn entry(favorite: bool) -> HistoryEntry {
        HistoryEntry {
            id: "abc123".into(),
            created_at: chrono::Utc::now(),
            form: ListingForm { property_type: "Condo".into(), ..ListingForm::default() },
            outputs: ListingOutputs { heading: "Oceanfront Gem".into(), ..ListingOutputs::default() },
            favorite,
        }
    }

    #[test]
    fn history_line_shows_id_type_and_heading() {
        let line = history_line(&entry(false));
        assert!(line.contains("abc123"));
        assert!(line.contains("Condo — Oceanfront Gem"));
        assert!(!line.contains('★'));
    }

    #[test]
    fn history_line_marks_favorites() {
        assert!(history_line(&entry(true)).contains('★'));
    }
}
