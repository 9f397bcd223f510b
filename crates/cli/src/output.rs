//! Terminal rendering helpers shared by the subcommands.

use time::{OffsetDateTime, macros::format_description};
use verdigris_core::{
    freshness::{self, Freshness},
    models::{FreshnessSummary, Repository},
};

pub const RESET: &str = "\x1b[0m";

pub fn colour(freshness: Freshness) -> &'static str {
    match freshness {
        Freshness::Green => "\x1b[32m",
        Freshness::Yellow => "\x1b[33m",
        Freshness::Red => "\x1b[31m",
    }
}

pub fn emoji(freshness: Freshness) -> &'static str {
    match freshness {
        Freshness::Green => "\u{1f7e2}",
        Freshness::Yellow => "\u{1f7e1}",
        Freshness::Red => "\u{1f534}",
    }
}

pub fn timestamp(value: OffsetDateTime) -> String {
    value
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_else(|_| value.to_string())
}

pub fn print_summary(summary: &FreshnessSummary) {
    println!("Repository Freshness Summary");
    println!("============================");
    println!();
    println!("Total repositories: {}\n", summary.total);
    let rows = [
        (Freshness::Green, "Green  (\u{2264}2 months): ", summary.green),
        (Freshness::Yellow, "Yellow (2-6 months):", summary.yellow),
        (Freshness::Red, "Red    (>6 months): ", summary.red),
    ];
    for (freshness, label, count) in rows {
        println!("{} {}{label}{RESET} {count}", emoji(freshness), colour(freshness));
    }
}

/// One line per repository: freshness indicator, aligned name, age.
/// Numbered when `numbered` is set (the top-stale listing).
pub fn print_repositories(repos: &[Repository], now: OffsetDateTime, numbered: bool) {
    let name_width = repos.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for (i, repo) in repos.iter().enumerate() {
        let freshness = Freshness::classify(repo.last_updated, now);
        let age = freshness::age(repo.last_updated, now);
        let prefix = if numbered { format!("{:2}. ", i + 1) } else { String::new() };
        println!(
            "{prefix}{} {}{:<name_width$}{RESET}  {age}",
            emoji(freshness),
            colour(freshness),
            repo.name,
        );
    }
}
