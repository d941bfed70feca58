use std::net::SocketAddr;
use std::path::Path;
use owo_colors::OwoColorize;
use crate::model::Athlete;
use crate::seed::SeedReport;
use crate::storage::DbStats;
use crate::ui::{stats_table, theme, Icons, Theme};

pub fn success(text: &str) {
    println!("{} {}", Icons::CHECK, text.style(theme().ok.clone()));
}

pub fn error(text: &str) {
    eprintln!("{} {}", Icons::CROSS, text.style(theme().failure.clone()));
}

pub fn warn(text: &str) {
    eprintln!("{} {}", Icons::WARN, text.style(theme().caution.clone()));
}

/// `12 gold · 3 silver · 5 bronze`, each count in its medal colour
pub fn medal_tally(theme: &Theme, gold: i64, silver: i64, bronze: i64) -> String {
    format!(
        "{} · {} · {}",
        format!("{} gold", gold).style(theme.gold.clone()),
        format!("{} silver", silver).style(theme.silver.clone()),
        format!("{} bronze", bronze).style(theme.bronze.clone()),
    )
}

/// One-line summary of a roster: athlete count plus the combined tally
pub fn roster_line(theme: &Theme, athletes: &[Athlete]) -> String {
    let (gold, silver, bronze) = athletes.iter().map(Athlete::medals).fold((0, 0, 0), |acc, m| {
        (acc.0 + m.0, acc.1 + m.1, acc.2 + m.2)
    });
    let noun = if athletes.len() == 1 { "athlete" } else { "athletes" };

    format!(
        "{} {} {} - {}",
        Icons::MEDAL,
        athletes.len().style(theme.heading.clone()),
        noun,
        medal_tally(theme, gold, silver, bronze)
    )
}

/// Rows created by a seed run, one per line
pub fn seed_lines(theme: &Theme, report: &SeedReport) -> Vec<String> {
    [
        ("Countries", report.countries),
        ("Sports", report.sports),
        ("Athletes", report.athletes),
        ("Results", report.results),
    ]
    .iter()
    .map(|(label, count)| format!("  {:<10} {}", label.style(theme.label.clone()), count))
    .collect()
}

fn field(icon: &str, label: &str, value: &str) {
    println!("{} {} {}", icon, label.style(theme().label.clone()), value);
}

pub fn serve_banner(db_path: &Path, addr: SocketAddr, origins: &[String]) {
    println!("{} {}", Icons::STADIUM, "Medalboard server".style(theme().heading.clone()));
    field(Icons::DATABASE, "Database:", &db_path.display().to_string());
    field(Icons::GLOBE, "Listening:", &format!("http://{}", addr));
    field(Icons::GLOBE, "Origins:", &origins.join(", "));
}

pub fn init_summary(config_path: &Path, db_path: &Path) {
    success("Initialized medalboard");
    field(Icons::FILE, "Config:", &config_path.display().to_string());
    field(Icons::DATABASE, "Database:", &db_path.display().to_string());
}

pub fn seed_started(file: &Path) {
    field(Icons::FILE, "Seeding from", &file.display().to_string());
}

pub fn seed_summary(report: &SeedReport) {
    success("Seed complete");
    for line in seed_lines(theme(), report) {
        println!("{}", line);
    }
}

pub fn roster_header(athletes: &[Athlete]) {
    println!();
    println!("{}", roster_line(theme(), athletes));
}

pub fn stats_summary(db_path: &Path, stats: &DbStats) {
    println!();
    println!("{} {}", Icons::STATS, "Medalboard statistics".style(theme().heading.clone()));
    field(Icons::DATABASE, "Database:", &db_path.display().to_string());
    println!("{}", stats_table(stats));
}
