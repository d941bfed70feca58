use tabled::{settings::Style, Table, Tabled};
use crate::model::Athlete;
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct AthleteRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Games")]
    games: String,
    #[tabled(rename = "Gold")]
    gold: i64,
    #[tabled(rename = "Silver")]
    silver: i64,
    #[tabled(rename = "Bronze")]
    bronze: i64,
    #[tabled(rename = "Total")]
    total: i64,
}

impl From<&Athlete> for AthleteRow {
    fn from(athlete: &Athlete) -> Self {
        let games = athlete
            .results
            .iter()
            .map(|r| r.year.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let (gold, silver, bronze) = athlete.medals();

        Self {
            id: athlete.id,
            name: athlete.name.clone(),
            country: athlete.country.name.clone(),
            games,
            gold,
            silver,
            bronze,
            total: athlete.medal_count(),
        }
    }
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Countries", &stats.countries.to_string());
    builder.add_row("Sports", &stats.sports.to_string());
    builder.add_row("Athletes", &stats.athletes.to_string());
    builder.add_row("Results", &stats.results.to_string());
    builder.build()
}

pub fn athletes_table(athletes: &[Athlete]) -> String {
    if athletes.is_empty() {
        return String::new();
    }

    let rows: Vec<AthleteRow> = athletes.iter().map(AthleteRow::from).collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}
