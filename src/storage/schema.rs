//! Database schema definitions

/// Connection pragmas applied on every open. Cascading deletes need foreign keys on.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL to create the country table
pub const CREATE_COUNTRY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS country (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the sport table
pub const CREATE_SPORT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sport (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the athlete table
pub const CREATE_ATHLETE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS athlete (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    country_id INTEGER NOT NULL REFERENCES country(id)
)
"#;

/// SQL to create the result table
/// `position` keeps the order results were submitted in
pub const CREATE_RESULT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS result (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    athlete_id INTEGER NOT NULL REFERENCES athlete(id) ON DELETE CASCADE,
    sport_id INTEGER NOT NULL REFERENCES sport(id),
    position INTEGER NOT NULL DEFAULT 0,
    age INTEGER NOT NULL,
    year INTEGER NOT NULL,
    date TEXT NOT NULL,
    gold INTEGER NOT NULL DEFAULT 0,
    silver INTEGER NOT NULL DEFAULT 0,
    bronze INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_athlete_name ON athlete(name)",
    "CREATE INDEX IF NOT EXISTS idx_athlete_country ON athlete(country_id)",
    "CREATE INDEX IF NOT EXISTS idx_result_athlete ON result(athlete_id)",
    "CREATE INDEX IF NOT EXISTS idx_result_sport ON result(sport_id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_COUNTRY_TABLE,
        CREATE_SPORT_TABLE,
        CREATE_ATHLETE_TABLE,
        CREATE_RESULT_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
