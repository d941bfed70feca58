pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    error, init_summary, medal_tally, roster_header, roster_line, seed_lines, seed_started,
    seed_summary, serve_banner, stats_summary, success, warn,
};
pub use table::{athletes_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
