pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::{icon, Icons};
pub use output::{
    category, coverage, dim, error, header, info, muted, page_summary, section, status, success,
    summary_row, warn,
};
pub use table::{stats_table, tests_table, vendors_table, TableBuilder};
pub use theme::{theme, Theme};
