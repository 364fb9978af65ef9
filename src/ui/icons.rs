pub struct Icons;

impl Icons {
    pub const CATALOG: &str = "🧪";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const VENDOR: &str = "🏢";
    pub const SHIELD: &str = "🛡️";
    pub const CLOCK: &str = "⏱️";
    pub const BOOK: &str = "📖";
    pub const PARTIAL: &str = "🟠";
    pub const UNKNOWN: &str = "❔";
}

/// Icon, or nothing when output is quiet
pub fn icon(symbol: &'static str) -> &'static str {
    if crate::output::is_quiet() {
        ""
    } else {
        symbol
    }
}
