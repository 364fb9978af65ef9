use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `DXCATALOG_QUIET=1` (or `true`) turns off colors and icons in human
/// output. JSON output is never decorated, so the flag only affects
/// `--format human`. Read once per process.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("DXCATALOG_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
