//! Default values for configuration fields.

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(
    default_references,
    Vec<String>,
    strings(&["\\ref", "\\reflem", "\\refdef", "\\refthm", "\\refcor"])
);
default_fn!(default_label_macros, Vec<String>, strings(&["\\label"]));
default_fn!(default_excluded_types, Vec<String>, strings(&["fig", "eq"]));
default_fn!(default_proof_environments, Vec<String>, strings(&["proof"]));

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "texdag.md";

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "TEXDAG_LOG";

/// Environment variable enabling quiet output
pub const QUIET_ENV: &str = "TEXDAG_QUIET";
