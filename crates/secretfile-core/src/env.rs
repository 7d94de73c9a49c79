//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable as a usize.
pub fn get_usize(name: &str) -> Option<usize> {
    get_var(name).and_then(|v| v.trim().parse().ok())
}

/// Get an environment variable as a u64.
pub fn get_u64(name: &str) -> Option<u64> {
    get_var(name).and_then(|v| v.trim().parse().ok())
}

/// Environment variable names recognised by secretfile.
pub mod vars {
    /// Config file override.
    pub const SECRETFILE_CONFIG: &str = "SECRETFILE_CONFIG";

    /// Default secrets file override.
    pub const SECRETFILE_FILE: &str = "SECRETFILE_FILE";

    /// Store cache capacity override.
    pub const SECRETFILE_CACHE_CAPACITY: &str = "SECRETFILE_CACHE_CAPACITY";

    /// Fingerprint recheck interval override, in milliseconds.
    pub const SECRETFILE_RECHECK_MS: &str = "SECRETFILE_RECHECK_MS";

    /// Log filter directive.
    pub const SECRETFILE_LOG: &str = "SECRETFILE_LOG";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_var_ignores_blank() {
        env::set_var("SECRETFILE_TEST_BLANK", "   ");
        assert!(get_var("SECRETFILE_TEST_BLANK").is_none());
    }

    #[test]
    fn test_get_numbers() {
        env::set_var("SECRETFILE_TEST_USIZE", "12");
        env::set_var("SECRETFILE_TEST_U64", " 750 ");
        env::set_var("SECRETFILE_TEST_BAD", "twelve");

        assert_eq!(get_usize("SECRETFILE_TEST_USIZE"), Some(12));
        assert_eq!(get_u64("SECRETFILE_TEST_U64"), Some(750));
        assert_eq!(get_usize("SECRETFILE_TEST_BAD"), None);
        assert_eq!(get_u64("SECRETFILE_TEST_NONEXISTENT"), None);
    }
}
