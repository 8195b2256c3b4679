//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Unsigned integer value; `Ok(None)` when the key is absent or blank.
    fn get_u64(&self, section: &str, key: &str) -> Result<Option<u64>, String>;

    /// Non-blank string value, trimmed.
    fn get_nonempty(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
