use crate::infrastructure::config::types::UnlockConfig;

impl UnlockConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.cache.sweeper_enabled && self.cache.sweep_interval_secs == 0 {
            errors.push("cache.sweep_interval_secs must be > 0 when cache.sweeper_enabled=true".to_string());
        }

        if let Err(err) = self.kdf.validate() {
            errors.push(format!("kdf: {err}"));
        }

        if let Some(path) = self.audit.log_path.as_ref() {
            if path.as_os_str().is_empty() {
                errors.push("audit.log_path must not be empty when set".to_string());
            }
        }

        if self.logging.filters.trim().is_empty() {
            errors.push("logging.filters must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
