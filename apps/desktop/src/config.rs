use std::{collections::HashMap, fs, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: String,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Defaults, overridden by `sow.toml` in the working directory, overridden
/// by environment variables. CLI flags win last (applied by the caller).
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("sow.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SOW_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = std::env::var("SOW_OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("APP__OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
        if let Some(v) = file_cfg.get("output_dir") {
            settings.output_dir = PathBuf::from(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_replace_defaults() {
        let mut settings = Settings::default();
        apply_file_overrides(
            &mut settings,
            "server_url = \"http://10.0.0.5:9000\"\noutput_dir = \"/tmp/sow\"\n",
        );
        assert_eq!(settings.server_url, "http://10.0.0.5:9000");
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/sow"));
    }

    #[test]
    fn unknown_keys_and_malformed_files_leave_defaults_standing() {
        let mut settings = Settings::default();
        apply_file_overrides(&mut settings, "unrelated = \"x\"\n");
        apply_file_overrides(&mut settings, "not valid toml [");
        assert_eq!(settings.server_url, Settings::default().server_url);
        assert_eq!(settings.output_dir, Settings::default().output_dir);
    }
}
