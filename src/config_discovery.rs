use std::path::PathBuf;

pub fn get_config_dir() -> PathBuf {
    let config_home = dirs::config_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config")
    });
    config_home.join("taskdesk")
}

pub fn find_config_file() -> Option<PathBuf> {
    let config_dir = get_config_dir();
    let mut paths = vec![config_dir.join("config.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".taskdesk").join("config.toml"));
    }

    paths.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_is_namespaced() {
        assert!(get_config_dir().ends_with("taskdesk"));
    }
}
