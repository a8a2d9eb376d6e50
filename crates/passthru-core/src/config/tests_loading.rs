//! Loading, merging and validation tests for configuration

#[cfg(test)]
mod loading_tests {
    use std::{io::Write, time::Duration};

    use serial_test::serial;

    use crate::{
        config::{load_config, load_toml_file, Config, Shortcut},
        exec::InteractivePolicy,
        introspection::IntrospectionMode,
        Error, Result,
    };

    const ENV_VARS: &[&str] = &[
        "PASSTHRU_CONFIG",
        "PASSTHRU_BACKEND",
        "PASSTHRU_NAME",
        "PASSTHRU_INTROSPECTION",
        "PASSTHRU_INTROSPECTION_TIMEOUT",
        "PASSTHRU_INTERACTIVE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn write_config(dir: &tempfile::TempDir, content: &str) -> Result<std::path::PathBuf> {
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path)?;
        file.write_all(content.as_bytes())?;
        Ok(path)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.name, "passthru");
        assert_eq!(config.backend, "ddev");
        assert_eq!(config.introspection, IntrospectionMode::Auto);
        assert_eq!(config.introspection_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.capture_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml_file_with_shortcuts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(
            &dir,
            r#"
name = "dw"
introspection = "text"
introspection_timeout_secs = 0

[shortcuts.artisan]
description = "Run artisan"
command = "exec"
args = ["php", "artisan"]
"#,
        )?;

        let config = load_toml_file(&path)?;
        assert_eq!(config.name, "dw");
        assert_eq!(config.backend, "ddev");
        assert_eq!(config.introspection, IntrospectionMode::Text);
        assert_eq!(config.introspection_timeout(), None);
        assert_eq!(
            config.shortcuts.get("artisan"),
            Some(&Shortcut {
                description: "Run artisan".to_string(),
                command: "exec".to_string(),
                args: vec!["php".to_string(), "artisan".to_string()],
            })
        );
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "name = \n invalid toml [[[")?;

        let result = load_toml_file(&path);
        assert!(matches!(result, Err(Error::Parse(_))));
        Ok(())
    }

    #[test]
    fn test_unknown_introspection_mode_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "introspection = \"yaml\"")?;
        assert!(load_toml_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_merge_keeps_earlier_values_left_at_default() {
        let global = Config {
            backend: "/opt/ddev/bin/ddev".to_string(),
            interactive: InteractivePolicy::Never,
            ..Config::default()
        };
        let project = Config {
            name: "dw".to_string(),
            ..Config::default()
        };

        let merged = global.merge(project);
        assert_eq!(merged.backend, "/opt/ddev/bin/ddev");
        assert_eq!(merged.name, "dw");
        assert_eq!(merged.interactive, InteractivePolicy::Never);
    }

    #[test]
    fn test_shortcut_cannot_shadow_builtin() {
        let mut config = Config::default();
        config.shortcuts.insert(
            "help".to_string(),
            Shortcut {
                description: String::new(),
                command: "exec".to_string(),
                args: Vec::new(),
            },
        );
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_name_with_whitespace_is_invalid() {
        let config = Config {
            name: "my wrapper".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides() -> Result<()> {
        clear_env();
        std::env::set_var("PASSTHRU_BACKEND", "fake-tool");
        std::env::set_var("PASSTHRU_INTROSPECTION", "structured");
        std::env::set_var("PASSTHRU_INTERACTIVE", "never");
        std::env::set_var("PASSTHRU_INTROSPECTION_TIMEOUT", "5");

        let config = Config::default().apply_env_vars();
        clear_env();

        let config = config?;
        assert_eq!(config.backend, "fake-tool");
        assert_eq!(config.introspection, IntrospectionMode::Structured);
        assert_eq!(config.interactive, InteractivePolicy::Never);
        assert_eq!(config.introspection_timeout_secs, 5);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout() {
        clear_env();
        std::env::set_var("PASSTHRU_INTROSPECTION_TIMEOUT", "soon");
        let result = Config::default().apply_env_vars();
        clear_env();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    #[serial]
    fn test_load_config_reads_file_named_by_env() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let path = write_config(&dir, "backend = \"other-tool\"\nname = \"ot\"\n")?;
        std::env::set_var("PASSTHRU_CONFIG", &path);

        let config = load_config();
        clear_env();

        let config = config?;
        assert_eq!(config.backend, "other-tool");
        assert_eq!(config.name, "ot");
        Ok(())
    }
}
