//! Tests for config module

#[cfg(test)]
mod tests {
    use crate::catalog::MethodKind;
    use crate::config::*;
    use std::io::Write;

    // ========================================================================
    // Defaults
    // ========================================================================

    #[test]
    fn test_config_default_values() {
        // Arrange & Act
        let config = BenchConfig::default();

        // Assert
        assert_eq!(config.methods.enabled, MethodKind::ALL.to_vec());
        assert_eq!(config.compression.level, 6);
        assert!(config.validate().is_ok());
    }

    // ========================================================================
    // TOML loading
    // ========================================================================

    #[test]
    fn test_config_from_toml_partial_override() {
        // Arrange
        let toml_str = r#"
            [methods]
            enabled = ["npy", "mat", "csv_gzip"]
        "#;

        // Act
        let config = BenchConfig::from_toml(toml_str).expect("parse");

        // Assert
        assert_eq!(
            config.methods.enabled,
            vec![MethodKind::Npy, MethodKind::Mat, MethodKind::CsvGzip]
        );
        assert_eq!(config.compression.level, 6);
    }

    #[test]
    fn test_config_from_toml_compression_level() {
        let config = BenchConfig::from_toml("[compression]\nlevel = 1\n").expect("parse");
        assert_eq!(config.compression.level, 1);
        assert_eq!(config.methods.enabled.len(), MethodKind::ALL.len());
    }

    #[test]
    fn test_config_unknown_method_fails_parse() {
        let result = BenchConfig::from_toml("[methods]\nenabled = [\"hdf5\"]\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_load_from_path() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[methods]\nenabled = [\"fortran\"]\n[compression]\nlevel = 9").unwrap();

        // Act
        let config = BenchConfig::load_from_path(file.path()).expect("load");

        // Assert
        assert_eq!(config.methods.enabled, vec![MethodKind::Fortran]);
        assert_eq!(config.compression.level, 9);
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig::load_from_path(dir.path().join("absent.toml")).expect("load");
        assert_eq!(config.methods.enabled, MethodKind::ALL.to_vec());
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn test_validate_rejects_empty_list() {
        let mut config = BenchConfig::default();
        config.methods.enabled.clear();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "methods.enabled"));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut config = BenchConfig::default();
        config.methods.enabled = vec![MethodKind::Png, MethodKind::Png];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'png' is listed more than once"));
    }

    #[test]
    fn test_validate_rejects_level_out_of_range() {
        let mut config = BenchConfig::default();
        config.compression.level = 10;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "compression.level"));
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    #[test]
    fn test_to_toml_parses_back() {
        // Arrange
        let mut config = BenchConfig::default();
        config.methods.enabled = vec![MethodKind::Json, MethodKind::BinaryGzip];
        config.compression.level = 3;

        // Act
        let toml_str = config.to_toml().expect("serialize");
        let back = BenchConfig::from_toml(&toml_str).expect("parse");

        // Assert
        assert!(toml_str.contains("binary_gzip"));
        assert_eq!(back.methods.enabled, config.methods.enabled);
        assert_eq!(back.compression.level, 3);
    }
}
