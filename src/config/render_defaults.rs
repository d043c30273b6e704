use compio::{fs::File, io::AsyncReadExt, io::BufReader};
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    io::Cursor,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::ext::BestEffortPathExt;

const DEFAULTS_FILE_NAME: &str = ".treediff.yaml";

fn get_defaults_file_path(root: &Path) -> PathBuf {
    root.join(DEFAULTS_FILE_NAME)
}

/// Render settings read from an optional `.treediff.yaml` in the
/// repository root. Each field is `None` when the file does not set it;
/// command-line flags take precedence over anything found here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderDefaults {
    pub status: Option<bool>,
    pub unicode: Option<bool>,
    pub indent: Option<NonZeroUsize>,
}

impl RenderDefaults {
    pub async fn read(root: &Path) -> Result<Self, RenderDefaultsError> {
        Self::from_path(get_defaults_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, RenderDefaultsError> {
        debug!(
            "Opening defaults file: {}",
            path.best_effort_path_display()
        );
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No defaults file present, using built-in defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };

        debug!("Reading defaults file");
        let cursor = Cursor::new(file);
        let mut reader = BufReader::new(cursor);
        let res = reader.read_to_string(String::new()).await;
        match res.0 {
            Ok(n) => debug!("Successfully read defaults file: {n} bytes"),
            _ => {
                res.0.context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                })?;
            }
        }
        res.1.as_str().try_into()
    }
}

impl TryFrom<&str> for RenderDefaults {
    type Error = RenderDefaultsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| RenderDefaultsError::ParseError { source: e })?;
        let Some(document) = documents.get(0) else {
            // An empty file sets nothing
            return Ok(Self::default());
        };

        let top_level = document
            .as_mapping()
            .ok_or(RenderDefaultsError::TopLevelNotMap)?;

        let mut defaults = Self::default();
        for (key, value) in top_level.iter() {
            let Some(name) = key.as_str() else {
                debug!("Skipping non-string defaults key: {:?}", key);
                continue;
            };
            match name {
                "status" => defaults.status = read_bool(name, value),
                "unicode" => defaults.unicode = read_bool(name, value),
                "indent" => defaults.indent = read_indent(value),
                unknown => debug!("Skipping unknown defaults key: {}", unknown),
            }
        }

        Ok(defaults)
    }
}

fn read_bool(name: &str, value: &Yaml) -> Option<bool> {
    match value {
        Yaml::Value(Scalar::Boolean(flag)) => Some(*flag),
        other => {
            warn!("Ignoring non-boolean value for '{}': {:?}", name, other);
            None
        }
    }
}

fn read_indent(value: &Yaml) -> Option<NonZeroUsize> {
    match value {
        Yaml::Value(Scalar::Integer(width)) => {
            let parsed = usize::try_from(*width).ok().and_then(NonZeroUsize::new);
            if parsed.is_none() {
                warn!("Ignoring non-positive indent width: {}", width);
            }
            parsed
        }
        other => {
            warn!("Ignoring non-integer indent width: {:?}", other);
            None
        }
    }
}

#[derive(Debug, Snafu)]
pub enum RenderDefaultsError {
    #[snafu(display("Failed to read the defaults file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the defaults file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the defaults file should be a map"))]
    TopLevelNotMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[compio::test]
    async fn missing_file_falls_back_to_builtin_defaults() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let result = RenderDefaults::read(temp_dir.path()).await;
        assert_eq!(result.unwrap(), RenderDefaults::default());
    }

    #[compio::test]
    async fn defaults_are_read_from_a_file() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(DEFAULTS_FILE_NAME);
        std::fs::write(&path, "status: true\nunicode: true\nindent: 2\n")
            .expect("Failed to write defaults file");

        let defaults = RenderDefaults::read(temp_dir.path()).await.unwrap();
        assert_eq!(defaults.status, Some(true));
        assert_eq!(defaults.unicode, Some(true));
        assert_eq!(defaults.indent, NonZeroUsize::new(2));
    }

    #[compio::test]
    async fn defaults_return_error_on_invalid_yaml() {
        let invalid_yaml = "invalid: yaml: content: [unclosed";
        let result: Result<RenderDefaults, _> = invalid_yaml.try_into();
        assert!(matches!(
            result,
            Err(RenderDefaultsError::ParseError { .. })
        ));
    }

    #[compio::test]
    async fn defaults_return_error_when_top_level_is_not_map() {
        let yaml_with_list_top_level = "- item1\n- item2";
        let result: Result<RenderDefaults, _> = yaml_with_list_top_level.try_into();
        assert!(matches!(result, Err(RenderDefaultsError::TopLevelNotMap)));
    }

    #[compio::test]
    async fn defaults_return_error_when_top_level_is_scalar() {
        let yaml_with_scalar_top_level = "just a string";
        let result: Result<RenderDefaults, _> = yaml_with_scalar_top_level.try_into();
        assert!(matches!(result, Err(RenderDefaultsError::TopLevelNotMap)));
    }

    #[compio::test]
    async fn empty_file_sets_nothing() {
        let result: Result<RenderDefaults, _> = "".try_into();
        assert_eq!(result.unwrap(), RenderDefaults::default());
    }

    #[compio::test]
    async fn unknown_keys_are_skipped() {
        let yaml_with_extras = "status: true\ncolor: always\n";
        let defaults: RenderDefaults = yaml_with_extras.try_into().unwrap();
        assert_eq!(defaults.status, Some(true));
        assert_eq!(defaults.unicode, None);
    }

    #[compio::test]
    async fn mistyped_values_are_skipped() {
        let yaml_with_bad_types = "status: 3\nunicode: maybe\nindent: wide\n";
        let defaults: RenderDefaults = yaml_with_bad_types.try_into().unwrap();
        assert_eq!(defaults, RenderDefaults::default());
    }

    #[compio::test]
    async fn non_positive_indent_is_skipped() {
        let defaults: RenderDefaults = "indent: 0\n".try_into().unwrap();
        assert_eq!(defaults.indent, None);

        let defaults: RenderDefaults = "indent: -2\n".try_into().unwrap();
        assert_eq!(defaults.indent, None);
    }
}
