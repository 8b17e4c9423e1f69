use crate::cli::Cli;
use crate::error::{CliError, Result};
use glnconf::core::analysis::conformation::State;
use glnconf::engine::error::EngineError;
use glnconf::workflows::classify::ClassifyRequest;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_PRECISION: usize = 2;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    precision: Option<usize>,
}

/// The configuration file: every key is optional and yields to the command line.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialClassifyConfig {
    state: Option<String>,
    trajectory: Option<Vec<PathBuf>>,
    indices: Option<PathBuf>,
    #[serde(rename = "gln-indices")]
    gln_indices: Option<PathBuf>,
    label: Option<String>,
    #[serde(rename = "copy-labels")]
    copy_labels: Option<Vec<String>>,
    output: Option<PartialOutputConfig>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

pub struct AppConfig {
    pub request: ClassifyRequest,
    pub precision: usize,
}

impl PartialClassifyConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn merge_with_cli(self, args: &Cli) -> Result<AppConfig> {
        let base_dir = self.base_dir.as_deref();
        let resolve = |path: PathBuf| match base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        };

        let state_name = args.state.clone().or(self.state).ok_or_else(|| {
            CliError::Config(
                "A value for 'state' is required either in the config file or via CLI argument."
                    .to_string(),
            )
        })?;
        let state: State = state_name.parse().map_err(EngineError::from)?;

        let trajectory_bases = if !args.trajectory.is_empty() {
            args.trajectory.clone()
        } else {
            self.trajectory
                .unwrap_or_default()
                .into_iter()
                .map(resolve)
                .collect()
        };
        if trajectory_bases.is_empty() {
            return Err(CliError::Config(
                "At least one 'trajectory' is required either in the config file or via CLI argument."
                    .to_string(),
            ));
        }

        let required = |cli: Option<&PathBuf>, file: Option<PathBuf>, key: &str| {
            cli.cloned().or(file.map(resolve)).ok_or_else(|| {
                CliError::Config(format!(
                    "A value for '{}' is required either in the config file or via CLI argument.",
                    key
                ))
            })
        };
        let hbond_indices = required(args.indices.as_ref(), self.indices, "indices")?;
        let gln_indices = required(args.gln_indices.as_ref(), self.gln_indices, "gln-indices")?;

        let copy_labels = args.copy_labels.clone().or(self.copy_labels);
        if let Some(labels) = &copy_labels {
            if let Some(blank) = labels.iter().position(|label| label.trim().is_empty()) {
                return Err(CliError::Argument(format!(
                    "copy label #{} is empty",
                    blank + 1
                )));
            }
        }

        let precision = args
            .precision
            .or(self.output.and_then(|output| output.precision))
            .unwrap_or(DEFAULT_PRECISION);

        Ok(AppConfig {
            request: ClassifyRequest {
                state,
                trajectory_bases,
                hbond_indices,
                gln_indices,
                label: args.label.clone().or(self.label),
                copy_labels,
            },
            precision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use glnconf::core::error::UnsupportedStateError;
    use std::fs;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("glnconf.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("glnconf").chain(args.iter().copied()))
    }

    #[test]
    fn file_values_load_and_resolve_against_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            state = "light"
            trajectory = ["runs/prod1", "/abs/prod2"]
            indices = "idx/hbond.npy"
            gln-indices = "idx/gln.csv"
            label = "WT light"
            copy-labels = ["A", "B"]

            [output]
            precision = 4
            "#,
        );

        let config = PartialClassifyConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&cli(&[]))
            .unwrap();

        assert_eq!(config.request.state, State::Light);
        assert_eq!(
            config.request.trajectory_bases,
            vec![dir.path().join("runs/prod1"), PathBuf::from("/abs/prod2")]
        );
        assert_eq!(config.request.hbond_indices, dir.path().join("idx/hbond.npy"));
        assert_eq!(config.request.gln_indices, dir.path().join("idx/gln.csv"));
        assert_eq!(config.request.label.as_deref(), Some("WT light"));
        assert_eq!(
            config.request.copy_labels,
            Some(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(config.precision, 4);
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = TempDir::new().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            state = "light"
            trajectory = ["prod1"]
            indices = "hbond.npy"
            gln-indices = "gln.npy"
            "#,
        );

        let config = PartialClassifyConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&cli(&[
                "-s",
                "dark",
                "-t",
                "other",
                "-g",
                "dark_gln.npy",
                "--precision",
                "1",
            ]))
            .unwrap();

        assert_eq!(config.request.state, State::Dark);
        assert_eq!(config.request.trajectory_bases, vec![PathBuf::from("other")]);
        assert_eq!(config.request.hbond_indices, dir.path().join("hbond.npy"));
        assert_eq!(config.request.gln_indices, PathBuf::from("dark_gln.npy"));
        assert_eq!(config.precision, 1);
    }

    #[test]
    fn cli_alone_is_enough() {
        let config = PartialClassifyConfig::default()
            .merge_with_cli(&cli(&["-s", "dark", "-t", "prod", "-i", "h.npy", "-g", "g.npy"]))
            .unwrap();

        assert_eq!(config.request.trajectory_bases, vec![PathBuf::from("prod")]);
        assert_eq!(config.request.label, None);
        assert_eq!(config.precision, DEFAULT_PRECISION);
    }

    #[test]
    fn unknown_state_is_an_unsupported_state_error() {
        let result = PartialClassifyConfig::default()
            .merge_with_cli(&cli(&["-s", "twilight", "-t", "p", "-i", "h", "-g", "g"]));

        match result {
            Err(CliError::Core(EngineError::UnsupportedState(UnsupportedStateError(name)))) => {
                assert_eq!(name, "twilight")
            }
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn missing_required_value_returns_error() {
        let result =
            PartialClassifyConfig::default().merge_with_cli(&cli(&["-s", "dark", "-t", "p", "-i", "h"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("gln-indices")));

        let result = PartialClassifyConfig::default().merge_with_cli(&cli(&["-s", "dark"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("trajectory")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config_file(&dir, "state = \"dark\"\nframes = 10\n");

        let result = PartialClassifyConfig::from_file(&path);

        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
