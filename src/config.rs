use std::path::PathBuf;

use thiserror::Error;

pub const USAGE: &str = "Usage: countertop [--assets <dir>] [--shader <file.wgsl>] [--ortho] \
[--show-lights] [--frames <n>] [--summary-only] [--help]";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
    #[error("Missing value for {0}")]
    MissingValue(&'static str),
    #[error("Invalid value for {flag}: {value}")]
    InvalidNumber { flag: &'static str, value: String },
}

/// Command line options for the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory the texture files are resolved against.
    pub assets: PathBuf,
    /// WGSL file replacing the built-in lighting program.
    pub shader: Option<PathBuf>,
    /// Start in orthographic projection.
    pub ortho: bool,
    pub show_lights: bool,
    /// Stop after this many rendered frames.
    pub frames: Option<u64>,
    pub summary_only: bool,
    pub help: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("."),
            shader: None,
            ortho: false,
            show_lights: false,
            frames: None,
            summary_only: false,
            help: false,
        }
    }
}

impl RuntimeConfig {
    /// Parses arguments without the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--assets" => {
                    let dir = args.next().ok_or(ConfigError::MissingValue("--assets"))?;
                    config.assets = PathBuf::from(dir);
                }
                "--shader" => {
                    let file = args.next().ok_or(ConfigError::MissingValue("--shader"))?;
                    config.shader = Some(PathBuf::from(file));
                }
                "--frames" => {
                    let value = args.next().ok_or(ConfigError::MissingValue("--frames"))?;
                    let frames = value.parse().map_err(|_| ConfigError::InvalidNumber {
                        flag: "--frames",
                        value: value.clone(),
                    })?;
                    config.frames = Some(frames);
                }
                "--ortho" => config.ortho = true,
                "--show-lights" => config.show_lights = true,
                "--summary-only" => config.summary_only = true,
                "-h" | "--help" => config.help = true,
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::args().skip(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let config = RuntimeConfig::parse(Vec::<String>::new()).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.assets, PathBuf::from("."));
    }

    #[test]
    fn parses_every_flag() {
        let config = RuntimeConfig::parse([
            "--assets",
            "textures",
            "--shader",
            "custom.wgsl",
            "--ortho",
            "--show-lights",
            "--frames",
            "120",
            "--summary-only",
        ])
        .unwrap();
        assert_eq!(config.assets, PathBuf::from("textures"));
        assert_eq!(config.shader, Some(PathBuf::from("custom.wgsl")));
        assert!(config.ortho && config.show_lights && config.summary_only);
        assert_eq!(config.frames, Some(120));
        assert!(!config.help);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            RuntimeConfig::parse(["--fullscreen"]),
            Err(ConfigError::UnknownArgument("--fullscreen".into()))
        );
        assert_eq!(
            RuntimeConfig::parse(["--assets"]),
            Err(ConfigError::MissingValue("--assets"))
        );
        assert!(matches!(
            RuntimeConfig::parse(["--frames", "many"]),
            Err(ConfigError::InvalidNumber { flag: "--frames", .. })
        ));
    }
}
