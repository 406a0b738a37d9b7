use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{cddb::client::ClientIdentity, rip::RipSettings};

pub const DEFAULT_DEVICE: &str = "/dev/sr0";
pub const DEFAULT_AGENT_FILE: &str = "agent";
pub const DEFAULT_TOKEN_FILE: &str = "token";
pub const DEFAULT_MIRROR: &str = "http://freedb.freedb.org/~cddb/cddb.cgi";
pub const DEFAULT_READ_SPEED: u32 = 8;

/// Optional settings file. Every key may be overridden on the command line.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub device: Option<String>,
    pub agent_file: Option<PathBuf>,
    pub token_file: Option<PathBuf>,
    pub cddb_mirror: Option<String>,
    pub library_dir: Option<PathBuf>,
    pub read_speed: Option<u32>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<FileConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    /// Loads `path`, treating a missing file as empty unless it was asked for
    /// explicitly.
    pub fn load_or_default(path: &Path, explicit: bool) -> anyhow::Result<FileConfig> {
        if !explicit && !path.exists() {
            return Ok(FileConfig::default());
        }
        Self::load(path)
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub device: String,
    pub identity: ClientIdentity,
    pub token: Option<String>,
    pub cddb_mirror: String,
    pub library_dir: PathBuf,
    pub read_speed: u32,
}

impl Config {
    /// Merges command line values over `file` and built-in defaults, then
    /// reads the agent and token files.
    pub fn resolve(overrides: FileConfig, file: FileConfig) -> anyhow::Result<Config> {
        let agent_file = overrides
            .agent_file
            .or(file.agent_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AGENT_FILE));
        let token_file = overrides
            .token_file
            .or(file.token_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));

        let library_dir = match overrides.library_dir.or(file.library_dir) {
            Some(dir) => dir,
            None => default_library_dir()?,
        };

        let read_speed = overrides
            .read_speed
            .or(file.read_speed)
            .unwrap_or(DEFAULT_READ_SPEED);
        if read_speed == 0 {
            return Err(anyhow!("read speed must be at least 1"));
        }

        Ok(Config {
            device: overrides
                .device
                .or(file.device)
                .unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
            identity: read_identity(&agent_file)?,
            token: read_token(&token_file)?,
            cddb_mirror: overrides
                .cddb_mirror
                .or(file.cddb_mirror)
                .unwrap_or_else(|| DEFAULT_MIRROR.to_string()),
            library_dir,
            read_speed,
        })
    }

    pub fn rip_settings(&self) -> RipSettings {
        RipSettings {
            device: self.device.clone(),
            library_dir: self.library_dir.clone(),
            read_speed: self.read_speed,
        }
    }
}

fn default_library_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Music"))
        .ok_or_else(|| anyhow!("cannot determine home directory, pass --library-dir"))
}

fn read_identity(path: &Path) -> anyhow::Result<ClientIdentity> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read agent file {}", path.display()))?;
    contents
        .parse::<ClientIdentity>()
        .map_err(|e: String| anyhow!(e))
        .with_context(|| format!("Invalid agent in {}", path.display()))
}

/// The token is optional; a missing file is not an error.
fn read_token(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file {}", path.display()))?;
    let token = contents.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
device = "/dev/sr1"
agent_file = "/etc/discrip/agent"
cddb_mirror = "http://gnudb.gnudb.org/~cddb/cddb.cgi"
library_dir = "/srv/music"
read_speed = 4
"#;

        let cfg: FileConfig = toml::from_str(toml_str)?;

        assert_eq!(cfg.device.as_deref(), Some("/dev/sr1"));
        assert_eq!(cfg.agent_file, Some(PathBuf::from("/etc/discrip/agent")));
        assert_eq!(cfg.token_file, None);
        assert_eq!(cfg.library_dir, Some(PathBuf::from("/srv/music")));
        assert_eq!(cfg.read_speed, Some(4));

        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("speed = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_implicit_config_is_empty() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("config.toml");

        assert_eq!(FileConfig::load_or_default(&path, false)?, FileConfig::default());
        assert!(FileConfig::load_or_default(&path, true).is_err());

        Ok(())
    }

    #[test]
    fn command_line_wins_over_file_and_defaults() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let agent = write(&tmp, "agent", "discrip/1.0\n");
        let token = write(&tmp, "token", "  secret \n");

        let file = FileConfig {
            device: Some("/dev/sr1".to_string()),
            library_dir: Some(tmp.path().join("from-file")),
            read_speed: Some(2),
            ..FileConfig::default()
        };
        let overrides = FileConfig {
            agent_file: Some(agent),
            token_file: Some(token),
            read_speed: Some(16),
            ..FileConfig::default()
        };

        let cfg = Config::resolve(overrides, file)?;

        assert_eq!(cfg.device, "/dev/sr1");
        assert_eq!(cfg.library_dir, tmp.path().join("from-file"));
        assert_eq!(cfg.read_speed, 16);
        assert_eq!(cfg.cddb_mirror, DEFAULT_MIRROR);
        assert_eq!(cfg.identity.to_string(), "discrip/1.0");
        assert_eq!(cfg.token.as_deref(), Some("secret"));

        Ok(())
    }

    #[test]
    fn missing_token_file_is_allowed() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let overrides = FileConfig {
            agent_file: Some(write(&tmp, "agent", "discrip/1.0")),
            token_file: Some(tmp.path().join("absent")),
            library_dir: Some(tmp.path().to_path_buf()),
            ..FileConfig::default()
        };

        let cfg = Config::resolve(overrides, FileConfig::default())?;

        assert_eq!(cfg.token, None);
        assert_eq!(cfg.device, DEFAULT_DEVICE);
        assert_eq!(cfg.read_speed, DEFAULT_READ_SPEED);

        Ok(())
    }

    #[test]
    fn malformed_agent_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let overrides = FileConfig {
            agent_file: Some(write(&tmp, "agent", "just-a-name")),
            library_dir: Some(tmp.path().to_path_buf()),
            ..FileConfig::default()
        };

        assert!(Config::resolve(overrides, FileConfig::default()).is_err());
    }

    #[test]
    fn zero_read_speed_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let overrides = FileConfig {
            agent_file: Some(write(&tmp, "agent", "discrip/1.0")),
            library_dir: Some(tmp.path().to_path_buf()),
            read_speed: Some(0),
            ..FileConfig::default()
        };

        assert!(Config::resolve(overrides, FileConfig::default()).is_err());
    }
}
