//! Explicit configuration context.
//!
//! Everything the templates and collaborators used to look up from the
//! environment (invoking user, home path, server path, constants) is captured
//! here once and passed along by value.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::loader::ConfigError;
use crate::config::schema::{ManagerConfig, ServiceConfig};

/// The user that owns generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub home: Option<PathBuf>,
}

impl Identity {
    /// An identity with no resolved ids; writes keep the process owner.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: None,
            gid: None,
            home: None,
        }
    }

    /// The user who invoked us, looking through `sudo`.
    pub fn invoking() -> Self {
        let name = ["SUDO_USER", "USER", "LOGNAME"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty());

        match name {
            Some(name) => Self::lookup(&name),
            None => Self::current_process(),
        }
    }

    /// Resolve uid, gid and home for a user name.
    #[cfg(unix)]
    pub fn lookup(name: &str) -> Self {
        match nix::unistd::User::from_name(name) {
            Ok(Some(user)) => Self {
                name: user.name,
                uid: Some(user.uid.as_raw()),
                gid: Some(user.gid.as_raw()),
                home: Some(user.dir),
            },
            Ok(None) => {
                tracing::warn!(user = name, "Unknown user, files keep the process owner");
                Self::unresolved(name)
            }
            Err(e) => {
                tracing::warn!(user = name, error = %e, "User lookup failed");
                Self::unresolved(name)
            }
        }
    }

    #[cfg(not(unix))]
    pub fn lookup(name: &str) -> Self {
        Self::unresolved(name)
    }

    #[cfg(unix)]
    fn current_process() -> Self {
        match nix::unistd::User::from_uid(nix::unistd::getuid()) {
            Ok(Some(user)) => Self::lookup(&user.name),
            _ => Self::unresolved("root"),
        }
    }

    #[cfg(not(unix))]
    fn current_process() -> Self {
        Self::unresolved("root")
    }
}

/// Values every manager operation needs, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigContext {
    /// Owner of generated files and the `user` nginx runs workers as.
    pub user: Identity,
    /// Valet home (`~/.config/valet`).
    pub home_path: PathBuf,
    /// Front controller requests are rewritten to.
    pub server_path: PathBuf,
    pub static_prefix: String,
    /// nginx executable used for syntax checks.
    pub nginx_binary: String,
    /// Loopback the stubs hard-code.
    pub default_loopback: String,
    pub default_tld: String,
    pub services: ServiceConfig,
}

impl ConfigContext {
    /// Build the context for the invoking user.
    pub fn from_config(config: &ManagerConfig) -> Result<Self, ConfigError> {
        Self::for_user(config, Identity::invoking())
    }

    /// Build the context for an explicit user.
    pub fn for_user(config: &ManagerConfig, user: Identity) -> Result<Self, ConfigError> {
        let home_path = match &config.paths.valet_home {
            Some(home) => home.clone(),
            None => default_home(user.home.as_deref()).ok_or(ConfigError::NoHomeDirectory)?,
        };
        let server_path = config
            .server
            .server_path
            .clone()
            .unwrap_or_else(|| home_path.join("server.php"));

        Ok(Self {
            user,
            home_path,
            server_path,
            static_prefix: config.server.static_prefix.clone(),
            nginx_binary: config.server.binary.clone(),
            default_loopback: config.server.default_loopback.clone(),
            default_tld: config.server.default_tld.clone(),
            services: config.service.clone(),
        })
    }

    /// Per-site server blocks.
    pub fn sites_dir(&self) -> PathBuf {
        self.home_path.join("Nginx")
    }

    /// Persisted `tld` / `loopback` settings.
    pub fn settings_file(&self) -> PathBuf {
        self.home_path.join("config.json")
    }

    pub fn certificates_dir(&self) -> PathBuf {
        self.home_path.join("Certificates")
    }
}

/// Valet home: `$VALET_HOME`, else `<user home>/.config/valet`.
pub fn default_home(user_home: Option<&Path>) -> Option<PathBuf> {
    if let Some(home) = env::var_os("VALET_HOME").filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home));
    }
    user_home
        .map(Path::to_path_buf)
        .or_else(dirs::home_dir)
        .map(|home| home.join(".config").join("valet"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_home_and_defaults() {
        let mut config = ManagerConfig::default();
        config.paths.valet_home = Some(PathBuf::from("/tmp/valet-home"));

        let ctx = ConfigContext::for_user(&config, Identity::unresolved("taylor")).unwrap();

        assert_eq!(ctx.user.name, "taylor");
        assert_eq!(ctx.server_path, PathBuf::from("/tmp/valet-home/server.php"));
        assert_eq!(ctx.sites_dir(), PathBuf::from("/tmp/valet-home/Nginx"));
        assert_eq!(ctx.settings_file(), PathBuf::from("/tmp/valet-home/config.json"));
        assert_eq!(ctx.default_loopback, "127.0.0.1");
        assert_eq!(ctx.services.primary, "nginx");
    }

    #[test]
    fn test_server_path_override() {
        let mut config = ManagerConfig::default();
        config.paths.valet_home = Some(PathBuf::from("/h"));
        config.server.server_path = Some(PathBuf::from("/opt/valet/server.php"));

        let ctx = ConfigContext::for_user(&config, Identity::unresolved("taylor")).unwrap();
        assert_eq!(ctx.server_path, PathBuf::from("/opt/valet/server.php"));
    }

    #[test]
    fn test_context_is_deterministic() {
        fn assert_eq_trait<T: Eq>(_: &T) {}

        let mut config = ManagerConfig::default();
        config.paths.valet_home = Some(PathBuf::from("/h"));

        let first = ConfigContext::for_user(&config, Identity::unresolved("taylor")).unwrap();
        let second = ConfigContext::for_user(&config, Identity::unresolved("taylor")).unwrap();
        assert_eq_trait(&first);
        assert_eq!(first, second);
    }
}
