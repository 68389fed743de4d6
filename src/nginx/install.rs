//! Installation orchestration.

use super::{Nginx, NginxError, NginxResult};
use crate::config::GlobalSettings;
use crate::template::{Placeholder, TokenSet, FASTCGI_PARAMS, NGINX_CONF, VALET_CONF};

impl Nginx {
    /// Install nginx if needed, then write every piece of configuration.
    pub fn install(&self) -> NginxResult<()> {
        if !self.installer.has_installed_nginx()? {
            let primary = &self.context.services.primary;
            tracing::info!(formula = %primary, "Nginx not installed, installing");
            self.installer
                .install_or_fail(primary)
                .map_err(NginxError::Installation)?;
        }

        self.install_configuration()?;
        self.install_server()?;
        self.install_nginx_directory()?;

        tracing::info!(config = %self.paths.main_config.display(), "Nginx installed");
        Ok(())
    }

    /// Seed `config.json` with the default TLD and loopback. Values already
    /// present are kept.
    pub fn initialize_settings(&self) -> NginxResult<GlobalSettings> {
        let defaults = GlobalSettings {
            tld: self.context.default_tld.clone(),
            loopback: self.context.default_loopback.clone(),
        };
        Ok(self.settings.ensure_initialized(&defaults)?)
    }

    /// Write the global `nginx.conf`.
    pub fn install_configuration(&self) -> NginxResult<()> {
        let tokens = TokenSet::new()
            .with(Placeholder::User, self.context.user.name.as_str())
            .with(Placeholder::HomePath, self.home_path());
        let contents = NGINX_CONF.render(&tokens)?;

        self.files
            .put_as_user(&self.paths.main_config, &contents, &self.context.user)?;
        tracing::debug!(path = %self.paths.main_config.display(), "Wrote main configuration");
        Ok(())
    }

    /// Write the manager's own server block and `fastcgi_params`.
    pub fn install_server(&self) -> NginxResult<()> {
        self.files
            .ensure_dir_as_user(&self.paths.server_dir(), &self.context.user)?;

        let tokens = TokenSet::new()
            .with(Placeholder::HomePath, self.home_path())
            .with(Placeholder::ServerPath, self.context.server_path.display().to_string())
            .with(Placeholder::StaticPrefix, self.context.static_prefix.as_str());
        let text = self.site.replace_loopback(VALET_CONF.body)?;
        let contents = VALET_CONF.render_text(&text, &tokens)?;

        self.files
            .put_as_user(&self.paths.server_config(), &contents, &self.context.user)?;
        self.files.put_as_user(
            &self.paths.fastcgi_params(),
            FASTCGI_PARAMS.body,
            &self.context.user,
        )?;
        tracing::debug!(path = %self.paths.server_config().display(), "Wrote server block");
        Ok(())
    }

    /// Ensure the per-site directory exists, then regenerate secured sites.
    pub fn install_nginx_directory(&self) -> NginxResult<()> {
        let dir = self.context.sites_dir();
        if !self.files.is_dir(&dir) {
            self.files.ensure_dir_as_user(&dir, &self.context.user)?;
        }
        self.files
            .put_as_user(&dir.join(".keep"), "\n", &self.context.user)?;

        self.rewrite_secure_nginx_files()
    }

    fn home_path(&self) -> String {
        self.context.home_path.display().to_string()
    }
}
