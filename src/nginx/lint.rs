//! Syntax validation through `nginx -t`.

use super::{Nginx, NginxError, NginxResult};

impl Nginx {
    /// Check the main configuration file. A non-zero exit is fatal.
    pub fn lint(&self) -> NginxResult<()> {
        let config = self.paths.main_config.display().to_string();
        let out = self
            .cli
            .run_as_root(&self.context.nginx_binary, &["-c", config.as_str(), "-t"])?;

        if !out.success() {
            tracing::error!(code = out.code, config = %config, "Nginx configuration check failed");
            return Err(NginxError::ConfigurationInvalid {
                code: out.code,
                output: out.output,
            });
        }
        tracing::debug!(config = %config, "Nginx configuration OK");
        Ok(())
    }
}
