//! Service lifecycle control.

use super::{Nginx, NginxResult};

impl Nginx {
    /// Validate, then restart. A broken configuration is never restarted.
    pub fn restart(&self) -> NginxResult<()> {
        self.lint()?;

        let name = self.installer.nginx_service_name();
        self.installer.restart_service(&name)?;
        tracing::info!(service = %name, "Nginx restarted");
        Ok(())
    }

    /// Stop the service without validation.
    pub fn stop(&self) -> NginxResult<()> {
        let name = self.installer.nginx_service_name();
        self.installer.stop_service(&[name.as_str()])?;
        tracing::info!(service = %name, "Nginx stopped");
        Ok(())
    }

    /// Stop and remove every nginx variant, then delete its configuration
    /// and logs. Irreversible.
    pub fn uninstall(&self) -> NginxResult<()> {
        let variants = self.context.services.variants();

        // Either variant may legitimately be absent.
        for name in variants {
            if let Err(e) = self.installer.stop_service(&[name]) {
                tracing::warn!(service = name, error = %e, "Could not stop service");
            }
        }
        if let Err(e) = self.installer.uninstall_formula(&variants) {
            tracing::warn!(error = %e, "Could not uninstall nginx packages");
        }

        // Both trees are attempted; the first failure is reported.
        let config = self.files.remove_dir_all(&self.paths.config_dir);
        let logs = self.files.remove_dir_all(&self.paths.log_dir);
        config.and(logs)?;
        tracing::info!(
            config_dir = %self.paths.config_dir.display(),
            log_dir = %self.paths.log_dir.display(),
            "Nginx uninstalled"
        );
        Ok(())
    }
}
