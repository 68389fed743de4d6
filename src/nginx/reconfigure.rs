//! Regeneration of secured-site server blocks.

use super::{Nginx, NginxResult};

impl Nginx {
    /// Rebuild every secured site for the current TLD and loopback.
    ///
    /// Fails with `MissingConfiguration` before touching any file when the
    /// settings are incomplete.
    pub fn rewrite_secure_nginx_files(&self) -> NginxResult<()> {
        let settings = self.settings.read()?;

        if settings.loopback != self.context.default_loopback {
            tracing::info!(
                from = %self.context.default_loopback,
                to = %settings.loopback,
                "Re-pointing site files at custom loopback"
            );
            self.site
                .alias_loopback(&self.context.default_loopback, &settings.loopback)?;
        }

        // Same settings on both sides: a full rebuild, not a migration.
        self.site
            .resecure_for_new_configuration(&settings, &settings)?;
        tracing::info!(tld = %settings.tld, loopback = %settings.loopback, "Secure sites regenerated");
        Ok(())
    }
}
