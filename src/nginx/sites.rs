//! Per-site configuration enumeration.

use super::{Nginx, NginxResult};

impl Nginx {
    /// Domains with an explicit server block, in scan order.
    pub fn configured_sites(&self) -> NginxResult<Vec<String>> {
        let names = self.files.scandir(&self.context.sites_dir())?;
        Ok(names
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .collect())
    }
}
