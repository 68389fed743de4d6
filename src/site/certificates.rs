//! Site registry backed by the certificate directory.

use std::path::PathBuf;
use std::sync::Arc;

use super::{rewrite_loopback, SiteError, SiteRegistry, SiteResult};
use crate::config::{ConfigContext, GlobalSettings, SettingsStore};
use crate::fs::Filesystem;
use crate::template::{Placeholder, TokenSet, SECURE_SITE_CONF};

/// A site is secured when `Certificates/<domain>.crt` exists.
#[derive(Debug, Clone)]
pub struct CertificateSites {
    context: ConfigContext,
    settings: SettingsStore,
    files: Arc<dyn Filesystem>,
}

impl CertificateSites {
    pub fn new(context: ConfigContext, settings: SettingsStore, files: Arc<dyn Filesystem>) -> Self {
        Self {
            context,
            settings,
            files,
        }
    }

    fn certificate(&self, domain: &str) -> PathBuf {
        self.context
            .certificates_dir()
            .join(format!("{domain}.crt"))
    }

    fn key(&self, domain: &str) -> PathBuf {
        self.context
            .certificates_dir()
            .join(format!("{domain}.key"))
    }

    fn site_files(&self) -> SiteResult<Vec<PathBuf>> {
        let dir = self.context.sites_dir();
        if !self.files.is_dir(&dir) {
            return Ok(Vec::new());
        }
        Ok(self
            .files
            .scandir(&dir)?
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .map(|name| dir.join(name))
            .collect())
    }

    /// Render the TLS server block for `domain` listening on `loopback`.
    fn build_secure_server(&self, domain: &str, loopback: &str) -> SiteResult<String> {
        let tokens = TokenSet::new()
            .with(Placeholder::Site, domain)
            .with(Placeholder::Cert, self.certificate(domain).display().to_string())
            .with(Placeholder::Key, self.key(domain).display().to_string())
            .with(Placeholder::HomePath, self.context.home_path.display().to_string())
            .with(Placeholder::ServerPath, self.context.server_path.display().to_string())
            .with(Placeholder::StaticPrefix, self.context.static_prefix.as_str());

        let text = rewrite_loopback(SECURE_SITE_CONF.body, &self.context.default_loopback, loopback);
        Ok(SECURE_SITE_CONF.render_text(&text, &tokens)?)
    }
}

impl SiteRegistry for CertificateSites {
    fn secured(&self) -> SiteResult<Vec<String>> {
        let dir = self.context.certificates_dir();
        if !self.files.is_dir(&dir) {
            return Ok(Vec::new());
        }
        Ok(self
            .files
            .scandir(&dir)?
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .filter_map(|name| name.strip_suffix(".crt").map(str::to_string))
            .collect())
    }

    fn replace_loopback(&self, text: &str) -> SiteResult<String> {
        let settings = self.settings.read()?;
        Ok(rewrite_loopback(text, &self.context.default_loopback, &settings.loopback))
    }

    fn alias_loopback(&self, old: &str, new: &str) -> SiteResult<()> {
        for path in self.site_files()? {
            let current = self.files.read_to_string(&path)?;
            let updated = rewrite_loopback(&current, old, new);
            if updated != current {
                tracing::debug!(path = %path.display(), old, new, "Re-pointing loopback");
                self.files.put_as_user(&path, &updated, &self.context.user)?;
            }
        }
        Ok(())
    }

    fn resecure_for_new_configuration(
        &self,
        old: &GlobalSettings,
        new: &GlobalSettings,
    ) -> SiteResult<()> {
        let old_suffix = format!(".{}", old.tld);
        let sites_dir = self.context.sites_dir();

        for domain in self.secured()? {
            let Some(name) = domain.strip_suffix(&old_suffix) else {
                tracing::debug!(domain = %domain, tld = %old.tld, "Skipping site outside the managed TLD");
                continue;
            };
            let target = format!("{name}.{}", new.tld);
            if !self.files.exists(&self.certificate(&target)) {
                return Err(SiteError::CertificateMissing { domain: target });
            }

            let conf = self.build_secure_server(&target, &new.loopback)?;
            self.files
                .put_as_user(&sites_dir.join(&target), &conf, &self.context.user)?;
            if target != domain {
                self.files.remove_file(&sites_dir.join(&domain))?;
            }
            tracing::info!(site = %target, "Rebuilt secure server block");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Identity, ManagerConfig};
    use crate::fs::LocalFilesystem;
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        context: ConfigContext,
        sites: CertificateSites,
    }

    fn fixture(settings: &str, certificates: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ManagerConfig::default();
        config.paths.valet_home = Some(dir.path().to_path_buf());
        let context = ConfigContext::for_user(&config, Identity::unresolved("tester")).unwrap();

        fs::create_dir_all(context.sites_dir()).unwrap();
        fs::create_dir_all(context.certificates_dir()).unwrap();
        for domain in certificates {
            fs::write(context.certificates_dir().join(format!("{domain}.crt")), "cert").unwrap();
            fs::write(context.certificates_dir().join(format!("{domain}.key")), "key").unwrap();
        }
        fs::write(context.settings_file(), settings).unwrap();

        let sites = CertificateSites::new(
            context.clone(),
            SettingsStore::new(context.settings_file()),
            Arc::new(LocalFilesystem::new()),
        );
        Fixture {
            _dir: dir,
            context,
            sites,
        }
    }

    fn settings(tld: &str, loopback: &str) -> GlobalSettings {
        GlobalSettings {
            tld: tld.into(),
            loopback: loopback.into(),
        }
    }

    #[test]
    fn test_secured_lists_certificates() {
        let f = fixture(r#"{"tld":"test","loopback":"127.0.0.1"}"#, &["blog.test", "shop.test"]);
        assert_eq!(f.sites.secured().unwrap(), vec!["blog.test", "shop.test"]);
    }

    #[test]
    fn test_resecure_rebuilds_with_current_loopback() {
        let f = fixture(r#"{"tld":"test","loopback":"10.200.10.1"}"#, &["blog.test"]);
        let current = settings("test", "10.200.10.1");

        f.sites.resecure_for_new_configuration(&current, &current).unwrap();

        let conf = fs::read_to_string(f.context.sites_dir().join("blog.test")).unwrap();
        assert!(conf.contains("listen 10.200.10.1:443 ssl http2;"));
        assert!(conf.contains("server_name blog.test www.blog.test *.blog.test;"));
        assert!(conf.contains(&format!(
            "ssl_certificate \"{}\";",
            f.context.certificates_dir().join("blog.test.crt").display()
        )));
        assert!(!conf.contains("VALET_"));
        assert!(!conf.contains("127.0.0.1:"));
    }

    #[test]
    fn test_resecure_moves_sites_to_new_tld() {
        let f = fixture(r#"{"tld":"dev","loopback":"127.0.0.1"}"#, &["blog.test", "blog.dev"]);
        fs::write(f.context.sites_dir().join("blog.test"), "old").unwrap();

        f.sites
            .resecure_for_new_configuration(&settings("test", "127.0.0.1"), &settings("dev", "127.0.0.1"))
            .unwrap();

        assert!(!f.context.sites_dir().join("blog.test").exists());
        assert!(f.context.sites_dir().join("blog.dev").exists());
    }

    #[test]
    fn test_resecure_requires_certificate_for_new_domain() {
        let f = fixture(r#"{"tld":"dev","loopback":"127.0.0.1"}"#, &["blog.test"]);
        let err = f
            .sites
            .resecure_for_new_configuration(&settings("test", "127.0.0.1"), &settings("dev", "127.0.0.1"))
            .unwrap_err();
        assert!(matches!(err, SiteError::CertificateMissing { domain } if domain == "blog.dev"));
    }

    #[test]
    fn test_alias_loopback_skips_hidden_files() {
        let f = fixture(r#"{"tld":"test","loopback":"10.0.0.9"}"#, &[]);
        let dir = f.context.sites_dir();
        fs::write(dir.join("blog.test"), "listen 127.0.0.1:443 ssl;").unwrap();
        fs::write(dir.join(".keep"), "listen 127.0.0.1:80;").unwrap();

        f.sites.alias_loopback("127.0.0.1", "10.0.0.9").unwrap();

        assert_eq!(fs::read_to_string(dir.join("blog.test")).unwrap(), "listen 10.0.0.9:443 ssl;");
        assert_eq!(fs::read_to_string(dir.join(".keep")).unwrap(), "listen 127.0.0.1:80;");
    }

    #[test]
    fn test_replace_loopback_reads_settings() {
        let f = fixture(r#"{"tld":"test","loopback":"10.0.0.9"}"#, &[]);
        let out = f.sites.replace_loopback("listen 127.0.0.1:80 default_server;").unwrap();
        assert_eq!(out, "listen 10.0.0.9:80 default_server;");
    }

    #[test]
    fn test_replace_loopback_without_settings_fails() {
        let f = fixture("{}", &[]);
        assert!(matches!(
            f.sites.replace_loopback("listen 127.0.0.1:80;"),
            Err(SiteError::Settings(_))
        ));
    }
}
