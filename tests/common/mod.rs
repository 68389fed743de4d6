//! Shared fixtures and recording collaborators for integration tests.

#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use valet_nginx::config::{ConfigContext, GlobalSettings, Identity, ManagerConfig, ProxyPaths, SettingsStore};
use valet_nginx::fs::{Filesystem, FsError, FsResult, LocalFilesystem};
use valet_nginx::nginx::{Collaborators, Nginx};
use valet_nginx::process::{CommandError, CommandOutput, CommandRunner};
use valet_nginx::service::{ServiceController, ServiceError, ServiceResult};
use valet_nginx::site::{rewrite_loopback, SiteRegistry, SiteResult};

/// Ordered log of every collaborator call, shared between stubs.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.entries().iter().position(|e| e.starts_with(prefix))
    }
}

/// Service controller that records calls and fails on demand.
#[derive(Debug, Clone)]
pub struct RecordingInstaller {
    pub journal: Journal,
    pub installed: bool,
    pub install_fails: bool,
    pub failing_stops: Vec<String>,
    pub uninstall_fails: bool,
}

impl RecordingInstaller {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            installed: true,
            install_fails: false,
            failing_stops: Vec::new(),
            uninstall_fails: false,
        }
    }

    fn failure(action: &'static str, name: &str) -> ServiceError {
        ServiceError::CommandFailed {
            action,
            name: name.to_string(),
            code: 1,
            output: "simulated failure".into(),
        }
    }
}

impl ServiceController for RecordingInstaller {
    fn has_installed_nginx(&self) -> ServiceResult<bool> {
        self.journal.record("has_installed_nginx");
        Ok(self.installed)
    }

    fn install_or_fail(&self, name: &str) -> ServiceResult<()> {
        self.journal.record(format!("install {name}"));
        if self.install_fails {
            return Err(ServiceError::InstallFailed {
                name: name.to_string(),
                code: 1,
                output: "simulated failure".into(),
            });
        }
        Ok(())
    }

    fn restart_service(&self, name: &str) -> ServiceResult<()> {
        self.journal.record(format!("restart {name}"));
        Ok(())
    }

    fn stop_service(&self, names: &[&str]) -> ServiceResult<()> {
        self.journal.record(format!("stop {}", names.join(" ")));
        match names.iter().find(|n| self.failing_stops.iter().any(|f| f == *n)) {
            Some(name) => Err(Self::failure("stop", name)),
            None => Ok(()),
        }
    }

    fn uninstall_formula(&self, names: &[&str]) -> ServiceResult<()> {
        self.journal.record(format!("uninstall {}", names.join(" ")));
        if self.uninstall_fails {
            return Err(Self::failure("uninstall", &names.join(" ")));
        }
        Ok(())
    }

    fn nginx_service_name(&self) -> String {
        "nginx".to_string()
    }
}

/// Site registry that records calls and applies a fixed loopback.
#[derive(Debug, Clone)]
pub struct RecordingSites {
    pub journal: Journal,
    pub loopback: String,
}

impl RecordingSites {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            loopback: "127.0.0.1".into(),
        }
    }
}

impl SiteRegistry for RecordingSites {
    fn secured(&self) -> SiteResult<Vec<String>> {
        self.journal.record("secured");
        Ok(Vec::new())
    }

    fn replace_loopback(&self, text: &str) -> SiteResult<String> {
        self.journal.record("replace_loopback");
        Ok(rewrite_loopback(text, "127.0.0.1", &self.loopback))
    }

    fn alias_loopback(&self, old: &str, new: &str) -> SiteResult<()> {
        self.journal.record(format!("alias_loopback {old} {new}"));
        Ok(())
    }

    fn resecure_for_new_configuration(
        &self,
        old: &GlobalSettings,
        new: &GlobalSettings,
    ) -> SiteResult<()> {
        self.journal.record(format!(
            "resecure {}/{} -> {}/{}",
            old.tld, old.loopback, new.tld, new.loopback
        ));
        Ok(())
    }
}

/// Command runner whose `nginx -t` result is fixed.
#[derive(Debug, Clone)]
pub struct ScriptedRunner {
    pub journal: Journal,
    pub lint: CommandOutput,
}

impl ScriptedRunner {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            lint: CommandOutput::new(0, "nginx: configuration file test is successful\n"),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.journal.record(format!("run {program} {}", args.join(" ")));
        Ok(CommandOutput::new(0, ""))
    }

    fn run_as_root(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.journal.record(format!("sudo {program} {}", args.join(" ")));
        Ok(self.lint.clone())
    }
}

/// Local filesystem whose directory listings are fixed.
#[derive(Debug, Clone)]
pub struct FixedListing {
    pub names: Vec<String>,
}

impl Filesystem for FixedListing {
    fn is_dir(&self, path: &Path) -> bool {
        LocalFilesystem.is_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        LocalFilesystem.exists(path)
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        LocalFilesystem.read_to_string(path)
    }

    fn ensure_dir_as_user(&self, path: &Path, owner: &Identity) -> FsResult<()> {
        LocalFilesystem.ensure_dir_as_user(path, owner)
    }

    fn put_as_user(&self, path: &Path, contents: &str, owner: &Identity) -> FsResult<()> {
        LocalFilesystem.put_as_user(path, contents, owner)
    }

    fn scandir(&self, _path: &Path) -> FsResult<Vec<String>> {
        Ok(self.names.clone())
    }

    fn remove_file(&self, path: &Path) -> FsResult<()> {
        LocalFilesystem.remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> FsResult<()> {
        LocalFilesystem.remove_dir_all(path)
    }
}

/// Local filesystem that journals writes and removals, and can refuse to
/// remove one path.
#[derive(Debug, Clone)]
pub struct RecordingFiles {
    pub journal: Journal,
    pub undeletable: Option<PathBuf>,
}

impl RecordingFiles {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            undeletable: None,
        }
    }

    fn name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Filesystem for RecordingFiles {
    fn is_dir(&self, path: &Path) -> bool {
        LocalFilesystem.is_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        LocalFilesystem.exists(path)
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        LocalFilesystem.read_to_string(path)
    }

    fn ensure_dir_as_user(&self, path: &Path, owner: &Identity) -> FsResult<()> {
        LocalFilesystem.ensure_dir_as_user(path, owner)
    }

    fn put_as_user(&self, path: &Path, contents: &str, owner: &Identity) -> FsResult<()> {
        self.journal.record(format!("put {}", Self::name(path)));
        LocalFilesystem.put_as_user(path, contents, owner)
    }

    fn scandir(&self, path: &Path) -> FsResult<Vec<String>> {
        LocalFilesystem.scandir(path)
    }

    fn remove_file(&self, path: &Path) -> FsResult<()> {
        LocalFilesystem.remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> FsResult<()> {
        self.journal.record(format!("remove {}", path.display()));
        if self.undeletable.as_deref() == Some(path) {
            return Err(FsError::new(
                "remove",
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "simulated failure"),
            ));
        }
        LocalFilesystem.remove_dir_all(path)
    }
}

/// A sandboxed installation: `etc/`, `log/` and a Valet home in a temp dir.
pub struct Sandbox {
    pub dir: tempfile::TempDir,
    pub paths: ProxyPaths,
    pub context: ConfigContext,
    pub journal: Journal,
    pub installer: RecordingInstaller,
    pub sites: RecordingSites,
    pub runner: ScriptedRunner,
    pub files: Arc<dyn Filesystem>,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let etc = dir.path().join("etc");
        let log = dir.path().join("log").join("nginx");
        std::fs::create_dir_all(etc.join("nginx")).unwrap();
        std::fs::create_dir_all(&log).unwrap();

        let mut config = ManagerConfig::default();
        config.paths.valet_home = Some(dir.path().join("home"));
        config.server.server_path = Some(PathBuf::from("/opt/valet/server.php"));
        let context = ConfigContext::for_user(&config, Identity::unresolved("tester")).unwrap();
        std::fs::create_dir_all(&context.home_path).unwrap();

        let journal = Journal::default();
        Self {
            paths: ProxyPaths::new(&etc, &log),
            context,
            installer: RecordingInstaller::new(journal.clone()),
            sites: RecordingSites::new(journal.clone()),
            runner: ScriptedRunner::new(journal.clone()),
            files: Arc::new(LocalFilesystem::new()),
            journal,
            dir,
        }
    }

    /// Write `config.json`.
    pub fn with_settings(self, json: &str) -> Self {
        std::fs::write(self.context.settings_file(), json).unwrap();
        self
    }

    pub fn nginx(&self) -> Nginx {
        Nginx::new(
            self.paths.clone(),
            self.context.clone(),
            SettingsStore::new(self.context.settings_file()),
            Collaborators {
                installer: Arc::new(self.installer.clone()),
                site: Arc::new(self.sites.clone()),
                files: self.files.clone(),
                cli: Arc::new(self.runner.clone()),
            },
        )
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }
}
