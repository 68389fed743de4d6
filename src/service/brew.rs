//! Homebrew-backed service controller.

use std::sync::Arc;

use super::{ServiceController, ServiceError, ServiceResult};
use crate::config::ServiceConfig;
use crate::process::{CommandOutput, CommandRunner};

/// Controls nginx through `brew` and `brew services`.
#[derive(Debug, Clone)]
pub struct Brew {
    config: ServiceConfig,
    cli: Arc<dyn CommandRunner>,
}

impl Brew {
    pub fn new(config: ServiceConfig, cli: Arc<dyn CommandRunner>) -> Self {
        Self { config, cli }
    }

    fn installed_formulae(&self) -> ServiceResult<Vec<String>> {
        let out = self.cli.run(&self.config.brew, &["list", "--formula"])?;
        if !out.success() {
            return Err(failed("list", "--formula", out));
        }
        Ok(out
            .output
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }

    fn has_installed(&self, name: &str) -> ServiceResult<bool> {
        Ok(self.installed_formulae()?.iter().any(|f| f == name))
    }

    fn services(&self, action: &'static str, name: &str) -> ServiceResult<()> {
        tracing::info!(service = name, action, "Controlling service");
        let out = self
            .cli
            .run_as_root(&self.config.brew, &["services", action, name])?;
        if out.success() {
            Ok(())
        } else {
            Err(failed(action, name, out))
        }
    }
}

fn failed(action: &'static str, name: &str, out: CommandOutput) -> ServiceError {
    ServiceError::CommandFailed {
        action,
        name: name.to_string(),
        code: out.code,
        output: out.output.trim().to_string(),
    }
}

impl ServiceController for Brew {
    fn has_installed_nginx(&self) -> ServiceResult<bool> {
        let installed = self.installed_formulae()?;
        Ok(self
            .config
            .variants()
            .iter()
            .any(|variant| installed.iter().any(|f| f == variant)))
    }

    fn install_or_fail(&self, name: &str) -> ServiceResult<()> {
        tracing::info!(formula = name, "Installing");
        let out = self.cli.run(&self.config.brew, &["install", name])?;
        if out.success() {
            return Ok(());
        }
        Err(ServiceError::InstallFailed {
            name: name.to_string(),
            code: out.code,
            output: out.output.trim().to_string(),
        })
    }

    fn restart_service(&self, name: &str) -> ServiceResult<()> {
        self.services("restart", name)
    }

    fn stop_service(&self, names: &[&str]) -> ServiceResult<()> {
        let mut first_error = None;
        for name in names {
            if let Err(e) = self.services("stop", name) {
                tracing::warn!(service = *name, error = %e, "Stop failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn uninstall_formula(&self, names: &[&str]) -> ServiceResult<()> {
        let mut args = vec!["uninstall", "--force"];
        args.extend_from_slice(names);
        let out = self.cli.run(&self.config.brew, &args)?;
        if out.success() {
            Ok(())
        } else {
            Err(failed("uninstall", &names.join(" "), out))
        }
    }

    fn nginx_service_name(&self) -> String {
        match self.has_installed(&self.config.full) {
            Ok(true) => self.config.full.clone(),
            Ok(false) => self.config.primary.clone(),
            Err(e) => {
                tracing::debug!(error = %e, "Could not list formulae, assuming primary nginx");
                self.config.primary.clone()
            }
        }
    }
}
