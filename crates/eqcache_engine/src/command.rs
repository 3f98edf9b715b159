//! Engine backed by the MathJax command-line tools.
//!
//! Each render spawns the configured program with the expression as its
//! final argument and reads the markup from stdout:
//!
//! ```text
//! tex2svg [args..] [--packages a,b] [--inline] -- 'x^2'
//! tex2chtml [args..] [--packages a,b] --fontURL <url> [--inline] -- 'x^2'
//! ```

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::{EngineError, EngineLauncher, EngineOptions, MathEngine, OutputMode};

/// Launches `CommandEngine`s from `EngineOptions`.
#[derive(Debug, Clone, Default)]
pub struct CommandLauncher {
    options: EngineOptions,
}

impl CommandLauncher {
    /// Creates a launcher with the given options.
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Returns the launch options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}

impl EngineLauncher for CommandLauncher {
    type Engine = CommandEngine;

    async fn launch(&self, mode: OutputMode) -> Result<CommandEngine, EngineError> {
        let program = self.options.program_for(mode).trim();
        if program.is_empty() {
            return Err(EngineError::launch("engine program is empty"));
        }

        let mut base_args = self.options.args.clone();
        if !self.options.packages.is_empty() {
            base_args.push("--packages".to_string());
            base_args.push(self.options.packages.join(","));
        }
        if mode == OutputMode::Html && !self.options.font_url.is_empty() {
            base_args.push("--fontURL".to_string());
            base_args.push(self.options.font_url.clone());
        }

        debug!("Engine command: {} {}", program, base_args.join(" "));

        Ok(CommandEngine {
            program: program.to_string(),
            base_args,
            timeout: self.options.timeout(),
        })
    }
}

/// A configured engine command.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandEngine {
    /// Returns the program this engine runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments passed before the per-render ones.
    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }

    fn command(&self, tex: &str, display: bool) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.base_args);
        if !display {
            command.arg("--inline");
        }
        command
            .arg("--")
            .arg(tex)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn spawn_error(&self, err: std::io::Error) -> EngineError {
        if err.kind() == ErrorKind::NotFound {
            EngineError::launch(format!("engine program '{}' not found", self.program))
        } else {
            EngineError::Io(err)
        }
    }
}

impl MathEngine for CommandEngine {
    async fn render(&self, tex: &str, display: bool) -> Result<String, EngineError> {
        let mut command = self.command(tex, display);
        let pending = command.output();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| EngineError::Timeout(limit.as_millis() as u64))?,
            None => pending.await,
        }
        .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::render(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let markup = String::from_utf8(output.stdout)
            .map_err(|e| EngineError::render(format!("engine output is not UTF-8: {}", e)))?;

        Ok(markup.trim().to_string())
    }
}
