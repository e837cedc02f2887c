// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Resolves [`RunArgs`]/[`GradeArgs`] plus the environment into the
//! concrete [`Config`] the rest of the crate runs with.
//!
//! Interpreter resolution follows the same tiered priority the orchestrator
//! used for its component paths: an explicit CLI override wins, then an
//! environment variable, then a built-in default. Unlike the orchestrator
//! there is no on-disk manifest to consult, because the interpreter is a
//! single well-known binary rather than a per-language build artifact.

use crate::cli::{GradeArgs, RunArgs};
use crate::command::CommandArgs;
use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_INTERPRETER: &str = "python3";
const INTERPRETER_ENV_VAR: &str = "ISIPYTHON_INTERPRETER";

const DEFAULT_IDLE_BUDGET: Duration = Duration::from_secs(10);
const DEFAULT_OUTPUT_BUFFER_CAPACITY: usize = 100;
const DEFAULT_INPUT_SETTLE_DELAY: Duration = Duration::from_millis(500);
const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_DIAGNOSTIC_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_DIAGNOSTIC_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// Resolves the interpreter command: CLI override, then `ISIPYTHON_INTERPRETER`,
/// then the built-in default. The interpreter is always run with `-u` so its
/// stdout is unbuffered, which the session supervisor relies on to see
/// prompts as soon as they're printed.
fn resolve_interpreter(override_path: &Option<PathBuf>) -> CommandArgs {
  let command = if let Some(path) = override_path {
    tracing::debug!("using interpreter override: {}", path.display());
    path.clone()
  } else if let Ok(path) = env::var(INTERPRETER_ENV_VAR) {
    tracing::debug!("using interpreter from {}: {}", INTERPRETER_ENV_VAR, path);
    PathBuf::from(path)
  } else {
    PathBuf::from(DEFAULT_INTERPRETER)
  };

  CommandArgs {
    command,
    args: vec!["-u".to_string()],
  }
}

/// Configuration for the interactive session supervisor (src/session.rs).
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
  /// How long a session may go without producing output or consuming input
  /// before the supervisor kills it.
  pub idle_budget: Duration,
  /// Maximum number of output/error lines retained per session; oldest
  /// lines are dropped once the cap is reached.
  pub output_buffer_capacity: usize,
  /// Delay after a child stops writing before the supervisor commits to
  /// believing it is blocked on a prompt read, letting a burst of output
  /// finish landing first.
  pub input_settle_delay: Duration,
  /// The interpreter to spawn for each session.
  pub interpreter: CommandArgs,
}

impl Default for SupervisorConfig {
  fn default() -> Self {
    Self {
      idle_budget: DEFAULT_IDLE_BUDGET,
      output_buffer_capacity: DEFAULT_OUTPUT_BUFFER_CAPACITY,
      input_settle_delay: DEFAULT_INPUT_SETTLE_DELAY,
      interpreter: resolve_interpreter(&None),
    }
  }
}

/// Configuration for the challenge grader (src/grader.rs).
#[derive(Debug, Clone)]
pub struct GraderConfig {
  /// Wall-clock budget for a single test case; exceeding it kills the
  /// child and records a timeout outcome for that case only.
  pub case_timeout: Duration,
  /// The interpreter to spawn for each test case.
  pub interpreter: CommandArgs,
}

impl Default for GraderConfig {
  fn default() -> Self {
    Self {
      case_timeout: DEFAULT_CASE_TIMEOUT,
      interpreter: resolve_interpreter(&None),
    }
  }
}

/// Configuration for the diagnostic translator (src/diagnostics.rs).
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
  pub api_key: Option<String>,
  pub model: String,
  pub base_url: String,
}

impl Default for DiagnosticsConfig {
  fn default() -> Self {
    Self {
      api_key: env::var("ANTHROPIC_API_KEY").ok(),
      model: DEFAULT_DIAGNOSTIC_MODEL.to_string(),
      base_url: DEFAULT_DIAGNOSTIC_BASE_URL.to_string(),
    }
  }
}

/// The fully resolved configuration for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Config {
  pub supervisor: SupervisorConfig,
  pub grader: GraderConfig,
  pub diagnostics: DiagnosticsConfig,
}

impl TryFrom<&RunArgs> for Config {
  type Error = ConfigError;

  fn try_from(args: &RunArgs) -> Result<Self, Self::Error> {
    let interpreter = resolve_interpreter(&args.interpreter_path);
    Ok(Config {
      supervisor: SupervisorConfig {
        interpreter,
        ..SupervisorConfig::default()
      },
      grader: GraderConfig::default(),
      diagnostics: DiagnosticsConfig::default(),
    })
  }
}

impl TryFrom<&GradeArgs> for Config {
  type Error = ConfigError;

  fn try_from(args: &GradeArgs) -> Result<Self, Self::Error> {
    let interpreter = resolve_interpreter(&args.interpreter_path);
    Ok(Config {
      supervisor: SupervisorConfig::default(),
      grader: GraderConfig {
        interpreter,
        ..GraderConfig::default()
      },
      diagnostics: DiagnosticsConfig::default(),
    })
  }
}
