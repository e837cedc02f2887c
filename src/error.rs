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

//! Error types for every subsystem, aggregated into [`CoreError`].
//!
//! Each module owns a narrow enum naming its own failure modes; `CoreError`
//! exists only so `main.rs` has one type to match on.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rewriting isiXhosa source into target-language source
/// (src/transpiler.rs).
#[derive(Error, Debug)]
pub enum TranspileError {
  #[error("line {line}: '{forbidden}' is a target-language keyword, use '{suggested}' instead")]
  ForeignKeyword {
    line: usize,
    forbidden: String,
    suggested: String,
  },

  #[error("failed to read source for transpilation")]
  Io(#[source] std::io::Error),
}

/// Errors raised by the interactive session supervisor (src/session.rs).
#[derive(Error, Debug)]
pub enum SessionError {
  #[error(transparent)]
  Transpile(#[from] TranspileError),

  #[error("session '{0}' does not exist")]
  SessionMissing(String),

  #[error("session '{0}' is not accepting input right now")]
  NotWaitingForInput(String),

  #[error("session '{0}' process is not running")]
  ProcessNotRunning(String),

  #[error("failed to spawn interpreter '{interpreter}'")]
  ChildSpawnFailed {
    interpreter: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write to child stdin for session '{0}'")]
  StdinWrite(String, #[source] std::io::Error),

  #[error("session '{0}' exceeded its idle budget and was killed")]
  IdleTimeout(String),

  #[error("failed to write transpiled source to a temporary file")]
  TempFile(#[source] std::io::Error),
}

/// Errors raised while grading a challenge submission (src/grader.rs).
#[derive(Error, Debug)]
pub enum GraderError {
  #[error("submission store failed: {0}")]
  Store(String),

  #[error("no test cases are registered for challenge '{0}'")]
  NoTestCases(String),

  #[error(transparent)]
  Transpile(#[from] TranspileError),

  #[error("failed to spawn interpreter for a test case")]
  ChildSpawnFailed(#[source] std::io::Error),

  #[error("failed to write transpiled source to a temporary file")]
  TempFile(#[source] std::io::Error),
}

/// Errors raised while translating interpreter diagnostics (src/diagnostics.rs).
#[derive(Error, Debug)]
pub enum DiagnosticError {
  #[error("diagnostic translation request failed: {0}")]
  Request(String),

  #[error("diagnostic translation service returned an unexpected response")]
  MalformedResponse,
}

/// Errors raised while resolving configuration (src/config.rs).
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("'{0}' was not found and no override was supplied")]
  Unresolved(&'static str),

  #[error("failed to read configuration file '{path}'")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse configuration file '{path}'")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Top-level error enum aggregating every subsystem's errors.
#[derive(Error, Debug)]
pub enum CoreError {
  #[error(transparent)]
  Transpile(#[from] TranspileError),

  #[error(transparent)]
  Session(#[from] SessionError),

  #[error(transparent)]
  Grader(#[from] GraderError),

  #[error(transparent)]
  Diagnostic(#[from] DiagnosticError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON serialization/deserialization error: {0}")]
  Json(#[from] serde_json::Error),
}
