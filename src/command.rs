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
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

/// Holds the executable command and base arguments used to invoke the
/// target-language interpreter.
///
/// This is the one place that knows how to launch a child process; both
/// the session supervisor and the grader build their `tokio::process::Command`
/// from one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandArgs {
  /// The interpreter binary (e.g. "python3" or "/usr/bin/python3.11").
  pub command: PathBuf,

  /// Base arguments placed before the source file path (e.g. ["-u"] to
  /// force unbuffered stdio, which the supervisor relies on for prompt
  /// detection).
  #[serde(default)]
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub args: Vec<String>,
}

impl CommandArgs {
  /// Builds a `tokio::process::Command` targeting `source_path`, with
  /// `args` inserted ahead of the path.
  pub fn to_tokio_command(&self, source_path: &std::path::Path) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(&self.command);
    cmd.args(&self.args);
    cmd.arg(source_path);
    cmd
  }
}
