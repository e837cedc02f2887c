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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "isiXhosa-to-Python execution core")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Transpile and run one source file interactively, streaming prompts
  /// and output to the terminal until the program completes.
  Run(RunArgs),

  /// Transpile and grade one source file against a fixed test-case file.
  Grade(GradeArgs),
}

#[derive(Debug, Parser)]
pub struct RunArgs {
  /// Path to an isiXhosa source file.
  pub source_path: PathBuf,

  /// Run with step/variable debug instrumentation enabled.
  #[arg(long)]
  pub debug: bool,

  /// Override the interpreter binary (defaults to `python3`, or
  /// `ISIPYTHON_INTERPRETER` if set).
  #[arg(long)]
  pub interpreter_path: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct GradeArgs {
  /// Path to an isiXhosa source file.
  pub source_path: PathBuf,

  /// Path to a JSON file holding the challenge's test cases, in the shape
  /// of `Vec<crate::grader::TestCase>`.
  pub test_cases_path: PathBuf,

  /// Override the interpreter binary (defaults to `python3`, or
  /// `ISIPYTHON_INTERPRETER` if set).
  #[arg(long)]
  pub interpreter_path: Option<PathBuf>,
}
