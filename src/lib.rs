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

//! # isipython-core
//!
//! The execution core behind IsiPython: turns isiXhosa source into Python,
//! runs it interactively under supervision, grades it against challenge
//! test cases, and translates whatever the interpreter says back into
//! isiXhosa.
//!
//! ## Core Modules
//!
//! * [`keywords`]: The closed isiXhosa-to-Python keyword table.
//! * [`transpiler`]: Keyword substitution, prompt-splitting, and debug
//!   instrumentation.
//! * [`session`]: The interactive session supervisor and its `Supervisor`
//!   entry point.
//! * [`registry`]: The process-wide table of live sessions.
//! * [`grader`]: Runs a submission against a challenge's test cases.
//! * [`scoring`]: Pure multiple-choice quiz scoring.
//! * [`diagnostics`]: Translates interpreter diagnostics into isiXhosa.
//! * [`cli`]: The `clap`-based development harness CLI.
//! * [`command`]: The shared `CommandArgs` interpreter-invocation descriptor.
//! * [`config`]: Resolves CLI args and environment into runtime configuration.
//! * [`error`]: The error types for every subsystem.
//! * [`logging`]: The `setup_tracing` utility.

pub mod cli;
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod grader;
pub mod keywords;
pub mod logging;
pub mod registry;
pub mod scoring;
pub mod session;
pub mod transpiler;
