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

//! Thin development harness around the core library: a `run` subcommand
//! that drives one interactive session to completion over the terminal's
//! own stdin/stdout, and a `grade` subcommand that grades a source file
//! against a test-case JSON file. Neither is part of the specified core;
//! production deployments wrap [`isipython_core`] behind their own server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use isipython_core::cli::{Cli, Commands, GradeArgs, RunArgs};
use isipython_core::config::Config;
use isipython_core::diagnostics::ReqwestLlmClient;
use isipython_core::error::GraderError;
use isipython_core::grader::{self, GradeOutcome, ProgressStore, SubmissionStore, TestCase, TestCaseStore};
use isipython_core::logging::setup_tracing;
use isipython_core::session::{SessionMode, Supervisor};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
  setup_tracing()?;

  let Cli { command } = Cli::parse();
  let main_span = tracing::info_span!("isipython");
  let _enter = main_span.enter();

  match command {
    Commands::Run(run_args) => run_interactive(run_args).await,
    Commands::Grade(grade_args) => run_grade(grade_args).await,
  }
}

async fn run_interactive(args: RunArgs) -> Result<()> {
  let source = std::fs::read_to_string(&args.source_path)
    .with_context(|| format!("reading {}", args.source_path.display()))?;
  let config = Config::try_from(&args)?;

  let registry = Arc::new(isipython_core::registry::SessionRegistry::new());
  let supervisor = Supervisor::new(config.supervisor, registry);
  let mode = if args.debug { SessionMode::Debug } else { SessionMode::Interactive };

  let mut snapshot = supervisor.start(&source, mode).await?;
  let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
  let mut printed = 0usize;

  loop {
    let lines: Vec<&str> = snapshot.output.lines().collect();
    for line in lines.iter().skip(printed) {
      println!("{line}");
    }
    printed = lines.len();

    if snapshot.completed {
      if let Some(error) = &snapshot.error {
        eprintln!("{error}");
      }
      break;
    }

    if snapshot.waiting_for_input == Some(true) {
      if let Some(prompt) = &snapshot.prompt {
        print!("{prompt}");
        use std::io::Write as _;
        std::io::stdout().flush().ok();
      }
      let line = stdin_lines.next_line().await?.unwrap_or_default();
      snapshot = supervisor.supply_input(&snapshot.session_id, &line).await?;
      continue;
    }

    if snapshot.waiting_for_debug_step == Some(true) {
      eprintln!(
        "-- line {:?} variables {:?} (press enter to step)",
        snapshot.current_line, snapshot.variables
      );
      let _ = stdin_lines.next_line().await?;
      snapshot = supervisor.supply_input(&snapshot.session_id, "").await?;
      continue;
    }

    snapshot = supervisor.status(&snapshot.session_id).await?;
  }

  Ok(())
}

async fn run_grade(args: GradeArgs) -> Result<()> {
  let source = std::fs::read_to_string(&args.source_path)
    .with_context(|| format!("reading {}", args.source_path.display()))?;
  let test_cases_json = std::fs::read_to_string(&args.test_cases_path)
    .with_context(|| format!("reading {}", args.test_cases_path.display()))?;
  let test_cases: Vec<TestCase> = serde_json::from_str(&test_cases_json)?;

  let config = Config::try_from(&args)?;
  let llm = ReqwestLlmClient::new(config.diagnostics);
  let submissions = LoggingStores::default();
  let cases = FixedTestCases(test_cases);

  let outcome = grader::grade_submission(
    &config.grader,
    &llm,
    &submissions,
    &cases,
    &submissions,
    "local-challenge",
    "local-user",
    &source,
  )
  .await?;

  match outcome {
    GradeOutcome::Graded(result) => {
      println!("{}", serde_json::to_string_pretty(&result)?);
    }
    GradeOutcome::ValidationFailed(failure) => {
      println!("{}", serde_json::to_string_pretty(&failure)?);
    }
  }

  Ok(())
}

/// An in-memory stand-in for the submission/progress stores a real server
/// would back with a database; this harness only needs somewhere to log to.
#[derive(Default)]
struct LoggingStores;

#[async_trait]
impl SubmissionStore for LoggingStores {
  async fn create(&self, challenge_id: &str, user_id: &str, _user_code: &str) -> Result<String, GraderError> {
    tracing::info!(challenge_id, user_id, "submission created");
    Ok(uuid::Uuid::new_v4().to_string())
  }

  async fn update_results(&self, submission_id: &str, status: &str, score: Option<f64>) -> Result<(), GraderError> {
    tracing::info!(submission_id, status, ?score, "submission updated");
    Ok(())
  }
}

#[async_trait]
impl ProgressStore for LoggingStores {
  async fn update_progress(
    &self,
    user_id: &str,
    challenge_id: &str,
    submission_id: &str,
    status: &str,
    score: Option<f64>,
  ) -> Result<(), GraderError> {
    tracing::info!(user_id, challenge_id, submission_id, status, ?score, "progress updated");
    Ok(())
  }
}

struct FixedTestCases(Vec<TestCase>);

#[async_trait]
impl TestCaseStore for FixedTestCases {
  async fn find_by_challenge(&self, _challenge_id: &str) -> Result<Vec<TestCase>, GraderError> {
    Ok(self.0.clone())
  }
}
