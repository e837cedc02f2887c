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

//! Grades one isiXhosa submission against a challenge's test cases: one
//! transpile, then one fresh child process per case, run to completion or
//! timeout, with no state shared between cases.

use crate::config::GraderConfig;
use crate::diagnostics::{self, LlmClient};
use crate::error::GraderError;
use crate::transpiler::{self, TranspileOptions};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write as _;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// One test case as the surrounding collaborator exposes it.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct TestCase {
  pub input_data: Vec<String>,
  pub expected_output: String,
  pub points_weight: f64,
  pub is_hidden: bool,
  pub is_example: bool,
  pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum CaseStatus {
  Passed,
  Failed,
}

/// The outcome of running one test case, before the visible/hidden split.
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
  pub status: CaseStatus,
  pub actual_output: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub english_error: Option<String>,
}

/// The visible-test view: full case content plus its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleTestResult {
  pub input_data: Vec<String>,
  pub expected_output: String,
  pub actual_output: String,
  pub status: CaseStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub english_error: Option<String>,
}

/// The hidden-test view: aggregate counts only, no case content.
#[derive(Debug, Clone, Serialize, Default)]
pub struct HiddenTestSummary {
  pub total: usize,
  pub passed: usize,
  pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResults {
  pub visible_tests: Vec<VisibleTestResult>,
  pub hidden_tests: HiddenTestSummary,
}

/// The full structured result of grading one submission.
#[derive(Debug, Clone, Serialize)]
pub struct GradingResult {
  pub submission_id: String,
  pub status: String,
  pub score: f64,
  pub tests_passed: usize,
  pub tests_total: usize,
  pub test_results: TestResults,
}

/// Returned when transpilation itself fails; grading stops before any case
/// is executed.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
  pub submission_id: String,
  pub english_error: String,
  pub validation_error: String,
}

#[derive(Debug)]
pub enum GradeOutcome {
  Graded(GradingResult),
  ValidationFailed(ValidationFailure),
}

/// Submission persistence, depended on for `create` and `update_results`.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
  async fn create(&self, challenge_id: &str, user_id: &str, user_code: &str) -> Result<String, GraderError>;
  async fn update_results(&self, submission_id: &str, status: &str, score: Option<f64>) -> Result<(), GraderError>;
}

/// Test-case lookup, depended on for `find_by_challenge`.
#[async_trait]
pub trait TestCaseStore: Send + Sync {
  async fn find_by_challenge(&self, challenge_id: &str) -> Result<Vec<TestCase>, GraderError>;
}

/// Per-user, per-challenge progress tracking.
#[async_trait]
pub trait ProgressStore: Send + Sync {
  async fn update_progress(&self, user_id: &str, challenge_id: &str, submission_id: &str, status: &str, score: Option<f64>) -> Result<(), GraderError>;
}

async fn run_case(
  config: &GraderConfig,
  target_source: &str,
  case: &TestCase,
) -> Result<(Option<String>, Option<String>, bool), GraderError> {
  let mut tmp = tempfile::Builder::new()
    .prefix("isipython_case_")
    .suffix(".py")
    .tempfile()
    .map_err(GraderError::TempFile)?;
  tmp.write_all(target_source.as_bytes()).map_err(GraderError::TempFile)?;
  tmp.flush().map_err(GraderError::TempFile)?;

  let mut command = config.interpreter.to_tokio_command(tmp.path());
  command
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

  let mut child = command.spawn().map_err(GraderError::ChildSpawnFailed)?;

  let mut stdin_data = String::new();
  for line in &case.input_data {
    stdin_data.push_str(line);
    stdin_data.push('\n');
  }

  if let Some(mut stdin) = child.stdin.take() {
    let _ = stdin.write_all(stdin_data.as_bytes()).await;
    let _ = stdin.shutdown().await;
  }

  let mut stdout_handle = child.stdout.take();
  let mut stderr_handle = child.stderr.take();

  let wait_result = tokio::time::timeout(config.case_timeout, child.wait()).await;

  let mut stdout = String::new();
  if let Some(stream) = stdout_handle.as_mut() {
    let _ = stream.read_to_string(&mut stdout).await;
  }
  let mut stderr = String::new();
  if let Some(stream) = stderr_handle.as_mut() {
    let _ = stream.read_to_string(&mut stderr).await;
  }

  match wait_result {
    Ok(_) => {
      let error = if stderr.trim().is_empty() { None } else { Some(stderr) };
      Ok((Some(stdout), error, false))
    }
    Err(_) => {
      let _ = child.kill().await;
      Ok((Some(stdout), None, true))
    }
  }
}

async fn execute_single_test(
  config: &GraderConfig,
  llm: &dyn LlmClient,
  target_source: &str,
  line_map: &HashMap<usize, usize>,
  case: &TestCase,
) -> CaseOutcome {
  let (output, stderr, timed_out) = match run_case(config, target_source, case).await {
    Ok(result) => result,
    Err(err) => {
      return CaseOutcome {
        status: CaseStatus::Failed,
        actual_output: String::new(),
        error_message: Some(format!("Impazamo yokuqhuba uvavanyo: {err}")),
        english_error: Some(err.to_string()),
      };
    }
  };

  let partial_output = output.unwrap_or_default().trim().to_string();

  if timed_out {
    return CaseOutcome {
      status: CaseStatus::Failed,
      actual_output: partial_output,
      error_message: Some("Ikhowudi yakho ithathe ixesha elide kakhulu".to_string()),
      english_error: Some("Code took too long to execute".to_string()),
    };
  }

  if let Some(stderr) = stderr {
    let english_error = stderr.clone();
    let translated = diagnostics::translate_error(llm, &stderr, line_map).await;
    return CaseOutcome {
      status: CaseStatus::Failed,
      actual_output: partial_output,
      error_message: Some(translated),
      english_error: Some(english_error),
    };
  }

  let expected = case.expected_output.trim();
  if partial_output == expected {
    CaseOutcome {
      status: CaseStatus::Passed,
      actual_output: partial_output,
      error_message: None,
      english_error: None,
    }
  } else {
    CaseOutcome {
      status: CaseStatus::Failed,
      actual_output: partial_output,
      error_message: None,
      english_error: None,
    }
  }
}

/// Grades `user_code` against `challenge_id`'s test cases, recording the
/// submission and the student's per-challenge progress as it goes.
pub async fn grade_submission(
  config: &GraderConfig,
  llm: &dyn LlmClient,
  submissions: &dyn SubmissionStore,
  test_cases: &dyn TestCaseStore,
  progress: &dyn ProgressStore,
  challenge_id: &str,
  user_id: &str,
  user_code: &str,
) -> Result<GradeOutcome, GraderError> {
  let submission_id = submissions.create(challenge_id, user_id, user_code).await?;

  let cases = test_cases.find_by_challenge(challenge_id).await?;
  if cases.is_empty() {
    return Err(GraderError::NoTestCases(challenge_id.to_string()));
  }

  let artifact = match transpiler::transpile(
    user_code,
    TranspileOptions {
      debug: false,
      challenge: true,
    },
  ) {
    Ok(artifact) => artifact,
    Err(err) => {
      submissions.update_results(&submission_id, "error", None).await?;
      progress
        .update_progress(user_id, challenge_id, &submission_id, "error", None)
        .await?;
      let english_error = err.to_string();
      let validation_error = diagnostics::translate_error(llm, &english_error, &HashMap::new()).await;
      return Ok(GradeOutcome::ValidationFailed(ValidationFailure {
        submission_id,
        english_error,
        validation_error,
      }));
    }
  };

  let line_map: HashMap<usize, usize> = artifact
    .line_map
    .iter()
    .enumerate()
    .map(|(target_idx, &source_line)| (target_idx + 1, source_line))
    .collect();

  let mut visible_tests = Vec::new();
  let mut hidden_tests = HiddenTestSummary::default();
  let mut tests_passed = 0usize;
  let tests_total = cases.len();
  let mut score = 0.0;

  for case in &cases {
    let outcome = execute_single_test(config, llm, &artifact.target_source, &line_map, case).await;

    if outcome.status == CaseStatus::Passed {
      tests_passed += 1;
      score += case.points_weight;
    }

    if case.is_hidden {
      hidden_tests.total += 1;
      match outcome.status {
        CaseStatus::Passed => hidden_tests.passed += 1,
        CaseStatus::Failed => hidden_tests.failed += 1,
      }
    } else {
      visible_tests.push(VisibleTestResult {
        input_data: case.input_data.clone(),
        expected_output: case.expected_output.clone(),
        actual_output: outcome.actual_output,
        status: outcome.status,
        explanation: case.explanation.clone(),
        error_message: outcome.error_message,
        english_error: outcome.english_error,
      });
    }
  }

  let overall_status = if tests_passed == tests_total { "passed" } else { "failed" };

  submissions.update_results(&submission_id, overall_status, Some(score)).await?;
  progress
    .update_progress(user_id, challenge_id, &submission_id, overall_status, Some(score))
    .await?;

  Ok(GradeOutcome::Graded(GradingResult {
    submission_id,
    status: overall_status.to_string(),
    score,
    tests_passed,
    tests_total,
    test_results: TestResults {
      visible_tests,
      hidden_tests,
    },
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::command::CommandArgs;
  use std::path::PathBuf;
  use std::sync::Mutex as StdMutex;

  struct FakeLlm;

  #[async_trait]
  impl LlmClient for FakeLlm {
    async fn complete(&self, _system_prompt: &str, _user_message: &str) -> Result<String, crate::error::DiagnosticError> {
      Ok("Kukho impazamo.".to_string())
    }
  }

  #[derive(Default)]
  struct FakeStores {
    updates: StdMutex<Vec<(String, Option<f64>)>>,
  }

  #[async_trait]
  impl SubmissionStore for FakeStores {
    async fn create(&self, _challenge_id: &str, _user_id: &str, _user_code: &str) -> Result<String, GraderError> {
      Ok("submission-1".to_string())
    }

    async fn update_results(&self, _submission_id: &str, status: &str, score: Option<f64>) -> Result<(), GraderError> {
      self.updates.lock().unwrap().push((status.to_string(), score));
      Ok(())
    }
  }

  #[async_trait]
  impl ProgressStore for FakeStores {
    async fn update_progress(
      &self,
      _user_id: &str,
      _challenge_id: &str,
      _submission_id: &str,
      _status: &str,
      _score: Option<f64>,
    ) -> Result<(), GraderError> {
      Ok(())
    }
  }

  struct FixedCases(Vec<TestCase>);

  #[async_trait]
  impl TestCaseStore for FixedCases {
    async fn find_by_challenge(&self, _challenge_id: &str) -> Result<Vec<TestCase>, GraderError> {
      Ok(self.0.clone())
    }
  }

  fn sh_grader_config() -> GraderConfig {
    GraderConfig {
      case_timeout: Duration::from_secs(5),
      interpreter: CommandArgs {
        command: PathBuf::from("/bin/sh"),
        args: vec![],
      },
    }
  }

  #[tokio::test]
  async fn valid_submission_grades_every_case_exactly_once() {
    let config = sh_grader_config();
    let llm = FakeLlm;
    let stores = FakeStores::default();
    let cases = FixedCases(vec![
      TestCase {
        input_data: vec!["Thandi".to_string()],
        expected_output: "Molo, Thandi".to_string(),
        points_weight: 5.0,
        is_hidden: false,
        is_example: true,
        explanation: None,
      },
      TestCase {
        input_data: vec!["Sipho".to_string()],
        expected_output: "Molo, Sipho".to_string(),
        points_weight: 5.0,
        is_hidden: true,
        is_example: false,
        explanation: None,
      },
    ]);

    let outcome = grade_submission(
      &config,
      &llm,
      &stores,
      &cases,
      &stores,
      "challenge-1",
      "user-1",
      "igama = input(\"Igama: \")",
    )
    .await
    .unwrap();

    match outcome {
      GradeOutcome::Graded(result) => {
        assert_eq!(result.tests_total, 2);
        assert_eq!(result.test_results.visible_tests.len(), 1);
        assert_eq!(result.test_results.hidden_tests.total, 1);
      }
      GradeOutcome::ValidationFailed(failure) => panic!("expected a graded outcome, got {failure:?}"),
    }
  }

  #[tokio::test]
  async fn foreign_keyword_short_circuits_into_validation_failure() {
    let config = sh_grader_config();
    let llm = FakeLlm;
    let stores = FakeStores::default();
    let cases = FixedCases(vec![TestCase {
      input_data: vec![],
      expected_output: String::new(),
      points_weight: 1.0,
      is_hidden: false,
      is_example: true,
      explanation: None,
    }]);

    let outcome = grade_submission(
      &config,
      &llm,
      &stores,
      &cases,
      &stores,
      "challenge-1",
      "user-1",
      "import math",
    )
    .await
    .unwrap();

    match outcome {
      GradeOutcome::ValidationFailed(failure) => {
        assert!(failure.english_error.contains("import"));
      }
      GradeOutcome::Graded(_) => panic!("expected a validation failure"),
    }
  }

  #[tokio::test]
  async fn no_test_cases_is_an_error() {
    let config = sh_grader_config();
    let llm = FakeLlm;
    let stores = FakeStores::default();
    let cases = FixedCases(vec![]);

    let err = grade_submission(
      &config,
      &llm,
      &stores,
      &cases,
      &stores,
      "challenge-1",
      "user-1",
      "buyisela 1",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, GraderError::NoTestCases(_)));
  }
}
