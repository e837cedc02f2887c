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

//! The interactive session supervisor: one child interpreter per session,
//! two stream monitors, and a lazily-evaluated state classification run on
//! every observation.

use crate::config::SupervisorConfig;
use crate::error::SessionError;
use crate::transpiler::{self, LineMap, TranspileOptions};
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::io::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

const DEBUG_TAG_PREFIX: &str = "D-D-D:";
const DEBUG_STEP_LINE: &str = "D-D-D:STEP";
const DEBUG_LINE_PREFIX: &str = "D-D-D:LINE:";
const DEBUG_VARS_PREFIX: &str = "D-D-D:VARS:";
const TIMEOUT_SENTINEL: &str = "[Timeout]";

/// The two ways a session may be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
  Interactive,
  Debug,
}

#[derive(Debug, Clone)]
struct TerminalInfo {
  error: Option<String>,
  code: Option<String>,
}

struct SessionInner {
  output: VecDeque<String>,
  errors: VecDeque<String>,
  prompt: Option<String>,
  last_activity: Instant,
  terminal: Option<TerminalInfo>,
}

impl SessionInner {
  fn push_output(&mut self, line: String, cap: usize) {
    self.output.push_back(line);
    while self.output.len() > cap {
      self.output.pop_front();
    }
  }

  fn push_error(&mut self, line: String, cap: usize) {
    self.errors.push_back(line);
    while self.errors.len() > cap {
      self.errors.pop_front();
    }
  }

  fn filtered_output(&self) -> String {
    self
      .output
      .iter()
      .filter(|line| !line.starts_with(DEBUG_TAG_PREFIX))
      .cloned()
      .collect::<Vec<_>>()
      .join("\n")
  }

  fn joined_errors(&self) -> Option<String> {
    if self.errors.is_empty() {
      None
    } else {
      Some(self.errors.iter().cloned().collect::<Vec<_>>().join("\n"))
    }
  }
}

/// One running (or just-finished) execution session.
pub struct Session {
  id: String,
  config: SupervisorConfig,
  original_source: String,
  line_map: LineMap,
  tempfile: Mutex<Option<tempfile::NamedTempFile>>,
  child: Mutex<Option<Child>>,
  stdin: Mutex<Option<ChildStdin>>,
  monitors: Mutex<Option<(JoinHandle<()>, JoinHandle<()>)>>,
  inner: Arc<Mutex<SessionInner>>,
}

impl Session {
  pub fn id(&self) -> &str {
    &self.id
  }

  /// Builds an inert, already-terminal session. Only used to exercise the
  /// registry without spawning a real child process.
  #[cfg(test)]
  pub fn new_for_test(id: String, config: SupervisorConfig) -> Self {
    Self {
      id,
      config,
      original_source: String::new(),
      line_map: Vec::new(),
      tempfile: Mutex::new(None),
      child: Mutex::new(None),
      stdin: Mutex::new(None),
      monitors: Mutex::new(None),
      inner: Arc::new(Mutex::new(SessionInner {
        output: VecDeque::new(),
        errors: VecDeque::new(),
        prompt: None,
        last_activity: Instant::now(),
        terminal: Some(TerminalInfo { error: None, code: None }),
      })),
    }
  }
}

/// The wire-format snapshot returned by every supervisor operation.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
  pub session_id: String,
  pub completed: bool,
  pub output: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub waiting_for_input: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prompt: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub waiting_for_debug_step: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub current_line: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variables: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line_mapping: Option<LineMap>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code: Option<String>,
}

async fn monitor_stdout(stream: ChildStdout, inner: Arc<Mutex<SessionInner>>, cap: usize) {
  let mut lines = BufReader::new(stream).lines();
  loop {
    match lines.next_line().await {
      Ok(Some(line)) => {
        let mut guard = inner.lock().await;
        if let Some(prompt) = line.strip_prefix(">>>") {
          guard.prompt = Some(prompt.to_string());
          guard.push_output(prompt.to_string(), cap);
        } else {
          guard.push_output(line, cap);
        }
      }
      Ok(None) => break,
      Err(err) => {
        tracing::warn!(error = %err, "stdout monitor I/O error");
        break;
      }
    }
  }
}

async fn monitor_stderr(stream: ChildStderr, inner: Arc<Mutex<SessionInner>>, cap: usize) {
  let mut lines = BufReader::new(stream).lines();
  loop {
    match lines.next_line().await {
      Ok(Some(line)) => {
        let mut guard = inner.lock().await;
        guard.push_error(line, cap);
      }
      Ok(None) => break,
      Err(err) => {
        tracing::warn!(error = %err, "stderr monitor I/O error");
        break;
      }
    }
  }
}

fn decode_debug_markers(output: &VecDeque<String>) -> (Option<usize>, Option<Value>) {
  let mut line = None;
  let mut vars = None;
  for entry in output.iter().rev() {
    if line.is_none() {
      if let Some(n) = entry.strip_prefix(DEBUG_LINE_PREFIX) {
        line = n.trim().parse::<usize>().ok();
      }
    }
    if vars.is_none() {
      if let Some(raw) = entry.strip_prefix(DEBUG_VARS_PREFIX) {
        vars = Some(parse_locals_repr(raw));
      }
    }
    if line.is_some() && vars.is_some() {
      break;
    }
  }
  (line, vars)
}

/// Parses the `str({...})` rendering of the instrumented locals dict
/// emitted by `D-D-D:VARS:`. Only the types the instrumentation itself
/// admits (int, float, str, bool, list, dict, None) are handled.
fn parse_locals_repr(raw: &str) -> Value {
  let chars: Vec<char> = raw.trim().chars().collect();
  let mut pos = 0;
  parse_py_value(&chars, &mut pos).unwrap_or(Value::Null)
}

fn skip_ws(chars: &[char], pos: &mut usize) {
  while *pos < chars.len() && chars[*pos].is_whitespace() {
    *pos += 1;
  }
}

fn parse_py_value(chars: &[char], pos: &mut usize) -> Option<Value> {
  skip_ws(chars, pos);
  match chars.get(*pos)? {
    '{' => parse_py_dict(chars, pos),
    '[' => parse_py_list(chars, pos),
    '\'' | '"' => parse_py_string(chars, pos).map(Value::String),
    _ => parse_py_atom(chars, pos),
  }
}

fn parse_py_string(chars: &[char], pos: &mut usize) -> Option<String> {
  let quote = chars[*pos];
  *pos += 1;
  let mut out = String::new();
  while *pos < chars.len() {
    let c = chars[*pos];
    if c == '\\' && *pos + 1 < chars.len() {
      out.push(chars[*pos + 1]);
      *pos += 2;
      continue;
    }
    if c == quote {
      *pos += 1;
      return Some(out);
    }
    out.push(c);
    *pos += 1;
  }
  None
}

fn parse_py_atom(chars: &[char], pos: &mut usize) -> Option<Value> {
  let start = *pos;
  while *pos < chars.len() && !matches!(chars[*pos], ',' | ':' | '}' | ']') {
    *pos += 1;
  }
  let token: String = chars[start..*pos].iter().collect();
  let token = token.trim();
  match token {
    "True" => Some(Value::Bool(true)),
    "False" => Some(Value::Bool(false)),
    "None" => Some(Value::Null),
    _ => {
      if let Ok(i) = token.parse::<i64>() {
        Some(Value::from(i))
      } else if let Ok(f) = token.parse::<f64>() {
        serde_json::Number::from_f64(f).map(Value::Number)
      } else {
        Some(Value::String(token.to_string()))
      }
    }
  }
}

fn parse_py_list(chars: &[char], pos: &mut usize) -> Option<Value> {
  *pos += 1; // '['
  let mut items = Vec::new();
  skip_ws(chars, pos);
  if chars.get(*pos) == Some(&']') {
    *pos += 1;
    return Some(Value::Array(items));
  }
  loop {
    let value = parse_py_value(chars, pos)?;
    items.push(value);
    skip_ws(chars, pos);
    match chars.get(*pos) {
      Some(',') => {
        *pos += 1;
        skip_ws(chars, pos);
      }
      Some(']') => {
        *pos += 1;
        break;
      }
      _ => return None,
    }
  }
  Some(Value::Array(items))
}

fn parse_py_dict(chars: &[char], pos: &mut usize) -> Option<Value> {
  *pos += 1; // '{'
  let mut map = serde_json::Map::new();
  skip_ws(chars, pos);
  if chars.get(*pos) == Some(&'}') {
    *pos += 1;
    return Some(Value::Object(map));
  }
  loop {
    skip_ws(chars, pos);
    let key = match chars.get(*pos) {
      Some('\'') | Some('"') => parse_py_string(chars, pos)?,
      _ => {
        let value = parse_py_atom(chars, pos)?;
        value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string())
      }
    };
    skip_ws(chars, pos);
    if chars.get(*pos) != Some(&':') {
      return None;
    }
    *pos += 1;
    let value = parse_py_value(chars, pos)?;
    map.insert(key, value);
    skip_ws(chars, pos);
    match chars.get(*pos) {
      Some(',') => {
        *pos += 1;
      }
      Some('}') => {
        *pos += 1;
        break;
      }
      _ => return None,
    }
  }
  Some(Value::Object(map))
}

fn build_terminal_snapshot(session: &Session, inner: &SessionInner, info: &TerminalInfo) -> StatusSnapshot {
  StatusSnapshot {
    session_id: session.id.clone(),
    completed: true,
    output: inner.filtered_output(),
    waiting_for_input: None,
    prompt: None,
    waiting_for_debug_step: None,
    current_line: None,
    variables: None,
    error: info.error.clone(),
    line_mapping: Some(session.line_map.clone()),
    code: info.code.clone(),
  }
}

/// Runs state classification (spec §4.D) and produces the snapshot for this
/// observation. Does not touch the registry; callers deregister on
/// `completed == true`.
async fn snapshot(session: &Session) -> StatusSnapshot {
  {
    let inner = session.inner.lock().await;
    if let Some(info) = &inner.terminal {
      return build_terminal_snapshot(session, &inner, info);
    }
  }

  let exited = {
    let mut child_guard = session.child.lock().await;
    match child_guard.as_mut() {
      Some(child) => matches!(child.try_wait(), Ok(Some(_))),
      None => true,
    }
  };

  if exited {
    if let Some((stdout_task, stderr_task)) = session.monitors.lock().await.take() {
      let _ = stdout_task.await;
      let _ = stderr_task.await;
    }
    session.tempfile.lock().await.take();

    let mut inner = session.inner.lock().await;
    let info = TerminalInfo {
      error: inner.joined_errors(),
      code: None,
    };
    inner.terminal = Some(info.clone());
    return build_terminal_snapshot(session, &inner, &info);
  }

  let mut inner = session.inner.lock().await;

  if inner.output.back().map(String::as_str) == Some(DEBUG_STEP_LINE) {
    let (current_line, variables) = decode_debug_markers(&inner.output);
    return StatusSnapshot {
      session_id: session.id.clone(),
      completed: false,
      output: inner.filtered_output(),
      waiting_for_input: None,
      prompt: None,
      waiting_for_debug_step: Some(true),
      current_line,
      variables,
      error: None,
      line_mapping: None,
      code: None,
    };
  }

  if let Some(prompt) = inner.prompt.clone() {
    if !prompt.is_empty() && inner.output.back().map(String::as_str) == Some(prompt.as_str()) {
      return StatusSnapshot {
        session_id: session.id.clone(),
        completed: false,
        output: inner.filtered_output(),
        waiting_for_input: Some(true),
        prompt: Some(prompt),
        waiting_for_debug_step: None,
        current_line: None,
        variables: None,
        error: None,
        line_mapping: None,
        code: None,
      };
    }
  }

  if inner.last_activity.elapsed() > session.config.idle_budget {
    drop(inner);

    if let Some((stdout_task, stderr_task)) = session.monitors.lock().await.take() {
      stdout_task.abort();
      stderr_task.abort();
    }
    if let Some(mut child) = session.child.lock().await.take() {
      let _ = child.kill().await;
    }
    session.tempfile.lock().await.take();

    let mut inner = session.inner.lock().await;
    let info = TerminalInfo {
      error: Some(TIMEOUT_SENTINEL.to_string()),
      code: Some(session.original_source.clone()),
    };
    inner.terminal = Some(info.clone());
    return build_terminal_snapshot(session, &inner, &info);
  }

  StatusSnapshot {
    session_id: session.id.clone(),
    completed: false,
    output: inner.filtered_output(),
    waiting_for_input: None,
    prompt: None,
    waiting_for_debug_step: None,
    current_line: None,
    variables: None,
    error: None,
    line_mapping: None,
    code: None,
  }
}

/// Owns the session registry and drives every session's lifecycle.
pub struct Supervisor {
  config: SupervisorConfig,
  registry: Arc<crate::registry::SessionRegistry>,
}

impl Supervisor {
  pub fn new(config: SupervisorConfig, registry: Arc<crate::registry::SessionRegistry>) -> Self {
    Self { config, registry }
  }

  /// Transpiles `source` and starts a fresh session.
  #[tracing::instrument(skip(self, source))]
  pub async fn start(&self, source: &str, mode: SessionMode) -> Result<StatusSnapshot, SessionError> {
    let artifact = transpiler::transpile(
      source,
      TranspileOptions {
        debug: mode == SessionMode::Debug,
        challenge: false,
      },
    )?;
    self.start_with_target(source, &artifact.target_source, artifact.line_map).await
  }

  /// Starts a session from already-built target source, bypassing the
  /// transpiler. Exists so lifecycle behavior can be tested against a
  /// substitute interpreter without a real isiXhosa-to-Python pipeline.
  pub async fn start_with_target(
    &self,
    original_source: &str,
    target_source: &str,
    line_map: LineMap,
  ) -> Result<StatusSnapshot, SessionError> {
    let id = Uuid::new_v4().to_string();

    let mut tmp = tempfile::Builder::new()
      .prefix(&format!("isipython_{id}_"))
      .suffix(".py")
      .tempfile()
      .map_err(SessionError::TempFile)?;
    tmp.write_all(target_source.as_bytes()).map_err(SessionError::TempFile)?;
    tmp.flush().map_err(SessionError::TempFile)?;
    let path = tmp.path().to_path_buf();

    let mut command = self.config.interpreter.to_tokio_command(&path);
    command
      .stdin(std::process::Stdio::piped())
      .stdout(std::process::Stdio::piped())
      .stderr(std::process::Stdio::piped())
      .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| SessionError::ChildSpawnFailed {
      interpreter: self.config.interpreter.command.clone(),
      source,
    })?;

    let stdin = child.stdin.take().expect("stdin was piped");
    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    let inner = Arc::new(Mutex::new(SessionInner {
      output: VecDeque::new(),
      errors: VecDeque::new(),
      prompt: None,
      last_activity: Instant::now(),
      terminal: None,
    }));

    let cap = self.config.output_buffer_capacity;
    let stdout_handle = tokio::spawn(
      monitor_stdout(stdout, inner.clone(), cap)
        .instrument(tracing::info_span!("stdout_monitor", session_id = %id)),
    );
    let stderr_handle = tokio::spawn(
      monitor_stderr(stderr, inner.clone(), cap)
        .instrument(tracing::info_span!("stderr_monitor", session_id = %id)),
    );

    let session = Arc::new(Session {
      id: id.clone(),
      config: self.config.clone(),
      original_source: original_source.to_string(),
      line_map,
      tempfile: Mutex::new(Some(tmp)),
      child: Mutex::new(Some(child)),
      stdin: Mutex::new(Some(stdin)),
      monitors: Mutex::new(Some((stdout_handle, stderr_handle))),
      inner,
    });

    self.registry.insert(session.clone()).await;
    Ok(self.observe(&session).await)
  }

  pub async fn status(&self, id: &str) -> Result<StatusSnapshot, SessionError> {
    let session = self.session(id).await?;
    Ok(self.observe(&session).await)
  }

  pub async fn supply_input(&self, id: &str, line: &str) -> Result<StatusSnapshot, SessionError> {
    let session = self.session(id).await?;

    {
      let inner = session.inner.lock().await;
      if inner.terminal.is_some() {
        return Err(SessionError::ProcessNotRunning(id.to_string()));
      }
    }

    {
      let mut stdin_guard = session.stdin.lock().await;
      let stdin = stdin_guard
        .as_mut()
        .ok_or_else(|| SessionError::ProcessNotRunning(id.to_string()))?;
      stdin
        .write_all(line.as_bytes())
        .await
        .map_err(|e| SessionError::StdinWrite(id.to_string(), e))?;
      stdin
        .write_all(b"\n")
        .await
        .map_err(|e| SessionError::StdinWrite(id.to_string(), e))?;
      stdin
        .flush()
        .await
        .map_err(|e| SessionError::StdinWrite(id.to_string(), e))?;
    }

    {
      let mut inner = session.inner.lock().await;
      inner.prompt = None;
      inner.last_activity = Instant::now();
    }

    tokio::time::sleep(session.config.input_settle_delay).await;
    Ok(self.observe(&session).await)
  }

  pub async fn kill(&self, id: &str) -> Result<(), SessionError> {
    let session = self.session(id).await?;

    let already_terminal = session.inner.lock().await.terminal.is_some();
    if !already_terminal {
      if let Some((stdout_task, stderr_task)) = session.monitors.lock().await.take() {
        stdout_task.abort();
        stderr_task.abort();
      }
      if let Some(mut child) = session.child.lock().await.take() {
        let _ = child.kill().await;
      }
      session.tempfile.lock().await.take();

      let mut inner = session.inner.lock().await;
      inner.terminal = Some(TerminalInfo { error: None, code: None });
    }

    self.registry.remove(id).await;
    Ok(())
  }

  async fn session(&self, id: &str) -> Result<Arc<Session>, SessionError> {
    self
      .registry
      .get(id)
      .await
      .ok_or_else(|| SessionError::SessionMissing(id.to_string()))
  }

  async fn observe(&self, session: &Arc<Session>) -> StatusSnapshot {
    let snap = snapshot(session).await;
    if snap.completed {
      self.registry.remove(&snap.session_id).await;
    }
    snap
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::command::CommandArgs;
  use crate::registry::SessionRegistry;
  use std::path::PathBuf;

  fn sh_supervisor(idle_budget: Duration) -> Supervisor {
    let config = SupervisorConfig {
      idle_budget,
      output_buffer_capacity: 100,
      input_settle_delay: Duration::from_millis(50),
      interpreter: CommandArgs {
        command: PathBuf::from("/bin/sh"),
        args: vec![],
      },
    };
    Supervisor::new(config, Arc::new(SessionRegistry::new()))
  }

  async fn poll_until_completed(supervisor: &Supervisor, id: &str, attempts: usize) -> StatusSnapshot {
    let mut snap = supervisor.status(id).await.unwrap();
    let mut remaining = attempts;
    while !snap.completed && remaining > 0 {
      tokio::time::sleep(Duration::from_millis(50)).await;
      snap = supervisor.status(id).await.unwrap();
      remaining -= 1;
    }
    snap
  }

  #[tokio::test]
  async fn plain_output_runs_to_completion() {
    let supervisor = sh_supervisor(Duration::from_secs(10));
    let initial = supervisor
      .start_with_target("molo", "echo Molo", vec![1])
      .await
      .unwrap();

    let final_snapshot = poll_until_completed(&supervisor, &initial.session_id, 40).await;
    assert!(final_snapshot.completed);
    assert_eq!(final_snapshot.output, "Molo");
    assert!(final_snapshot.error.is_none());
  }

  #[tokio::test]
  async fn interactive_prompt_then_input_completes_session() {
    let supervisor = sh_supervisor(Duration::from_secs(10));
    let script = "echo '>>>Igama: '\nread name\necho \"Molo, $name\"\n";
    let initial = supervisor
      .start_with_target("igama = input(\"Igama: \")", script, vec![1, 1, 2])
      .await
      .unwrap();

    let mut waiting = initial;
    for _ in 0..40 {
      if waiting.waiting_for_input == Some(true) {
        break;
      }
      tokio::time::sleep(Duration::from_millis(30)).await;
      waiting = supervisor.status(&waiting.session_id).await.unwrap();
    }
    assert_eq!(waiting.waiting_for_input, Some(true));
    assert_eq!(waiting.prompt.as_deref(), Some("Igama: "));

    let after_input = supervisor.supply_input(&waiting.session_id, "Thandi").await.unwrap();
    let final_snapshot = poll_until_completed(&supervisor, &after_input.session_id, 40).await;

    assert!(final_snapshot.completed);
    assert!(final_snapshot.output.contains("Molo, Thandi"));
  }

  #[tokio::test]
  async fn debug_steps_decode_line_and_variables() {
    let supervisor = sh_supervisor(Duration::from_secs(10));
    let script = concat!(
      "echo 'D-D-D:LINE:1'\n",
      "echo 'D-D-D:VARS:{}'\n",
      "echo 'D-D-D:STEP'\n",
      "read _\n",
      "echo 'D-D-D:LINE:2'\n",
      "echo \"D-D-D:VARS:{'x': 1}\"\n",
      "echo 'D-D-D:STEP'\n",
      "read _\n",
      "echo done\n",
    );
    let initial = supervisor
      .start_with_target("x = 1", script, vec![1, 1, 1, 1, 2, 2, 2, 2])
      .await
      .unwrap();

    let mut step = initial;
    for _ in 0..40 {
      if step.waiting_for_debug_step == Some(true) {
        break;
      }
      tokio::time::sleep(Duration::from_millis(30)).await;
      step = supervisor.status(&step.session_id).await.unwrap();
    }
    assert_eq!(step.waiting_for_debug_step, Some(true));
    assert_eq!(step.current_line, Some(1));

    let after_step_one = supervisor.supply_input(&step.session_id, "").await.unwrap();
    let mut step_two = after_step_one;
    for _ in 0..40 {
      if step_two.waiting_for_debug_step == Some(true) && step_two.current_line == Some(2) {
        break;
      }
      tokio::time::sleep(Duration::from_millis(30)).await;
      step_two = supervisor.status(&step_two.session_id).await.unwrap();
    }
    assert_eq!(step_two.current_line, Some(2));
    assert_eq!(step_two.variables, Some(serde_json::json!({"x": 1})));

    let after_step_two = supervisor.supply_input(&step_two.session_id, "").await.unwrap();
    let final_snapshot = poll_until_completed(&supervisor, &after_step_two.session_id, 40).await;
    assert!(final_snapshot.completed);
  }

  #[tokio::test]
  async fn idle_session_is_killed_with_timeout_sentinel() {
    let supervisor = sh_supervisor(Duration::from_millis(80));
    let initial = supervisor
      .start_with_target("ngelixa Inyaniso: dlula", "while true; do sleep 1; done", vec![1])
      .await
      .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    let snap = supervisor.status(&initial.session_id).await.unwrap();

    assert!(snap.completed);
    assert_eq!(snap.error.as_deref(), Some("[Timeout]"));
    assert_eq!(snap.code.as_deref(), Some("ngelixa Inyaniso: dlula"));
  }

  #[tokio::test]
  async fn kill_deregisters_a_running_session() {
    let supervisor = sh_supervisor(Duration::from_secs(10));
    let initial = supervisor
      .start_with_target("zama", "while true; do sleep 1; done", vec![1])
      .await
      .unwrap();

    supervisor.kill(&initial.session_id).await.unwrap();
    let err = supervisor.status(&initial.session_id).await.unwrap_err();
    assert!(matches!(err, SessionError::SessionMissing(_)));
  }

  #[tokio::test]
  async fn status_of_unknown_session_fails() {
    let supervisor = sh_supervisor(Duration::from_secs(10));
    let err = supervisor.status("does-not-exist").await.unwrap_err();
    assert!(matches!(err, SessionError::SessionMissing(_)));
  }
}
