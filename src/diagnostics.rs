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

//! Turns a raw interpreter diagnostic (or, on an idle-budget kill, the
//! original source) into a short isiXhosa explanation for the student.
//!
//! The remapping step and both translate functions are pure with respect to
//! the network; only [`ReqwestLlmClient::complete`] performs I/O, and it sits
//! behind the [`LlmClient`] trait so the rest of this module is testable
//! with a fake.

use crate::config::DiagnosticsConfig;
use crate::error::DiagnosticError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const ERROR_SYSTEM_PROMPT: &str = r#"You are a helpful assistant that explains Python errors to students using clear, accurate, beginner-friendly isiXhosa.

These students write IsiPython, isiXhosa source that is translated to Python before it runs. When you name a programming keyword, always use its isiXhosa equivalent, never the English Python keyword.

KEYWORD MAPPINGS (Python -> isiXhosa): import->ngenisa, from->ukusuka, if->ukuba, while->ngelixa, def->chaza, for->ngokulandelelana, else->enye, elif->okanye_ukuba, and->kwaye, or->okanye, not->hayi, True->Inyaniso, False->Ubuxoki, None->Akukho, break->yekisa, continue->qhubeka, return->buyisela, try->zama, except->ngaphandle, finally->ekugqibeleni, with->nge, as->njenge, class->iklasi, pass->dlula, raise->phakamisa, in->ngaphakathi, is->ngu.

RULES: isiXhosa only; short (1-2 sentences); always name the line number; never guess a cause the message doesn't support; explain any technical term you use in simple isiXhosa; encouraging tone, focused on what to do next.

Respond with only the isiXhosa translation."#;

const TIMEOUT_SYSTEM_PROMPT: &str = r#"You are a programming tutor who explains timeout errors to isiXhosa-speaking first-year computer science students in clear, beginner-friendly isiXhosa.

These students write IsiPython, isiXhosa source translated to Python before it runs. Always name programming keywords by their isiXhosa equivalent.

KEYWORD MAPPINGS (Python -> isiXhosa): import->ngenisa, from->ukusuka, if->ukuba, while->ngelixa, def->chaza, for->ngokulandelelana, else->enye, elif->okanye_ukuba, and->kwaye, or->okanye, not->hayi, True->Inyaniso, False->Ubuxoki, None->Akukho, break->yekisa, continue->qhubeka, return->buyisela, try->zama, except->ngaphandle, finally->ekugqibeleni, with->nge, as->njenge, class->iklasi, pass->dlula, raise->phakamisa, in->ngaphakathi, is->ngu.

Look for: a `ngelixa Inyaniso:` loop with no `yekisa`, a counter that never changes, a condition that moves the wrong way, or deeply nested loops over large ranges.

RULES: isiXhosa only; 2-3 sentences; name a specific line when you are certain; be concrete about the fix, not just the symptom; encouraging tone.

Respond with only the isiXhosa explanation."#;

const TIMEOUT_FALLBACK: &str =
  "Ikhowudi yakho ithathe ixesha elide kakhulu. Khangela imijikelo engapheliyo okanye iindawo kwikhowudi yakho ezithatha ixesha elide.";

fn translation_fallback(reason: &str) -> String {
  format!("Impazamo: Ayikwazanga ukuguqulela le ngxelo ({reason})")
}

/// One turn of a chat-style completion request: a system prompt plus a
/// single user message, answered with a single text response.
#[async_trait]
pub trait LlmClient: Send + Sync {
  async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, DiagnosticError>;
}

/// Converts `line <n>` references in a Python traceback into the
/// corresponding source-line numbers, using the transpiler's line map.
/// Unmapped numbers are left unchanged.
pub fn remap_line_numbers(message: &str, line_map: &HashMap<usize, usize>) -> String {
  if line_map.is_empty() {
    return message.to_string();
  }

  let bytes = message.as_bytes();
  let mut out = String::with_capacity(message.len());
  let mut i = 0;

  while i < bytes.len() {
    if message[i..].starts_with("line ") {
      let digits_start = i + 5;
      let mut j = digits_start;
      while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
      }
      if j > digits_start {
        let target_line: usize = message[digits_start..j].parse().unwrap();
        let source_line = line_map.get(&target_line).copied().unwrap_or(target_line);
        out.push_str("line ");
        out.push_str(&source_line.to_string());
        i = j;
        continue;
      }
    }
    let ch = message[i..].chars().next().unwrap();
    out.push(ch);
    i += ch.len_utf8();
  }

  out
}

/// Translates a raw interpreter stderr capture into isiXhosa, remapping
/// line numbers first.
pub async fn translate_error(
  client: &dyn LlmClient,
  stderr_output: &str,
  line_map: &HashMap<usize, usize>,
) -> String {
  let remapped = remap_line_numbers(stderr_output, line_map);
  match client.complete(ERROR_SYSTEM_PROMPT, &remapped).await {
    Ok(text) => text.trim().to_string(),
    Err(err) => translation_fallback(&err.to_string()),
  }
}

/// Translates an idle-budget kill into a loop/slow-code diagnosis, given
/// the student's original isiXhosa source.
pub async fn translate_timeout(client: &dyn LlmClient, original_source: &str) -> String {
  let prompt = format!("STUDENT CODE:\n{original_source}");
  match client.complete(TIMEOUT_SYSTEM_PROMPT, &prompt).await {
    Ok(text) => text.trim().to_string(),
    Err(_) => TIMEOUT_FALLBACK.to_string(),
  }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
  model: &'a str,
  max_tokens: u32,
  temperature: f32,
  system: &'a str,
  messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
  content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
  text: String,
}

/// Talks to an Anthropic-shaped messages endpoint over HTTP.
pub struct ReqwestLlmClient {
  http: reqwest::Client,
  config: DiagnosticsConfig,
}

impl ReqwestLlmClient {
  pub fn new(config: DiagnosticsConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      config,
    }
  }
}

#[async_trait]
impl LlmClient for ReqwestLlmClient {
  async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, DiagnosticError> {
    let api_key = self
      .config
      .api_key
      .as_deref()
      .ok_or_else(|| DiagnosticError::Request("no API key configured".to_string()))?;

    let body = AnthropicRequest {
      model: &self.config.model,
      max_tokens: 1024,
      temperature: 0.2,
      system: system_prompt,
      messages: vec![AnthropicMessage {
        role: "user",
        content: user_message,
      }],
    };

    let response = self
      .http
      .post(&self.config.base_url)
      .header("x-api-key", api_key)
      .header("anthropic-version", "2023-06-01")
      .json(&body)
      .send()
      .await
      .map_err(|e| DiagnosticError::Request(e.to_string()))?;

    let parsed: AnthropicResponse = response
      .error_for_status()
      .map_err(|e| DiagnosticError::Request(e.to_string()))?
      .json()
      .await
      .map_err(|e| DiagnosticError::Request(e.to_string()))?;

    parsed
      .content
      .into_iter()
      .next()
      .map(|block| block.text)
      .ok_or(DiagnosticError::MalformedResponse)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct FixedClient(&'static str);

  #[async_trait]
  impl LlmClient for FixedClient {
    async fn complete(&self, _system_prompt: &str, _user_message: &str) -> Result<String, DiagnosticError> {
      Ok(self.0.to_string())
    }
  }

  struct FailingClient;

  #[async_trait]
  impl LlmClient for FailingClient {
    async fn complete(&self, _system_prompt: &str, _user_message: &str) -> Result<String, DiagnosticError> {
      Err(DiagnosticError::Request("no network".to_string()))
    }
  }

  #[test]
  fn remap_rewrites_known_lines_only() {
    let mut map = HashMap::new();
    map.insert(7, 3);
    let out = remap_line_numbers("File \"t.py\", line 7\nNameError at line 9", &map);
    assert_eq!(out, "File \"t.py\", line 3\nNameError at line 9");
  }

  #[test]
  fn remap_is_identity_on_empty_map() {
    let out = remap_line_numbers("line 4 exploded", &HashMap::new());
    assert_eq!(out, "line 4 exploded");
  }

  #[tokio::test]
  async fn translate_error_uses_client_output() {
    let client = FixedClient("Kukho impazamo kumgca 3.");
    let text = translate_error(&client, "line 3: boom", &HashMap::new()).await;
    assert_eq!(text, "Kukho impazamo kumgca 3.");
  }

  #[tokio::test]
  async fn translate_error_falls_back_on_client_failure() {
    let client = FailingClient;
    let text = translate_error(&client, "line 3: boom", &HashMap::new()).await;
    assert!(text.starts_with("Impazamo:"));
  }

  #[tokio::test]
  async fn translate_timeout_falls_back_on_client_failure() {
    let client = FailingClient;
    let text = translate_timeout(&client, "ngelixa Inyaniso: dlula").await;
    assert_eq!(text, TIMEOUT_FALLBACK);
  }
}
