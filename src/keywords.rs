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

//! The canonical isiXhosa-to-target keyword table.
//!
//! Closed, bidirectional, stable data: no I/O, no dynamic registration.
//! The source→target direction drives [`crate::transpiler`]; the
//! target→source direction lets [`crate::diagnostics`] and the
//! transpiler's foreign-keyword check name the student's own vocabulary
//! when pointing at a target-language construct.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One (isiXhosa, target) keyword pair.
pub const KEYWORD_PAIRS: &[(&str, &str)] = &[
  ("Ubuxoki", "False"),
  ("Inyaniso", "True"),
  ("Akukho", "None"),
  ("kwaye", "and"),
  ("njenge", "as"),
  ("qinisekisa", "assert"),
  ("ngemva", "async"),
  ("linda", "await"),
  ("yekisa", "break"),
  ("iklasi", "class"),
  ("qhubeka", "continue"),
  ("chaza", "def"),
  ("cima", "del"),
  ("okanye", "or"),
  ("enye", "else"),
  ("ngaphandle", "except"),
  ("ekugqibeleni", "finally"),
  ("jikelele", "global"),
  ("ukuba", "if"),
  ("ngenisa", "import"),
  ("ngaphakathi", "in"),
  ("umsebenzi", "lambda"),
  ("ingaphandle", "nonlocal"),
  ("hayi", "not"),
  ("dlula", "pass"),
  ("phakamisa", "raise"),
  ("buyisela", "return"),
  ("zama", "try"),
  ("ngelixa", "while"),
  ("nge", "with"),
  ("velisa", "yield"),
  ("ngokulandelelana", "for"),
  ("ukusuka", "from"),
  ("ngu", "is"),
  ("okanye_ukuba", "elif"),
];

static SOURCE_TO_TARGET: Lazy<HashMap<&'static str, &'static str>> =
  Lazy::new(|| KEYWORD_PAIRS.iter().copied().collect());

static TARGET_TO_SOURCE: Lazy<HashMap<&'static str, &'static str>> =
  Lazy::new(|| KEYWORD_PAIRS.iter().map(|(src, tgt)| (*tgt, *src)).collect());

/// isiXhosa keyword → target-language keyword.
pub fn source_to_target() -> &'static HashMap<&'static str, &'static str> {
  &SOURCE_TO_TARGET
}

/// Target-language keyword → isiXhosa keyword.
pub fn target_to_source() -> &'static HashMap<&'static str, &'static str> {
  &TARGET_TO_SOURCE
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_is_bijective() {
    assert_eq!(source_to_target().len(), KEYWORD_PAIRS.len());
    assert_eq!(target_to_source().len(), KEYWORD_PAIRS.len());
  }

  #[test]
  fn round_trips() {
    for (src, tgt) in KEYWORD_PAIRS {
      assert_eq!(source_to_target().get(src), Some(tgt));
      assert_eq!(target_to_source().get(tgt), Some(src));
    }
  }
}
