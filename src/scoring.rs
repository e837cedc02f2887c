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

//! Scores a multiple-choice quiz submission. No I/O: a pure function over
//! the authoritative question list and the student's answers.

use serde::Serialize;
use std::collections::HashMap;

/// One authoritative question: its id, correct choice, and point weight.
#[derive(Debug, Clone)]
pub struct QuizQuestion {
  pub question_id: String,
  pub correct_choice: String,
  pub weight: f64,
}

/// Per-question feedback returned alongside the aggregate score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionResult {
  pub question_id: String,
  pub chosen: Option<String>,
  pub correct: String,
  pub is_correct: bool,
  pub weight: f64,
}

/// The aggregate result of scoring one quiz submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizResult {
  pub score: f64,
  pub total_points: f64,
  pub percentage: f64,
  pub detailed_results: Vec<QuestionResult>,
}

/// Scores `answers` against `questions`. A question with no entry in
/// `answers` is always incorrect. `percentage` is zero when `total_points`
/// is zero, to avoid dividing by it.
pub fn score_quiz(
  questions: &[QuizQuestion],
  answers: &HashMap<String, String>,
  total_points: f64,
) -> QuizResult {
  let mut score = 0.0;
  let mut detailed_results = Vec::with_capacity(questions.len());

  for question in questions {
    let chosen = answers.get(&question.question_id).cloned();
    let is_correct = chosen.as_deref() == Some(question.correct_choice.as_str());
    if is_correct {
      score += question.weight;
    }
    detailed_results.push(QuestionResult {
      question_id: question.question_id.clone(),
      chosen,
      correct: question.correct_choice.clone(),
      is_correct,
      weight: question.weight,
    });
  }

  let percentage = if total_points > 0.0 {
    ((score / total_points) * 100.0 * 100.0).round() / 100.0
  } else {
    0.0
  };

  QuizResult {
    score,
    total_points,
    percentage,
    detailed_results,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn questions() -> Vec<QuizQuestion> {
    vec![
      QuizQuestion {
        question_id: "q1".to_string(),
        correct_choice: "b".to_string(),
        weight: 2.0,
      },
      QuizQuestion {
        question_id: "q2".to_string(),
        correct_choice: "a".to_string(),
        weight: 3.0,
      },
    ]
  }

  #[test]
  fn all_correct_scores_full_points() {
    let answers = HashMap::from([("q1".to_string(), "b".to_string()), ("q2".to_string(), "a".to_string())]);
    let result = score_quiz(&questions(), &answers, 5.0);
    assert_eq!(result.score, 5.0);
    assert_eq!(result.percentage, 100.0);
    assert!(result.detailed_results.iter().all(|r| r.is_correct));
  }

  #[test]
  fn missing_answer_counts_as_incorrect() {
    let answers = HashMap::from([("q1".to_string(), "b".to_string())]);
    let result = score_quiz(&questions(), &answers, 5.0);
    assert_eq!(result.score, 2.0);
    assert_eq!(result.percentage, 40.0);
    let q2 = result.detailed_results.iter().find(|r| r.question_id == "q2").unwrap();
    assert!(!q2.is_correct);
    assert_eq!(q2.chosen, None);
  }

  #[test]
  fn zero_total_points_yields_zero_percentage() {
    let result = score_quiz(&questions(), &HashMap::new(), 0.0);
    assert_eq!(result.percentage, 0.0);
  }
}
