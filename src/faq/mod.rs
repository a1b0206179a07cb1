use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::Path;

use log::{ info, warn };
use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use serde::{ Serialize, Deserialize };

/// Two tokens this similar count as the same word, which absorbs simple
/// inflections like "hour"/"hours".
const TOKEN_MATCH_SCORE: f64 = 0.92;

/// Sent when no entry clears the similarity threshold.
const FALLBACK_REPLIES: &[&str] = &[
    "I'm sorry, I couldn't find a specific answer to your question.",
    "Could you please rephrase your question?",
    "I don't have enough information to answer that. Can you be more specific?",
    "I'm afraid I don't understand. Could you try asking differently?",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does",
        "for", "from", "how", "i", "in", "is", "it", "my", "of", "on", "or",
        "our", "that", "the", "this", "to", "we", "what", "when", "where",
        "which", "who", "will", "with", "you", "your",
    ]
        .into_iter()
        .collect()
});

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

struct IndexedEntry {
    question: String,
    tokens: HashSet<String>,
    answer: String,
}

/// Answers a user message from a fixed question/answer list by token-set
/// similarity against each known question.
pub struct FaqResponder {
    entries: Vec<IndexedEntry>,
    threshold: f64,
}

impl FaqResponder {
    pub fn new(entries: Vec<FaqEntry>, threshold: f64) -> Self {
        // Questions are tokenized once up front so matching stays cheap.
        let entries = entries
            .into_iter()
            .map(|e| IndexedEntry {
                tokens: tokenize(&e.question).into_iter().collect(),
                question: e.question,
                answer: e.answer,
            })
            .collect();

        Self { entries, threshold }
    }

    /// Load entries from a JSON file. A missing file falls back to the
    /// built-in defaults; an unreadable one is a startup error.
    pub fn load(
        path: &str,
        threshold: f64
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let entries = if Path::new(path).exists() {
            let json_str = fs::read_to_string(path)?;
            let entries: Vec<FaqEntry> = serde_json::from_str(&json_str)?;
            info!("Loaded {} FAQ entries from {}", entries.len(), path);
            entries
        } else {
            warn!("FAQ file {} not found, using built-in defaults", path);
            default_entries()
        };

        Ok(Self::new(entries, threshold))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best-matching entry at or above the threshold, earliest entry
    /// winning ties.
    fn find_best_match(&self, input: &str) -> Option<&IndexedEntry> {
        let input_tokens: HashSet<String> = tokenize(input).into_iter().collect();

        let mut best: Option<&IndexedEntry> = None;
        let mut best_score = 0.0;
        for entry in &self.entries {
            let score = token_set_similarity(&input_tokens, &entry.tokens);
            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        if best_score >= self.threshold {
            if let Some(entry) = best {
                info!(
                    "Matched question '{}' with score {:.2}",
                    entry.question,
                    best_score
                );
            }
            best
        } else {
            None
        }
    }

    pub fn generate_response(&self, input: &str) -> String {
        match self.find_best_match(input) {
            Some(entry) => entry.answer.clone(),
            None => {
                let mut rng = rand::rng();
                FALLBACK_REPLIES
                    .choose(&mut rng)
                    .unwrap_or(&FALLBACK_REPLIES[0])
                    .to_string()
            }
        }
    }
}

fn default_entries() -> Vec<FaqEntry> {
    vec![
        FaqEntry {
            question: "What are your business hours?".into(),
            answer: "We are open Monday to Friday from 9 AM to 5 PM.".into(),
        },
        FaqEntry {
            question: "How can I contact customer support?".into(),
            answer: "You can reach our customer support at 1-800-SUPPORT or email support@company.com".into(),
        }
    ]
}

/// Lowercase, drop punctuation, split on whitespace, drop stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

fn tokens_match(a: &str, b: &str) -> bool {
    a == b || strsim::jaro_winkler(a, b) >= TOKEN_MATCH_SCORE
}

/// Jaccard index over the two token sets, with fuzzy token equality.
fn token_set_similarity(input: &HashSet<String>, question: &HashSet<String>) -> f64 {
    if input.is_empty() && question.is_empty() {
        return 0.0;
    }

    // Each question token can absorb at most one input token, so the
    // index stays within [0, 1] even with fuzzy equality.
    let shared = input
        .iter()
        .filter(|i| question.iter().any(|q| tokens_match(i, q)))
        .count()
        .min(question.len());
    let union = input.len() + question.len() - shared;

    (shared as f64) / (union as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder() -> FaqResponder {
        FaqResponder::new(default_entries(), 0.3)
    }

    #[test]
    fn tokenize_drops_punctuation_and_stop_words() {
        assert_eq!(
            tokenize("What are your business hours?!"),
            vec!["business".to_string(), "hours".to_string()]
        );
    }

    #[test]
    fn exact_question_matches_its_entry() {
        let reply = responder().generate_response("What are your business hours?");
        assert_eq!(reply, "We are open Monday to Friday from 9 AM to 5 PM.");
    }

    #[test]
    fn near_phrasing_still_matches() {
        // Singular "hour" plus different framing words.
        let reply = responder().generate_response("tell me your business hour");
        assert_eq!(reply, "We are open Monday to Friday from 9 AM to 5 PM.");
    }

    #[test]
    fn contact_question_matches_support_entry() {
        let reply = responder().generate_response("how do I contact support?");
        assert!(reply.contains("1-800-SUPPORT"), "got: {}", reply);
    }

    #[test]
    fn unrelated_input_gets_a_fallback_reply() {
        let reply = responder().generate_response("do you sell rocket fuel");
        assert!(FALLBACK_REPLIES.contains(&reply.as_str()), "got: {}", reply);
    }

    #[test]
    fn threshold_gates_weak_matches() {
        let strict = FaqResponder::new(default_entries(), 1.0);
        let reply = strict.generate_response("business");
        assert!(FALLBACK_REPLIES.contains(&reply.as_str()), "got: {}", reply);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let responder = FaqResponder::load("does/not/exist.json", 0.3).expect("load");
        assert_eq!(responder.len(), default_entries().len());
    }
}
