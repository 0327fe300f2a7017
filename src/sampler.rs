//! Random prompt sampling
//!
//! Builds "random prompt" suggestions by drawing distinct words from five
//! categorized vocabularies (nouns, adjectives, actions, settings, styles).

use crate::{Error, Result};
use rand::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const MIN_PROMPT_WORDS: usize = 1;
pub const MAX_PROMPT_WORDS: usize = 25;

const VOCABULARY_FILES: [&str; 5] = [
    "nouns.json",
    "adjectives.json",
    "actions.json",
    "settings.json",
    "styles.json",
];

const BUILTIN_VOCABULARIES: [&str; 5] = [
    include_str!("../data/vocabulary/nouns.json"),
    include_str!("../data/vocabulary/adjectives.json"),
    include_str!("../data/vocabulary/actions.json"),
    include_str!("../data/vocabulary/settings.json"),
    include_str!("../data/vocabulary/styles.json"),
];

#[derive(Debug, Deserialize)]
struct WordList(Vec<String>);

fn parse_word_list(json: &str) -> Result<Vec<String>> {
    let list: WordList = serde_json::from_str(json)?;
    Ok(list.0)
}

/// Random prompt generator over a deduplicated word pool.
#[derive(Debug, Clone)]
pub struct PromptSampler {
    pool: Vec<String>,
}

impl PromptSampler {
    /// Sampler over the vocabularies compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let lists = BUILTIN_VOCABULARIES
            .iter()
            .map(|json| parse_word_list(json))
            .collect::<Result<Vec<_>>>()?;
        Self::new(lists)
    }

    /// Load the five vocabulary JSON files from `data_dir`.
    pub fn from_dir(data_dir: &Path) -> Result<Self> {
        let lists = VOCABULARY_FILES
            .iter()
            .map(|name| parse_word_list(&fs::read_to_string(data_dir.join(name))?))
            .collect::<Result<Vec<_>>>()?;
        Self::new(lists)
    }

    /// Union of `lists` in order, keeping the first spelling of each word.
    pub fn new(lists: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        let pool: Vec<String> = lists
            .into_iter()
            .flatten()
            .map(|word| word.trim().to_string())
            .filter(|word| !word.is_empty() && seen.insert(word.to_lowercase()))
            .collect();

        if pool.is_empty() {
            return Err(Error::Vocabulary("Vocabulary is empty".to_string()));
        }

        Ok(Self { pool })
    }

    /// Number of distinct words available.
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.pool.iter().any(|w| w == word)
    }

    pub fn sample(&self) -> String {
        self.sample_with(&mut thread_rng())
    }

    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.sample_words(rng).join(" ")
    }

    /// Draw between 1 and 25 distinct words, in selection order.
    pub fn sample_words<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let length = rng
            .gen_range(MIN_PROMPT_WORDS..=MAX_PROMPT_WORDS)
            .min(self.pool.len());

        let mut pool = self.pool.clone();
        let (chosen, _) = pool.partial_shuffle(rng, length);
        chosen.to_vec()
    }
}
