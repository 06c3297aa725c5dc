//! Shared helpers for storyprep integration tests
//!
//! Scratch datasets on disk and a seeded generator of small stories built
//! from names, speech verbs and noise words.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

pub const NAMES: [&str; 8] = ["Lily", "Max", "Ruby", "Tom", "Mom", "Teacher", "Ben", "Zoe"];

/// Words the resolver must never report.
pub const NOISE: [&str; 22] = [
    "He", "She", "His", "Her", "They", "We", "I", "It", "The", "A", "An", "Next", "Ow", "No",
    "Stop", "That", "This", "Both", "And", "But", "Today", "There",
];

const VERBS: [&str; 5] = ["said the", "said", "told her", "told him", "replied"];

const LINES: [&str; 6] = [
    "Look at the sky",
    "I want a cookie",
    "Come here, Max",
    "Where is Lily?",
    "Stop that",
    "Ow, my knee",
];

/// A temporary directory holding dataset files.
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    pub fn read_json(&self, name: &str) -> Value {
        let content = std::fs::read_to_string(self.path(name)).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

/// Seeded generator of short stories with quoted, attributed lines.
pub struct StoryGen {
    rng: StdRng,
}

impl StoryGen {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items.choose(&mut self.rng).copied().unwrap_or("")
    }

    fn speaker(&mut self) -> String {
        // Mix in lowercase and noise speakers to exercise capitalize and filtering
        match self.rng.gen_range(0..4) {
            0 => self.pick(&NOISE).to_lowercase(),
            1 => self.pick(&NAMES).to_lowercase(),
            _ => self.pick(&NAMES).to_string(),
        }
    }

    pub fn story(&mut self) -> String {
        let mut parts = Vec::new();
        for _ in 0..self.rng.gen_range(0..6) {
            let line = self.pick(&LINES);
            let verb = self.pick(&VERBS);
            let speaker = self.speaker();
            parts.push(format!("\"{},\" {} {}.", line, verb, speaker));
            if self.rng.gen_bool(0.5) {
                let name = self.pick(&NAMES);
                parts.push(format!("Then {} went home with {}.", self.pick(&NOISE), name));
            }
        }
        parts.join(" ")
    }
}
