//! External NLP process over JSON lines
//!
//! Spawns the configured command once and keeps it alive for the whole run,
//! so model loading happens a single time. Each call writes one request line
//! and reads one response line:
//!
//! ```text
//! → {"task": "sentences", "text": "..."}
//! ← {"sentences": ["...", "..."]}
//! → {"task": "entities", "text": "..."}
//! ← {"entities": [{"text": "Lily", "label": "PERSON"}]}
//! ← {"error": "..."}            (on failure)
//! ```
//!
//! `scripts/spacy_nlp.py` serves this protocol with spaCy.

use super::{Entity, EntityRecognizer, NlpError, SentenceSplitter};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;

#[derive(Serialize)]
struct Request<'a> {
    task: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    sentences: Option<Vec<String>>,
    #[serde(default)]
    entities: Option<Vec<Entity>>,
    #[serde(default)]
    error: Option<String>,
}

struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// NLP backend served by a long-lived child process.
pub struct SubprocessNlp {
    program: String,
    session: Mutex<Session>,
}

impl SubprocessNlp {
    /// Start the process. `command[0]` is the program, the rest its arguments.
    pub fn spawn(command: &[String]) -> Result<Self, NlpError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| NlpError::Unavailable("empty NLP command".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| NlpError::Unavailable(format!("failed to start {}: {}", program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| NlpError::Unavailable("no stdin available".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NlpError::Unavailable("no stdout available".to_string()))?;

        tracing::info!(program = %program, pid = child.id(), "started NLP process");

        Ok(Self {
            program: program.clone(),
            session: Mutex::new(Session {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            }),
        })
    }

    fn call(&self, task: &'static str, text: &str) -> Result<Response, NlpError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| NlpError::Unavailable("NLP session lock poisoned".to_string()))?;

        let mut line = serde_json::to_string(&Request { task, text })
            .map_err(|e| NlpError::Protocol(format!("failed to encode request: {}", e)))?;
        line.push('\n');

        let gone = |e: std::io::Error| {
            NlpError::Unavailable(format!("{} is not responding: {}", self.program, e))
        };
        session.stdin.write_all(line.as_bytes()).map_err(gone)?;
        session.stdin.flush().map_err(gone)?;

        let mut reply = String::new();
        let read = session.stdout.read_line(&mut reply).map_err(gone)?;
        if read == 0 {
            return Err(NlpError::Unavailable(format!("{} exited", self.program)));
        }

        let response: Response = serde_json::from_str(reply.trim_end())
            .map_err(|e| NlpError::Protocol(format!("malformed response: {}", e)))?;
        match response.error {
            Some(message) => Err(NlpError::Backend(message)),
            None => Ok(response),
        }
    }
}

impl SentenceSplitter for SubprocessNlp {
    fn split(&self, text: &str) -> Result<Vec<String>, NlpError> {
        self.call("sentences", text)?
            .sentences
            .ok_or_else(|| NlpError::Protocol("response has no 'sentences'".to_string()))
    }
}

impl EntityRecognizer for SubprocessNlp {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        self.call("entities", text)?
            .entities
            .ok_or_else(|| NlpError::Protocol("response has no 'entities'".to_string()))
    }
}

impl Drop for SubprocessNlp {
    fn drop(&mut self) {
        if let Ok(session) = self.session.get_mut() {
            let _ = session.child.kill();
            let _ = session.child.wait();
        }
    }
}

impl std::fmt::Debug for SubprocessNlp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubprocessNlp")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}
