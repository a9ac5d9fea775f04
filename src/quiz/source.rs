use super::Quiz;
use crate::error::QuizLoadError;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

/// Where quiz data comes from; one request per session, no retries
pub trait QuizSource {
    fn fetch(&self, id: &str) -> Result<Quiz, QuizLoadError>;
}

/// Reads `<root>/<id>.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl QuizSource for DirectorySource {
    fn fetch(&self, id: &str) -> Result<Quiz, QuizLoadError> {
        // the identifier is a single path segment
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(QuizLoadError::NotFound(id.to_string()));
        }
        let path = self.path_for(id);
        debug!("Fetching quiz from {}", path.display());
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => QuizLoadError::NotFound(id.to_string()),
            _ => QuizLoadError::Io(e),
        })?;
        let quiz: Quiz = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "Loaded quiz {:?} with {} questions",
            quiz.title,
            quiz.questions.len()
        );
        Ok(quiz)
    }
}
