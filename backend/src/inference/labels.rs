use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("Failed to read label file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Label file {0} contains no labels")]
    Empty(PathBuf),
}

/// Class names in output-vector order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LabelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let labels = Self::parse(&text);
        if labels.is_empty() {
            return Err(LabelError::Empty(path.to_path_buf()));
        }
        log::info!("Loaded {} labels from {}", labels.len(), path.display());
        Ok(labels)
    }

    /// One label per line. Blank lines are skipped and a leading
    /// `"<index> "` prefix is dropped, so `"0 Monilia"` reads as `"Monilia"`.
    pub fn parse(text: &str) -> Self {
        let labels = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(strip_index)
            .map(str::to_string)
            .collect();
        Self(labels)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

fn strip_index(line: &str) -> &str {
    match line.split_once(char::is_whitespace) {
        Some((index, rest)) if index.chars().all(|c| c.is_ascii_digit()) => rest.trim_start(),
        _ => line,
    }
}

impl<S: Into<String>> FromIterator<S> for Labels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
