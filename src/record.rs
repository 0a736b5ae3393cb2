use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Name: ?(.*?)\r?$").unwrap());
static BIO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Bio: ?(.*?)\r?$").unwrap());
static DISCIPLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Discipline: ?(.*?)\r?$").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing `{0}` line in profile text")]
    MissingField(&'static str),
}

/// One faculty member as extracted from a directory page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FacultyRecord {
    pub name: String,
    pub biography: String,
    pub discipline: String,
}

impl FacultyRecord {
    pub fn new(
        name: impl Into<String>,
        biography: impl Into<String>,
        discipline: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            biography: biography.into(),
            discipline: discipline.into(),
        }
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hello, my name is {} and I am a {} faculty member.",
            self.name, self.discipline
        )
    }

    pub fn word_count(&self) -> usize {
        self.biography.split_whitespace().count()
    }

    /// Render the `Name:` / `Bio:` / `Discipline:` dump written by `download-profiles`.
    pub fn to_text(&self) -> String {
        format!(
            "Name: {}\nBio: {}\nDiscipline: {}\n",
            self.name, self.biography, self.discipline
        )
    }

    /// Read a dump produced by [`FacultyRecord::to_text`].
    pub fn from_text(text: &str) -> Result<Self, RecordError> {
        let field = |re: &Regex, label: &'static str| -> Result<String, RecordError> {
            re.captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or(RecordError::MissingField(label))
        };

        Ok(Self {
            name: field(&NAME_RE, "Name")?,
            biography: field(&BIO_RE, "Bio")?,
            discipline: field(&DISCIPLINE_RE, "Discipline")?,
        })
    }
}

impl fmt::Display for FacultyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\nBio: {}\nDiscipline: {}",
            self.name, self.biography, self.discipline
        )
    }
}
