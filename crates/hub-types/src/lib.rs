/// Reasons a candidate entry name is refused before it ever reaches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The input was empty or contained only whitespace
    #[error("Name cannot be empty")]
    Empty,
    /// The input contained `/` or `\`
    #[error("Name cannot contain a path separator")]
    Separator,
    /// The input contained a NUL byte
    #[error("Name cannot contain a NUL byte")]
    Nul,
    /// The input started with `.`, which would make it a hidden entry
    #[error("Name cannot start with '.'")]
    Hidden,
}

/// A single, visible path segment that is safe to create under a parent directory.
///
/// The input is trimmed of leading and trailing whitespace during construction. The
/// resulting name is guaranteed to:
///
/// - contain at least one non-whitespace character
/// - contain neither `/` nor `\`
/// - contain no NUL byte
/// - not start with `.` (so `.` and `..` are impossible too)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName(String);

impl EntryName {
    /// Validates `input` and wraps the trimmed result.
    ///
    /// # Errors
    ///
    /// Returns the first [`NameError`] the trimmed input violates.
    pub fn new(input: impl AsRef<str>) -> Result<Self, NameError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        if trimmed.contains(['/', '\\']) {
            return Err(NameError::Separator);
        }
        if trimmed.contains('\0') {
            return Err(NameError::Nul);
        }
        if trimmed.starts_with('.') {
            return Err(NameError::Hidden);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `other` spells the same name with different letter case.
    pub fn differs_only_in_case(&self, other: &str) -> bool {
        self.0 != other && self.0.to_lowercase() == other.to_lowercase()
    }

    /// Splits the name into stem and `.ext` suffix (suffix includes the dot, may be empty).
    pub fn split_extension(&self) -> (&str, &str) {
        match self.0.rfind('.') {
            Some(idx) if idx > 0 => self.0.split_at(idx),
            _ => (self.0.as_str(), ""),
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
