//! Rule chains for form validation
//!
//! A chain is a pipeline of pure steps. Each step either hands the (possibly
//! transformed) value to the next one or stops the chain with a message.

use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Location of a value inside the sign-up form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Avatar,
    Name,
    Email,
    Password,
    Techs,
    TechTitle(usize),
    TechKnowledge(usize),
}

impl FieldPath {
    /// Position of the path in the rendered form, used for ordering
    fn sort_key(&self) -> (u8, usize, u8) {
        match self {
            Self::Avatar => (0, 0, 0),
            Self::Name => (1, 0, 0),
            Self::Email => (2, 0, 0),
            Self::Password => (3, 0, 0),
            Self::Techs => (4, 0, 0),
            Self::TechTitle(i) => (4, i + 1, 0),
            Self::TechKnowledge(i) => (4, i + 1, 1),
        }
    }

    /// Index of the tech entry this path points into, if any
    pub fn tech_index(&self) -> Option<usize> {
        match self {
            Self::TechTitle(i) | Self::TechKnowledge(i) => Some(*i),
            _ => None,
        }
    }
}

impl PartialOrd for FieldPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Avatar => write!(f, "avatar"),
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Password => write!(f, "password"),
            Self::Techs => write!(f, "techs"),
            Self::TechTitle(i) => write!(f, "techs[{i}].title"),
            Self::TechKnowledge(i) => write!(f, "techs[{i}].knowledge"),
        }
    }
}

impl FromStr for FieldPath {
    type Err = String;

    /// Parses `techs[1].title` as well as the dotted `techs.1.title` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avatar" => return Ok(Self::Avatar),
            "name" => return Ok(Self::Name),
            "email" => return Ok(Self::Email),
            "password" => return Ok(Self::Password),
            "techs" => return Ok(Self::Techs),
            _ => {}
        }

        let rest = s
            .strip_prefix("techs")
            .ok_or_else(|| format!("unknown field path: {s}"))?;
        let (index, leaf) = if let Some(bracketed) = rest.strip_prefix('[') {
            bracketed
                .split_once("].")
                .ok_or_else(|| format!("malformed field path: {s}"))?
        } else if let Some(dotted) = rest.strip_prefix('.') {
            dotted
                .split_once('.')
                .ok_or_else(|| format!("malformed field path: {s}"))?
        } else {
            return Err(format!("malformed field path: {s}"));
        };

        let index: usize = index
            .parse()
            .map_err(|_| format!("invalid index in field path: {s}"))?;
        match leaf {
            "title" => Ok(Self::TechTitle(index)),
            "knowledge" => Ok(Self::TechKnowledge(index)),
            _ => Err(format!("unknown field path: {s}")),
        }
    }
}

/// Snapshot of the messages produced by one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FieldPath, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a path. The first message for a path wins.
    pub fn insert(&mut self, path: FieldPath, message: impl Into<String>) {
        self.errors.entry(path).or_insert_with(|| message.into());
    }

    /// Record the outcome of a rule chain, returning the value on success
    pub fn record<T>(&mut self, path: FieldPath, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(path, message);
                None
            }
        }
    }

    pub fn get(&self, path: FieldPath) -> Option<&str> {
        self.errors.get(&path).map(String::as_str)
    }

    pub fn contains(&self, path: FieldPath) -> bool {
        self.errors.contains_key(&path)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate errors in form order
    pub fn iter(&self) -> impl Iterator<Item = (FieldPath, &str)> {
        self.errors.iter().map(|(path, msg)| (*path, msg.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(path, message)| format!("{path}: {message}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

type Step<T> = Box<dyn Fn(T) -> Result<T, String> + Send + Sync>;

/// An ordered pipeline of validation and transform steps
pub struct Chain<T> {
    steps: Vec<Step<T>>,
}

impl<T: 'static> Chain<T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a raw step
    pub fn step<F>(mut self, step: F) -> Self
    where
        F: Fn(T) -> Result<T, String> + Send + Sync + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Stop the chain with `message` unless `predicate` holds
    pub fn check<P>(self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.step(move |value| {
            if predicate(&value) {
                Ok(value)
            } else {
                Err(message.clone())
            }
        })
    }

    /// Replace the value without failing
    pub fn transform<F>(self, f: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.step(move |value| Ok(f(value)))
    }

    /// Run every step in order, stopping at the first failure
    pub fn run(&self, value: T) -> Result<T, String> {
        self.steps.iter().try_fold(value, |value, step| step(value))
    }
}

impl<T: 'static> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain<String> {
    pub fn non_empty(self, message: impl Into<String>) -> Self {
        self.check(|s: &String| !s.is_empty(), message)
    }

    /// Like `non_empty` but whitespace-only input also fails
    pub fn non_blank(self, message: impl Into<String>) -> Self {
        self.check(|s: &String| !s.trim().is_empty(), message)
    }

    /// Minimum length in UTF-16 code units, as browser form libraries count it
    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.check(move |s: &String| s.encode_utf16().count() >= min, message)
    }

    pub fn email(self, message: impl Into<String>) -> Self {
        self.check(|s: &String| is_email(s), message)
    }

    pub fn lowercase(self) -> Self {
        self.transform(|s| s.to_lowercase())
    }

    pub fn ends_with(self, suffix: impl Into<String>, message: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.check(move |s: &String| s.ends_with(&suffix), message)
    }
}

impl Chain<f64> {
    pub fn not_nan(self, message: impl Into<String>) -> Self {
        self.check(|n: &f64| !n.is_nan(), message)
    }

    pub fn min(self, min: f64, message: impl Into<String>) -> Self {
        self.check(move |n: &f64| *n >= min, message)
    }

    pub fn max(self, max: f64, message: impl Into<String>) -> Self {
        self.check(move |n: &f64| *n <= max, message)
    }
}

/// Rule applied to a list as a whole, independent of its elements
#[derive(Debug, Clone)]
pub struct ListRule {
    min_items: usize,
    message: String,
}

impl ListRule {
    pub fn min_items(min_items: usize, message: impl Into<String>) -> Self {
        Self {
            min_items,
            message: message.into(),
        }
    }

    pub fn run<T>(&self, items: &[T]) -> Result<(), String> {
        if items.len() >= self.min_items {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

/// Coerce raw text input into a number.
///
/// Blank input becomes 0 and anything unparsable becomes NaN, so range rules
/// downstream see the same values a browser number input would produce.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        // Rust accepts "inf"/"nan" spellings that are not numeric input
        Ok(n) if trimmed.chars().any(|c| c.is_ascii_digit()) => n,
        _ => f64::NAN,
    }
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Email syntax check (case-insensitive)
pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_RE.is_match(value)
}

/// Upper-case the first character of every space-separated word.
///
/// Leading and trailing whitespace is dropped; runs of internal spaces are kept.
pub fn capitalize_words(value: &str) -> String {
    value
        .trim()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
