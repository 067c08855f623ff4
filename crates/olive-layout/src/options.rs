//! Layout options and their environment overrides.

use crate::color::ColorScheme;
use crate::interrupt::Interrupt;
use crate::LayoutError;

/// Default span, in rows, above which an edge is drawn as two stubs.
pub const DEFAULT_BROKEN_LINE_LENGTH: usize = 32;

/// Smallest accepted broken-line threshold. A broken edge needs distinct
/// rows for its two stubs and their connectors.
pub const MIN_BROKEN_LINE_LENGTH: usize = 3;

pub const ENV_MAX_COUNT: &str = "OLIVE_MAX_COUNT";
pub const ENV_BROKEN_LINE_LENGTH: &str = "OLIVE_BROKEN_LINE_LENGTH";
pub const ENV_COLOR_SCHEME: &str = "OLIVE_COLOR_SCHEME";

/// Options for one layout run.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Keep only the first `n` rows of the sequence.
    pub max_count: Option<usize>,
    /// `None` never breaks long edges.
    pub broken_line_length: Option<usize>,
    pub color_scheme: ColorScheme,
    pub interrupt: Option<Interrupt>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_count: None,
            broken_line_length: Some(DEFAULT_BROKEN_LINE_LENGTH),
            color_scheme: ColorScheme::default(),
            interrupt: None,
        }
    }
}

impl LayoutOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_count(mut self, max_count: Option<usize>) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn broken_line_length(mut self, length: Option<usize>) -> Self {
        self.broken_line_length = length;
        self
    }

    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        match self.broken_line_length {
            Some(length) if length < MIN_BROKEN_LINE_LENGTH => Err(LayoutError::InvalidOption(
                format!(
                    "broken line length must be at least {}, got {}",
                    MIN_BROKEN_LINE_LENGTH, length
                ),
            )),
            _ => Ok(()),
        }
    }

    /// Defaults with overrides from `OLIVE_MAX_COUNT`,
    /// `OLIVE_BROKEN_LINE_LENGTH` and `OLIVE_COLOR_SCHEME`.
    pub fn from_env() -> Result<Self, LayoutError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, LayoutError> {
        if let Some(value) = lookup(ENV_MAX_COUNT) {
            let count = value
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid_env(ENV_MAX_COUNT, &value))?;
            self.max_count = Some(count);
        }

        if let Some(value) = lookup(ENV_BROKEN_LINE_LENGTH) {
            self.broken_line_length = match value.trim() {
                "0" | "off" | "none" => None,
                n => Some(
                    n.parse::<usize>()
                        .map_err(|_| invalid_env(ENV_BROKEN_LINE_LENGTH, &value))?,
                ),
            };
        }

        if let Some(value) = lookup(ENV_COLOR_SCHEME) {
            self.color_scheme = value.parse()?;
        }

        self.validate()?;
        Ok(self)
    }
}

fn invalid_env(name: &str, value: &str) -> LayoutError {
    LayoutError::InvalidOption(format!("{}={}", name, value))
}
