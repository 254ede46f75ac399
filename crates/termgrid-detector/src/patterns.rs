//! Input-prompt patterns matched against engine output lines.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use termgrid_core::PromptPatternConfig;

lazy_static! {
    /// Built-in prompt patterns, checked in order against each line.
    ///
    /// The `y/N` / `Y/n` bracket forms are case-exact on purpose: the
    /// capital marks the default answer, and matching the lowercase
    /// variant loosely would also catch ordinary text.
    static ref INPUT_PATTERNS: Vec<Regex> = [
        r"(?i)password\s*:",
        r"(?i)passphrase\s*:",
        r"\[y/N\]",
        r"\[Y/n\]",
        r"\(y/n\)",
        r"\(yes/no\)",
        r"(?i)\[sudo\]",
        r"(?i)continue connecting",
        r"(?i)do you want to",
        r"(?i)proceed\?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("built-in prompt pattern"))
    .collect();
}

/// Matcher over the built-in prompt table plus config-supplied extras.
#[derive(Debug, Default)]
pub struct PromptMatcher {
    extra: Vec<Regex>,
}

impl PromptMatcher {
    /// Matcher with only the built-in patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher with additional user-configured patterns appended after
    /// the built-in table. Patterns that fail to compile are skipped;
    /// config validation normally rejects them before this point.
    pub fn with_extra_patterns(configs: &[PromptPatternConfig]) -> Self {
        let extra = configs
            .iter()
            .filter_map(|config| match Regex::new(&config.pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!(name = config.name, error = %e, "skipping invalid prompt pattern");
                    None
                }
            })
            .collect();
        Self { extra }
    }

    /// Whether the line looks like an input prompt.
    pub fn is_input_prompt(&self, line: &str) -> bool {
        INPUT_PATTERNS.iter().chain(self.extra.iter()).any(|p| p.is_match(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_prompts() {
        let matcher = PromptMatcher::new();
        assert!(matcher.is_input_prompt("Password:"));
        assert!(matcher.is_input_prompt("password :"));
        assert!(matcher.is_input_prompt("Enter passphrase for key '/home/u/.ssh/id_ed25519':"));
        assert!(matcher.is_input_prompt("[sudo] password for user:"));
    }

    #[test]
    fn test_confirmation_prompts() {
        let matcher = PromptMatcher::new();
        assert!(matcher.is_input_prompt("Overwrite? [y/N]"));
        assert!(matcher.is_input_prompt("Continue [Y/n]"));
        assert!(matcher.is_input_prompt("Delete branch? (y/n)"));
        assert!(matcher.is_input_prompt("Are you sure? (yes/no)"));
        assert!(matcher.is_input_prompt(
            "Are you sure you want to continue connecting (yes/no/[fingerprint])?"
        ));
        assert!(matcher.is_input_prompt("Do you want to install these packages?"));
        assert!(matcher.is_input_prompt("Proceed? "));
    }

    #[test]
    fn test_ordinary_output_not_matched() {
        let matcher = PromptMatcher::new();
        assert!(!matcher.is_input_prompt("$ ls -la"));
        assert!(!matcher.is_input_prompt("compiling termgrid v0.1.0"));
        assert!(!matcher.is_input_prompt("drwxr-xr-x 4 user staff 128 Jan 1 00:00 src"));
        // Lowercase bracket form with the wrong default casing
        assert!(!matcher.is_input_prompt("see [y/n] in the docs"));
    }

    #[test]
    fn test_extra_patterns_appended() {
        let configs = vec![PromptPatternConfig {
            name: "token".to_string(),
            pattern: r"(?i)enter token\s*:".to_string(),
        }];
        let matcher = PromptMatcher::with_extra_patterns(&configs);

        assert!(matcher.is_input_prompt("Enter token: "));
        assert!(matcher.is_input_prompt("Password:")); // built-ins still active
    }

    #[test]
    fn test_invalid_extra_pattern_skipped() {
        let configs = vec![PromptPatternConfig {
            name: "broken".to_string(),
            pattern: "([unclosed".to_string(),
        }];
        let matcher = PromptMatcher::with_extra_patterns(&configs);
        assert!(!matcher.is_input_prompt("[unclosed"));
        assert!(matcher.is_input_prompt("Password:"));
    }
}
