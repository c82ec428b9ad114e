//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// Environment variables whose presence means a CI runner
const CI_VARS: [&str; 9] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// Decides between styled and plain output
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
        }
    }

    /// Plain output regardless of the terminal
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Check if we're in an interactive terminal
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Check if we should use styled `cliclack` output
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn detect_interactive() -> bool {
        // stdout carries command output; a pipe means plain text
        if !std::io::stdout().is_terminal() {
            return false;
        }

        !CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_context() {
        let ctx = UiContext::non_interactive();
        assert!(!ctx.is_interactive());
        assert!(!ctx.use_fancy_output());
    }
}
