//! Child process exit outcomes

use std::fmt;
use std::process::ExitStatus;

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal exit with a status code
    Code(i32),
    /// Killed by a signal (unix only)
    Signaled(i32),
    /// Neither a code nor a signal could be read
    Indeterminate,
}

impl ExitOutcome {
    /// Whether the process exited with status 0
    pub fn success(&self) -> bool {
        matches!(self, Self::Code(0))
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Code(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }

        Self::Indeterminate
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exit code {}", code),
            Self::Signaled(signal) => write!(f, "terminated by signal {}", signal),
            Self::Indeterminate => write!(f, "unknown exit status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_code_zero_is_success() {
        assert!(ExitOutcome::Code(0).success());
        assert!(!ExitOutcome::Code(3).success());
        assert!(!ExitOutcome::Signaled(9).success());
        assert!(!ExitOutcome::Indeterminate.success());
    }

    #[test]
    fn display() {
        assert_eq!(ExitOutcome::Code(2).to_string(), "exit code 2");
        assert_eq!(ExitOutcome::Signaled(15).to_string(), "terminated by signal 15");
        assert_eq!(ExitOutcome::Indeterminate.to_string(), "unknown exit status");
    }

    #[cfg(unix)]
    #[test]
    fn from_unix_status() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait statuses: exit code lives in the high byte
        assert_eq!(ExitOutcome::from(ExitStatus::from_raw(3 << 8)), ExitOutcome::Code(3));
        assert_eq!(ExitOutcome::from(ExitStatus::from_raw(9)), ExitOutcome::Signaled(9));
    }
}
