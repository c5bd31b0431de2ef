//! Outcome of a single remote command.

use std::fmt;

/// What happened to a remote process.
///
/// At most one of `exit_code` and `signal` is meaningful for a given
/// completion. Both `None` means the process state is unknown (the channel
/// closed before any status was observed), which is distinct from exit 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Unix exit status (`$?`), when the process exited normally.
    pub exit_code: Option<u32>,
    /// Diagnostic message reported alongside a signal, if any.
    pub message: Option<String>,
    /// Signal that terminated the process, if any.
    pub signal: Option<ExitSignal>,
}

impl ExecutionResult {
    /// True only for an observed, normal, zero exit.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && self.signal.is_none()
    }

    /// True when neither an exit code nor a signal was observed.
    pub fn unknown(&self) -> bool {
        self.exit_code.is_none() && self.signal.is_none()
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.exit_code, &self.signal) {
            (Some(code), _) => write!(f, "exit {code}"),
            (None, Some(sig)) => write!(f, "killed by SIG{sig}"),
            (None, None) => write!(f, "unknown"),
        }
    }
}

/// Signal that terminated a remote process (RFC 4254 §6.10 names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitSignal {
    Abrt,
    Alrm,
    Fpe,
    Hup,
    Ill,
    Int,
    Kill,
    Pipe,
    Quit,
    Segv,
    Term,
    Usr1,
    /// Non-standard signal name.
    Other(String),
}

impl fmt::Display for ExitSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitSignal::Abrt => "ABRT",
            ExitSignal::Alrm => "ALRM",
            ExitSignal::Fpe => "FPE",
            ExitSignal::Hup => "HUP",
            ExitSignal::Ill => "ILL",
            ExitSignal::Int => "INT",
            ExitSignal::Kill => "KILL",
            ExitSignal::Pipe => "PIPE",
            ExitSignal::Quit => "QUIT",
            ExitSignal::Segv => "SEGV",
            ExitSignal::Term => "TERM",
            ExitSignal::Usr1 => "USR1",
            ExitSignal::Other(name) => name,
        };
        f.write_str(name)
    }
}

impl From<russh::Sig> for ExitSignal {
    fn from(sig: russh::Sig) -> Self {
        use russh::Sig;
        match sig {
            Sig::ABRT => ExitSignal::Abrt,
            Sig::ALRM => ExitSignal::Alrm,
            Sig::FPE => ExitSignal::Fpe,
            Sig::HUP => ExitSignal::Hup,
            Sig::ILL => ExitSignal::Ill,
            Sig::INT => ExitSignal::Int,
            Sig::KILL => ExitSignal::Kill,
            Sig::PIPE => ExitSignal::Pipe,
            Sig::QUIT => ExitSignal::Quit,
            Sig::SEGV => ExitSignal::Segv,
            Sig::TERM => ExitSignal::Term,
            Sig::USR1 => ExitSignal::Usr1,
            Sig::Custom(name) => ExitSignal::Other(name),
        }
    }
}
