use console::{style, Term};

/// Status lines for the person at the terminal, all on stdout.
#[derive(Debug, Clone)]
pub struct Reporter {
    term: Term,
}

impl Reporter {
    pub fn stdout() -> Self {
        Reporter {
            term: Term::stdout(),
        }
    }

    fn line(&self, line: &str) {
        // Best effort.
        let _ = self.term.write_line(line);
    }

    pub fn success(&self, message: &str) {
        self.line(&format!("{} {}", style("[✓]").green(), message));
    }

    pub fn failure(&self, message: &str) {
        self.line(&format!("{} {}", style("[✗]").red().bold(), message));
    }

    pub fn note(&self, message: &str) {
        self.line(&format!("{} {}", style("[-]").yellow(), message));
    }

    pub fn command(&self, command: &impl std::fmt::Display) {
        self.line(&command.to_string());
    }
}
