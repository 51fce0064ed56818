//! Free-form host input, one host per line.

use hostwatch_common::error::HostError;

/// Splits pasted text into candidate hosts, trimming lines and dropping blank ones.
pub fn parse_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Per-line result of adding a batch of hosts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub added: Vec<String>,
    pub invalid: Vec<String>,
    pub duplicates: Vec<String>,
}

impl BatchReport {
    /// Files the outcome of one `add_host` call under the right bucket.
    pub fn record(&mut self, host: &str, outcome: Result<(), HostError>) {
        match outcome {
            Ok(()) => self.added.push(host.to_string()),
            Err(HostError::DuplicateHost(_)) => self.duplicates.push(host.to_string()),
            Err(HostError::InvalidFormat(_)) | Err(HostError::NotFound(_)) => {
                self.invalid.push(host.to_string())
            }
        }
    }

    /// `true` when nothing was added, i.e. every line was invalid or known.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    pub fn rejected(&self) -> usize {
        self.invalid.len() + self.duplicates.len()
    }
}
