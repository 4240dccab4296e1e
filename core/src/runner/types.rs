use std::fmt;
use std::path::PathBuf;

/// A fully planned collaborator invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub cwd: Option<PathBuf>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends `--flag value`.
    pub fn flag(self, name: &str, value: impl fmt::Display) -> Self {
        self.arg(name).arg(value.to_string())
    }

    pub fn flag_if(self, cond: bool, name: &str) -> Self {
        if cond {
            self.arg(name)
        } else {
            self
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Value following `--flag`, if present.
    pub fn flag_value(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == name)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Command line for logs, with values of secret flags masked.
    pub fn redacted(&self, secret_flags: &[&str]) -> String {
        let mut out = vec![self.program.clone()];
        let mut mask_next = false;
        for a in &self.args {
            if mask_next {
                out.push("****".to_string());
                mask_next = false;
                continue;
            }
            mask_next = secret_flags.contains(&a.as_str());
            out.push(a.clone());
        }
        out.join(" ")
    }
}
