//! `--jq` post-processing of JSON output

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use crate::error::JqError;

/// A jq program plus how its output should be painted
#[derive(Debug, Clone, Copy)]
pub(crate) struct JqFilter<'a> {
    program: &'a str,
    color: bool,
}

impl<'a> JqFilter<'a> {
    /// `color` follows the resolved `--color`/`--no-color` setting
    pub(crate) fn new(program: &'a str, color: bool) -> Self {
        Self { program, color }
    }

    fn args(&self) -> [&'a str; 2] {
        let paint = if self.color {
            "--color-output"
        } else {
            "--monochrome-output"
        };
        [paint, self.program]
    }

    /// Feed `json` to jq on stdin and return what it printed
    pub(crate) fn apply(&self, json: &str) -> Result<String, JqError> {
        let mut jq = Command::new("jq")
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    JqError::NotFound
                } else {
                    JqError::Spawn(e)
                }
            })?;

        let mut stdin = jq
            .stdin
            .take()
            .ok_or_else(|| JqError::Stdin(ErrorKind::BrokenPipe.into()))?;
        stdin.write_all(json.as_bytes()).map_err(JqError::Stdin)?;
        // jq only starts printing once its input is closed
        drop(stdin);

        let done = jq.wait_with_output().map_err(JqError::Wait)?;
        if done.status.success() {
            return String::from_utf8(done.stdout).map_err(JqError::Utf8);
        }
        let message = String::from_utf8_lossy(&done.stderr).trim().to_string();
        tracing::debug!(program = self.program, status = %done.status, "jq rejected program");
        Err(JqError::Filter(message))
    }
}
