//! Bounded external-process invocation.
//!
//! Commands run under `sh -c` with combined stdout+stderr capture and a hard
//! deadline. The pipes are drained on reader threads so a chatty child can
//! never fill a pipe buffer and deadlock the exit poll.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub output: String,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Run `command` in `cwd`, killing the child if it outlives `timeout`.
pub fn run_with_timeout(command: &str, cwd: &Path, timeout: Duration) -> Result<ProcessOutput> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to launch '{}'", command))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_handle = thread::spawn(move || read_to_string(stdout));
    let err_handle = thread::spawn(move || read_to_string(stderr));

    let deadline = Instant::now() + timeout;
    let mut timed_out = false;
    let status = loop {
        match child
            .try_wait()
            .with_context(|| format!("Failed to poll '{}'", command))?
        {
            Some(status) => break Some(status),
            None if Instant::now() >= deadline => {
                timed_out = true;
                let _ = child.kill();
                break child.wait().ok();
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let mut output = out_handle.join().unwrap_or_default();
    let err = err_handle.join().unwrap_or_default();
    if !err.is_empty() {
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&err);
    }

    Ok(ProcessOutput {
        exit_code: status.and_then(|s| s.code()),
        output,
        timed_out,
    })
}

fn read_to_string(pipe: Option<impl Read>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
