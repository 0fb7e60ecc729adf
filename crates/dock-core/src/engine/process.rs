use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug)]
pub(crate) struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug)]
pub(crate) enum RunError {
    Spawn(io::Error),
    Wait(io::Error),
    TimedOut(Duration),
}

fn drain<R: Read + Send + 'static>(source: Option<R>) -> Option<JoinHandle<String>> {
    source.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                debug!(error = %e, captured = buf.len(), "Child output pipe closed with an error.");
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Puts the child in its own process group so a deadline can take down anything it spawned.
#[cfg(unix)]
fn isolate(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

#[cfg(unix)]
fn signal_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group id is the child's pid, set by `isolate`.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!(error = %io::Error::last_os_error(), pgid, "Failed to signal process group.");
    }
}

#[cfg(not(unix))]
fn signal_group(_child: &Child) {}

fn terminate(child: &mut Child) {
    signal_group(child);
    if let Err(e) = child.kill() {
        debug!(error = %e, "Child already exited before kill.");
    }
    if let Err(e) = child.wait() {
        debug!(error = %e, "Failed to reap killed child.");
    }
}

fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Runs `command` to completion, capturing stdout and stderr separately.
///
/// Both pipes are drained on helper threads so a process that writes more than the pipe
/// buffer never stalls. With a `timeout`, the child and every process it started are killed
/// once the deadline passes.
pub(crate) fn run_captured(
    command: &mut Command,
    timeout: Option<Duration>,
) -> Result<CapturedOutput, RunError> {
    if timeout.is_some() {
        isolate(command);
    }
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(RunError::Spawn)?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout {
        None => child.wait().map_err(RunError::Wait)?,
        Some(limit) => match wait_with_deadline(&mut child, limit).map_err(RunError::Wait)? {
            Some(status) => status,
            None => {
                terminate(&mut child);
                return Err(RunError::TimedOut(limit));
            }
        },
    };

    Ok(CapturedOutput {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}
