use crate::platform::{ProbeDialect, ProbeError};
use chrono::{DateTime, Local};
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const EXIT_POLL: Duration = Duration::from_millis(50);

/// One line of subprocess output, stamped when it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeLine {
    pub text: String,
    pub received_at: DateTime<Local>,
}

impl ProbeLine {
    pub fn new(text: impl Into<String>, received_at: DateTime<Local>) -> Self {
        Self {
            text: text.into(),
            received_at,
        }
    }
}

/// Shared handle used to terminate the probe subprocess from anywhere.
#[derive(Clone)]
pub struct ProbeHandle {
    child: Arc<Mutex<Child>>,
    pid: u32,
}

impl ProbeHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Kill and reap the subprocess. Safe to call more than once.
    pub fn kill(&self) {
        let mut child = match self.child.lock() {
            Ok(child) => child,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        if let Err(err) = child.kill() {
            debug!(pid = self.pid, %err, "probe kill failed");
        }
        let _ = child.wait();
    }
}

/// Launch the probe subprocess and forward its stdout lines to `sender`.
///
/// The sender is dropped when stdout closes, which ends the receiving side.
pub fn spawn_probe_stream(
    dialect: &dyn ProbeDialect,
    host: &str,
    sender: Sender<ProbeLine>,
) -> Result<ProbeHandle, ProbeError> {
    let program = dialect.program();
    let args = dialect.args(host);

    let mut child = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProbeError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let pid = child.id();
    info!(program, ?args, pid, platform = dialect.name(), "probe started");

    let stdout = child.stdout.take().ok_or(ProbeError::MissingPipe("stdout"))?;
    let stderr = child.stderr.take().ok_or(ProbeError::MissingPipe("stderr"))?;

    let handle = ProbeHandle {
        child: Arc::new(Mutex::new(child)),
        pid,
    };

    let exit_handle = handle.clone();
    thread::spawn(move || {
        let reader = BufReader::new(stdout);
        for chunk in reader.split(b'\n') {
            let Ok(bytes) = chunk else { break };
            let text = String::from_utf8_lossy(&bytes)
                .trim_end_matches('\r')
                .to_string();
            if sender.send(ProbeLine::new(text, Local::now())).is_err() {
                break;
            }
        }
        drop(sender);
        log_exit(&exit_handle);
    });

    thread::spawn(move || {
        let reader = BufReader::new(stderr);
        for line in reader.lines().map_while(Result::ok) {
            if !line.trim().is_empty() {
                warn!(pid, "probe stderr: {line}");
            }
        }
    });

    Ok(handle)
}

fn log_exit(handle: &ProbeHandle) {
    // Never block while holding the child lock; `kill` needs it.
    loop {
        let status = match handle.child.lock() {
            Ok(mut child) => child.try_wait(),
            Err(poisoned) => poisoned.into_inner().try_wait(),
        };
        match status {
            Ok(Some(status)) => {
                info!(pid = handle.pid, %status, "probe exited");
                return;
            }
            Ok(None) => thread::sleep(EXIT_POLL),
            Err(err) => {
                warn!(pid = handle.pid, %err, "failed to reap probe");
                return;
            }
        }
    }
}

/// Blocking, ordered sequence of probe output lines.
///
/// Owns the subprocess: dropping the source kills it. The sequence ends when
/// the subprocess closes its stdout.
pub struct ProbeSource {
    lines: Receiver<ProbeLine>,
    handle: ProbeHandle,
}

impl ProbeSource {
    pub fn spawn(dialect: &dyn ProbeDialect, host: &str) -> Result<Self, ProbeError> {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_probe_stream(dialect, host, tx)?;
        Ok(Self { lines: rx, handle })
    }

    pub fn handle(&self) -> ProbeHandle {
        self.handle.clone()
    }
}

impl Iterator for ProbeSource {
    type Item = ProbeLine;

    fn next(&mut self) -> Option<ProbeLine> {
        self.lines.recv().ok()
    }
}

impl Drop for ProbeSource {
    fn drop(&mut self) {
        self.handle.kill();
    }
}
