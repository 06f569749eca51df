//! External tool execution
//!
//! This module is the only place that spawns SDK tools. Every invocation:
//!
//! - Runs in its own process group and is registered with
//!   `ChildRegistry::global()` until reaped
//! - Merges stdout and stderr into one line channel fed by two reader threads
//! - Feeds stdin according to its [`StdinPlan`]
//!
//! # Data paths
//!
//! Output, input and completion are independent. The reader threads only
//! touch the output pipes, the auto-answer writer only touches stdin, and the
//! caller owns completion through [`RunningProcess::wait`]. None of them
//! waits on another, so a tool that prompts while its output pipe is full
//! cannot deadlock the front-end.
//!
//! # Example
//!
//! ```ignore
//! use avidia::process_runner::{run_streaming, ProcessSpec, StdinPlan};
//!
//! let spec = ProcessSpec::new("/opt/android/cmdline-tools/latest/bin/sdkmanager")
//!     .arg("platform-tools")
//!     .stdin(StdinPlan::auto_answer("y", Duration::from_secs(1)));
//!
//! let result = run_streaming(spec, |line| println!("{}", line.text))?;
//! ```

use crate::error::Result;
use crate::process_guard::{kill_process_group, ChildRegistry, CommandProcessGroup};
use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// What the child's stdin is connected to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinPlan {
    /// `/dev/null`
    Null,
    /// A pipe the caller writes through [`RunningProcess::input`]
    Piped,
    /// Lines written once right after spawn, then stdin is closed
    Scripted(Vec<String>),
    /// `line` written every `interval` by a background writer until the
    /// invocation completes
    AutoAnswer { line: String, interval: Duration },
    /// The parent's terminal
    Inherit,
}

impl StdinPlan {
    pub fn scripted(line: impl Into<String>) -> Self {
        Self::Scripted(vec![line.into()])
    }

    pub fn auto_answer(line: impl Into<String>, interval: Duration) -> Self {
        Self::AutoAnswer {
            line: line.into(),
            interval,
        }
    }
}

/// Whether stdout/stderr are captured or handed to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    Piped,
    /// Foreground: the child owns the terminal and stays in our process
    /// group so it can read from the tty
    Inherit,
}

/// Everything needed to launch one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Added on top of the inherited environment
    pub env: Vec<(String, String)>,
    pub stdin: StdinPlan,
    pub cwd: Option<PathBuf>,
    pub stdio: StdioMode,
}

impl ProcessSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            stdin: StdinPlan::Null,
            cwd: None,
            stdio: StdioMode::Piped,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn envs<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env.extend(vars);
        self
    }

    pub fn stdin(mut self, plan: StdinPlan) -> Self {
        self.stdin = plan;
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Inherit the terminal for stdin, stdout and stderr
    pub fn foreground(mut self) -> Self {
        self.stdio = StdioMode::Inherit;
        self.stdin = StdinPlan::Inherit;
        self
    }

    /// File name of the program, for messages
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Shell-like rendering for logs
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Why a spawn failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchFailureKind {
    NotFound,
    PermissionDenied,
    Other,
}

impl fmt::Display for LaunchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Other => write!(f, "launch error"),
        }
    }
}

/// The tool could not be started at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to launch {program}: {message}")]
pub struct LaunchFailure {
    pub program: String,
    pub kind: LaunchFailureKind,
    pub message: String,
}

impl LaunchFailure {
    fn from_io(program: String, err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => LaunchFailureKind::NotFound,
            std::io::ErrorKind::PermissionDenied => LaunchFailureKind::PermissionDenied,
            _ => LaunchFailureKind::Other,
        };
        Self {
            program,
            kind,
            message: err.to_string(),
        }
    }
}

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Exited(i32),
    /// Killed by the given signal number
    Terminated(i32),
    LaunchFailed(LaunchFailureKind, String),
}

/// Result of one invocation. Output is not retained here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub outcome: ProcessOutcome,
    /// Lines the auto-answer writer delivered
    pub answers_written: usize,
}

impl ProcessResult {
    pub fn launch_failed(failure: &LaunchFailure) -> Self {
        Self {
            outcome: ProcessOutcome::LaunchFailed(failure.kind, failure.message.clone()),
            answers_written: 0,
        }
    }

    /// Exit code 0
    pub fn success(&self) -> bool {
        self.outcome == ProcessOutcome::Exited(0)
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.outcome {
            ProcessOutcome::Exited(code) => Some(code),
            _ => None,
        }
    }

    /// One-line description for failure messages
    pub fn describe(&self) -> String {
        match &self.outcome {
            ProcessOutcome::Exited(0) => "completed successfully".to_string(),
            ProcessOutcome::Exited(code) => format!("exited with code {}", code),
            ProcessOutcome::Terminated(sig) => format!("terminated by signal {}", sig),
            ProcessOutcome::LaunchFailed(kind, message) => {
                format!("could not be started ({}): {}", kind, message)
            }
        }
    }
}

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// One line of tool output, without its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: Stream,
    pub text: String,
}

/// Result of a bounded wait for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Line(OutputLine),
    Timeout,
    /// Both output pipes are closed
    Eof,
}

/// Background writer feeding the auto-answer line
struct AnswerWriter {
    cancel: Sender<()>,
    handle: JoinHandle<usize>,
}

impl AnswerWriter {
    fn spawn(mut stdin: ChildStdin, line: String, interval: Duration) -> Self {
        let (cancel, cancel_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            let payload = format!("{}\n", line);
            let mut written = 0usize;
            loop {
                if let Err(e) = stdin
                    .write_all(payload.as_bytes())
                    .and_then(|_| stdin.flush())
                {
                    tracing::debug!(error = %e, written, "auto-answer writer stopped, stdin closed");
                    break;
                }
                written += 1;
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Cancelled, or the invocation dropped its sender
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            written
        });
        Self { cancel, handle }
    }

    /// Cancel and join. Returns the number of lines written.
    fn stop(self) -> usize {
        let _ = self.cancel.send(());
        drop(self.cancel);
        self.handle.join().unwrap_or_else(|_| {
            tracing::error!("auto-answer writer panicked");
            0
        })
    }
}

/// Split raw output into lines; carriage-return redraws keep only their
/// last non-empty segment
fn clean_line(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches(['\n', '\r']);
    text.rsplit('\r')
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
        .to_string()
}

fn spawn_reader<R: Read + Send + 'static>(
    pipe: R,
    stream: Stream,
    tx: Sender<OutputLine>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut raw = Vec::new();
        loop {
            raw.clear();
            match reader.read_until(b'\n', &mut raw) {
                Ok(0) => break,
                Ok(_) => {
                    let line = OutputLine {
                        stream,
                        text: clean_line(&raw),
                    };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, ?stream, "output reader stopped");
                    break;
                }
            }
        }
    })
}

/// A spawned tool invocation
pub struct RunningProcess {
    program: String,
    pid: u32,
    child: Option<Child>,
    lines: Receiver<OutputLine>,
    readers: Vec<JoinHandle<()>>,
    stdin: Option<ChildStdin>,
    writer: Option<AnswerWriter>,
}

/// Spawn a tool according to `spec`
pub fn start(spec: ProcessSpec) -> std::result::Result<RunningProcess, LaunchFailure> {
    let program = spec.program_name();
    tracing::info!(command = %spec.command_line(), env = ?spec.env, "starting tool");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args).envs(spec.env.iter().cloned());
    if let Some(dir) = &spec.cwd {
        cmd.current_dir(dir);
    }

    cmd.stdin(match spec.stdin {
        StdinPlan::Null => Stdio::null(),
        StdinPlan::Inherit => Stdio::inherit(),
        StdinPlan::Piped | StdinPlan::Scripted(_) | StdinPlan::AutoAnswer { .. } => Stdio::piped(),
    });

    match spec.stdio {
        StdioMode::Piped => {
            cmd.stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .in_new_process_group();
        }
        StdioMode::Inherit => {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
    }

    let mut child = cmd.spawn().map_err(|e| {
        let failure = LaunchFailure::from_io(program.clone(), &e);
        tracing::warn!(program = %program, kind = %failure.kind, error = %e, "launch failed");
        failure
    })?;
    let pid = child.id();

    if let Ok(mut registry) = ChildRegistry::global().lock() {
        registry.register(pid);
    }

    let (tx, lines) = mpsc::channel();
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, Stream::Stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, Stream::Stderr, tx.clone()));
    }
    // End of stream is both readers finishing
    drop(tx);

    let mut stdin = None;
    let mut writer = None;
    match spec.stdin {
        StdinPlan::Piped => stdin = child.stdin.take(),
        StdinPlan::Scripted(answers) => {
            if let Some(mut pipe) = child.stdin.take() {
                for answer in &answers {
                    if let Err(e) = writeln!(pipe, "{}", answer) {
                        tracing::debug!(error = %e, "tool closed stdin before reading its answers");
                        break;
                    }
                }
                // Dropping the pipe closes stdin
            }
        }
        StdinPlan::AutoAnswer { line, interval } => {
            if let Some(pipe) = child.stdin.take() {
                writer = Some(AnswerWriter::spawn(pipe, line, interval));
            }
        }
        StdinPlan::Null | StdinPlan::Inherit => {}
    }

    Ok(RunningProcess {
        program,
        pid,
        child: Some(child),
        lines,
        readers,
        stdin,
        writer,
    })
}

impl RunningProcess {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Block until the next line; `None` at end of output
    pub fn next_line(&mut self) -> Option<OutputLine> {
        self.lines.recv().ok()
    }

    /// Wait at most `timeout` for the next line
    pub fn next_line_timeout(&mut self, timeout: Duration) -> LineEvent {
        match self.lines.recv_timeout(timeout) {
            Ok(line) => LineEvent::Line(line),
            Err(RecvTimeoutError::Timeout) => LineEvent::Timeout,
            Err(RecvTimeoutError::Disconnected) => LineEvent::Eof,
        }
    }

    /// Stdin writer, available for `StdinPlan::Piped` until closed
    pub fn input(&mut self) -> Option<&mut ChildStdin> {
        self.stdin.as_mut()
    }

    /// Close a piped stdin so the tool sees end of input
    pub fn close_input(&mut self) {
        self.stdin = None;
    }

    /// Deliver all remaining output to `on_line`, stop the auto-answer
    /// writer and reap the tool.
    ///
    /// Every line the tool wrote before exiting reaches `on_line` before
    /// this returns.
    pub fn wait<F>(mut self, mut on_line: F) -> Result<ProcessResult>
    where
        F: FnMut(OutputLine),
    {
        self.close_input();

        // The writer keeps answering prompts while output drains
        while let Ok(line) = self.lines.recv() {
            on_line(line);
        }
        for reader in self.readers.drain(..) {
            let _ = reader.join();
        }

        let answers_written = self.writer.take().map(AnswerWriter::stop).unwrap_or(0);

        let status = match self.child.take() {
            Some(mut child) => {
                let status = child.wait();
                self.unregister();
                status?
            }
            None => {
                return Err(crate::error::AvidiaError::process(format!(
                    "{} was already reaped",
                    self.program
                )))
            }
        };

        let outcome = match (status.code(), status.signal()) {
            (Some(code), _) => ProcessOutcome::Exited(code),
            (None, Some(sig)) => ProcessOutcome::Terminated(sig),
            (None, None) => ProcessOutcome::Exited(-1),
        };
        let result = ProcessResult {
            outcome,
            answers_written,
        };
        tracing::info!(program = %self.program, pid = self.pid, outcome = %result.describe(), answers_written, "tool finished");
        Ok(result)
    }

    fn unregister(&self) {
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(self.pid);
        }
    }
}

impl Drop for RunningProcess {
    fn drop(&mut self) {
        self.stdin = None;
        if let Some(writer) = self.writer.take() {
            writer.stop();
        }
        if let Some(mut child) = self.child.take() {
            tracing::warn!(program = %self.program, pid = self.pid, "abandoning running tool, killing its process group");
            kill_process_group(self.pid);
            let _ = child.wait();
            self.unregister();
        }
    }
}

/// Run to completion, handing each line to `on_line` as it arrives.
/// A launch failure becomes a `LaunchFailed` result.
pub fn run_streaming<F>(spec: ProcessSpec, on_line: F) -> Result<ProcessResult>
where
    F: FnMut(OutputLine),
{
    match start(spec) {
        Ok(process) => process.wait(on_line),
        Err(failure) => Ok(ProcessResult::launch_failed(&failure)),
    }
}

/// Output of [`run_captured`]
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub result: ProcessResult,
    pub lines: Vec<OutputLine>,
}

impl CapturedOutput {
    /// Stdout lines only
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.stream == Stream::Stdout)
            .map(|l| l.text.as_str())
    }

    /// All lines joined with newlines, in arrival order
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.text);
            text.push('\n');
        }
        text
    }
}

/// Run to completion and keep every line
pub fn run_captured(spec: ProcessSpec) -> Result<CapturedOutput> {
    let mut lines = Vec::new();
    let result = run_streaming(spec, |line| lines.push(line))?;
    Ok(CapturedOutput { result, lines })
}

/// Run with the terminal handed to the child
pub fn run_foreground(spec: ProcessSpec) -> Result<ProcessResult> {
    run_streaming(spec.foreground(), |_| {})
}
