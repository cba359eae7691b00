//! External process launching.
//!
//! Each active mode corresponds to exactly one fixed program invocation.
//! The argument vectors are constants of the deployment, not user input.

use tokio::process::Command;

use crate::command::Mode;

/// Vision pipeline startup script.
static VISION: ProcessSpec = ProcessSpec {
    program: "vision_startup.sh",
    args: &[],
};

/// Streaming daemon bound to the camera device, with the deployment's
/// encoding, resolution, port, framerate, and rotation baked in.
static VIEWING: ProcessSpec = ProcessSpec {
    program: "/usr/bin/uv4l",
    args: &[
        "--auto-video_nr",
        "--driver",
        "raspicam",
        "--encoding",
        "h264",
        "--width",
        "104",
        "--height",
        "96",
        "--server-option",
        "--port=1187",
        "--framerate",
        "25",
        "--enable-server",
        "on",
        "--rotation",
        "180",
    ],
};

/// Error type for process launching.
///
/// Any of these is fatal to the supervisor: a supervisor that cannot
/// spawn children is assumed unrecoverable.
#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    /// The target executable was not found.
    #[error("executable not found")]
    NotFound,
    /// Permission denied when spawning.
    #[error("permission denied")]
    PermissionDenied,
    /// Other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The child exited before a pid could be recorded.
    #[error("spawned process has no pid")]
    NoPid,
}

impl LaunchError {
    /// Create a `LaunchError` from an I/O error, classifying common cases.
    fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}

/// Opaque identifier for a previously launched external process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle(u32);

impl ProcessHandle {
    /// Wrap a raw OS pid.
    #[must_use]
    pub fn new(pid: u32) -> Self {
        Self(pid)
    }

    /// The raw OS pid.
    #[must_use]
    pub fn pid(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed program invocation: executable path plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    program: &'static str,
    args: &'static [&'static str],
}

impl ProcessSpec {
    /// The spec for the computer-vision pipeline.
    #[must_use]
    pub fn vision() -> &'static Self {
        &VISION
    }

    /// The spec for the remote-viewing streaming daemon.
    #[must_use]
    pub fn viewing() -> &'static Self {
        &VIEWING
    }

    /// The spec for an active mode, or `None` for `Off`/`Invalid`.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Option<&'static Self> {
        match mode {
            Mode::Viewing => Some(Self::viewing()),
            Mode::VisionActive => Some(Self::vision()),
            Mode::Off | Mode::Invalid => None,
        }
    }

    /// The executable path.
    #[must_use]
    pub fn program(&self) -> &'static str {
        self.program
    }

    /// The argument vector (not including the program name).
    #[must_use]
    pub fn args(&self) -> &'static [&'static str] {
        self.args
    }
}

/// Spawn the process described by `spec` and return its pid.
///
/// The child inherits the supervisor's stdio and is not waited on here;
/// the dropped handle is reaped asynchronously by the tokio runtime.
/// Spawn ensures a failed exec terminates the child rather than falling
/// back into supervisor code.
///
/// # Errors
///
/// Returns `LaunchError` if process creation fails. Callers treat this
/// as fatal.
pub fn launch(spec: &ProcessSpec) -> Result<ProcessHandle, LaunchError> {
    let child = Command::new(spec.program)
        .args(spec.args)
        .spawn()
        .map_err(|err| {
            tracing::error!(program = spec.program, error = %err, "failed to spawn process");
            LaunchError::from_io(err)
        })?;

    let pid = child.id().ok_or(LaunchError::NoPid)?;
    tracing::debug!(program = spec.program, pid, "spawned process");
    Ok(ProcessHandle::new(pid))
}
