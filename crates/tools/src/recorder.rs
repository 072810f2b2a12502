//! Pipe raw RGB frames into an external encoder.
//!
//! The recorder owns the encoder process. Frames go down its stdin as
//! tightly packed bottom-up RGB24 rows (the order `glReadPixels` returns),
//! and the encoder flips them back with `-vf vflip`. A slow encoder blocks
//! the write, which throttles the render loop.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum ToolsError {
    #[error("failed to start encoder `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("frame is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
    #[error("encoder pipe error: {0}")]
    Pipe(#[from] std::io::Error),
    #[error("recorder already finished")]
    Closed,
    #[error("encoder exited with {0}")]
    EncoderFailed(ExitStatus),
}

/// Encoder invocation for one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub program: String,
}

impl RecorderConfig {
    pub fn new(output: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            output: output.into(),
            width,
            height,
            fps: 60,
            program: "ffmpeg".into(),
        }
    }

    /// Command-line arguments for `ffmpeg`.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s"]
            .map(String::from)
            .into();
        args.push(format!("{}x{}", self.width, self.height));
        args.push("-r".into());
        args.push(self.fps.to_string());
        let tail = ["-i", "-", "-vf", "vflip", "-c:v", "libx264", "-pix_fmt", "yuv420p"];
        args.extend(tail.map(String::from));
        args.push(self.output.display().to_string());
        args
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args()).stdout(Stdio::null()).stderr(Stdio::null());
        cmd
    }
}

pub struct FrameRecorder {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
    frames: u64,
}

impl FrameRecorder {
    /// Spawn the encoder described by `config`.
    pub fn start(config: &RecorderConfig) -> Result<Self, ToolsError> {
        let recorder = Self::with_command(config.command(), config.width, config.height)?;
        tracing::info!(
            output = %config.output.display(),
            width = config.width,
            height = config.height,
            fps = config.fps,
            "recording started"
        );
        Ok(recorder)
    }

    /// Spawn an arbitrary frame sink. Its stdin is replaced with a pipe.
    pub fn with_command(
        mut command: Command,
        width: u32,
        height: u32,
    ) -> Result<Self, ToolsError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| ToolsError::Spawn { program, source })?;
        let stdin = child.stdin.take();
        Ok(Self {
            child: Some(child),
            stdin,
            width,
            height,
            frames: 0,
        })
    }

    /// Frame size fixed at start; every frame must match it.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes in one frame: `width * height * 3`.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    pub fn write_frame(&mut self, rgb: &[u8]) -> Result<(), ToolsError> {
        if rgb.len() != self.frame_len() {
            return Err(ToolsError::FrameSize {
                expected: self.frame_len(),
                actual: rgb.len(),
            });
        }
        let stdin = self.stdin.as_mut().ok_or(ToolsError::Closed)?;
        stdin.write_all(rgb)?;
        self.frames += 1;
        Ok(())
    }

    /// Close the pipe and wait for the encoder to flush and exit.
    pub fn finish(mut self) -> Result<ExitStatus, ToolsError> {
        drop(self.stdin.take());
        let mut child = self.child.take().ok_or(ToolsError::Closed)?;
        let status = child.wait()?;
        tracing::info!(frames = self.frames, %status, "recording finished");
        if status.success() {
            Ok(status)
        } else {
            Err(ToolsError::EncoderFailed(status))
        }
    }
}

impl Drop for FrameRecorder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.wait() {
                tracing::warn!("encoder did not exit cleanly: {e}");
            }
        }
    }
}

impl std::fmt::Debug for FrameRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRecorder")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
