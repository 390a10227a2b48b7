// src/exec/task_runner.rs

//! Individual process runner.

use std::io;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info};

use super::invocation::{CommandError, CommandOutput, Invocation};

const READ_CHUNK: usize = 8 * 1024;

/// Spawn the invocation, drain stdout and stderr concurrently while waiting
/// for it, and return the trimmed output.
///
/// Both drains finish before the exit status is looked at, so a chatty
/// stderr can never block a child that is also writing to stdout.
pub async fn run_process(
    invocation: Invocation,
    echo_output: bool,
) -> Result<CommandOutput, CommandError> {
    let command_line = invocation.command_line();
    info!(
        command = %command_line,
        dir = %invocation.dir.display(),
        "running command"
    );

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .current_dir(&invocation.dir)
        .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| CommandError::Spawn {
        command: command_line.clone(),
        source,
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout_buf, stderr_buf) = tokio::join!(
        child.wait(),
        drain(stdout, echo_output.then(tokio::io::stdout)),
        drain(stderr, echo_output.then(tokio::io::stderr)),
    );

    let status = status.map_err(|source| CommandError::Wait {
        command: command_line.clone(),
        source,
    })?;

    let (stdout_buf, stderr_buf) = match (stdout_buf, stderr_buf) {
        (Ok(out), Ok(err)) => (out, err),
        (Err(source), _) | (_, Err(source)) => {
            return Err(CommandError::Capture {
                command: command_line,
                source,
            });
        }
    };

    let stdout = String::from_utf8_lossy(&stdout_buf).trim().to_string();
    let stderr = String::from_utf8_lossy(&stderr_buf).trim().to_string();

    debug!(
        command = %command_line,
        exit_code = ?status.code(),
        success = status.success(),
        "command exited"
    );

    if !status.success() {
        return Err(CommandError::Exit {
            command: command_line,
            code: status.code(),
            stdout,
            stderr,
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

/// Copy everything from `reader` into a buffer, mirroring to `mirror` when
/// one is given.
async fn drain<R, W>(reader: Option<R>, mut mirror: Option<W>) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let Some(mut reader) = reader else {
        return Ok(captured);
    };

    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&chunk[..n]);
        if let Some(out) = mirror.as_mut() {
            out.write_all(&chunk[..n]).await?;
        }
    }

    if let Some(out) = mirror.as_mut() {
        out.flush().await?;
    }

    Ok(captured)
}
