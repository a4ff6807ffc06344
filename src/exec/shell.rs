// src/exec/shell.rs

use std::collections::VecDeque;
use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// How many trailing stderr lines are kept as failure detail.
const STDERR_TAIL_LINES: usize = 20;

/// Fill `{slot}` placeholders in a command template with literal values.
pub fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (slot, value) in slots {
        out = out.replace(&format!("{{{slot}}}"), value);
    }
    out
}

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Run one external step command to completion.
///
/// Stdout is streamed to the log at debug level; the stderr tail is
/// collected and becomes the failure detail when the command exits
/// non-zero.
pub async fn run_step(task: &str, command: &str) -> Result<()> {
    info!(task = %task, cmd = %command, "starting step process");

    let mut cmd = shell_command(command);
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{task}'"))?;

    let out_handle = child.stdout.take().map(|stdout| {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stdout: {line}");
            }
        })
    });

    let err_handle = child.stderr.take().map(|stderr| {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {line}");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{task}'"))?;

    if let Some(handle) = out_handle {
        let _ = handle.await;
    }
    let tail = match err_handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => VecDeque::new(),
    };

    let code = status.code().unwrap_or(-1);
    info!(
        task = %task,
        exit_code = code,
        success = status.success(),
        "step process exited"
    );

    if status.success() {
        return Ok(());
    }

    let detail: Vec<String> = tail.into_iter().collect();
    if detail.is_empty() {
        bail!("command exited with status {code}");
    }
    bail!("command exited with status {code}\n{}", detail.join("\n"));
}

/// Run a list of step commands sequentially, stopping at the first failure.
pub async fn run_steps(task: &str, commands: &[String]) -> Result<()> {
    for command in commands {
        run_step(task, command).await?;
    }
    Ok(())
}

/// Spawn a side-effect command without waiting for it.
///
/// Used for the notification and live-reload sinks; failures are logged at
/// debug and never surface to the caller.
pub fn spawn_fire_and_forget(command: &str) {
    let mut cmd = shell_command(command);
    cmd.stdout(Stdio::null()).stderr(Stdio::null());

    match cmd.spawn() {
        Ok(mut child) => {
            let command = command.to_string();
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) if !status.success() => {
                        debug!(
                            cmd = %command,
                            code = ?status.code(),
                            "fire-and-forget command exited non-zero"
                        );
                    }
                    Err(err) => {
                        debug!(cmd = %command, error = %err, "fire-and-forget wait failed");
                    }
                    _ => {}
                }
            });
        }
        Err(err) => {
            debug!(cmd = %command, error = %err, "failed to spawn fire-and-forget command");
        }
    }
}
