use crate::scheduler::RunHandle;
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Pause,
    Resume,
    Stop,
}

/// Maps a line typed during a run to a command. Accepts the single-letter
/// forms and the full words, case-insensitively.
pub fn parse_command(line: &str) -> Option<ControlCommand> {
    match line.trim().to_lowercase().as_str() {
        "p" | "pause" => Some(ControlCommand::Pause),
        "r" | "resume" => Some(ControlCommand::Resume),
        "q" | "quit" | "stop" => Some(ControlCommand::Stop),
        _ => None,
    }
}

pub fn apply_command(handle: &RunHandle, command: ControlCommand) -> bool {
    match command {
        ControlCommand::Pause => handle.pause(),
        ControlCommand::Resume => handle.resume(),
        ControlCommand::Stop => handle.stop(),
    }
}

/// Reads pause/resume/stop commands from stdin for the rest of the run.
/// Returns `None` when stdin is not a terminal.
pub fn spawn_control_listener(handle: RunHandle) -> Option<JoinHandle<()>> {
    if !std::io::stdin().is_terminal() {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(&line) {
                Some(command) => {
                    apply_command(&handle, command);
                    if command == ControlCommand::Stop {
                        break;
                    }
                }
                None => debug!("ignoring console input {:?}", line),
            }
        }
    }))
}
