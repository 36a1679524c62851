//! Control command parsing

use ledtrig_core::DeviceId;
use ledtrig_types::ParseDeviceIdError;
use std::str::FromStr;
use thiserror::Error;

/// One administrative command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Print registered devices
    List,
    /// Add a trigger for a device
    Register(DeviceId),
    /// Remove a device's trigger
    Unregister(DeviceId),
    /// Fire a device's trigger once
    Trigger(DeviceId),
    /// Remove every trigger
    Clear,
}

/// Control input that could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("empty command")]
    Empty,

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{command} expects a <major>:<minor> argument")]
    MissingArgument { command: &'static str },

    #[error("{command} takes no argument, got {argument:?}")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error(transparent)]
    InvalidDevice(#[from] ParseDeviceIdError),
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, argument) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, Some(rest.trim())),
            None => (line, None),
        };

        let device = |command: &'static str| -> Result<DeviceId, ControlError> {
            let text = argument.ok_or(ControlError::MissingArgument { command })?;
            Ok(text.parse::<DeviceId>()?)
        };
        let bare = |command: &'static str, value: ControlCommand| match argument {
            Some(extra) => Err(ControlError::UnexpectedArgument {
                command,
                argument: extra.to_string(),
            }),
            None => Ok(value),
        };

        match name {
            "" => Err(ControlError::Empty),
            "list" => bare("list", ControlCommand::List),
            "clear" => bare("clear", ControlCommand::Clear),
            "register" => Ok(ControlCommand::Register(device("register")?)),
            "unregister" => Ok(ControlCommand::Unregister(device("unregister")?)),
            "trigger" => Ok(ControlCommand::Trigger(device("trigger")?)),
            other => Err(ControlError::UnknownCommand(other.to_string())),
        }
    }
}
