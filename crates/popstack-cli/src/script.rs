//! Script parsing
//!
//! One step per line, `#` starts a comment:
//!
//! ```text
//! push toast        # append
//! unshift modal     # show in front
//! swap banner       # replace the shown popup
//! hide [name]       # remove the front, or a named popup
//! clear
//! dismiss toast     # the popup asks to be hidden
//! emit push toast   # send a command through the engine
//! wait 5            # milliseconds
//! status
//! ```

use std::time::Duration;

use popstack_core::PopupCommand;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown step '{word}'")]
    UnknownStep { line: usize, word: String },

    #[error("line {line}: '{step}' needs a popup name")]
    MissingName { line: usize, step: String },

    #[error("line {line}: '{step}' takes no further arguments, found '{extra}'")]
    UnexpectedArgument {
        line: usize,
        step: String,
        extra: String,
    },

    #[error("line {line}: '{value}' is not a duration in milliseconds")]
    InvalidDuration { line: usize, value: String },

    #[error("line {line}: '{name}' is not a popup command")]
    UnknownCommand { line: usize, name: String },
}

/// One script instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Push(String),
    Unshift(String),
    Swap(String),
    Hide(Option<String>),
    Clear,
    Dismiss(String),
    /// Publish `command` on the engine under the controller's namespace
    Emit {
        command: String,
        target: Option<String>,
    },
    Wait(Duration),
    Status,
}

/// Parse a whole script, skipping blank lines and comments
pub fn parse(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        if let Some(step) = parse_line(index + 1, raw)? {
            steps.push(step);
        }
    }
    Ok(steps)
}

fn parse_line(line: usize, raw: &str) -> Result<Option<Step>, ScriptError> {
    let text = raw.split('#').next().unwrap_or_default();
    let mut words = text.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let step = match word {
        "push" => Step::Push(name(line, word, &args)?),
        "unshift" => Step::Unshift(name(line, word, &args)?),
        "swap" => Step::Swap(name(line, word, &args)?),
        "dismiss" => Step::Dismiss(name(line, word, &args)?),
        "hide" => Step::Hide(optional_name(line, word, &args)?),
        "clear" => {
            no_args(line, word, &args)?;
            Step::Clear
        }
        "status" => {
            no_args(line, word, &args)?;
            Step::Status
        }
        "wait" => {
            let value = name(line, word, &args)?;
            let ms = value
                .parse::<u64>()
                .map_err(|_| ScriptError::InvalidDuration { line, value })?;
            Step::Wait(Duration::from_millis(ms))
        }
        "emit" => parse_emit(line, &args)?,
        other => {
            return Err(ScriptError::UnknownStep {
                line,
                word: other.to_string(),
            })
        }
    };
    Ok(Some(step))
}

fn parse_emit(line: usize, args: &[&str]) -> Result<Step, ScriptError> {
    let Some((&command, rest)) = args.split_first() else {
        return Err(ScriptError::MissingName {
            line,
            step: "emit".to_string(),
        });
    };
    if !PopupCommand::NAMES.contains(&command) {
        return Err(ScriptError::UnknownCommand {
            line,
            name: command.to_string(),
        });
    }

    let step = format!("emit {}", command);
    let target = match command {
        "clear" => {
            no_args(line, &step, rest)?;
            None
        }
        "hide" => optional_name(line, &step, rest)?,
        _ => Some(name(line, &step, rest)?),
    };
    Ok(Step::Emit {
        command: command.to_string(),
        target,
    })
}

fn name(line: usize, step: &str, args: &[&str]) -> Result<String, ScriptError> {
    match args {
        [] => Err(ScriptError::MissingName {
            line,
            step: step.to_string(),
        }),
        [value] => Ok(value.to_string()),
        [_, extra, ..] => Err(ScriptError::UnexpectedArgument {
            line,
            step: step.to_string(),
            extra: extra.to_string(),
        }),
    }
}

fn optional_name(line: usize, step: &str, args: &[&str]) -> Result<Option<String>, ScriptError> {
    if args.is_empty() {
        Ok(None)
    } else {
        name(line, step, args).map(Some)
    }
}

fn no_args(line: usize, step: &str, args: &[&str]) -> Result<(), ScriptError> {
    match args.first() {
        None => Ok(()),
        Some(extra) => Err(ScriptError::UnexpectedArgument {
            line,
            step: step.to_string(),
            extra: extra.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_step() {
        let steps = parse(
            "push a\nunshift b\nswap c\nhide\nhide a\nclear\ndismiss a\n\
             emit push a\nemit hide\nemit clear\nwait 5\nstatus\n",
        )
        .expect("valid script");

        assert_eq!(
            steps,
            vec![
                Step::Push("a".into()),
                Step::Unshift("b".into()),
                Step::Swap("c".into()),
                Step::Hide(None),
                Step::Hide(Some("a".into())),
                Step::Clear,
                Step::Dismiss("a".into()),
                Step::Emit {
                    command: "push".into(),
                    target: Some("a".into()),
                },
                Step::Emit {
                    command: "hide".into(),
                    target: None,
                },
                Step::Emit {
                    command: "clear".into(),
                    target: None,
                },
                Step::Wait(Duration::from_millis(5)),
                Step::Status,
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let steps = parse("# setup\n\n   push a   # first popup\n#hide\n").expect("valid script");
        assert_eq!(steps, vec![Step::Push("a".into())]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        assert_eq!(
            parse("push a\nfly away"),
            Err(ScriptError::UnknownStep {
                line: 2,
                word: "fly".into()
            })
        );
        assert_eq!(
            parse("\npush"),
            Err(ScriptError::MissingName {
                line: 2,
                step: "push".into()
            })
        );
        assert_eq!(
            parse("clear now"),
            Err(ScriptError::UnexpectedArgument {
                line: 1,
                step: "clear".into(),
                extra: "now".into()
            })
        );
    }

    #[test]
    fn test_wait_requires_milliseconds() {
        assert_eq!(
            parse("wait soon"),
            Err(ScriptError::InvalidDuration {
                line: 1,
                value: "soon".into()
            })
        );
    }

    #[test]
    fn test_emit_validates_command() {
        assert_eq!(
            parse("emit explode"),
            Err(ScriptError::UnknownCommand {
                line: 1,
                name: "explode".into()
            })
        );
        assert_eq!(
            parse("emit swap"),
            Err(ScriptError::MissingName {
                line: 1,
                step: "emit swap".into()
            })
        );
    }
}
