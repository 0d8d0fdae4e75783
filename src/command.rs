use std::path::PathBuf;

use crate::error::Error;

/// Operator command decoded from a tokenized line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Map { path: PathBuf },
    Dataset { path: PathBuf, model_dir: PathBuf },
    DatasetTrajectory,
    MapTrajectory,
    Find { seconds: f64 },
    Save { seconds: f64 },
    Zoom { ratio: f64 },
    Help,
    Quit,
}

/// Entry of the command table.
pub struct CommandSpec {
    pub name: &'static str,
    /// Minimum number of arguments.
    pub arity: usize,
    pub usage: &'static str,
    pub summary: &'static str,
    decode: fn(&[&str]) -> Result<Command, Error>,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "map",
        arity: 1,
        usage: "map <path>",
        summary: "load a map, releasing the previous one",
        decode: |args| {
            Ok(Command::Map {
                path: PathBuf::from(args[0]),
            })
        },
    },
    CommandSpec {
        name: "dataset",
        arity: 2,
        usage: "dataset <path> <model-dir>",
        summary: "open a dataset, releasing the previous one",
        decode: |args| {
            Ok(Command::Dataset {
                path: PathBuf::from(args[0]),
                model_dir: PathBuf::from(args[1]),
            })
        },
    },
    CommandSpec {
        name: "dataset_trajectory",
        arity: 0,
        usage: "dataset_trajectory",
        summary: "dump the dataset ground-truth trajectory",
        decode: |_| Ok(Command::DatasetTrajectory),
    },
    CommandSpec {
        name: "map_trajectory",
        arity: 0,
        usage: "map_trajectory",
        summary: "dump the map camera trajectory",
        decode: |_| Ok(Command::MapTrajectory),
    },
    CommandSpec {
        name: "find",
        arity: 1,
        usage: "find <seconds>",
        summary: "localize the dataset frame at the given elapsed time",
        decode: |args| {
            Ok(Command::Find {
                seconds: parse_number(args[0])?,
            })
        },
    },
    CommandSpec {
        name: "save",
        arity: 1,
        usage: "save <seconds>",
        summary: "save the dataset frame at the given elapsed time",
        decode: |args| {
            Ok(Command::Save {
                seconds: parse_number(args[0])?,
            })
        },
    },
    CommandSpec {
        name: "zoom",
        arity: 1,
        usage: "zoom <ratio>",
        summary: "set the zoom ratio of dataset frames",
        decode: |args| {
            Ok(Command::Zoom {
                ratio: parse_number(args[0])?,
            })
        },
    },
    CommandSpec {
        name: "help",
        arity: 0,
        usage: "help",
        summary: "list commands",
        decode: |_| Ok(Command::Help),
    },
    CommandSpec {
        name: "quit",
        arity: 0,
        usage: "quit",
        summary: "leave",
        decode: |_| Ok(Command::Quit),
    },
];

fn parse_number(token: &str) -> Result<f64, Error> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::invalid_parameter(format!(
            "`{token}` is not a finite number"
        ))),
    }
}

impl Command {
    /// Decodes a tokenized line. Blank lines decode to `None`.
    ///
    /// Arguments beyond the command arity are ignored.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Option<Self>, Error> {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let name = name.as_ref();
        let spec = COMMANDS
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| Error::invalid_parameter(format!("Unknown command `{name}`, try `help`")))?;

        let args = args.iter().map(|arg| arg.as_ref()).collect::<Vec<&str>>();
        if args.len() < spec.arity {
            return Err(Error::invalid_parameter(format!("Usage: {}", spec.usage)));
        }
        if args.len() > spec.arity {
            log::warn!(
                "Ignoring extra arguments of `{name}`: {}",
                args[spec.arity..].join(" ")
            );
        }

        (spec.decode)(&args).map(Some)
    }
}
