//! Logic behind the `json-lens` binary.
//!
//! ```text
//! json-lens <path> [--lines]    print the raw result of <path>
//! json-lens --valid             check that stdin is one well-formed value
//! ```
//!
//! The document is read from stdin. With `--lines` the input is treated as
//! JSON Lines and `<path>` (which may then be omitted) is applied to every
//! line.

use std::io::Read;

use thiserror::Error;

use crate::parser::ParseError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("usage: json-lens <path> [--lines] | json-lens --valid")]
    Usage,
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("invalid path: {0}")]
    Path(#[from] ParseError),
    #[error("input is not well-formed JSON")]
    InvalidJson,
    #[error("no match")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query { path: String, lines: bool },
    Validate,
}

/// Parse the arguments that follow the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut path = None;
    let mut lines = false;
    let mut validate = false;
    for arg in args {
        let arg = arg.into();
        match arg.as_str() {
            "--lines" => lines = true,
            "--valid" => validate = true,
            "-h" | "--help" => return Err(CliError::Usage),
            flag if flag.starts_with("--") => return Err(CliError::UnknownOption(arg)),
            _ if path.is_some() => return Err(CliError::Usage),
            _ => path = Some(arg),
        }
    }
    match (validate, path) {
        (true, None) if !lines => Ok(Command::Validate),
        (true, _) => Err(CliError::Usage),
        (false, Some(path)) => Ok(Command::Query { path, lines }),
        (false, None) if lines => Ok(Command::Query { path: String::new(), lines }),
        (false, None) => Err(CliError::Usage),
    }
}

pub fn read_input<R: Read>(mut reader: R) -> Result<String, CliError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Run `command` against `input`, returning the text to print.
pub fn run(command: &Command, input: &str) -> Result<String, CliError> {
    match command {
        Command::Validate if crate::valid(input) => Ok("true".to_owned()),
        Command::Validate => Err(CliError::InvalidJson),
        Command::Query { path, lines } => {
            let path = match (*lines, path.is_empty()) {
                (true, true) => "..".to_owned(),
                (true, false) => format!("..{path}"),
                (false, _) => path.clone(),
            };
            let compiled = crate::compile(&path)?;
            let result = crate::get_path(input, &compiled);
            if result.exists() {
                Ok(result.raw().to_owned())
            } else {
                Err(CliError::NotFound)
            }
        }
    }
}
