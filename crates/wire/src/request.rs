//! Command lines sent to the candidate
//!
//! One request per line, space-separated, `\n` terminated:
//!
//! ```text
//! insert <key> <value>
//! lookup <key>
//! increment <key>
//! delete <key>
//! clear
//! compact
//! ```

use std::fmt;

use kvdiff_core::{Key, Operation, Value};

use crate::number::parse_decimal;

/// One command in the candidate protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// `insert <key> <value>`
    Insert {
        /// Key
        key: Key,
        /// Value
        value: Value,
    },
    /// `lookup <key>`; the only request with a response line
    Lookup {
        /// Key
        key: Key,
    },
    /// `increment <key>`
    Increment {
        /// Key
        key: Key,
    },
    /// `delete <key>`
    Delete {
        /// Key
        key: Key,
    },
    /// `clear`
    Clear,
    /// `compact`
    Compact,
}

impl Request {
    /// Whether the candidate answers this request with one line
    pub fn expects_response(&self) -> bool {
        matches!(self, Request::Lookup { .. })
    }
}

impl From<Operation> for Request {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Put { key, value } => Request::Insert { key, value },
            Operation::Lookup { key } => Request::Lookup { key },
            Operation::Increment { key } => Request::Increment { key },
            Operation::Delete { key } => Request::Delete { key },
            Operation::Clear => Request::Clear,
            Operation::Compact => Request::Compact,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Insert { key, value } => write!(f, "insert {} {}", key, value),
            Request::Lookup { key } => write!(f, "lookup {}", key),
            Request::Increment { key } => write!(f, "increment {}", key),
            Request::Delete { key } => write!(f, "delete {}", key),
            Request::Clear => write!(f, "clear"),
            Request::Compact => write!(f, "compact"),
        }
    }
}

/// Encode a request as a full protocol line, including the terminator
pub fn encode_request(request: &Request) -> String {
    format!("{}\n", request)
}

/// Errors parsing a request line (candidate side)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Blank line
    #[error("empty request line")]
    Empty,

    /// First token is not a known command
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Command is missing an operand
    #[error("{command}: missing {operand}")]
    MissingOperand {
        /// Command name
        command: &'static str,
        /// Operand name
        operand: &'static str,
    },

    /// Operand is not a 32-bit unsigned decimal
    #[error("{command}: invalid {operand} {text:?}")]
    InvalidOperand {
        /// Command name
        command: &'static str,
        /// Operand name
        operand: &'static str,
        /// Offending token
        text: String,
    },

    /// Extra tokens after the last operand
    #[error("{command}: unexpected trailing input {text:?}")]
    TrailingInput {
        /// Command name
        command: &'static str,
        /// First unexpected token
        text: String,
    },
}

/// Parse one request line
///
/// Tokens are separated by ASCII whitespace; the line terminator is optional.
pub fn parse_request(line: &str) -> Result<Request, RequestError> {
    let mut tokens = line.split_ascii_whitespace();
    let command = tokens.next().ok_or(RequestError::Empty)?;

    let request = match command {
        "insert" => {
            let key = operand(&mut tokens, "insert", "key")?;
            let value = operand(&mut tokens, "insert", "value")?;
            finish(tokens, "insert", Request::Insert { key, value })?
        }
        "lookup" => {
            let key = operand(&mut tokens, "lookup", "key")?;
            finish(tokens, "lookup", Request::Lookup { key })?
        }
        "increment" => {
            let key = operand(&mut tokens, "increment", "key")?;
            finish(tokens, "increment", Request::Increment { key })?
        }
        "delete" => {
            let key = operand(&mut tokens, "delete", "key")?;
            finish(tokens, "delete", Request::Delete { key })?
        }
        "clear" => finish(tokens, "clear", Request::Clear)?,
        "compact" => finish(tokens, "compact", Request::Compact)?,
        other => return Err(RequestError::UnknownCommand(other.to_string())),
    };

    Ok(request)
}

fn operand<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    operand: &'static str,
) -> Result<u32, RequestError> {
    let text = tokens
        .next()
        .ok_or(RequestError::MissingOperand { command, operand })?;
    parse_decimal(text).ok_or_else(|| RequestError::InvalidOperand {
        command,
        operand,
        text: text.to_string(),
    })
}

fn finish<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    command: &'static str,
    request: Request,
) -> Result<Request, RequestError> {
    match tokens.next() {
        Some(extra) => Err(RequestError::TrailingInput {
            command,
            text: extra.to_string(),
        }),
        None => Ok(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_all_commands() {
        let cases = [
            (Request::Insert { key: 1, value: 4294967295 }, "insert 1 4294967295\n"),
            (Request::Lookup { key: 0 }, "lookup 0\n"),
            (Request::Increment { key: 7 }, "increment 7\n"),
            (Request::Delete { key: 9 }, "delete 9\n"),
            (Request::Clear, "clear\n"),
            (Request::Compact, "compact\n"),
        ];
        for (request, line) in cases {
            assert_eq!(encode_request(&request), line);
        }
    }

    #[test]
    fn test_from_operation() {
        assert_eq!(
            Request::from(Operation::Put { key: 3, value: 5 }),
            Request::Insert { key: 3, value: 5 }
        );
        assert_eq!(Request::from(Operation::Compact), Request::Compact);
    }

    #[test]
    fn test_only_lookup_expects_response() {
        assert!(Request::Lookup { key: 1 }.expects_response());
        assert!(!Request::Insert { key: 1, value: 1 }.expects_response());
        assert!(!Request::Clear.expects_response());
    }

    #[test]
    fn test_parse_request() {
        assert_eq!(
            parse_request("insert 10 20\n").unwrap(),
            Request::Insert { key: 10, value: 20 }
        );
        assert_eq!(parse_request("  lookup\t3 \r\n").unwrap(), Request::Lookup { key: 3 });
        assert_eq!(parse_request("clear").unwrap(), Request::Clear);
    }

    #[test]
    fn test_parse_request_errors() {
        assert_eq!(parse_request("\n").unwrap_err(), RequestError::Empty);
        assert!(matches!(
            parse_request("upsert 1 2").unwrap_err(),
            RequestError::UnknownCommand(c) if c == "upsert"
        ));
        assert!(matches!(
            parse_request("insert 1").unwrap_err(),
            RequestError::MissingOperand { operand: "value", .. }
        ));
        assert!(matches!(
            parse_request("delete -1").unwrap_err(),
            RequestError::InvalidOperand { .. }
        ));
        assert!(matches!(
            parse_request("lookup 4294967296").unwrap_err(),
            RequestError::InvalidOperand { .. }
        ));
        assert!(matches!(
            parse_request("compact now").unwrap_err(),
            RequestError::TrailingInput { .. }
        ));
    }
}
