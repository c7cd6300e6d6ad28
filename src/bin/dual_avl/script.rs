//! Parsing and replay of command scripts.
//!
//! A script is a whitespace-separated token stream: a command count `n`, followed by `n`
//! commands of the form `<op> <start> <step> <end>`. The op `I` inserts the range and `D`
//! removes it. Any other op is skipped with a warning.

use std::fmt;
use std::str::SplitWhitespace;

use dual_avl::DualAvlTree;
use thiserror::Error;
use tracing::{debug, warn};

/// Error type for malformed scripts.
#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The script has no tokens at all.
    #[error("missing command count")]
    MissingCount,
    /// The leading token is not a non-negative integer.
    #[error("invalid command count `{0}`")]
    InvalidCount(String),
    /// Input ended inside the announced commands.
    #[error("expected {expected} commands, input ends in command {command}")]
    Truncated { expected: usize, command: usize },
    /// A numeric field of a command does not fit an `i32`.
    #[error("command {command}: invalid {field} `{token}`")]
    InvalidNumber {
        command: usize,
        field: &'static str,
        token: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Insert,
    Delete,
    Unknown(String),
}

impl From<&str> for Op {
    fn from(token: &str) -> Self {
        match token {
            "I" => Op::Insert,
            "D" => Op::Delete,
            other => Op::Unknown(other.to_owned()),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Insert => f.write_str("I"),
            Op::Delete => f.write_str("D"),
            Op::Unknown(token) => f.write_str(token),
        }
    }
}

/// One script line: apply `op` to the keys `start, start + step, …` up to `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Command {
    pub(crate) op: Op,
    pub(crate) start: i32,
    pub(crate) step: i32,
    pub(crate) end: i32,
}

impl Command {
    /// Applies the command to `tree`, returning how many keys were added or removed.
    ///
    /// Unknown commands leave the tree untouched and return `None`.
    pub(crate) fn apply(&self, tree: &mut DualAvlTree<i32>) -> Option<usize> {
        match self.op {
            Op::Insert => Some(tree.insert_range(self.start, self.end, self.step)),
            Op::Delete => Some(tree.remove_range(self.start, self.end, self.step)),
            Op::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.op, self.start, self.step, self.end)
    }
}

/// Parses a whole script.
///
/// # Errors
///
/// Returns a [`ScriptError`] if the count is missing or invalid, a numeric field does not parse,
/// or the input holds fewer commands than announced.
pub(crate) fn parse(input: &str) -> Result<Vec<Command>, ScriptError> {
    let mut tokens = input.split_whitespace();

    let count = tokens.next().ok_or(ScriptError::MissingCount)?;
    let count: usize = count
        .parse()
        .map_err(|_| ScriptError::InvalidCount(count.to_owned()))?;

    let mut commands = Vec::with_capacity(count.min(1024));
    for command in 1..=count {
        let mut fields = Fields {
            tokens: &mut tokens,
            expected: count,
            command,
        };
        let op = Op::from(fields.next()?);
        let start = fields.number("start")?;
        let step = fields.number("step")?;
        let end = fields.number("end")?;
        commands.push(Command {
            op,
            start,
            step,
            end,
        });
    }

    let trailing = tokens.count();
    if trailing > 0 {
        debug!(trailing, "ignoring tokens after the last command");
    }

    Ok(commands)
}

/// Replays `commands` against `tree` in order.
pub(crate) fn replay(commands: &[Command], tree: &mut DualAvlTree<i32>) {
    for (index, command) in commands.iter().enumerate() {
        match command.apply(tree) {
            Some(changed) => debug!(index, %command, changed, len = tree.len(), "applied"),
            None => warn!(index, %command, "unknown command"),
        }
    }
}

struct Fields<'a, 'b> {
    tokens: &'a mut SplitWhitespace<'b>,
    expected: usize,
    command: usize,
}

impl<'b> Fields<'_, 'b> {
    fn next(&mut self) -> Result<&'b str, ScriptError> {
        self.tokens.next().ok_or(ScriptError::Truncated {
            expected: self.expected,
            command: self.command,
        })
    }

    fn number(&mut self, field: &'static str) -> Result<i32, ScriptError> {
        let token = self.next()?;
        token.parse().map_err(|_| ScriptError::InvalidNumber {
            command: self.command,
            field,
            token: token.to_owned(),
        })
    }
}
