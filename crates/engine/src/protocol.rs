use common::{Error, Result};

/// One input line of the game protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `settings <key> <value>`
    Settings { key: String, value: String },
    /// `update game next_candles <payload>`
    NextCandles(String),
    /// `update game stacks <payload>`
    Stacks(String),
    /// `action ...`, trailing tokens ignored
    Action,
    /// `end`
    End,
}

impl Command {
    /// Parse one line. Blank lines and commands the bot has no use for yield
    /// `None`; a known command missing a token is an error.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Ok(None);
        };

        let mut next = |what: &str| {
            tokens.next().ok_or_else(|| Error::Protocol {
                line: line.to_string(),
                reason: format!("missing {what}"),
            })
        };

        let command = match head {
            "settings" => {
                let key = next("setting key")?.to_string();
                let value = next("setting value")?.to_string();
                Some(Command::Settings { key, value })
            }
            "update" => {
                if next("update target")? != "game" {
                    return Ok(None);
                }
                let key = next("update key")?;
                let payload = next("update payload")?;
                match key {
                    "next_candles" => Some(Command::NextCandles(payload.to_string())),
                    "stacks" => Some(Command::Stacks(payload.to_string())),
                    _ => None,
                }
            }
            "action" => Some(Command::Action),
            "end" => Some(Command::End),
            _ => None,
        };
        Ok(command)
    }
}
