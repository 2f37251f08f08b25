use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use common::{Action, Result};
use risk::RiskManager;

use crate::decision::DecisionEngine;
use crate::ingestion::{ingest_next_candles, ingest_stacks};
use crate::protocol::Command;
use crate::session::SessionState;

/// Why the engine stopped reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// An `end` command was read.
    EndCommand,
    /// The input stream closed.
    EndOfInput,
}

/// What the caller should do after one line.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue,
    Emit(Action),
    Stop,
}

/// The command loop: reads one line, applies it fully, writes at most one
/// action line, then reads the next.
pub struct Engine {
    session: SessionState,
}

impl Engine {
    pub fn new(session: SessionState) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Handle one input line.
    pub fn handle_line(&mut self, line: &str) -> Result<Step> {
        let Some(command) = Command::parse(line)? else {
            return Ok(Step::Continue);
        };

        match command {
            Command::Settings { key, value } => {
                self.session.settings.apply(&key, &value)?;
                Ok(Step::Continue)
            }
            Command::NextCandles(payload) => {
                ingest_next_candles(&mut self.session, &payload)?;
                Ok(Step::Continue)
            }
            Command::Stacks(payload) => {
                ingest_stacks(&mut self.session, &payload)?;
                Ok(Step::Continue)
            }
            Command::Action => Ok(Step::Emit(self.act()?)),
            Command::End => Ok(Step::Stop),
        }
    }

    /// Run one decision cycle on the selected pair.
    pub fn act(&mut self) -> Result<Action> {
        let (pair, inputs) = self.session.decision_inputs()?;
        let decider = DecisionEngine::new(RiskManager::new(self.session.risk));
        let decision = decider.decide(&pair, &mut self.session.position, &inputs);
        Ok(decision.action)
    }

    /// Drive the engine until `end` or end of input. Errors stop the loop
    /// and are returned to the caller.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<Shutdown>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            risk_fraction = self.session.risk.risk_fraction,
            saver_mode = self.session.risk.saver_mode,
            "Engine running"
        );
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line)? {
                Step::Continue => {}
                Step::Emit(action) => {
                    writer.write_all(format!("{action}\n").as_bytes()).await?;
                    writer.flush().await?;
                }
                Step::Stop => {
                    info!("End command received");
                    return Ok(Shutdown::EndCommand);
                }
            }
        }
        debug!("Input closed");
        Ok(Shutdown::EndOfInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Error;
    use risk::RiskConfig;

    use crate::decision::PositionState;

    const HEADER: &str = "settings candle_format pair,date,high,low,open,close,volume\n";

    fn engine(risk_fraction: f64) -> Engine {
        Engine::new(SessionState::new(RiskConfig { risk_fraction, saver_mode: false }))
    }

    fn candle(date: usize, close: f64, volume: f64) -> String {
        format!("update game next_candles USDT_BTC,{date},0,0,0,{close},{volume}\n")
    }

    /// Sixty steadily falling closes followed by a bounce on thin volume:
    /// every entry condition holds on the last candle.
    fn entry_script() -> String {
        let mut script = String::from(HEADER);
        script.push_str("update game stacks BTC:0.0,USDT:1000.0\n");
        for i in 0..60 {
            script.push_str(&candle(i, 200.0 - i as f64, 100.0));
        }
        script.push_str(&candle(60, 146.0, 50.0));
        script
    }

    async fn run(engine: &mut Engine, script: &str) -> (Result<Shutdown>, Vec<String>) {
        let mut out = Vec::new();
        let result = engine.run(script.as_bytes(), &mut out).await;
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (result, lines)
    }

    #[tokio::test]
    async fn short_history_only_passes() {
        let mut script = String::from(HEADER);
        script.push_str("update game stacks BTC:0.0,USDT:1000.0\n");
        for i in 0..10 {
            script.push_str(&candle(i, 100.0 - i as f64, 100.0));
            script.push_str("action order 10000\n");
        }
        let mut engine = engine(0.5);
        let (result, lines) = run(&mut engine, &script).await;
        assert_eq!(result.unwrap(), Shutdown::EndOfInput);
        assert_eq!(lines, vec!["pass"; 10]);
        assert!(engine.session().indicators.bands.is_degenerate());
    }

    #[tokio::test]
    async fn small_portfolio_never_trades() {
        let mut script = entry_script();
        script = script.replace("USDT:1000.0", "USDT:150.0");
        script.push_str("action\n");
        let mut engine = engine(0.5);
        let (_, lines) = run(&mut engine, &script).await;
        assert_eq!(lines, vec!["pass"]);
        assert_eq!(engine.session().position, PositionState::Flat);
    }

    #[tokio::test]
    async fn full_cycle_buy_take_profit_cooldown() {
        let mut engine = engine(0.5);

        let mut script = entry_script();
        script.push_str("action\n");
        let (_, lines) = run(&mut engine, &script).await;
        assert_eq!(lines, vec![format!("buy USDT_BTC {:?}", 1000.0 / 146.0 * 0.5)]);
        assert_eq!(
            engine.session().position,
            PositionState::Holding { entry_price: 146.0 }
        );

        // 180 > 146 * 1.2
        let script = format!(
            "update game stacks BTC:3.0,USDT:500.0\n{}action\n",
            candle(61, 180.0, 100.0)
        );
        let (_, lines) = run(&mut engine, &script).await;
        assert_eq!(lines, vec!["sell USDT_BTC 3.0"]);
        assert_eq!(engine.session().position, PositionState::Cooldown);

        // Cooldown never trades and clears once price drops under the mid-band.
        let script = format!(
            "update game stacks BTC:0.0,USDT:1040.0\n{}action\n",
            candle(62, 100.0, 100.0)
        );
        let (_, lines) = run(&mut engine, &script).await;
        assert_eq!(lines, vec!["pass"]);
        assert_eq!(engine.session().position, PositionState::Flat);
    }

    #[tokio::test]
    async fn repeated_actions_are_deterministic() {
        let mut engine = engine(0.5);
        let (_, _) = run(&mut engine, &entry_script()).await;

        let mut twin = Engine::new(engine.session().clone());
        let a = engine.act().unwrap();
        let b = twin.act().unwrap();
        assert_eq!(a, b);
        assert_eq!(engine.session().position, twin.session().position);
    }

    #[tokio::test]
    async fn end_stops_before_later_lines() {
        let mut engine = engine(0.5);
        let (result, lines) = run(&mut engine, "\nend\naction\n").await;
        assert_eq!(result.unwrap(), Shutdown::EndCommand);
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn action_before_candles_is_fatal() {
        let mut engine = engine(0.5);
        let (result, lines) = run(&mut engine, "update game stacks USDT:1000\naction\n").await;
        assert!(matches!(result, Err(Error::InsufficientData(_))));
        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn unknown_currency_is_fatal() {
        let mut engine = engine(0.5);
        let script = format!("{HEADER}update game stacks USDT:1000\n{}action\n", candle(0, 10.0, 1.0));
        let (result, _) = run(&mut engine, &script).await;
        assert!(matches!(result, Err(Error::UnknownCurrency(c)) if c == "BTC"));
    }

    #[test]
    fn settings_lines_update_the_session() {
        let mut engine = engine(0.5);
        assert_eq!(engine.handle_line("settings initial_funds 5000").unwrap(), Step::Continue);
        assert_eq!(engine.handle_line("settings foo bar").unwrap(), Step::Continue);
        assert_eq!(engine.session().settings.initial_funds, 5000);
        assert!(engine.handle_line("settings initial_funds lots").is_err());
    }
}
