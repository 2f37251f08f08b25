//! Market state, command handling and the decision state machine.

pub mod decision;
pub mod history;
pub mod ingestion;
pub mod lifecycle;
pub mod protocol;
pub mod session;
pub mod settings;

pub use decision::{Decision, DecisionEngine, DecisionInputs, PositionState, Reason};
pub use history::{InstrumentHistory, MarketStore, RSI_INDICATOR};
pub use lifecycle::{Engine, Shutdown, Step};
pub use protocol::Command;
pub use session::{IndicatorSnapshot, SessionState};
pub use settings::{CandleSchema, GameSettings};
