//! Runtime environment: priority-ordered phenomena driving the controller

pub mod environment;
pub mod phenomenon;

pub use environment::{AppliedChange, PassReport, RuntimeEnvironment};
pub use phenomenon::{ChangeMenu, ChosenChanges, DecisionPolicy, Phenomenon, PhenomenonDescription};
