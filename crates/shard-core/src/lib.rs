//! Tick scheduler and operator control plane for a shard server (§4.E, §9).
//!
//! This crate wires the already-complete [`shard_world`] zone runtime to a
//! fixed-cadence scheduler loop, exposing pause/resume/speed/stop controls
//! to an operator surface (`shard-server`) through shared atomic state. It
//! holds no game logic of its own: zone simulation lives in `shard-world`,
//! action validation in `shard-actions`, market clearing in `shard-economy`,
//! and autonomous-character decisions in `shard-agent-runner`. This crate
//! only decides *when* those pieces run and hands their output to whatever
//! observer the host process (`shard-engine`) registers.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `shard-config.yaml`.
//! - [`operator`] -- Shared operator control state for pause, resume,
//!   speed adjustment, and clean shutdown.
//! - [`scheduler`] -- The tick scheduler loop and [`scheduler::TickObserver`]
//!   trait.

pub mod config;
pub mod operator;
pub mod scheduler;

pub use config::{ConfigError, OperatorConfig, ShardConfig, WorldConfig};
pub use operator::{OperatorState, ShardStatus};
pub use scheduler::{NoOpObserver, TickObserver, TickScheduler};
