//! Actor-based monitoring engine
//!
//! Each actor runs as an independent async task communicating via Tokio channels.
//!
//! ## Architecture Overview
//!
//! ```text
//!            ┌────────────────────┐
//!            │  Engine / API      │
//!            └─────────┬──────────┘
//!                      │ Add / Delete (mpsc + oneshot)
//!            ┌─────────▼──────────┐   Add / Delete (acked)   ┌──────────────┐
//!            │  RegistryActor     ├─────────────────────────►│  StateActor  │◄── Read (lease)
//!            │  (monitor map)     │                          │  (state map) │
//!            └─────────┬──────────┘                          └──────▲───────┘
//!                      │ spawns / cancels                           │
//!        ┌─────────────┼─────────────┐                              │
//!   ┌────▼─────┐  ┌────▼─────┐  ┌────▼─────┐     CheckResult (mpsc) │
//!   │Scheduler1│  │Scheduler2│  │SchedulerN├────────────────────────┘
//!   └──────────┘  └──────────┘  └──────────┘
//! ```
//!
//! ## Actor Types
//!
//! - **RegistryActor**: Owns the registered monitors, runs the add/delete handshakes
//! - **StateActor**: Owns the state records, applies check results
//! - **Scheduler**: One loop per monitor, executes checks on a timer
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each actor has a bounded mpsc command channel
//! 2. **Handshakes**: oneshot acknowledgements bracket scheduling around state records
//! 3. **Results**: Schedulers push check results onto the state actor's update queue

pub mod messages;
pub mod registry;
pub mod scheduler;
pub mod state;
