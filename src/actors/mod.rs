//! Task-based polling of Logstash nodes
//!
//! Each configured target gets its own [`PollWorker`](collector::PollWorker),
//! running as an independent tokio task. All workers publish into one shared
//! [`EventSink`](crate::sink::EventSink) and stop together on a single
//! shutdown signal.
//!
//! ## Architecture Overview
//!
//! ```text
//!                  ┌─────────────────────┐
//!                  │  Host (main)        │── ShutdownTrigger
//!                  └──────────┬──────────┘
//!                             │ start_workers
//!                ┌────────────┼────────────┐
//!                │            │            │
//!        ┌───────▼───────┐    │    ┌───────▼───────┐
//!        │ PollWorker-1  │    │    │ PollWorker-N  │ ◄── ShutdownListener
//!        │ (Target A)    │    │    │ (Target N)    │
//!        └───────┬───────┘    │    └───────┬───────┘
//!                └────────────┼────────────┘
//!                             │ publish(MetricEvent)
//!                   ┌─────────▼──────────┐
//!                   │     EventSink      │
//!                   └────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - **collector**: the worker state machine and its spawn/join helpers
//! - **messages**: events, payloads and worker statistics
//! - **shutdown**: single-use broadcast stop signal
//! - **ticker**: the "wait for next tick" abstraction, real and manual

pub mod collector;
pub mod messages;
pub mod shutdown;
pub mod ticker;
