//! This crate provides a task board: dated tasks, grouped by day, stored in a remote task store.
//!
//! The store is abstracted by the [`TaskGateway`](traits::TaskGateway) trait. This crate provides a PostgREST client
//! (e.g. for a Supabase `tasks` table) in [`gateway::rest`], and a store that lives in this process (optionally backed by a JSON file) in [`gateway::local`].
//!
//! A [`TaskBoard`] mirrors the content of a gateway, and only changes once the gateway has accepted a change. \
//! What a user sees of the board is described by [`view::BoardView`], recomputed from scratch every time.

pub mod traits;
pub mod error;
pub use error::StoreError;

mod task;
pub use task::{Deadline, NewTask, Task, TaskId};
pub mod board;
pub use board::TaskBoard;
pub mod views;
pub mod view;
pub mod feedback;

pub mod gateway;
pub mod resource;
pub mod mock_behaviour;

pub mod config;
