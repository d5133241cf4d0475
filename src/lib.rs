//! taskplan: request planning with a task completion and approval workflow.
//!
//! A request is split into ordered tasks; each task is marked done, then
//! approved, and the request is closed once every task is approved. The
//! [`planner`] module holds the state machine, [`db`] the storage backends,
//! and [`api`], [`mcp`] and [`cli`] the ways to reach it.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod mcp;
pub mod planner;
