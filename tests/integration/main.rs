//! End-to-end tests: the real HTTP client and board against an
//! in-process fake of the betting API.

mod board_flow;
mod client;
