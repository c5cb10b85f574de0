// src/repositories/mod.rs

pub mod exercises;
pub mod submissions;
pub mod users;
