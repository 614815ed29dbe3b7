//! One module per protocol instruction

mod calculate;
mod delete;
mod list;
mod pin;
mod put;
mod reset;
mod select;
