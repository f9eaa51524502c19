//! Repository layer — query functions organized by table.

pub mod ads;
