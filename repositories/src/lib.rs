//! Storage backends for [`items_core::ItemModel`].

pub mod memory;
pub mod mongodb;
