//! Collection endpoints shared by every [`Resource`](spaceport_core::resource::Resource).

pub mod handlers;
