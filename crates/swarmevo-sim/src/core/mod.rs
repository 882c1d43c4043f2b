pub use self::{arena::ArenaBounds, bot::Bot, vec2::Vec2};

pub mod arena;
pub mod bot;
pub mod vec2;
