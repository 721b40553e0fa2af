pub mod analysis;
pub mod inspect;
