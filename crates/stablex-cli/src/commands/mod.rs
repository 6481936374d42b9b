pub mod check;
pub mod export;
pub mod inspect;
