pub mod movie;
pub mod seat;

pub use movie::Movie;
pub use seat::{Seat, SeatStatus};
