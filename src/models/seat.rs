use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    #[serde(rename = "FREE")]
    Free,
    #[serde(rename = "RESERVED")]
    Reserved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub row: char,
    pub number: u32,
    pub status: SeatStatus,
}

impl Seat {
    pub fn new(row: char, number: u32) -> Self {
        Self {
            row,
            number,
            status: SeatStatus::Free,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.status == SeatStatus::Reserved
    }
}
