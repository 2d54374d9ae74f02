use serde::{Deserialize, Serialize};

// Позиция афиши: название фильма и фиксированная цена места
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub price: u32,
}
