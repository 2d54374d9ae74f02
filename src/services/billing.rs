use serde::Serialize;

/// Расчет по успешному бронированию: сумма без налога, GST и итог
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub seats: u32,
    pub total: u64,
    pub gst: f64,
    pub final_amount: f64,
}

pub fn quote(seats: u32, price: u32, gst_rate: f64) -> Quote {
    let total = seats as u64 * price as u64;
    let gst = total as f64 * gst_rate;
    Quote {
        seats,
        total,
        gst,
        final_amount: total as f64 + gst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use crate::services::grid::ReservationGrid;

    #[test]
    fn quote_applies_flat_gst() {
        let q = quote(3, 300, 0.18);
        assert_eq!(q.seats, 3);
        assert_eq!(q.total, 900);
        assert!((q.gst - 162.0).abs() < 1e-9);
        assert!((q.final_amount - 1062.0).abs() < 1e-9);
        assert_eq!(format!("{:.2}", q.gst), "162.00");
        assert_eq!(format!("{:.2}", q.final_amount), "1062.00");
    }

    #[test]
    fn zero_rate_means_no_tax() {
        let q = quote(2, 250, 0.0);
        assert_eq!(q.total, 500);
        assert_eq!(q.gst, 0.0);
        assert_eq!(q.final_amount, 500.0);
    }

    // Сквозной сценарий: Mufasa по 300, B3-5 успешно, затем B4-6 с конфликтом
    #[test]
    fn mufasa_booking_scenario() {
        let movie = Movie {
            title: "Mufasa".to_string(),
            price: 300,
        };
        let mut grid = ReservationGrid::new(&movie);

        let seats = grid.reserve('B', 3, 5).unwrap();
        let q = quote(seats, grid.price(), 0.18);
        assert_eq!(q.total, 900);
        assert_eq!(format!("{:.2}", q.gst), "162.00");
        assert_eq!(format!("{:.2}", q.final_amount), "1062.00");

        let before = grid.reserved_seats();
        assert!(grid.reserve('B', 4, 6).is_err());
        assert_eq!(grid.reserved_seats(), before);
    }
}
