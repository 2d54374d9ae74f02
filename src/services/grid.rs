use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::warn;

use crate::models::{Movie, Seat, SeatStatus};

pub const ROWS: usize = 26;
pub const COLUMNS: usize = 32;

// Ошибки бронирования; любая из них означает, что зал не изменился
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReserveError {
    #[error("ряд '{0}' вне диапазона A-Z")]
    InvalidRow(char),
    #[error("колонки {start}-{end} вне диапазона 1-32")]
    ColumnOutOfRange { start: u32, end: u32 },
    #[error("начальная колонка {start} больше конечной {end}")]
    InvertedRange { start: u32, end: u32 },
    #[error("место {row}{number} уже занято")]
    SeatTaken { row: char, number: u32 },
}

/// Зал одного фильма: 26 рядов по 32 места, построчно в одном буфере
pub struct ReservationGrid {
    title: String,
    price: u32,
    seats: Vec<Seat>,
}

impl ReservationGrid {
    pub fn new(movie: &Movie) -> Self {
        let mut seats = Vec::with_capacity(ROWS * COLUMNS);
        for row in 0..ROWS {
            let letter = (b'A' + row as u8) as char;
            for col in 0..COLUMNS {
                seats.push(Seat::new(letter, col as u32 + 1));
            }
        }
        Self {
            title: movie.title.clone(),
            price: movie.price,
            seats,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    fn index(row: usize, col: usize) -> usize {
        row * COLUMNS + col
    }

    fn row_index(row: char) -> Option<usize> {
        if row.is_ascii_uppercase() {
            Some(row as usize - 'A' as usize)
        } else {
            None
        }
    }

    pub fn is_reserved(&self, row: char, number: u32) -> bool {
        match Self::row_index(row) {
            Some(r) if (1..=COLUMNS as u32).contains(&number) => {
                self.seats[Self::index(r, number as usize - 1)].is_reserved()
            }
            _ => false,
        }
    }

    /// Бронирует непрерывный диапазон мест в одном ряду.
    ///
    /// Сначала проверяется весь диапазон и только потом помечаются места:
    /// при конфликте или некорректном вводе зал остается нетронутым.
    /// Возвращает число забронированных мест.
    pub fn reserve(&mut self, row: char, start: u32, end: u32) -> Result<u32, ReserveError> {
        let row_idx = Self::row_index(row).ok_or(ReserveError::InvalidRow(row))?;
        if start < 1 || end > COLUMNS as u32 {
            return Err(ReserveError::ColumnOutOfRange { start, end });
        }
        if start > end {
            return Err(ReserveError::InvertedRange { start, end });
        }

        for number in start..=end {
            if self.seats[Self::index(row_idx, number as usize - 1)].is_reserved() {
                return Err(ReserveError::SeatTaken { row, number });
            }
        }
        for number in start..=end {
            self.seats[Self::index(row_idx, number as usize - 1)].status = SeatStatus::Reserved;
        }

        Ok(end - start + 1)
    }

    // Занятые места в порядке ряд за рядом, внутри ряда по возрастанию колонки
    pub fn reserved_seats(&self) -> Vec<(char, u32)> {
        self.seats
            .iter()
            .filter(|s| s.is_reserved())
            .map(|s| (s.row, s.number))
            .collect()
    }

    /// Восстанавливает занятые места из построчного источника `<ряд>,<колонка>`.
    ///
    /// Битые записи и координаты вне зала пропускаются с предупреждением:
    /// файлу на диске нельзя доверять вслепую.
    pub fn restore_from(&mut self, source: impl BufRead) -> io::Result<usize> {
        let mut restored = 0;
        for line in source.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(&line) {
                Some((row_idx, col_idx)) => {
                    self.seats[Self::index(row_idx, col_idx)].status = SeatStatus::Reserved;
                    restored += 1;
                }
                None => {
                    warn!("skipping malformed seat record {:?} for '{}'", line, self.title);
                }
            }
        }
        Ok(restored)
    }

    /// Записывает по одной строке `<ряд>,<колонка>` на каждое занятое место.
    pub fn persist_to(&self, mut sink: impl Write) -> io::Result<()> {
        for (row, number) in self.reserved_seats() {
            writeln!(sink, "{},{}", row, number)?;
        }
        Ok(())
    }

    /// Текстовая схема зала: шапка с номерами колонок, затем ряд за рядом.
    /// Чистое чтение, состояние не меняется.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nСхема зала «{}»:\n", self.title));
        out.push_str("   ");
        for col in 1..=COLUMNS {
            out.push_str(&format!("{:2} ", col));
        }
        out.push('\n');

        for row in 0..ROWS {
            let letter = (b'A' + row as u8) as char;
            out.push_str(&format!("{:>2} ", letter));
            for col in 0..COLUMNS {
                out.push_str(if self.seats[Self::index(row, col)].is_reserved() {
                    " X "
                } else {
                    " O "
                });
            }
            out.push('\n');
        }
        out
    }
}

// Разбор записи "<ряд>,<колонка>" с проверкой границ зала.
// Возвращает индексы (ряд, колонка) либо None для любой некорректной строки.
fn parse_record(line: &str) -> Option<(usize, usize)> {
    let (row_part, col_part) = line.split_once(',')?;
    let row_part = row_part.trim();
    let mut chars = row_part.chars();
    let row = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let row_idx = ReservationGrid::row_index(row)?;
    let number: u32 = col_part.trim().parse().ok()?;
    if !(1..=COLUMNS as u32).contains(&number) {
        return None;
    }
    Some((row_idx, number as usize - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mufasa() -> ReservationGrid {
        ReservationGrid::new(&Movie {
            title: "Mufasa".to_string(),
            price: 300,
        })
    }

    #[test]
    fn new_grid_has_no_reservations() {
        let grid = mufasa();
        assert_eq!(grid.reserved_seats().len(), 0);
        assert!(!grid.is_reserved('A', 1));
        assert!(!grid.is_reserved('Z', 32));
    }

    #[test]
    fn reserve_marks_exactly_the_requested_range() {
        let mut grid = mufasa();
        assert_eq!(grid.reserve('B', 3, 5), Ok(3));

        for number in 3..=5 {
            assert!(grid.is_reserved('B', number));
        }
        assert!(!grid.is_reserved('B', 2));
        assert!(!grid.is_reserved('B', 6));
        assert!(!grid.is_reserved('A', 3));
        assert!(!grid.is_reserved('C', 3));
        assert_eq!(grid.reserved_seats().len(), 3);
    }

    #[test]
    fn single_seat_range_is_valid() {
        let mut grid = mufasa();
        assert_eq!(grid.reserve('Z', 32, 32), Ok(1));
        assert!(grid.is_reserved('Z', 32));
    }

    #[test]
    fn overlapping_reserve_fails_without_mutation() {
        let mut grid = mufasa();
        grid.reserve('B', 3, 5).unwrap();
        let before = grid.reserved_seats();

        assert_eq!(
            grid.reserve('B', 4, 6),
            Err(ReserveError::SeatTaken { row: 'B', number: 4 })
        );
        assert_eq!(grid.reserved_seats(), before);
        assert!(!grid.is_reserved('B', 6));
    }

    #[test]
    fn invalid_inputs_fail_without_mutation() {
        let mut grid = mufasa();

        assert_eq!(grid.reserve('@', 1, 2), Err(ReserveError::InvalidRow('@')));
        assert_eq!(grid.reserve('a', 1, 2), Err(ReserveError::InvalidRow('a')));
        assert_eq!(
            grid.reserve('A', 0, 2),
            Err(ReserveError::ColumnOutOfRange { start: 0, end: 2 })
        );
        assert_eq!(
            grid.reserve('A', 1, 33),
            Err(ReserveError::ColumnOutOfRange { start: 1, end: 33 })
        );
        assert_eq!(
            grid.reserve('A', 7, 3),
            Err(ReserveError::InvertedRange { start: 7, end: 3 })
        );
        assert_eq!(grid.reserved_seats().len(), 0);
    }

    #[test]
    fn persist_is_row_major_ordered() {
        let mut grid = mufasa();
        grid.reserve('C', 10, 11).unwrap();
        grid.reserve('A', 2, 2).unwrap();

        let mut buf = Vec::new();
        grid.persist_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "A,2\nC,10\nC,11\n");
    }

    #[test]
    fn persist_then_restore_round_trips() {
        let mut grid = mufasa();
        grid.reserve('A', 1, 4).unwrap();
        grid.reserve('M', 16, 16).unwrap();
        grid.reserve('Z', 30, 32).unwrap();

        let mut buf = Vec::new();
        grid.persist_to(&mut buf).unwrap();

        let mut fresh = mufasa();
        assert_eq!(fresh.restore_from(buf.as_slice()).unwrap(), 8);
        assert_eq!(fresh.reserved_seats(), grid.reserved_seats());
    }

    #[test]
    fn restore_skips_malformed_and_out_of_bounds_records() {
        let data = "A,5\nbogus\nAB,3\n[,7\nB,0\nB,33\nB,x\n\nZ,32\n";
        let mut grid = mufasa();
        assert_eq!(grid.restore_from(data.as_bytes()).unwrap(), 2);
        assert_eq!(grid.reserved_seats(), vec![('A', 5), ('Z', 32)]);
    }

    #[test]
    fn restore_tolerates_duplicate_records() {
        let mut grid = mufasa();
        grid.restore_from("D,7\nD,7\n".as_bytes()).unwrap();
        assert_eq!(grid.reserved_seats(), vec![('D', 7)]);
    }

    #[test]
    fn render_is_idempotent() {
        let mut grid = mufasa();
        grid.reserve('B', 3, 5).unwrap();
        assert_eq!(grid.render(), grid.render());
    }

    #[test]
    fn render_shows_reserved_and_free_glyphs() {
        let mut grid = mufasa();
        let empty = grid.render();
        assert!(!empty.contains('X'));
        assert_eq!(empty.lines().count(), 2 + ROWS + 1);

        grid.reserve('A', 1, 2).unwrap();
        let chart = grid.render();
        assert_eq!(chart.matches(" X ").count(), 2);
        assert!(chart.contains("Mufasa"));
    }

    fn column_range() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=COLUMNS as u32, 1u32..=COLUMNS as u32).prop_map(|(a, b)| (a.min(b), a.max(b)))
    }

    proptest! {
        // Ключевой инвариант: неудачное бронирование никогда не меняет зал
        #[test]
        fn conflicting_reserve_never_mutates(
            row in 0u8..ROWS as u8,
            first in column_range(),
            second in column_range(),
        ) {
            let row = (b'A' + row) as char;
            let mut grid = mufasa();
            grid.reserve(row, first.0, first.1).unwrap();
            let before = grid.reserved_seats();

            let overlaps = second.0 <= first.1 && first.0 <= second.1;
            let result = grid.reserve(row, second.0, second.1);

            if overlaps {
                prop_assert!(result.is_err());
                prop_assert_eq!(grid.reserved_seats(), before);
            } else {
                prop_assert_eq!(result, Ok(second.1 - second.0 + 1));
                prop_assert_eq!(
                    grid.reserved_seats().len(),
                    before.len() + (second.1 - second.0 + 1) as usize
                );
            }
        }
    }
}
