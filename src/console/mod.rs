use std::io::{self, BufRead, Write};

use chrono::Local;
use tracing::{error, info};

use crate::services::billing;
use crate::AppState;

/// Консольный цикл: выбор фильма, схема зала, бронирование, подтверждение.
///
/// Ни одна ошибка здесь не фатальна: неверный ввод, конфликт мест или сбой
/// записи на диск приводят к сообщению и возврату в меню.
pub fn run(state: &mut AppState, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let gst_rate = state.config.billing.gst_rate;
    let mut lines = input.lines();

    loop {
        writeln!(output, "\nДобро пожаловать в систему бронирования билетов\n")?;
        writeln!(output, "Доступные фильмы:")?;
        for (i, screening) in state.screenings.iter().enumerate() {
            writeln!(output, "{}. {}", i + 1, screening.grid.title())?;
        }
        writeln!(output, "0. Выход")?;
        write!(
            output,
            "\nВведите номер фильма (1-{}) или 0 для выхода: ",
            state.screenings.len()
        )?;
        output.flush()?;

        let Some(line) = next_line(&mut lines)? else { break };
        let Ok(choice) = line.trim().parse::<usize>() else {
            writeln!(output, "Неверный выбор. Попробуйте еще раз.")?;
            continue;
        };
        if choice == 0 {
            writeln!(
                output,
                "Спасибо, что воспользовались системой бронирования. До свидания!"
            )?;
            break;
        }
        let Some(screening) = state.screenings.get_mut(choice - 1) else {
            writeln!(output, "Неверный выбор. Попробуйте еще раз.")?;
            continue;
        };

        writeln!(output, "{}", screening.grid.render())?;

        write!(output, "Введите ваше имя: ")?;
        output.flush()?;
        let Some(name) = next_line(&mut lines)? else { break };
        let name = name.trim().to_string();

        write!(output, "Введите ряд (A-Z): ")?;
        output.flush()?;
        let Some(row_line) = next_line(&mut lines)? else { break };
        let Some(row) = parse_row(&row_line) else {
            writeln!(output, "Некорректный ряд.")?;
            continue;
        };

        write!(output, "Введите начальную колонку (1-32): ")?;
        output.flush()?;
        let Some(start_line) = next_line(&mut lines)? else { break };
        let Some(start) = parse_column(&start_line) else {
            writeln!(output, "Некорректная колонка.")?;
            continue;
        };

        write!(output, "Введите конечную колонку (1-32): ")?;
        output.flush()?;
        let Some(end_line) = next_line(&mut lines)? else { break };
        let Some(end) = parse_column(&end_line) else {
            writeln!(output, "Некорректная колонка.")?;
            continue;
        };

        match screening.grid.reserve(row, start, end) {
            Ok(seats) => {
                let q = billing::quote(seats, screening.grid.price(), gst_rate);
                writeln!(
                    output,
                    "Места {}{}-{} на «{}» успешно забронированы.",
                    row,
                    start,
                    end,
                    screening.grid.title()
                )?;
                writeln!(output, "Имя: {}", name)?;
                writeln!(output, "Дата: {}", Local::now().format("%Y-%m-%d %H:%M"))?;
                writeln!(output, "Сумма: {}", q.total)?;
                writeln!(output, "GST ({:.0}%): {:.2}", gst_rate * 100.0, q.gst)?;
                writeln!(output, "Итого с GST: {:.2}", q.final_amount)?;
                info!(
                    "reserved {}{}-{} for '{}'",
                    row,
                    start,
                    end,
                    screening.grid.title()
                );

                // Бронь уже применена в памяти; сбой записи не откатывает ее
                if let Err(e) = screening.store.save(&screening.grid) {
                    error!(
                        "failed to persist reservations for '{}': {:?}",
                        screening.grid.title(),
                        e
                    );
                }
            }
            Err(e) => {
                writeln!(output, "Бронирование не удалось: {}.", e)?;
            }
        }
    }

    Ok(())
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<Option<String>> {
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

// Ряд вводится одной буквой, регистр не важен
fn parse_row(line: &str) -> Option<char> {
    let mut chars = line.trim().chars();
    let row = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    Some(row)
}

fn parse_column(line: &str) -> Option<u32> {
    line.trim().parse().ok()
}
