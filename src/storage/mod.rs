use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::services::grid::ReservationGrid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("не удалось прочитать {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("не удалось записать {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Хранилище занятых мест: один текстовый файл `<название>.txt` на фильм
pub struct SeatStore {
    path: PathBuf,
}

impl SeatStore {
    pub fn for_title(data_dir: &Path, title: &str) -> Self {
        Self {
            path: data_dir.join(format!("{title}.txt")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Загрузка ранее занятых мест; отсутствие файла — не ошибка
    pub fn load_into(&self, grid: &mut ReservationGrid) -> Result<usize, StorageError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no saved reservations for '{}'", grid.title());
                return Ok(0);
            }
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let restored = grid
            .restore_from(BufReader::new(file))
            .map_err(|e| StorageError::Read {
                path: self.path.clone(),
                source: e,
            })?;
        info!("restored {} reserved seats for '{}'", restored, grid.title());
        Ok(restored)
    }

    /// Перезаписывает файл целиком: сначала во временный файл рядом,
    /// затем rename поверх старого, чтобы не оставить обрезанный список.
    pub fn save(&self, grid: &ReservationGrid) -> Result<(), StorageError> {
        let write_err = |e| StorageError::Write {
            path: self.path.clone(),
            source: e,
        };

        let tmp = tmp_path(&self.path);
        let file = File::create(&tmp).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        grid.persist_to(&mut writer).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

// ".tmp" приклеивается к полному имени, а не заменяет расширение:
// названия фильмов могут содержать точки
fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
