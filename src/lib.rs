pub mod config;
pub mod console;
pub mod models;
pub mod services;
pub mod storage;

use anyhow::Context;
use tracing::warn;

use config::Config;
use services::grid::ReservationGrid;
use storage::SeatStore;

// Shared state для всего приложения
pub struct AppState {
    pub config: Config,
    pub screenings: Vec<Screening>,
}

// Один фильм из афиши: зал и его файл-хранилище
pub struct Screening {
    pub grid: ReservationGrid,
    pub store: SeatStore,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.app.data_dir).with_context(|| {
            format!(
                "failed to create data dir {}",
                config.app.data_dir.display()
            )
        })?;

        let mut screenings = Vec::with_capacity(config.catalog.len());
        for movie in &config.catalog {
            let mut grid = ReservationGrid::new(movie);
            let store = SeatStore::for_title(&config.app.data_dir, &movie.title);
            // Битое хранилище не мешает запуску: начинаем с пустого зала
            if let Err(e) = store.load_into(&mut grid) {
                warn!("failed to load reservations for '{}': {:?}", movie.title, e);
            }
            screenings.push(Screening { grid, store });
        }

        Ok(Self { config, screenings })
    }
}
