use std::env;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::models::Movie;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub billing: BillingConfig,
    pub catalog: Vec<Movie>,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub rust_log: String,
}

// Настройки расчета стоимости
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    pub gst_rate: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                data_dir: env::var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".")),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "cinema_system=info".to_string()),
            },
            billing: BillingConfig {
                gst_rate: env::var("GST_RATE")
                    .unwrap_or_else(|_| "0.18".to_string())
                    .parse()
                    .expect("GST_RATE must be a valid number"),
            },
            // Афиша задается списком (название, цена), а не ветками в коде:
            // новые фильмы добавляются без перекомпиляции
            catalog: match env::var("MOVIE_CATALOG") {
                Ok(path) => {
                    let raw = fs::read_to_string(&path)
                        .expect("MOVIE_CATALOG must point to a readable file");
                    serde_json::from_str(&raw).expect("MOVIE_CATALOG must be a valid JSON catalog")
                }
                Err(_) => Self::default_catalog(),
            },
        }
    }

    // Афиша по умолчанию
    pub fn default_catalog() -> Vec<Movie> {
        vec![
            Movie {
                title: "Mufasa".to_string(),
                price: 300,
            },
            Movie {
                title: "Pushpa-2".to_string(),
                price: 330,
            },
            Movie {
                title: "Ganguva".to_string(),
                price: 200,
            },
        ]
    }
}
