use crate::error::{config_error, RosterResult};
use crate::roster::{Employee, SeedBook, SeedTemplate, StaffDirectory};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// Default Redis URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default location of the staff and seed file
pub const DEFAULT_ROSTER_CONFIG: &str = "config/roster.toml";

/// Default location of the JSON roster file
pub const DEFAULT_DATA_FILE: &str = "data/roster.json";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Where week rosters are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis { url: String },
    File { path: PathBuf },
}

impl StoreBackend {
    /// Pick a backend from its name
    pub fn from_name(name: &str, redis_url: String, data_file: PathBuf) -> RosterResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis { url: redis_url }),
            "file" => Ok(StoreBackend::File { path: data_file }),
            other => Err(config_error(&format!(
                "Unknown ROSTER_STORE '{}', expected memory, redis or file",
                other
            ))),
        }
    }
}

/// Layout of the roster TOML file
#[derive(Debug, Default, Deserialize)]
struct RosterFile {
    #[serde(default)]
    staff: Vec<Employee>,
    #[serde(default)]
    seeds: Vec<SeedTemplate>,
}

/// Main configuration structure for the roster service
#[derive(Debug, Clone)]
pub struct Config {
    /// Store backend for week rosters
    pub store: StoreBackend,
    /// HTTP port
    pub port: u16,
    /// Timezone used to find the current week
    pub timezone: String,
    /// Staff directory
    pub staff: StaffDirectory,
    /// Seed templates for known weeks
    pub seeds: SeedBook,
}

impl Config {
    /// Load configuration from environment and the roster file
    pub fn load() -> RosterResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        let data_file = env::var("ROSTER_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));
        let store_name = env::var("ROSTER_STORE").unwrap_or_else(|_| "memory".to_string());
        let store = StoreBackend::from_name(&store_name, redis_url, data_file)?;

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| config_error(&format!("Invalid PORT format: {}", value)))?,
            Err(_) => DEFAULT_PORT,
        };

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));

        let roster_path =
            env::var("ROSTER_CONFIG").unwrap_or_else(|_| DEFAULT_ROSTER_CONFIG.to_string());
        let (staff, seeds) = match fs::read_to_string(&roster_path) {
            Ok(content) => Self::parse_roster_file(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No roster file at {}, starting with no staff", roster_path);
                (StaffDirectory::default(), SeedBook::default())
            }
            Err(e) => return Err(e.into()),
        };

        let config = Config {
            store,
            port,
            timezone,
            staff,
            seeds,
        };
        config.tz()?;

        Ok(config)
    }

    /// Parse the staff directory and seed book from roster TOML
    pub fn parse_roster_file(content: &str) -> RosterResult<(StaffDirectory, SeedBook)> {
        let file: RosterFile = toml::from_str(content)?;
        let staff = StaffDirectory::new(file.staff)
            .map_err(|e| config_error(&format!("Invalid staff list: {}", e)))?;
        let seeds = SeedBook::new(file.seeds)?;

        info!(
            "Loaded {} staff and {} seeded weeks",
            staff.len(),
            seeds.len()
        );
        Ok((staff, seeds))
    }

    /// Parsed timezone
    pub fn tz(&self) -> RosterResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| config_error(&format!("Invalid TIMEZONE {}: {}", self.timezone, e)))
    }
}
