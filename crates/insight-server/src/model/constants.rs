// Configuration keys and defaults for the Insight Manager server

pub const SERVER_ADDRESS_PROPERTY: &str = "server.address";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const SERVER_PORT_PROPERTY: &str = "server.port";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const SERVER_CONTEXT_PATH_PROPERTY: &str = "server.context_path";
pub const SERVER_SHUTDOWN_TIMEOUT_PROPERTY: &str = "server.shutdown_timeout_seconds";
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECONDS: u64 = 10;

pub const DB_URL_PROPERTY: &str = "db.url";
pub const DEFAULT_DB_URL: &str = "sqlite://insight-manager.db?mode=rwc";
pub const DB_MIGRATE_PROPERTY: &str = "db.migrate";
pub const DB_MAX_CONNECTIONS: &str = "db.pool.max_connections";
pub const DB_MIN_CONNECTIONS: &str = "db.pool.min_connections";
pub const DB_CONNECT_TIMEOUT: &str = "db.pool.connect_timeout";
pub const DB_ACQUIRE_TIMEOUT: &str = "db.pool.acquire_timeout";
pub const DB_IDLE_TIMEOUT: &str = "db.pool.idle_timeout";
pub const DB_MAX_LIFETIME: &str = "db.pool.max_lifetime";
pub const DB_SQLX_LOGGING: &str = "db.pool.sqlx_logging";

pub const IMPORT_MAX_FILE_SIZE: &str = "insight.import.max_file_size";
pub const DEFAULT_IMPORT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const IMPORT_DEFAULT_POLICY: &str = "insight.import.default_policy";

pub const UPLOAD_DIR: &str = "insight.upload.dir";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const UPLOAD_URL_PREFIX: &str = "insight.upload.url_prefix";
pub const DEFAULT_UPLOAD_URL_PREFIX: &str = "/uploads";
pub const UPLOAD_MAX_FILE_SIZE: &str = "insight.upload.max_file_size";
pub const DEFAULT_UPLOAD_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub const LOGGING_DIR: &str = "logging.dir";
pub const LOGGING_CONSOLE: &str = "logging.console";
pub const LOGGING_FILE: &str = "logging.file";
pub const LOGGING_LEVEL: &str = "logging.level";
pub const LOGGING_ROTATION: &str = "logging.rotation";

/// Multipart field carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// Image types accepted by the upload endpoint, with the extension they are stored under
pub const IMAGE_CONTENT_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
];
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
