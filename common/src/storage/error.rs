#[derive(Debug)]
pub enum StorageError {
    IoError(std::io::Error),
    SerializeError(serde_yaml_ng::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
            StorageError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e)
    }
}

impl From<serde_yaml_ng::Error> for StorageError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        StorageError::SerializeError(e)
    }
}
