//! Registry construction errors.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Capacity was zero or above the configured ceiling.
    #[error("invalid registry capacity {requested} (allowed: {})", allowed_range(.max))]
    InvalidCapacity {
        requested: usize,
        max: Option<usize>,
    },
}

fn allowed_range(max: &Option<usize>) -> String {
    match max {
        Some(max) => format!("1..={max}"),
        None => "1 or more".to_string(),
    }
}
