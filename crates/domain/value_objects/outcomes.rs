/// Result of an insert guarded by a uniqueness rule.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome<T> {
    Created(T),
    AlreadyExists(String),
}

impl<T> CreateOutcome<T> {
    pub fn into_created(self) -> Option<T> {
        match self {
            CreateOutcome::Created(value) => Some(value),
            CreateOutcome::AlreadyExists(_) => None,
        }
    }
}
