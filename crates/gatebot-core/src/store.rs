/// Document store port.
///
/// The bot opens a handle at startup and passes it around in the app context,
/// but no handler reads or writes it yet.
pub trait Datastore: Send + Sync {
    /// Name of the database the handle is bound to.
    fn database_name(&self) -> &str;
}

/// A datastore that was never connected to anything.
#[derive(Clone, Debug)]
pub struct DetachedDatastore {
    name: String,
}

impl DetachedDatastore {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Datastore for DetachedDatastore {
    fn database_name(&self) -> &str {
        &self.name
    }
}
