/// Who may perform one operation on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token needed.
    Public,
    /// Claims are attached when a valid token is present; never rejects.
    OptionalSession,
    /// Any valid token.
    Session,
    /// A valid token whose subject matches the `{id}` path segment, or a
    /// privileged one. Without an `{id}` segment only privileged callers pass.
    OwnerOrPrivileged,
    /// A valid token carrying `isPrivileged`.
    Privileged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Access level for each operation of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub list: Access,
    pub get: Access,
    pub create: Access,
    pub update: Access,
    pub delete: Access,
}

impl AccessPolicy {
    /// Anyone reads, any signed-in caller writes.
    pub const PUBLIC_READ: Self = Self {
        list: Access::Public,
        get: Access::Public,
        create: Access::Session,
        update: Access::Session,
        delete: Access::Session,
    };

    pub const fn access(&self, operation: Operation) -> Access {
        match operation {
            Operation::List => self.list,
            Operation::Get => self.get,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}
