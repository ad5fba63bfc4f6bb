//! Role-based authorization gate
//!
//! A pure mapping from `(Role, Operation)` to allow/deny. The HTTP layer
//! checks it on every mutating route before any store access; whatever the
//! client hides or shows is irrelevant here.

use crate::{error::AppError, models::user::Role};

/// Operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create an author or a book
    CreateCatalog,
    /// Edit an author or a book
    EditCatalog,
    /// Delete an author or a book
    DeleteCatalog,
    /// List, read, modify or delete other users, or change any role
    ManageUsers,
}

impl Operation {
    fn describe(&self) -> &'static str {
        match self {
            Operation::CreateCatalog => "crear registros del catálogo",
            Operation::EditCatalog => "editar registros del catálogo",
            Operation::DeleteCatalog => "eliminar registros del catálogo",
            Operation::ManageUsers => "administrar usuarios",
        }
    }
}

/// Fixed policy table
pub fn is_allowed(role: Role, operation: Operation) -> bool {
    match (role, operation) {
        (Role::Admin, _) => true,
        (Role::Editor, Operation::CreateCatalog | Operation::EditCatalog) => true,
        (Role::Editor, Operation::DeleteCatalog | Operation::ManageUsers) => false,
        (Role::CommonUser, _) => false,
    }
}

/// Same as [`is_allowed`], as a `Result` for use with `?`
pub fn authorize(role: Role, operation: Operation) -> Result<(), AppError> {
    if is_allowed(role, operation) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "El rol '{}' no tiene permiso para {}",
            role,
            operation.describe()
        )))
    }
}
