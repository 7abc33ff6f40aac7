pub use categories::Category;
pub use error::EngineError;
pub use expenses::Expense;
pub use households::{Household, Member};
pub use ops::{Engine, EngineBuilder};
pub use roles::Role;
pub use splits::Split;
pub use summary::{ExpenseSummary, UserBalance};

mod categories;
mod error;
mod expenses;
mod households;
mod invite_codes;
mod memberships;
mod ops;
mod roles;
mod splits;
mod summary;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
