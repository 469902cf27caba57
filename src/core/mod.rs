pub mod deadline;
pub mod lookup;
pub mod race;

pub use crate::domain::model::{LookupKey, LookupOutcome, ProviderName, ProviderPayload};
pub use crate::domain::ports::{ConfigProvider, Provider};
pub use crate::utils::error::Result;
