pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{BrasilApiClient, ViaCepClient};
pub use config::{ConfigArgs, LogFormat, ServiceConfig, TomlConfig};
pub use crate::core::{
    deadline::{Deadline, DeadlineGovernor, DeadlineGuard},
    lookup::LookupService,
    race::RaceAggregator,
};
pub use domain::model::{LookupKey, LookupOutcome, ProviderName, ProviderPayload};
pub use domain::ports::Provider;
pub use utils::error::{LookupError, Result};
