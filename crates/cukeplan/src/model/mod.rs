//! Document model built by the parser.
//!
//! A [`Feature`] exclusively owns its [`Rule`]s, [`Background`] and
//! [`Scenario`]s; each rule owns its own scenarios and background. Outlines are
//! scenarios carrying [`OutlineData`]. Every entity serialises with `serde` so
//! trees can be snapshotted and compared.

mod container;
mod feature;
mod scenario;
mod step;

pub use container::{Background, DisallowedStep, StepContainer};
pub use feature::{Feature, Rule};
pub use scenario::{ExampleRow, OutlineData, Scenario, ScenarioKind};
pub use step::{DataTable, DocString, Step};
