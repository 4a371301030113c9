// Prompt template registry and invocation engine
//
// Every assistant action funnels through the dispatch engine: validate the
// request, look the template up in the catalog, bind parameters and run the
// strategy that matches the template variant.

pub mod catalog;
pub mod dispatch;
pub mod errors;
pub mod library;
pub mod strategy;
pub mod template;
pub mod types;

// Re-export main types
pub use catalog::{TemplateCatalog, TemplateDescriptor};
pub use dispatch::{DispatchEngine, GenerationRequest};
pub use errors::{DispatchError, DispatchResult, ValidationError};
pub use template::{FlatTemplate, InvocationStrategy, OptionalParam, RoleTemplate, Template};
pub use types::{GenerationResult, ParamValue, ParameterSet};
